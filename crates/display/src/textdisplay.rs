//! TextDisplay: composites named panels onto a grid surface.
//!
//! The display owns one [`GridSurface`] and a registry of [`Panel`]s keyed by
//! unique name. A background thread re-composites every panel at the
//! configured cadence; the surface's own thread flushes the result to the
//! terminal. The registry lock is held across a whole composite, so panels
//! can't be added or removed halfway through a frame.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use anyhow::{bail, Result};
use log::{debug, error, info};

use crate::panel::{Panel, TextboxConfig};
use crate::term::{CrosstermBackend, DisplayConfig, GridSurface, StopSignal, TerminalBackend};
use crate::types::{DisplayError, Point, Size};

/// Base name of the transient panel that shows an input prompt.
const PROMPT_PANEL: &str = "prompt";

struct DisplayInner {
    surface: GridSurface,
    panels: Mutex<HashMap<String, Panel>>,
    stop: StopSignal,
}

impl DisplayInner {
    fn panels(&self) -> MutexGuard<'_, HashMap<String, Panel>> {
        self.panels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn composite_once(&self) {
        let panels = self.panels();

        let mut ordered: Vec<(i32, &str, &Panel)> = panels
            .iter()
            .map(|(name, panel)| (panel.priority(), name.as_str(), panel))
            .collect();
        ordered.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

        self.surface.paint(|grid| {
            grid.clear();
            for (_, _, panel) in &ordered {
                panel.render_onto(grid);
            }
        });
    }

    fn composite_loop(&self) {
        let interval = self.surface.config().composite_interval();
        debug!("composite loop started ({:?} per composite)", interval);
        while !self.stop.wait(interval) {
            self.composite_once();
        }
        debug!("composite loop exited");
    }
}

/// Panel compositor over a terminal grid.
pub struct TextDisplay {
    inner: Arc<DisplayInner>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl TextDisplay {
    /// Build a display without touching the terminal. Call [`start`](Self::start) next.
    pub fn new(config: DisplayConfig, backend: impl TerminalBackend + 'static) -> Self {
        Self {
            inner: Arc::new(DisplayInner {
                surface: GridSurface::new(config, backend),
                panels: Mutex::new(HashMap::new()),
                stop: StopSignal::new(),
            }),
            worker: Mutex::new(None),
        }
    }

    /// A display drawing to the process's own terminal.
    pub fn stdout(config: DisplayConfig) -> Self {
        Self::new(config, CrosstermBackend::new())
    }

    pub fn surface(&self) -> &GridSurface {
        &self.inner.surface
    }

    pub fn config(&self) -> &DisplayConfig {
        self.inner.surface.config()
    }

    fn worker(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start the surface (blocking until the terminal size is right), then
    /// the composite loop. Calling `start` again does nothing.
    ///
    /// The size wait runs without holding any display lock, so a
    /// [`shutdown`](Self::shutdown) from another thread ends it.
    pub fn start(&self) -> Result<()> {
        if self.worker().is_some() {
            return Ok(());
        }

        self.inner.surface.start()?;

        let mut worker = self.worker();
        if worker.is_some() {
            return Ok(());
        }
        if !self.inner.surface.is_running() {
            bail!("display was shut down while starting");
        }
        self.inner.stop.reset();

        let inner = Arc::clone(&self.inner);
        let handle = thread::Builder::new()
            .name("panel-composite".to_string())
            .spawn(move || inner.composite_loop())?;
        *worker = Some(handle);
        info!("text display started");
        Ok(())
    }

    /// Stop compositing, then shut the surface down. Safe to call more than once.
    pub fn shutdown(&self) -> Result<()> {
        // Held throughout so a concurrent `start` can't install a composite
        // thread on a surface that is going away.
        let mut worker = self.worker();
        if let Some(handle) = worker.take() {
            self.inner.stop.stop();
            if handle.join().is_err() {
                error!("composite thread panicked");
            }
            info!("text display stopped");
        }
        self.inner.surface.shutdown()
    }

    /// Register `panel` under `name`. Returns the registered handle.
    pub fn add_panel(&self, name: impl Into<String>, panel: Panel) -> Result<Panel, DisplayError> {
        let name = name.into();
        let mut panels = self.inner.panels();
        if panels.contains_key(&name) {
            return Err(DisplayError::NameConflict(name));
        }
        debug!("registered panel {:?}", name);
        panels.insert(name, panel.clone());
        Ok(panel)
    }

    /// Build a panel from `config` and register it under `name`.
    pub fn add_panel_config(
        &self,
        name: impl Into<String>,
        config: TextboxConfig,
    ) -> Result<Panel, DisplayError> {
        self.add_panel(name, Panel::new(config))
    }

    pub fn remove_panel(&self, name: &str) -> Result<Panel, DisplayError> {
        let panel = self
            .inner
            .panels()
            .remove(name)
            .ok_or_else(|| DisplayError::NotFound(name.to_string()))?;
        debug!("removed panel {:?}", name);
        Ok(panel)
    }

    pub fn get_panel(&self, name: &str) -> Result<Panel, DisplayError> {
        self.inner
            .panels()
            .get(name)
            .cloned()
            .ok_or_else(|| DisplayError::NotFound(name.to_string()))
    }

    pub fn contains_panel(&self, name: &str) -> bool {
        self.inner.panels().contains_key(name)
    }

    /// Registered panel names, sorted.
    pub fn panel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.panels().keys().cloned().collect();
        names.sort();
        names
    }

    /// Clear the grid and draw every panel in ascending priority.
    pub fn composite_once(&self) {
        self.inner.composite_once();
    }

    /// Composite and flush right away.
    pub fn force_update(&self) -> Result<()> {
        self.inner.composite_once();
        self.inner.surface.force_flush()
    }

    /// Show `prompt` at `location` and block for a line typed right after it.
    ///
    /// The prompt is drawn by a transient panel on top of everything else and
    /// removed again once the read finishes, whether or not it succeeded.
    pub fn read_input(&self, location: Point, prompt: &str) -> Result<String> {
        let width = prompt.chars().count();
        let name = self.register_prompt(location, prompt, width);

        let cursor = location.offset(width as i32, 0);
        let result = self
            .force_update()
            .and_then(|()| self.inner.surface.read_input(cursor, ""));

        if self.inner.panels().remove(&name).is_some() {
            debug!("removed prompt panel {:?}", name);
        }
        result
    }

    fn register_prompt(&self, location: Point, prompt: &str, width: usize) -> String {
        let mut panels = self.inner.panels();
        let mut name = PROMPT_PANEL.to_string();
        let mut suffix = 0;
        while panels.contains_key(&name) {
            suffix += 1;
            name = format!("{}-{}", PROMPT_PANEL, suffix);
        }

        let size = Size::new(width.min(u16::MAX as usize) as u16, 1);
        let config = TextboxConfig::new(location, size)
            .text(prompt)
            .priority(i32::MAX);
        panels.insert(name.clone(), Panel::new(config));
        name
    }
}

impl Drop for TextDisplay {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            error!("failed to shut down text display: {:#}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::HeadlessBackend;

    fn display(cols: u16, rows: u16) -> (TextDisplay, HeadlessBackend) {
        let backend = HeadlessBackend::new(Size::new(cols, rows));
        let config = DisplayConfig::new(cols, rows, 100.0);
        (TextDisplay::new(config, backend.clone()), backend)
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let (display, _) = display(4, 1);
        let first = display
            .add_panel_config("log", TextboxConfig::default())
            .unwrap();
        let second = Panel::new(TextboxConfig::default().text("other"));
        assert_eq!(
            display.add_panel("log", second.clone()).unwrap_err(),
            DisplayError::NameConflict("log".to_string())
        );
        let stored = display.get_panel("log").unwrap();
        assert!(stored.same_panel(&first));
        assert!(!stored.same_panel(&second));
    }

    #[test]
    fn unknown_names_are_not_found() {
        let (display, _) = display(4, 1);
        assert_eq!(
            display.get_panel("nope").unwrap_err(),
            DisplayError::NotFound("nope".to_string())
        );
        assert!(display.remove_panel("nope").is_err());
    }

    #[test]
    fn prompt_names_get_suffixes() {
        let (display, _) = display(10, 1);
        display
            .add_panel_config(PROMPT_PANEL, TextboxConfig::default())
            .unwrap();
        let name = display.register_prompt(Point::new(0, 0), "> ", 2);
        assert_eq!(name, "prompt-1");
        let name = display.register_prompt(Point::new(0, 0), "> ", 2);
        assert_eq!(name, "prompt-2");
    }

    #[test]
    fn shutdown_ends_a_start_stuck_on_terminal_size() {
        let backend = HeadlessBackend::new(Size::new(5, 5));
        let display = TextDisplay::new(DisplayConfig::new(10, 3, 100.0), backend.clone());

        thread::scope(|scope| {
            let starting = scope.spawn(|| display.start());
            let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
            while backend.frame_count() == 0 {
                assert!(std::time::Instant::now() < deadline, "size banner never shown");
                thread::sleep(std::time::Duration::from_millis(2));
            }

            display.shutdown().unwrap();
            let result = starting.join().unwrap();
            assert!(result.is_err());
        });
        assert!(!display.surface().is_running());
        assert_eq!(backend.exit_count(), 1);
        assert!(display.worker().is_none());
    }

    #[test]
    fn shutdown_without_start_is_harmless() {
        let (display, backend) = display(4, 1);
        display.shutdown().unwrap();
        assert_eq!(backend.exit_count(), 0);
    }
}
