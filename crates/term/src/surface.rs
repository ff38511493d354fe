//! GridSurface: a shared character grid plus the thread that keeps the
//! terminal in sync with it.
//!
//! Lifecycle is two-phase. [`GridSurface::new`] only allocates; nothing touches
//! the terminal until [`GridSurface::start`], which enters full-screen mode,
//! spawns the flush thread and blocks until the terminal has the configured
//! size. [`GridSurface::shutdown`] (or drop) stops the thread and restores the
//! terminal.
//!
//! Writers and the flush thread share the grid through a mutex; the flush
//! thread copies the grid under the lock and paints the copy, so a flush never
//! sees a half-finished write. Interactive input pauses flushing through a
//! [`FlushGate`] and waits for the frame in flight before touching the screen.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use anyhow::{bail, Result};
use log::{debug, error, info, warn};

use crate::backend::TerminalBackend;
use crate::config::DisplayConfig;
use crate::grid::{Canvas, CharGrid};
use crate::sync::{lock, FlushGate, StopSignal};
use crate::types::{Alignment, DisplayError, HAlign, Point, Size, VAlign};

struct SurfaceShared {
    config: DisplayConfig,
    grid: Mutex<CharGrid>,
    backend: Mutex<Box<dyn TerminalBackend>>,
    gate: FlushGate,
    stop: StopSignal,
}

impl SurfaceShared {
    /// One tick of the flush loop. Skipped entirely while paused.
    fn flush_frame(&self, frame: &mut CharGrid) -> Result<()> {
        let Some(_token) = self.gate.begin_flush() else {
            return Ok(());
        };
        frame.clone_from(&*lock(&self.grid));
        lock(&self.backend).draw(frame)
    }

    fn flush_loop(&self) {
        let interval = self.config.frame_interval();
        let mut frame = CharGrid::new(self.config.cols, self.config.rows);
        debug!("flush loop started ({:?} per frame)", interval);
        while !self.stop.wait(interval) {
            if let Err(err) = self.flush_frame(&mut frame) {
                error!("failed to flush frame: {:#}", err);
            }
        }
        debug!("flush loop exited");
    }
}

/// Fixed-size character grid mirrored to a terminal at a fixed frame rate.
pub struct GridSurface {
    shared: Arc<SurfaceShared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl GridSurface {
    pub fn new(config: DisplayConfig, backend: impl TerminalBackend + 'static) -> Self {
        let grid = CharGrid::new(config.cols, config.rows);
        Self {
            shared: Arc::new(SurfaceShared {
                config,
                grid: Mutex::new(grid),
                backend: Mutex::new(Box::new(backend)),
                gate: FlushGate::new(),
                stop: StopSignal::new(),
            }),
            worker: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.shared.config
    }

    pub fn cols(&self) -> u16 {
        self.shared.config.cols
    }

    pub fn rows(&self) -> u16 {
        self.shared.config.rows
    }

    pub fn is_running(&self) -> bool {
        lock(&self.worker).is_some()
    }

    /// Enter the terminal, start flushing and wait for a correctly sized terminal.
    ///
    /// Calling `start` on a running surface does nothing.
    pub fn start(&self) -> Result<()> {
        {
            let mut worker = lock(&self.worker);
            if worker.is_some() {
                return Ok(());
            }

            lock(&self.shared.backend).enter()?;
            self.shared.stop.reset();

            let shared = Arc::clone(&self.shared);
            let handle = thread::Builder::new()
                .name("grid-flush".to_string())
                .spawn(move || shared.flush_loop())?;
            *worker = Some(handle);
        }
        info!(
            "grid surface started at {}x{}, {} fps",
            self.cols(),
            self.rows(),
            self.shared.config.fps
        );

        self.wait_for_terminal_size()
    }

    /// Fail with [`DisplayError::TerminalSizeMismatch`] unless the terminal
    /// is exactly `cols` x `rows`.
    pub fn check_terminal_size(&self) -> Result<()> {
        let actual = lock(&self.shared.backend).size()?;
        let expected = self.shared.config.size();
        if actual != expected {
            return Err(DisplayError::TerminalSizeMismatch { expected, actual }.into());
        }
        Ok(())
    }

    fn wait_for_terminal_size(&self) -> Result<()> {
        let mut reported: Option<Size> = None;
        loop {
            let err = match self.check_terminal_size() {
                Ok(()) => break,
                Err(err) => err,
            };
            let actual = match err.downcast_ref::<DisplayError>() {
                Some(DisplayError::TerminalSizeMismatch { actual, .. }) => *actual,
                _ => return Err(err),
            };

            let message = err.to_string();
            if reported != Some(actual) {
                warn!("{}", message);
                reported = Some(actual);
            }

            let center = Point::new(self.cols() as i32 / 2, self.rows() as i32 / 2);
            self.paint(|grid| {
                grid.clear();
                grid.draw_border();
                grid.write_horizontal(&message, center, HAlign::Center);
            });
            self.force_flush()?;

            // Raw mode swallows SIGINT; the interrupt keys are the way out.
            if lock(&self.shared.backend).poll_interrupt()? {
                warn!("interrupted while waiting for terminal size");
                bail!("interrupted while waiting for terminal size");
            }
            if self.shared.stop.wait(self.shared.config.frame_interval()) {
                return Err(err);
            }
        }

        self.clear();
        Ok(())
    }

    /// Stop the flush thread, wait for it, and restore the terminal.
    ///
    /// Safe to call more than once.
    pub fn shutdown(&self) -> Result<()> {
        let Some(handle) = lock(&self.worker).take() else {
            return Ok(());
        };

        self.shared.stop.stop();
        if handle.join().is_err() {
            error!("flush thread panicked");
        }
        lock(&self.shared.backend).exit()?;
        info!("grid surface shut down");
        Ok(())
    }

    /// Run `f` with exclusive access to the grid.
    ///
    /// Everything `f` does lands in the same frame.
    pub fn paint<R>(&self, f: impl FnOnce(&mut CharGrid) -> R) -> R {
        let mut grid = lock(&self.shared.grid);
        f(&mut *grid)
    }

    /// Copy of the current buffer.
    pub fn snapshot(&self) -> CharGrid {
        lock(&self.shared.grid).clone()
    }

    pub fn clear(&self) {
        self.paint(CharGrid::clear);
    }

    pub fn write_horizontal(&self, text: &str, at: Point, align: HAlign) {
        self.paint(|grid| grid.write_horizontal(text, at, align));
    }

    pub fn write_vertical(&self, text: &str, at: Point, align: VAlign) {
        self.paint(|grid| grid.write_vertical(text, at, align));
    }

    pub fn draw_pattern(&self, pattern: &str, at: Point, align: Alignment) {
        self.paint(|grid| grid.draw_pattern(pattern, at, align));
    }

    pub fn draw_border(&self) {
        self.paint(CharGrid::draw_border);
    }

    /// Paint the current buffer now, regardless of the frame schedule.
    pub fn force_flush(&self) -> Result<()> {
        let frame = self.snapshot();
        lock(&self.shared.backend).draw(&frame)
    }

    /// Block for one line of input typed at `at`, after `prompt`.
    ///
    /// Automatic flushing is paused for the duration of the read. The latest
    /// buffer is painted once the frame in flight (if any) has finished, so
    /// the user always answers against an up-to-date screen.
    pub fn read_input(&self, at: Point, prompt: &str) -> Result<String> {
        let _pause = self.shared.gate.pause();
        let frame = self.snapshot();
        let mut backend = lock(&self.shared.backend);
        backend.draw(&frame)?;
        debug!("reading input at {}", at);
        backend.read_line(at, prompt)
    }
}

impl Canvas for GridSurface {
    fn draw_pattern(&mut self, pattern: &str, at: Point, align: Alignment) {
        GridSurface::draw_pattern(self, pattern, at, align);
    }
}

impl Drop for GridSurface {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            error!("failed to shut down grid surface: {:#}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use std::time::Duration;

    fn headless(cols: u16, rows: u16) -> (GridSurface, HeadlessBackend) {
        let backend = HeadlessBackend::new(Size::new(cols, rows));
        let config = DisplayConfig::new(cols, rows, 200.0);
        (GridSurface::new(config, backend.clone()), backend)
    }

    #[test]
    fn new_surface_has_no_side_effects() {
        let (surface, backend) = headless(4, 2);
        assert!(!surface.is_running());
        assert!(!backend.is_entered());
        assert_eq!(backend.frame_count(), 0);
    }

    #[test]
    fn force_flush_paints_current_buffer() {
        let (surface, backend) = headless(4, 1);
        surface.write_horizontal("ok", Point::new(1, 0), HAlign::Left);
        surface.force_flush().unwrap();
        assert_eq!(backend.last_frame().unwrap(), vec![" ok "]);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let (surface, backend) = headless(4, 1);
        surface.start().unwrap();
        assert!(backend.is_entered());
        surface.shutdown().unwrap();
        surface.shutdown().unwrap();
        assert_eq!(backend.exit_count(), 1);
        assert!(!surface.is_running());
    }

    #[test]
    fn interrupt_key_aborts_the_size_wait() {
        let backend = HeadlessBackend::new(Size::new(3, 3));
        let surface = GridSurface::new(DisplayConfig::new(8, 2, 100.0), backend.clone());
        backend.push_interrupt();

        let err = surface.start().unwrap_err();
        assert!(err.to_string().contains("interrupted"));
        surface.shutdown().unwrap();
        assert_eq!(backend.exit_count(), 1);
    }

    #[test]
    fn flush_loop_paints_frames_while_running() {
        let (surface, backend) = headless(4, 1);
        surface.start().unwrap();
        surface.write_horizontal("abcd", Point::new(0, 0), HAlign::Left);
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while backend.last_frame() != Some(vec!["abcd".to_string()]) {
            assert!(std::time::Instant::now() < deadline, "no frame flushed");
            thread::sleep(Duration::from_millis(5));
        }
        surface.shutdown().unwrap();
    }
}
