//! Panel demo runner (default binary).
//!
//! Lays out the same kind of panels the card game uses, streams activity
//! text into them from a background thread, and reads lines from the user
//! until `quit`. Useful for checking the display on a real terminal.

use std::fs::OpenOptions;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use kitten_tui::display::{Panel, TextDisplay, TextboxConfig};
use kitten_tui::term::{DisplayConfig, StopSignal};
use kitten_tui::types::{Alignment, HAlign, Point, Size, VAlign};

const DEFAULT_LOG_PATH: &str = "/tmp/kitten-tui.log";
const TICK: Duration = Duration::from_millis(1500);

fn main() -> Result<()> {
    init_logging()?;

    let config = DisplayConfig::from_env();
    let title_align = match std::env::var("KITTEN_TITLE_ALIGN") {
        Ok(token) => Alignment::parse(token.trim())?,
        Err(_) => Alignment::TOP_CENTER,
    };
    info!("starting panel demo: {:?}", config);

    let display = TextDisplay::stdout(config);
    let result = display.start().and_then(|()| run(&display, title_align));

    // Always try to restore terminal state.
    if let Err(err) = display.shutdown() {
        warn!("shutdown failed: {:#}", err);
    }
    result
}

fn init_logging() -> Result<()> {
    let path = std::env::var("KITTEN_LOG_PATH").unwrap_or_else(|_| DEFAULT_LOG_PATH.to_string());
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path))?;

    // The terminal is the display; logs must never go to stdout/stderr.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

fn run(display: &TextDisplay, title_align: Alignment) -> Result<()> {
    let cols = display.config().cols as i32;
    let rows = display.config().rows as i32;
    let side = 22.min(cols / 3);

    let title_anchor = match title_align.horizontal {
        HAlign::Left => 0,
        HAlign::Center => cols / 2,
        HAlign::Right => cols,
    };
    display.add_panel_config(
        "title",
        TextboxConfig::new(Point::new(title_anchor, 0), Size::new(40, 1))
            .text("EXPLODING KITTENS - panel demo")
            .alignment(Alignment::new(VAlign::Top, title_align.horizontal)),
    )?;
    let activity = display.add_panel_config(
        "activity",
        TextboxConfig::new(
            Point::new(0, 2),
            Size::new((cols - side - 1).max(1) as u16, (rows - 5).max(1) as u16),
        )
        .text("Welcome! Cards are being shuffled..."),
    )?;
    let status = display.add_panel_config(
        "status",
        TextboxConfig::new(
            Point::new(cols - side, 2),
            Size::new(side.max(1) as u16, 6),
        )
        .priority(1),
    )?;
    display.add_panel_config(
        "help",
        TextboxConfig::new(Point::new(0, rows - 2), Size::new(cols as u16, 1))
            .text("Type anything. 'hide'/'show' toggle the status panel, 'undo' drops a line, 'quit' exits."),
    )?;

    let stop = Arc::new(StopSignal::new());
    let ticker = spawn_ticker(Arc::clone(&stop), activity.clone(), status.clone())?;

    let result = prompt_loop(display, &activity, &status, rows);

    stop.stop();
    if ticker.join().is_err() {
        warn!("ticker thread panicked");
    }
    result
}

fn prompt_loop(display: &TextDisplay, activity: &Panel, status: &Panel, rows: i32) -> Result<()> {
    loop {
        let line = display.read_input(Point::new(0, rows - 1), "> ")?;
        match line.trim() {
            "" => continue,
            "quit" | "q" => return Ok(()),
            "hide" => status.set_visible(false),
            "show" => status.set_visible(true),
            "undo" => activity.delete_last_lines(1),
            other => activity.append_text(&format!("\nYou said: {}", other)),
        }
    }
}

fn spawn_ticker(
    stop: Arc<StopSignal>,
    activity: Panel,
    status: Panel,
) -> Result<thread::JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("demo-ticker".to_string())
        .spawn(move || {
            let mut turn: u32 = 0;
            while !stop.wait(TICK) {
                turn += 1;
                activity.append_text(&format!("\nTurn {}: a card is drawn.", turn));
                status.replace_text(&format!(
                    "Turn: {}\nCards left: {}\nAlive: 3",
                    turn,
                    56u32.saturating_sub(turn)
                ));
            }
        })?;
    Ok(handle)
}
