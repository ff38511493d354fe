use std::thread;
use std::time::{Duration, Instant};

use kitten_tui::term::{DisplayConfig, GridSurface, HeadlessBackend};
use kitten_tui::types::{Alignment, DisplayError, HAlign, Point, Size};

fn wait_until(what: &str, mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        thread::sleep(Duration::from_millis(2));
    }
}

#[test_log::test]
fn start_waits_for_the_expected_terminal_size() {
    let expected = Size::new(50, 5);
    let backend = HeadlessBackend::with_sizes([Size::new(40, 5), Size::new(40, 5), expected]);
    let surface = GridSurface::new(DisplayConfig::new(50, 5, 200.0), backend.clone());

    surface.start().unwrap();

    let banner = "Incorrect terminal size: 40x5, expected: 50x5";
    let frames = backend.frames();
    let shown = frames
        .iter()
        .find(|frame| frame.iter().any(|line| line.contains(banner)))
        .expect("size banner was never painted");
    assert!(shown[0].starts_with('+') && shown[0].ends_with('+'));
    assert!(shown[1].starts_with('|') && shown[1].ends_with('|'));
    assert!(shown[2].contains(banner));

    // Once the size is right the banner is gone.
    assert!(surface.snapshot().lines().iter().all(|line| line.trim().is_empty()));
    surface.check_terminal_size().unwrap();
    surface.shutdown().unwrap();
}

#[test]
fn size_mismatch_reports_both_sizes() {
    let backend = HeadlessBackend::new(Size::new(30, 10));
    let surface = GridSurface::new(DisplayConfig::new(80, 24, 10.0), backend);

    let err = surface.check_terminal_size().unwrap_err();
    assert_eq!(
        err.downcast_ref::<DisplayError>(),
        Some(&DisplayError::TerminalSizeMismatch {
            expected: Size::new(80, 24),
            actual: Size::new(30, 10),
        })
    );
    assert_eq!(
        err.to_string(),
        "Incorrect terminal size: 30x10, expected: 80x24"
    );
}

#[test]
fn writes_become_visible_on_the_next_frame() {
    let backend = HeadlessBackend::new(Size::new(8, 2));
    let surface = GridSurface::new(DisplayConfig::new(8, 2, 200.0), backend.clone());
    surface.start().unwrap();

    surface.draw_pattern("meow\npurr", Point::new(8, 2), Alignment::BOTTOM_RIGHT);
    wait_until("the pattern to be flushed", || {
        backend.last_frame() == Some(vec!["    meow".to_string(), "    purr".to_string()])
    });

    surface.shutdown().unwrap();
    assert!(!backend.is_entered());
}

#[test]
fn read_input_paints_before_reading() {
    let backend = HeadlessBackend::new(Size::new(6, 2));
    let surface = GridSurface::new(DisplayConfig::new(6, 2, 10.0), backend.clone());
    backend.push_input("draw");

    surface.write_horizontal("hand?", Point::new(0, 0), HAlign::Left);
    let line = surface.read_input(Point::new(0, 1), "> ").unwrap();

    assert_eq!(line, "draw");
    assert_eq!(backend.last_frame().unwrap()[0], "hand? ");
    assert_eq!(backend.reads(), vec![(Point::new(0, 1), "> ".to_string())]);
}

#[test]
fn read_input_without_input_is_an_error() {
    let backend = HeadlessBackend::new(Size::new(4, 1));
    let surface = GridSurface::new(DisplayConfig::new(4, 1, 10.0), backend);
    assert!(surface.read_input(Point::new(0, 0), "").is_err());
}

#[test]
fn concurrent_writers_never_tear_a_line() {
    let backend = HeadlessBackend::new(Size::new(10, 4));
    let surface = GridSurface::new(DisplayConfig::new(10, 4, 500.0), backend.clone());
    surface.start().unwrap();

    thread::scope(|scope| {
        for row in 0..4 {
            let surface = &surface;
            scope.spawn(move || {
                for i in 0..250u32 {
                    let ch = (b'a' + (i % 26) as u8) as char;
                    let line: String = std::iter::repeat(ch).take(10).collect();
                    surface.write_horizontal(&line, Point::new(0, row), HAlign::Left);
                }
            });
        }
    });
    surface.force_flush().unwrap();
    surface.shutdown().unwrap();

    for frame in backend.frames() {
        for line in frame {
            let first = line.chars().next().unwrap();
            assert!(line.chars().all(|c| c == first), "torn line {:?}", line);
        }
    }
}
