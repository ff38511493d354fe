//! Key mapping from terminal events to line edits.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A single edit applied to the line being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEdit {
    Insert(char),
    Backspace,
    Submit,
    /// Ctrl+C, Ctrl+D or Esc: abandon the read.
    Interrupt,
}

/// Map a keyboard event to a line edit.
pub fn map_key_event(key: KeyEvent) -> Option<LineEdit> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Char('d') | KeyCode::Char('D') => {
                Some(LineEdit::Interrupt)
            }
            // Raw mode delivers Ctrl+M / Ctrl+J for some Enter keys.
            KeyCode::Char('m') | KeyCode::Char('j') => Some(LineEdit::Submit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Enter => Some(LineEdit::Submit),
        KeyCode::Backspace => Some(LineEdit::Backspace),
        KeyCode::Esc => Some(LineEdit::Interrupt),
        KeyCode::Char(ch) if is_single_cell(ch) => Some(LineEdit::Insert(ch)),
        _ => None,
    }
}

// Only single-byte printable characters can be echoed one cell at a time.
fn is_single_cell(ch: char) -> bool {
    ch.is_ascii() && !ch.is_ascii_control()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    #[test]
    fn test_printable_keys_insert() {
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Char('a'))),
            Some(LineEdit::Insert('a'))
        );
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(LineEdit::Insert('A'))
        );
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(LineEdit::Insert(' '))
        );
        assert_eq!(map_key_event(KeyEvent::from(KeyCode::Char('é'))), None);
    }

    #[test]
    fn test_editing_keys() {
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Enter)),
            Some(LineEdit::Submit)
        );
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Backspace)),
            Some(LineEdit::Backspace)
        );
        assert_eq!(map_key_event(KeyEvent::from(KeyCode::Left)), None);
    }

    #[test]
    fn test_interrupt_keys() {
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(LineEdit::Interrupt)
        );
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Some(LineEdit::Interrupt)
        );
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Esc)),
            Some(LineEdit::Interrupt)
        );
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_release_events_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key_event(release), None);
    }
}
