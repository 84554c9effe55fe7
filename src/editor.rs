use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Once;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};

use crate::history::History;

static SET_PANIC_HOOK: Once = Once::new();

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        // install panic hook once to restore terminal on panic
        SET_PANIC_HOOK.call_once(|| {
            let prev = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = terminal::disable_raw_mode();
                prev(info);
            }));
        });

        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Ignored,
    Redraw,
    MoveCursor,
    Submit,
    /// Ctrl-C: throw the line away and start over.
    Cancel,
    /// Ctrl-D on an empty line.
    Eof,
}

/// Reads one command line. On a terminal this is a small raw-mode editor;
/// when input is piped it falls back to plain buffered reads.
pub struct LineEditor {
    interactive: bool,
    buffer: String,
    /// Cursor position in chars, not bytes.
    cursor_pos: usize,
}

impl LineEditor {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
            buffer: String::new(),
            cursor_pos: 0,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// `Ok(None)` at end of input.
    pub fn read_line(&mut self, prompt: &str, history: &mut History) -> io::Result<Option<String>> {
        if self.interactive {
            self.read_interactive(prompt, history)
        } else {
            Self::read_piped()
        }
    }

    fn read_piped() -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn read_interactive(&mut self, prompt: &str, history: &mut History) -> io::Result<Option<String>> {
        self.buffer.clear();
        self.cursor_pos = 0;
        history.reset_position();

        let mut stdout = io::stdout();
        let _guard = RawModeGuard::enter()?;

        execute!(stdout, Print(prompt))?;
        stdout.flush()?;

        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match self.handle_key(key, history) {
                KeyOutcome::Ignored => {}
                KeyOutcome::Redraw => self.redraw(prompt)?,
                KeyOutcome::MoveCursor => self.update_cursor_position(prompt)?,
                KeyOutcome::Submit => {
                    execute!(stdout, Print("\r\n"))?;
                    return Ok(Some(self.buffer.clone()));
                }
                KeyOutcome::Cancel => {
                    execute!(stdout, Print("^C\r\n"))?;
                    return Ok(Some(String::new()));
                }
                KeyOutcome::Eof => {
                    execute!(stdout, Print("\r\n"))?;
                    return Ok(None);
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, history: &mut History) -> KeyOutcome {
        let len = self.buffer.chars().count();

        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => KeyOutcome::Submit,

            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.buffer.clear();
                self.cursor_pos = 0;
                KeyOutcome::Cancel
            }

            (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                if self.buffer.is_empty() {
                    KeyOutcome::Eof
                } else {
                    KeyOutcome::Ignored
                }
            }

            (KeyCode::Backspace, _) if self.cursor_pos > 0 => {
                self.cursor_pos -= 1;
                let at = self.byte_index_at_char_pos(self.cursor_pos);
                self.buffer.remove(at);
                KeyOutcome::Redraw
            }

            (KeyCode::Delete, _) if self.cursor_pos < len => {
                let at = self.byte_index_at_char_pos(self.cursor_pos);
                self.buffer.remove(at);
                KeyOutcome::Redraw
            }

            (KeyCode::Left, _) if self.cursor_pos > 0 => {
                self.cursor_pos -= 1;
                KeyOutcome::MoveCursor
            }

            (KeyCode::Right, _) if self.cursor_pos < len => {
                self.cursor_pos += 1;
                KeyOutcome::MoveCursor
            }

            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor_pos = 0;
                KeyOutcome::MoveCursor
            }

            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor_pos = len;
                KeyOutcome::MoveCursor
            }

            (KeyCode::Up, _) => match history.previous() {
                Some(entry) => {
                    self.set_buffer(entry.to_string());
                    KeyOutcome::Redraw
                }
                None => KeyOutcome::Ignored,
            },

            (KeyCode::Down, _) => {
                let entry = history.next().map(str::to_string).unwrap_or_default();
                self.set_buffer(entry);
                KeyOutcome::Redraw
            }

            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                let end = self.byte_index_at_char_pos(self.cursor_pos);
                self.buffer.drain(..end);
                self.cursor_pos = 0;
                KeyOutcome::Redraw
            }

            (KeyCode::Char(c), m) if m == KeyModifiers::NONE || m == KeyModifiers::SHIFT => {
                let at = self.byte_index_at_char_pos(self.cursor_pos);
                self.buffer.insert(at, c);
                self.cursor_pos += 1;
                KeyOutcome::Redraw
            }

            _ => KeyOutcome::Ignored,
        }
    }

    fn set_buffer(&mut self, line: String) {
        self.buffer = line;
        self.cursor_pos = self.buffer.chars().count();
    }

    fn redraw(&self, prompt: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::UntilNewLine),
            Print(prompt),
            Print(&self.buffer),
        )?;
        self.update_cursor_position(prompt)
    }

    fn update_cursor_position(&self, prompt: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        let column = visual_length(prompt) + self.cursor_pos;
        execute!(stdout, cursor::MoveToColumn(column as u16))?;
        stdout.flush()
    }

    fn byte_index_at_char_pos(&self, char_pos: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }
}

/// Printed width of `s`, skipping ANSI color sequences.
fn visual_length(s: &str) -> usize {
    let mut in_escape = false;
    let mut length = 0;

    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else {
            length += 1;
        }
    }
    length
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> LineEditor {
        LineEditor {
            interactive: true,
            buffer: String::new(),
            cursor_pos: 0,
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(ed: &mut LineEditor, history: &mut History, s: &str) {
        for c in s.chars() {
            ed.handle_key(press(KeyCode::Char(c)), history);
        }
    }

    #[test]
    fn test_typing_and_editing() {
        let mut history = History::new(None);
        let mut ed = editor();

        type_str(&mut ed, &mut history, "bgkil 0");
        for _ in 0..2 {
            ed.handle_key(press(KeyCode::Left), &mut history);
        }
        ed.handle_key(press(KeyCode::Char('l')), &mut history);
        assert_eq!(ed.buffer, "bgkill 0");

        ed.handle_key(press(KeyCode::End), &mut history);
        ed.handle_key(press(KeyCode::Backspace), &mut history);
        assert_eq!(ed.buffer, "bgkill ");
        assert_eq!(ed.handle_key(press(KeyCode::Enter), &mut history), KeyOutcome::Submit);
    }

    #[test]
    fn test_history_recall() {
        let mut history = History::new(None);
        history.add("bglist");
        let mut ed = editor();

        ed.handle_key(press(KeyCode::Up), &mut history);
        assert_eq!(ed.buffer, "bglist");
        assert_eq!(ed.cursor_pos, 6);

        ed.handle_key(press(KeyCode::Down), &mut history);
        assert_eq!(ed.buffer, "");
    }

    #[test]
    fn test_ctrl_d_only_ends_input_on_empty_line() {
        let mut history = History::new(None);
        let mut ed = editor();

        assert_eq!(ed.handle_key(ctrl('d'), &mut history), KeyOutcome::Eof);
        type_str(&mut ed, &mut history, "pwd");
        assert_eq!(ed.handle_key(ctrl('d'), &mut history), KeyOutcome::Ignored);
        assert_eq!(ed.handle_key(ctrl('c'), &mut history), KeyOutcome::Cancel);
        assert!(ed.buffer.is_empty());
    }

    #[test]
    fn test_visual_length_skips_color_codes() {
        assert_eq!(visual_length("\x1b[32mab\x1b[0m> "), 4);
    }
}
