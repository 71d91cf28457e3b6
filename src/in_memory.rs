use std::fmt::{Debug, Formatter};
use std::io::Write;
use std::sync::{Arc, Mutex};

use vt100::Parser;

use crate::TermLike;

/// A thin wrapper around [`vt100::Parser`] that also keeps every raw write.
///
/// This is just an [`Arc`] around its internal state, so it can be freely cloned: hand one clone
/// to a [`DrawTarget`](crate::DrawTarget) and inspect the screen through the other.
#[derive(Debug, Clone)]
pub struct InMemoryTerm {
    state: Arc<Mutex<InMemoryTermState>>,
}

impl InMemoryTerm {
    pub fn new(rows: u16, cols: u16) -> InMemoryTerm {
        assert!(rows > 0, "rows must be > 0");
        assert!(cols > 0, "cols must be > 0");
        InMemoryTerm {
            state: Arc::new(Mutex::new(InMemoryTermState::new(rows, cols))),
        }
    }

    /// Returns what is visible on screen, one line per row.
    ///
    /// Trailing whitespace is trimmed from every row, and empty rows are trimmed from the end.
    pub fn contents(&self) -> String {
        let state = self.state.lock().unwrap();

        // `Screen::contents` does not include newlines, so rebuild the contents row by row.
        let mut rows = state
            .parser
            .screen()
            .rows(0, state.width)
            .map(|row| row.trim_end().to_string())
            .collect::<Vec<_>>();

        while rows.last().map_or(false, |row| row.is_empty()) {
            rows.pop();
        }
        rows.join("\n")
    }

    /// Returns every string written so far, in order.
    pub fn writes(&self) -> Vec<String> {
        self.state.lock().unwrap().writes.clone()
    }

    /// Returns the `(row, col)` of the cursor.
    pub fn cursor_position(&self) -> (u16, u16) {
        self.state.lock().unwrap().parser.screen().cursor_position()
    }
}

impl TermLike for InMemoryTerm {
    fn write_str(&self, s: &str) -> std::io::Result<()> {
        self.state.lock().unwrap().write_str(s)
    }

    fn flush(&self) -> std::io::Result<()> {
        self.state.lock().unwrap().parser.flush()
    }
}

struct InMemoryTermState {
    width: u16,
    parser: vt100::Parser,
    writes: Vec<String>,
}

impl InMemoryTermState {
    pub(crate) fn new(rows: u16, cols: u16) -> InMemoryTermState {
        InMemoryTermState {
            width: cols,
            parser: Parser::new(rows, cols, 0),
            writes: Vec::new(),
        }
    }

    pub(crate) fn write_str(&mut self, s: &str) -> std::io::Result<()> {
        self.writes.push(s.to_owned());
        self.parser.write_all(s.as_bytes())
    }
}

impl Debug for InMemoryTermState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTermState").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn line_wrapping() {
        let in_mem = InMemoryTerm::new(10, 5);
        assert_eq!(in_mem.cursor_position(), (0, 0));

        in_mem.write_str("ABCDE").unwrap();
        assert_eq!(in_mem.contents(), "ABCDE");
        assert_eq!(in_mem.cursor_position(), (0, 5));

        // Should wrap onto next line
        in_mem.write_str("FG").unwrap();
        assert_eq!(in_mem.contents(), "ABCDE\nFG");
        assert_eq!(in_mem.cursor_position(), (1, 2));
    }

    #[test]
    fn carriage_return_overwrites() {
        let in_mem = InMemoryTerm::new(10, 80);
        in_mem.write_str("\r| thinking!").unwrap();
        in_mem.write_str("\r/ thinking!").unwrap();
        assert_eq!(in_mem.contents(), "/ thinking!");
        assert_eq!(in_mem.cursor_position(), (0, 11));

        in_mem.write_str("\r           \r").unwrap();
        assert_eq!(in_mem.contents(), "");
        assert_eq!(in_mem.cursor_position(), (0, 0));
        assert_eq!(in_mem.writes().len(), 3);
    }
}
