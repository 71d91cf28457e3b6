use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use console::measure_text_width;

use crate::draw_target::{DrawTarget, Stream};

/// A single terminal line that an indicator repaints in place.
///
/// The line is an [`Arc`] around its internal state. When it is cloned it just increments the
/// refcount, so an indicator running on another thread and a [`LogWrapper`] on this one paint
/// the same line.
///
/// [`LogWrapper`]: crate::LogWrapper
#[derive(Clone, Debug, Default)]
pub struct StatusLine {
    state: Arc<Mutex<LineState>>,
}

#[derive(Debug, Default)]
struct LineState {
    target: DrawTarget,
    /// What is currently on screen, `None` once the line has been blanked.
    last: Option<String>,
    frames: u64,
}

impl LineState {
    fn blank(&self, status: &str) -> io::Result<()> {
        let blanks = " ".repeat(measure_text_width(status));
        self.target.write_and_flush(&format!("\r{blanks}\r"))
    }
}

impl StatusLine {
    pub fn new(target: DrawTarget) -> StatusLine {
        StatusLine {
            state: Arc::new(Mutex::new(LineState {
                target,
                last: None,
                frames: 0,
            })),
        }
    }

    /// Overwrites the line with `status`.
    ///
    /// The cursor is returned to column 0 first and no newline is written, so the next call
    /// paints over this one.
    pub fn draw(&self, status: String) -> io::Result<()> {
        let mut state = self.state();
        let res = state.target.write_and_flush(&format!("\r{status}"));
        state.last = Some(status);
        state.frames += 1;
        res
    }

    /// Blanks the line with as many spaces as the last status was wide and leaves the cursor at
    /// column 0.
    ///
    /// Does nothing if nothing was drawn since the last clear.
    pub fn clear(&self) -> io::Result<()> {
        let mut state = self.state();
        match state.last.take() {
            Some(last) => state.blank(&last),
            None => Ok(()),
        }
    }

    /// Blank the line temporarily, execute `f`, then redraw the last status.
    ///
    /// **Note:** The internal lock is held while `f` is executed, so the indicator cannot paint
    /// over whatever `f` writes.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        let state = self.state();
        if let Some(last) = &state.last {
            state.blank(last).ok();
        }
        let rv = f();
        if let Some(last) = &state.last {
            state.target.write_and_flush(&format!("\r{last}")).ok();
        }
        rv
    }

    /// Returns the status currently on screen.
    pub fn last_status(&self) -> Option<String> {
        self.state().last.clone()
    }

    /// Returns how many frames were drawn on this line so far.
    pub fn frames_drawn(&self) -> u64 {
        self.state().frames
    }

    pub fn is_hidden(&self) -> bool {
        self.state().target.is_hidden()
    }

    pub(crate) fn stream(&self) -> Option<Stream> {
        self.state().target.stream()
    }

    fn state(&self) -> MutexGuard<'_, LineState> {
        self.state.lock().unwrap()
    }
}
