use std::borrow::Cow;

use log::trace;

use crate::draw_target::DrawTarget;
use crate::line::StatusLine;
use crate::signal::Signal;
use crate::style::IndicatorStyle;

/// A spinner that repaints `<frame> <message>` on one line until it is told to stop.
///
/// The indicator is cheap to clone: the message and style are plain values, and the
/// [`StatusLine`] it paints on is shared between clones.
#[derive(Clone, Debug)]
pub struct Indicator {
    message: Cow<'static, str>,
    style: IndicatorStyle,
    line: StatusLine,
}

impl Indicator {
    /// Creates a new indicator with the default style
    ///
    /// This indicator by default draws to stdout, and only if stdout is a terminal.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Indicator {
        Indicator {
            message: message.into(),
            style: IndicatorStyle::default_spinner(),
            line: StatusLine::default(),
        }
    }

    /// A convenience builder-like function for an indicator with a given style
    pub fn with_style(mut self, style: IndicatorStyle) -> Indicator {
        self.style = style;
        self
    }

    /// A convenience builder-like function for an indicator with a given draw target
    pub fn with_draw_target(mut self, target: DrawTarget) -> Indicator {
        self.line = StatusLine::new(target);
        self
    }

    /// Paints on an existing line, for instance one that a [`LogWrapper`] also holds.
    ///
    /// [`LogWrapper`]: crate::LogWrapper
    pub fn with_line(mut self, line: StatusLine) -> Indicator {
        self.line = line;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn style(&self) -> &IndicatorStyle {
        &self.style
    }

    pub fn line(&self) -> &StatusLine {
        &self.line
    }

    /// Returns the status line for the given frame number.
    pub fn status(&self, tick: u64) -> String {
        format!("{} {}", self.style.get_tick_str(tick), self.message)
    }

    /// Animates until `signal` fires, then blanks the line.
    ///
    /// A frame is always drawn before the signal is first checked, so even a stop that was
    /// requested before this was called shows exactly one frame. The signal is checked in
    /// place of the pause between frames, so a stop is noticed within one cadence.
    pub fn run<S: Signal + ?Sized>(&self, signal: &S) {
        let _clear = ClearOnDrop(self.line.clone());
        let cadence = self.style.get_cadence();
        let mut tick = 0u64;
        loop {
            self.draw(tick);
            if signal.wait(cadence) {
                break;
            }
            tick = tick.wrapping_add(1);
        }
    }

    /// Returns a future that animates forever, pausing at an `.await` between frames.
    ///
    /// The first frame is drawn right away, before the future is first polled. Stop the
    /// animation by aborting the task it runs in: the future is dropped at its pause and the line
    /// is blanked on the way out, so cancellation is an ordinary way for this to end. Dropping
    /// the future before it ever ran blanks the line all the same.
    #[cfg(feature = "tokio")]
    pub fn run_until_cancelled(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let indicator = self.clone();
        let clear = ClearOnDrop(self.line.clone());
        indicator.draw(0);
        async move {
            let _clear = clear;
            let cadence = indicator.style.get_cadence();
            let mut tick = 0u64;
            loop {
                tokio::time::sleep(cadence).await;
                tick = tick.wrapping_add(1);
                indicator.draw(tick);
            }
        }
    }

    fn draw(&self, tick: u64) {
        trace!("indicator frame {tick}");
        // a broken terminal must not take the supervised work down with it
        self.line.draw(self.status(tick)).ok();
    }
}

/// Blanks the line on every way out of the animation loop: a stop, a panic, or the future being
/// dropped at an `.await`.
struct ClearOnDrop(StatusLine);

impl Drop for ClearOnDrop {
    fn drop(&mut self) {
        self.0.clear().ok();
    }
}
