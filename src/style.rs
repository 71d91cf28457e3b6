use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

/// The frame glyphs used when no other style is set.
pub const DEFAULT_TICK_CHARS: &str = r"\|/-";

/// The pause between two frames when no other style is set.
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(100);

/// Controls how an [`Indicator`](crate::Indicator) animates.
#[derive(Clone, Debug)]
pub struct IndicatorStyle {
    tick_strings: Vec<Box<str>>,
    cadence: Duration,
}

fn segment(s: &str) -> Vec<Box<str>> {
    UnicodeSegmentation::graphemes(s, true)
        .map(|s| s.into())
        .collect()
}

/// Checks that every glyph takes up the same number of columns.
///
/// Panics on an empty frame set, or if the glyphs are not equal-width. A frame narrower than its
/// predecessor would leave a stale column behind on the status line.
fn check_frames(frames: &[Box<str>]) -> usize {
    frames
        .iter()
        .map(|s| unicode_width::UnicodeWidthStr::width(s.as_ref()))
        .fold(None, |acc, new| {
            match acc {
                None => return Some(new),
                Some(old) => assert_eq!(old, new, "got passed un-equal width tick strings"),
            }
            acc
        })
        .expect("an indicator needs at least one tick string")
}

impl IndicatorStyle {
    /// Returns the default style: `\ | / -` at one frame per 100ms.
    pub fn default_spinner() -> IndicatorStyle {
        IndicatorStyle {
            tick_strings: segment(DEFAULT_TICK_CHARS),
            cadence: DEFAULT_CADENCE,
        }
    }

    /// Sets the frame sequence, one frame per grapheme cluster of `s`.
    pub fn tick_chars(mut self, s: &str) -> IndicatorStyle {
        let frames = segment(s);
        check_frames(&frames);
        self.tick_strings = frames;
        self
    }

    /// Sets the frame sequence from explicit strings.
    pub fn tick_strings(mut self, s: &[&str]) -> IndicatorStyle {
        let frames: Vec<Box<str>> = s.iter().map(|s| (*s).into()).collect();
        check_frames(&frames);
        self.tick_strings = frames;
        self
    }

    /// Sets the pause between two frames.
    ///
    /// This is also the polling granularity of the stop signal, so it bounds how long the
    /// supervisor waits for the indicator to wind down.
    pub fn cadence(mut self, cadence: Duration) -> IndicatorStyle {
        self.cadence = cadence;
        self
    }

    /// Returns the tick string for a given frame number.
    pub fn get_tick_str(&self, idx: u64) -> &str {
        &self.tick_strings[(idx % self.tick_strings.len() as u64) as usize]
    }

    /// Returns the number of frames in one cycle.
    pub fn frame_count(&self) -> usize {
        self.tick_strings.len()
    }

    pub fn get_cadence(&self) -> Duration {
        self.cadence
    }

    /// Concatenates the frames back into one string, as accepted by [`tick_chars`].
    ///
    /// [`tick_chars`]: IndicatorStyle::tick_chars
    pub(crate) fn tick_chars_str(&self) -> String {
        self.tick_strings.concat()
    }
}

impl Default for IndicatorStyle {
    fn default() -> IndicatorStyle {
        IndicatorStyle::default_spinner()
    }
}
