use crate::StatusLine;
use log::{Level, LevelFilter, Log, Metadata, SetLoggerError};

/// A [`Log`] implementor that blanks a [`StatusLine`] around every record it passes on, so log
/// output never lands in the middle of a spinner frame.
///
/// Hand the same line to the indicator with [`Indicator::with_line`].
///
/// [`Indicator::with_line`]: crate::Indicator::with_line
pub struct LogWrapper<L: Log> {
    line: StatusLine,
    log: L,
}

impl<L: Log + 'static> LogWrapper<L> {
    pub fn new(line: StatusLine, log: L) -> Self {
        Self { line, log }
    }

    /// Installs this as the global logger.
    ///
    /// The maximum level is set to the most verbose level the wrapped logger accepts, call
    /// [`log::set_max_level`] afterwards to override it.
    pub fn try_init(self) -> Result<(), SetLoggerError> {
        log::set_max_level(self.max_level());
        log::set_boxed_logger(Box::new(self))
    }

    /// The most verbose level the wrapped logger has enabled.
    fn max_level(&self) -> LevelFilter {
        [
            Level::Trace,
            Level::Debug,
            Level::Info,
            Level::Warn,
            Level::Error,
        ]
        .into_iter()
        .find(|&level| self.enabled(&Metadata::builder().level(level).build()))
        .map_or(LevelFilter::Off, |level| level.to_level_filter())
    }

    pub fn line(&self) -> StatusLine {
        self.line.clone()
    }
}

impl<L: Log> Log for LogWrapper<L> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.log.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        self.line.suspend(|| self.log.log(record))
    }

    fn flush(&self) {
        self.log.flush()
    }
}
