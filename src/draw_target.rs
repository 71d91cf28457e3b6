use std::io;

use console::Term;

use crate::TermLike;

/// Target for draw operations
///
/// This tells an indicator where to paint its status line.
#[derive(Debug)]
pub struct DrawTarget {
    kind: TargetKind,
}

impl DrawTarget {
    /// Draw to a buffered stdout terminal, flushed after every frame.
    ///
    /// This is the default draw target for indicators.
    pub fn stdout() -> Self {
        Self::term(Term::buffered_stdout(), Stream::Stdout)
    }

    /// Draw to a buffered stderr terminal, flushed after every frame.
    pub fn stderr() -> Self {
        Self::term(Term::buffered_stderr(), Stream::Stderr)
    }

    /// Indicators are by default drawn to terminals however if the terminal is not user attended
    /// the status line is hidden. This is done so that piping to a file will not produce
    /// carriage-return noise in that file.
    fn term(term: Term, stream: Stream) -> Self {
        Self {
            kind: TargetKind::Term { term, stream },
        }
    }

    /// Draw to a boxed object that implements the [`TermLike`] trait.
    pub fn term_like(term_like: Box<dyn TermLike>) -> Self {
        Self {
            kind: TargetKind::TermLike { inner: term_like },
        }
    }

    /// A hidden draw target.
    ///
    /// This forces an indicator to be not rendered at all.
    pub fn hidden() -> Self {
        Self {
            kind: TargetKind::Hidden,
        }
    }

    /// Returns true if the draw target is hidden.
    pub fn is_hidden(&self) -> bool {
        match self.kind {
            TargetKind::Hidden => true,
            TargetKind::Term { ref term, .. } => !term.is_term(),
            TargetKind::TermLike { .. } => false,
        }
    }

    /// Writes `s` and flushes it so that partial lines show up immediately.
    pub(crate) fn write_and_flush(&self, s: &str) -> io::Result<()> {
        match self.kind {
            TargetKind::Term { ref term, .. } if term.is_term() => {
                term.write_str(s)?;
                term.flush()
            }
            TargetKind::TermLike { ref inner } => {
                inner.write_str(s)?;
                inner.flush()
            }
            // Hidden, or not attended
            _ => Ok(()),
        }
    }

    /// The standard stream behind this target, if it is one another process can inherit.
    pub(crate) fn stream(&self) -> Option<Stream> {
        match self.kind {
            TargetKind::Term { stream, .. } => Some(stream),
            TargetKind::Hidden => Some(Stream::Hidden),
            TargetKind::TermLike { .. } => None,
        }
    }

    pub(crate) fn from_stream(stream: Stream) -> Self {
        match stream {
            Stream::Stdout => Self::stdout(),
            Stream::Stderr => Self::stderr(),
            Stream::Hidden => Self::hidden(),
        }
    }
}

impl Default for DrawTarget {
    fn default() -> Self {
        Self::stdout()
    }
}

#[derive(Debug)]
enum TargetKind {
    Term { term: Term, stream: Stream },
    Hidden,
    TermLike { inner: Box<dyn TermLike> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Stream {
    Stdout,
    Stderr,
    Hidden,
}

impl Stream {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
            Stream::Hidden => "hidden",
        }
    }
}
