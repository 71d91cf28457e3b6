//! spindle runs a terminal spinner next to a piece of blocking work and stops it cleanly once
//! the work is done.
//!
//! A [`Supervisor`] starts an [`Indicator`] on an independent unit of execution, runs the work on
//! the calling thread, then stops the indicator and waits for it to blank its line before handing
//! back the result. The unit of execution is pluggable through the [`Spawner`] trait:
//!
//! * [`ThreadSpawner`] runs the indicator on an OS thread, stopped through a shared
//!   [`StopSignal`].
//! * [`ProcessSpawner`] (unix) runs it in a child process, stopped through a pipe on the child's
//!   stdin ([`PipeSignal`]).
//! * [`Cooperative`] (with the `tokio` feature) runs it as a tokio task and stops it by
//!   cancellation. The work is a future here, see [`Supervisor::run_async`].
//!
//! ```rust,no_run
//! use spindle::{Supervisor, ThreadSpawner};
//!
//! let answer = Supervisor::with_message(ThreadSpawner::new(), "thinking!")
//!     .run(spindle::work::slow)?;
//! println!("Answer: {answer}");
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! # Styles
//!
//! An indicator draws `<frame> <message>`. The frames and the pause between them come from an
//! [`IndicatorStyle`]:
//!
//! ```rust
//! # use std::time::Duration;
//! use spindle::{Indicator, IndicatorStyle};
//!
//! let indicator = Indicator::new("loading").with_style(
//!     IndicatorStyle::default_spinner()
//!         .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
//!         .cadence(Duration::from_millis(80)),
//! );
//! assert_eq!(indicator.status(1), "⠙ loading");
//! ```
//!
//! # Output
//!
//! Indicators draw to stdout by default, and only if stdout is a terminal, so piping a program's
//! output to a file will not fill it with carriage returns. See [`DrawTarget`] for the other
//! targets. With the `in_memory` feature, [`InMemoryTerm`] renders into a virtual screen for
//! tests.

#[cfg(feature = "tokio")]
mod cooperative;
mod draw_target;
#[cfg(feature = "in_memory")]
mod in_memory;
mod indicator;
mod line;
mod log;
#[cfg(unix)]
mod pipe;
#[cfg(unix)]
pub mod process;
mod signal;
mod spawner;
mod style;
mod supervisor;
mod term_like;
pub mod work;

#[cfg(feature = "tokio")]
pub use crate::cooperative::{Cooperative, TaskHandle};
pub use crate::draw_target::DrawTarget;
#[cfg(feature = "in_memory")]
pub use crate::in_memory::InMemoryTerm;
pub use crate::indicator::Indicator;
pub use crate::line::StatusLine;
pub use crate::log::LogWrapper;
#[cfg(unix)]
pub use crate::pipe::PipeSignal;
#[cfg(unix)]
pub use crate::process::{ProcessHandle, ProcessSpawner};
pub use crate::signal::{Signal, StopSignal};
pub use crate::spawner::{
    AsyncIndicatorHandle, AsyncSpawner, IndicatorHandle, Spawner, ThreadHandle, ThreadSpawner,
};
pub use crate::style::{IndicatorStyle, DEFAULT_CADENCE, DEFAULT_TICK_CHARS};
pub use crate::supervisor::Supervisor;
pub use crate::term_like::TermLike;
