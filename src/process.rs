//! Running the indicator in a child process.
//!
//! There is no shared memory between the supervisor and a child process, so the child is told
//! everything it needs on its command line and is stopped through its stdin (see [`PipeSignal`]).
//! The child is a re-execution of a program that calls [`run_if_child`] on startup, by default
//! the current executable.

use std::env;
use std::ffi::OsStr;
use std::io;
use std::path::PathBuf;
use std::process::{self, Child, Command, ExitStatus, Stdio};
use std::time::Duration;

use clap::Parser;
use log::debug;

use crate::draw_target::{DrawTarget, Stream};
use crate::indicator::Indicator;
use crate::pipe::PipeSignal;
use crate::signal::Signal;
use crate::spawner::{IndicatorHandle, Spawner};
use crate::style::{IndicatorStyle, DEFAULT_TICK_CHARS};

/// The first argument that marks a process as a spawned indicator.
pub const CHILD_COMMAND: &str = "__spindle-indicator";

/// Runs the indicator and exits if this process was started by a [`ProcessSpawner`].
///
/// Call this first thing in `main` of any program a [`ProcessSpawner`] re-executes. In every
/// other case it returns `Ok(())` right away and leaves the arguments alone.
pub fn run_if_child() -> io::Result<()> {
    if env::args_os().nth(1).as_deref() != Some(OsStr::new(CHILD_COMMAND)) {
        return Ok(());
    }

    let args = ChildArgs::try_parse_from(env::args_os().skip(1))
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    let indicator = args.into_indicator();
    debug!("indicator process {} started", process::id());
    indicator.run(&PipeSignal::from_stdin());
    process::exit(0)
}

#[derive(Debug, Parser)]
#[command(name = CHILD_COMMAND)]
struct ChildArgs {
    #[arg(long)]
    message: String,
    #[arg(long, default_value = DEFAULT_TICK_CHARS)]
    frames: String,
    #[arg(long, default_value_t = 100)]
    cadence_ms: u64,
    #[arg(long, value_enum, default_value_t = Stream::Stdout)]
    target: Stream,
}

impl ChildArgs {
    fn into_indicator(self) -> Indicator {
        let style = IndicatorStyle::default_spinner()
            .tick_chars(&self.frames)
            .cadence(Duration::from_millis(self.cadence_ms));
        Indicator::new(self.message)
            .with_style(style)
            .with_draw_target(DrawTarget::from_stream(self.target))
    }
}

/// The command line a child needs to reproduce `indicator`.
///
/// Values are attached with `=` so that messages and frames starting with `-` are not mistaken
/// for flags.
fn child_args(indicator: &Indicator, target: Stream) -> Vec<String> {
    let style = indicator.style();
    vec![
        CHILD_COMMAND.to_string(),
        format!("--message={}", indicator.message()),
        format!("--frames={}", style.tick_chars_str()),
        format!("--cadence-ms={}", style.get_cadence().as_millis()),
        format!("--target={}", target.name()),
    ]
}

/// Runs indicators in a child process, stopped through a pipe on the child's stdin.
///
/// Only indicators drawing to stdout, stderr or nowhere can be moved to another process, the
/// child inherits the stream. Spawning one with a custom [`TermLike`](crate::TermLike) target fails
/// with [`io::ErrorKind::Unsupported`].
#[derive(Clone, Debug, Default)]
pub struct ProcessSpawner {
    program: Option<PathBuf>,
}

impl ProcessSpawner {
    /// Re-executes the current executable.
    pub fn new() -> ProcessSpawner {
        ProcessSpawner::default()
    }

    /// Executes `program` instead, which must call [`run_if_child`] on startup.
    pub fn with_program(program: impl Into<PathBuf>) -> ProcessSpawner {
        ProcessSpawner {
            program: Some(program.into()),
        }
    }
}

impl Spawner for ProcessSpawner {
    type Handle = ProcessHandle;

    fn spawn(&self, indicator: Indicator) -> io::Result<ProcessHandle> {
        let target = indicator.line().stream().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::Unsupported,
                "a child process can only draw to stdout, stderr or nowhere",
            )
        })?;
        let program = match &self.program {
            Some(program) => program.clone(),
            None => env::current_exe()?,
        };

        let mut child = Command::new(&program)
            .args(child_args(&indicator, target))
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;
        let stdin = match child.stdin.take() {
            Some(stdin) => stdin,
            None => {
                child.kill().ok();
                return Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "indicator process has no stdin",
                ));
            }
        };
        debug!(
            "spawned indicator process {} from {}",
            child.id(),
            program.display()
        );

        Ok(ProcessHandle {
            child,
            signal: PipeSignal::from_child_stdin(stdin),
            reaped: false,
        })
    }
}

/// Owns an indicator process.
///
/// Dropping it without joining stops the child and waits for it, so no zombie is left behind.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    signal: PipeSignal,
    reaped: bool,
}

impl ProcessHandle {
    /// The OS process id of the indicator.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait()?;
        self.reaped = true;
        debug!("joined indicator process {}: {status}", self.child.id());
        Ok(status)
    }
}

impl IndicatorHandle for ProcessHandle {
    fn signal_stop(&mut self) {
        debug!("stopping indicator process {}", self.child.id());
        self.signal.signal();
    }

    fn join(mut self) -> io::Result<()> {
        let status = self.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("indicator process exited with {status}"),
            ))
        }
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        if !self.reaped {
            self.signal.signal();
            self.wait().ok();
        }
    }
}
