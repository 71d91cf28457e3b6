use std::future::Future;
use std::io;
use std::thread;

use log::debug;

use crate::indicator::Indicator;
use crate::signal::{Signal, StopSignal};

/// Starts an [`Indicator`] on some independent unit of execution.
///
/// This is the seam between the [`Supervisor`](crate::Supervisor) and the concurrency primitive
/// it runs the indicator on. Implementations create whatever stop signal suits their backing and
/// hand it to the indicator.
pub trait Spawner {
    type Handle: IndicatorHandle;

    fn spawn(&self, indicator: Indicator) -> io::Result<Self::Handle>;
}

/// Owns a running indicator.
pub trait IndicatorHandle {
    /// Asks the indicator to stop after its current frame. Idempotent.
    fn signal_stop(&mut self);

    /// Blocks until the indicator has exited and blanked its line.
    ///
    /// Joining without signaling first blocks forever: the indicator never stops on its own.
    fn join(self) -> io::Result<()>;
}

/// Starts an [`Indicator`] next to work that is itself a future.
///
/// The counterpart of [`Spawner`] for backends whose join has to be awaited, used by
/// [`Supervisor::run_async`](crate::Supervisor::run_async).
pub trait AsyncSpawner {
    type Handle: AsyncIndicatorHandle;

    fn spawn(&self, indicator: Indicator) -> io::Result<Self::Handle>;
}

/// Owns a running indicator whose exit is awaited rather than blocked on.
pub trait AsyncIndicatorHandle {
    /// Asks the indicator to stop. Idempotent.
    fn signal_stop(&mut self);

    /// Resolves once the indicator has exited and blanked its line.
    fn join(self) -> impl Future<Output = io::Result<()>> + Send;
}

/// Runs indicators on their own OS thread, stopped through a shared [`StopSignal`].
#[derive(Clone, Debug, Default)]
pub struct ThreadSpawner {
    _private: (),
}

impl ThreadSpawner {
    pub fn new() -> ThreadSpawner {
        ThreadSpawner::default()
    }
}

impl Spawner for ThreadSpawner {
    type Handle = ThreadHandle;

    fn spawn(&self, indicator: Indicator) -> io::Result<ThreadHandle> {
        let signal = StopSignal::new();
        let thread = thread::Builder::new().name("spindle-indicator".into()).spawn({
            let signal = signal.clone();
            move || indicator.run(&signal)
        })?;
        debug!("spawned indicator thread {:?}", thread.thread().id());
        Ok(ThreadHandle {
            thread: Some(thread),
            signal,
        })
    }
}

/// Owns an indicator thread. Dropping it without joining stops and joins the thread.
#[derive(Debug)]
pub struct ThreadHandle {
    thread: Option<thread::JoinHandle<()>>,
    signal: StopSignal,
}

impl ThreadHandle {
    fn join_thread(&mut self) -> io::Result<()> {
        let thread = match self.thread.take() {
            Some(thread) => thread,
            None => return Ok(()),
        };
        let id = thread.thread().id();
        thread
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "indicator thread panicked"))?;
        debug!("joined indicator thread {id:?}");
        Ok(())
    }
}

impl IndicatorHandle for ThreadHandle {
    fn signal_stop(&mut self) {
        debug!("stopping indicator thread");
        self.signal.signal();
    }

    fn join(mut self) -> io::Result<()> {
        self.join_thread()
    }
}

impl Drop for ThreadHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.signal.signal();
            self.join_thread().ok();
        }
    }
}
