use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// A one-shot stop request that can be waited on with a timeout.
///
/// The indicator only ever talks to this trait, so the same loop runs against an in-memory flag
/// on a thread and against a pipe in a child process.
pub trait Signal: Send + Sync {
    /// Requests a stop. Calling this more than once has no further effect.
    fn signal(&self);

    /// Blocks for up to `timeout`, returning `true` as soon as a stop was requested and `false`
    /// if the timeout elapsed first.
    fn wait(&self, timeout: Duration) -> bool;

    /// Returns whether a stop was requested, without blocking.
    fn is_signaled(&self) -> bool {
        self.wait(Duration::ZERO)
    }
}

/// An in-memory stop flag shared between threads.
///
/// Cloning shares the flag: signaling any clone wakes waiters on all of them.
#[derive(Clone, Debug, Default)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> StopSignal {
        StopSignal::default()
    }
}

impl Signal for StopSignal {
    fn signal(&self) {
        let (flag, cvar) = &*self.inner;
        *flag.lock().unwrap() = true;
        cvar.notify_all();
    }

    fn wait(&self, timeout: Duration) -> bool {
        let (flag, cvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut stopped = flag.lock().unwrap();
        // loop to ride out spurious wakeups
        while !*stopped {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            stopped = cvar.wait_timeout(stopped, deadline - now).unwrap().0;
        }
        true
    }
}
