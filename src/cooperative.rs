use std::future::Future;
use std::io;

use log::debug;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::indicator::Indicator;
use crate::spawner::{AsyncIndicatorHandle, AsyncSpawner};

/// Runs indicators as tokio tasks, stopped by aborting the task.
///
/// On a current-thread runtime the indicator and the supervised work share one thread, so the
/// work must reach `.await` points for the indicator to animate. Spawning outside of a tokio
/// runtime fails.
#[derive(Clone, Debug, Default)]
pub struct Cooperative {
    _private: (),
}

impl Cooperative {
    pub fn new() -> Cooperative {
        Cooperative::default()
    }
}

impl AsyncSpawner for Cooperative {
    type Handle = TaskHandle;

    fn spawn(&self, indicator: Indicator) -> io::Result<TaskHandle> {
        let runtime =
            Handle::try_current().map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let task = runtime.spawn(indicator.run_until_cancelled());
        debug!("spawned indicator task");
        Ok(TaskHandle { task: Some(task) })
    }
}

/// Owns a running indicator task. Dropping it without joining aborts the task.
#[derive(Debug)]
pub struct TaskHandle {
    task: Option<JoinHandle<()>>,
}

impl AsyncIndicatorHandle for TaskHandle {
    /// Requests cancellation. The task unwinds at its next `.await`.
    fn signal_stop(&mut self) {
        if let Some(task) = &self.task {
            debug!("cancelling indicator task");
            task.abort();
        }
    }

    /// Waits until the task has unwound and blanked its line.
    ///
    /// A cancelled task is the expected outcome and reported as success.
    fn join(mut self) -> impl Future<Output = io::Result<()>> + Send {
        let task = self.task.take();
        async move {
            let task = match task {
                Some(task) => task,
                None => return Ok(()),
            };
            match task.await {
                Ok(()) => {}
                Err(err) if err.is_cancelled() => {}
                Err(err) => {
                    return Err(io::Error::new(
                        io::ErrorKind::Other,
                        format!("indicator task failed: {err}"),
                    ))
                }
            }
            debug!("joined indicator task");
            Ok(())
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
