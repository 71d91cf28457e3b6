use std::borrow::Cow;
use std::io;

use log::debug;

use crate::indicator::Indicator;
use crate::spawner::{AsyncIndicatorHandle, AsyncSpawner, IndicatorHandle, Spawner};

/// Runs a piece of work while an [`Indicator`] animates next to it.
///
/// The supervisor starts the indicator through its spawner, runs the work on the calling thread,
/// then stops the indicator and waits until it has blanked its line. Only then does it hand back
/// the work's result, so whatever the caller prints next lands on a clean line.
///
/// ```rust,no_run
/// use spindle::{Supervisor, ThreadSpawner};
///
/// let supervisor = Supervisor::with_message(ThreadSpawner::new(), "thinking!");
/// let answer = supervisor.run(spindle::work::slow)?;
/// println!("Answer: {answer}");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct Supervisor<S> {
    spawner: S,
    indicator: Indicator,
}

impl<S> Supervisor<S> {
    pub fn new(spawner: S, indicator: Indicator) -> Supervisor<S> {
        Supervisor { spawner, indicator }
    }

    /// A supervisor whose indicator has the default style and draws to stdout.
    pub fn with_message(spawner: S, message: impl Into<Cow<'static, str>>) -> Supervisor<S> {
        Supervisor::new(spawner, Indicator::new(message))
    }

    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }
}

impl<S: Spawner> Supervisor<S> {
    /// Runs `primary` to completion with the indicator animating alongside.
    ///
    /// The stop is requested only after `primary` returned, and this returns only after the
    /// indicator has exited. That holds for every outcome of `primary`: an `Err` it returns
    /// passes through untouched, and if it panics the indicator is stopped and joined before the
    /// panic carries on.
    ///
    /// Fails if the indicator could not be started (in which case `primary` never runs) or did
    /// not exit cleanly.
    pub fn run<F, T>(&self, primary: F) -> io::Result<T>
    where
        F: FnOnce() -> T,
    {
        let handle = self.spawner.spawn(self.indicator.clone())?;
        let guard = StopGuard {
            handle: Some(handle),
        };
        let result = primary();
        debug!("primary task finished");
        guard.stop()?;
        Ok(result)
    }
}

impl<S: AsyncSpawner> Supervisor<S> {
    /// Awaits `primary` with the indicator animating as a task next to it.
    ///
    /// With [`Cooperative`](crate::Cooperative), `primary` has to yield at `.await` points for
    /// the indicator to get a turn on a current-thread runtime. Once it completes the indicator
    /// is stopped and awaited; a cancelled task is not reported as an error. If this future is
    /// dropped early the handle's own drop stops the indicator.
    pub async fn run_async<F>(&self, primary: F) -> io::Result<F::Output>
    where
        F: std::future::Future,
    {
        let mut handle = self.spawner.spawn(self.indicator.clone())?;
        let result = primary.await;
        debug!("primary task finished");
        handle.signal_stop();
        handle.join().await?;
        Ok(result)
    }
}

/// Stops and joins the indicator when the primary task is done, or when it unwinds.
struct StopGuard<H: IndicatorHandle> {
    handle: Option<H>,
}

impl<H: IndicatorHandle> StopGuard<H> {
    fn stop(mut self) -> io::Result<()> {
        match self.handle.take() {
            Some(handle) => stop_and_join(handle),
            None => Ok(()),
        }
    }
}

impl<H: IndicatorHandle> Drop for StopGuard<H> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("primary task unwound, stopping indicator");
            stop_and_join(handle).ok();
        }
    }
}

fn stop_and_join<H: IndicatorHandle>(mut handle: H) -> io::Result<()> {
    handle.signal_stop();
    handle.join()
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{DrawTarget, Signal, StopSignal};

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Event {
        Spawned,
        PrimaryDone,
        StopSignaled,
        Joined,
    }

    type Events = Arc<Mutex<Vec<Event>>>;

    /// Runs the indicator synchronously inside `join`, so nothing here needs a real thread.
    #[derive(Default)]
    struct FakeSpawner {
        events: Events,
        fail_spawn: bool,
        fail_join: bool,
    }

    struct FakeHandle {
        events: Events,
        indicator: Indicator,
        signal: StopSignal,
        fail_join: bool,
    }

    impl Spawner for FakeSpawner {
        type Handle = FakeHandle;

        fn spawn(&self, indicator: Indicator) -> io::Result<FakeHandle> {
            if self.fail_spawn {
                return Err(io::Error::new(io::ErrorKind::Other, "no threads left"));
            }
            self.events.lock().unwrap().push(Event::Spawned);
            Ok(FakeHandle {
                events: self.events.clone(),
                indicator,
                signal: StopSignal::new(),
                fail_join: self.fail_join,
            })
        }
    }

    impl IndicatorHandle for FakeHandle {
        fn signal_stop(&mut self) {
            self.events.lock().unwrap().push(Event::StopSignaled);
            self.signal.signal();
        }

        fn join(self) -> io::Result<()> {
            assert!(self.signal.is_signaled(), "joined before stopping");
            self.indicator.run(&self.signal);
            self.events.lock().unwrap().push(Event::Joined);
            match self.fail_join {
                true => Err(io::Error::new(io::ErrorKind::Other, "indicator crashed")),
                false => Ok(()),
            }
        }
    }

    fn supervisor(spawner: FakeSpawner) -> (Supervisor<FakeSpawner>, Events) {
        let events = spawner.events.clone();
        let indicator = Indicator::new("thinking!").with_draw_target(DrawTarget::hidden());
        (Supervisor::new(spawner, indicator), events)
    }

    fn push(events: &Events, event: Event) {
        events.lock().unwrap().push(event);
    }

    #[test]
    fn stops_only_after_the_primary_task() {
        let (supervisor, events) = supervisor(FakeSpawner::default());

        let answer = supervisor
            .run(|| {
                push(&events, Event::PrimaryDone);
                42
            })
            .unwrap();

        assert_eq!(answer, 42);
        assert_eq!(
            *events.lock().unwrap(),
            [
                Event::Spawned,
                Event::PrimaryDone,
                Event::StopSignaled,
                Event::Joined
            ]
        );
        // one render-then-blank cycle, even though the stop came before the first frame
        assert_eq!(supervisor.indicator().line().frames_drawn(), 1);
        assert_eq!(supervisor.indicator().line().last_status(), None);
    }

    #[test]
    fn primary_errors_pass_through_after_cleanup() {
        let (supervisor, events) = supervisor(FakeSpawner::default());

        let result: Result<u32, &str> = supervisor.run(|| Err("no answer")).unwrap();

        assert_eq!(result, Err("no answer"));
        assert_eq!(
            events.lock().unwrap().last().copied(),
            Some(Event::Joined)
        );
    }

    #[test]
    fn primary_panics_still_stop_the_indicator() {
        let (supervisor, events) = supervisor(FakeSpawner::default());

        let res = catch_unwind(AssertUnwindSafe(|| {
            supervisor.run(|| -> u32 { panic!("primary task blew up") })
        }));

        assert!(res.is_err());
        assert_eq!(
            *events.lock().unwrap(),
            [Event::Spawned, Event::StopSignaled, Event::Joined]
        );
    }

    #[test]
    fn failed_spawn_skips_the_primary_task() {
        let (supervisor, events) = supervisor(FakeSpawner {
            fail_spawn: true,
            ..FakeSpawner::default()
        });

        let mut ran = false;
        let err = supervisor.run(|| ran = true).unwrap_err();

        assert_eq!(err.to_string(), "no threads left");
        assert!(!ran);
        assert!(events.lock().unwrap().is_empty());
    }

    struct FakeAsyncSpawner(Events);

    impl AsyncSpawner for FakeAsyncSpawner {
        type Handle = FakeHandle;

        fn spawn(&self, indicator: Indicator) -> io::Result<FakeHandle> {
            FakeSpawner {
                events: self.0.clone(),
                ..FakeSpawner::default()
            }
            .spawn(indicator)
        }
    }

    impl AsyncIndicatorHandle for FakeHandle {
        fn signal_stop(&mut self) {
            IndicatorHandle::signal_stop(self);
        }

        async fn join(self) -> io::Result<()> {
            IndicatorHandle::join(self)
        }
    }

    #[tokio::test]
    async fn async_work_follows_the_same_order() {
        let events = Events::default();
        let indicator = Indicator::new("thinking!").with_draw_target(DrawTarget::hidden());
        let supervisor = Supervisor::new(FakeAsyncSpawner(events.clone()), indicator);

        let answer = supervisor
            .run_async(async {
                push(&events, Event::PrimaryDone);
                42
            })
            .await
            .unwrap();

        assert_eq!(answer, 42);
        assert_eq!(
            *events.lock().unwrap(),
            [
                Event::Spawned,
                Event::PrimaryDone,
                Event::StopSignaled,
                Event::Joined
            ]
        );
    }

    #[test]
    fn failed_join_is_reported() {
        let (supervisor, events) = supervisor(FakeSpawner {
            fail_join: true,
            ..FakeSpawner::default()
        });

        let err = supervisor.run(|| 42).unwrap_err();

        assert_eq!(err.to_string(), "indicator crashed");
        assert_eq!(events.lock().unwrap().len(), 3);
    }
}
