//! Stand-in primary tasks: they wait, then return a fixed answer.

use std::thread;
use std::time::Duration;

/// What the stand-in tasks return.
pub const ANSWER: u64 = 42;

/// How long the stand-in tasks take.
pub const WORK_DURATION: Duration = Duration::from_secs(5);

/// Blocks the calling thread for [`WORK_DURATION`], then returns [`ANSWER`].
pub fn slow() -> u64 {
    slow_for(WORK_DURATION)
}

pub fn slow_for(duration: Duration) -> u64 {
    thread::sleep(duration);
    ANSWER
}

/// Like [`slow`], but waits at an `.await` so other tasks on the same thread keep running.
#[cfg(feature = "tokio")]
pub async fn slow_async() -> u64 {
    slow_async_for(WORK_DURATION).await
}

#[cfg(feature = "tokio")]
pub async fn slow_async_for(duration: Duration) -> u64 {
    tokio::time::sleep(duration).await;
    ANSWER
}
