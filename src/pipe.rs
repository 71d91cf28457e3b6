use std::fmt;
use std::io::{self, Write};
use std::os::unix::io::RawFd;
use std::process::ChildStdin;
use std::sync::Mutex;
use std::time::Duration;

use portable_atomic::{AtomicBool, Ordering};

use crate::signal::{Signal, StopSignal};

/// A stop signal that crosses a process boundary over a pipe.
///
/// The parent holds the write end (the child's stdin). Signaling writes a byte and closes it.
/// The child holds the read end and waits on it with `poll(2)`. Readable data and end-of-file
/// both count as a stop, so a child whose parent went away stops too.
pub struct PipeSignal {
    end: PipeEnd,
}

enum PipeEnd {
    Writer {
        stdin: Mutex<Option<ChildStdin>>,
        sent: StopSignal,
    },
    Reader {
        fd: RawFd,
        seen: AtomicBool,
    },
}

impl PipeSignal {
    /// The parent side, wrapping the stdin of a spawned child.
    pub fn from_child_stdin(stdin: ChildStdin) -> PipeSignal {
        PipeSignal {
            end: PipeEnd::Writer {
                stdin: Mutex::new(Some(stdin)),
                sent: StopSignal::new(),
            },
        }
    }

    /// The child side, waiting on this process' stdin.
    pub fn from_stdin() -> PipeSignal {
        PipeSignal::from_raw_fd(libc::STDIN_FILENO)
    }

    /// The child side, waiting on an arbitrary readable descriptor.
    ///
    /// The descriptor is only polled, never read or closed.
    pub(crate) fn from_raw_fd(fd: RawFd) -> PipeSignal {
        PipeSignal {
            end: PipeEnd::Reader {
                fd,
                seen: AtomicBool::new(false),
            },
        }
    }
}

fn poll_readable(fd: RawFd, timeout: Duration) -> io::Result<bool> {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let timeout_ms = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
    match unsafe { libc::poll(&mut pfd, 1, timeout_ms) } {
        -1 => Err(io::Error::last_os_error()),
        0 => Ok(false),
        _ => Ok(true),
    }
}

impl Signal for PipeSignal {
    fn signal(&self) {
        match &self.end {
            PipeEnd::Writer { stdin, sent } => {
                sent.signal();
                if let Some(mut stdin) = stdin.lock().unwrap().take() {
                    // the child may be gone already, closing the pipe is what matters
                    stdin.write_all(b"\n").ok();
                }
            }
            PipeEnd::Reader { seen, .. } => seen.store(true, Ordering::Release),
        }
    }

    fn wait(&self, timeout: Duration) -> bool {
        match &self.end {
            PipeEnd::Writer { sent, .. } => sent.wait(timeout),
            PipeEnd::Reader { fd, seen } => {
                if seen.load(Ordering::Acquire) {
                    return true;
                }
                let stopped = match poll_readable(*fd, timeout) {
                    Ok(readable) => readable,
                    // a signal cut the wait short, the caller just renders one more frame
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => false,
                    Err(err) => {
                        log::debug!("stop pipe is unusable, stopping: {err}");
                        true
                    }
                };
                if stopped {
                    seen.store(true, Ordering::Release);
                }
                stopped
            }
        }
    }
}

impl fmt::Debug for PipeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.end {
            PipeEnd::Writer { sent, .. } => f
                .debug_struct("PipeSignal")
                .field("end", &"writer")
                .field("signaled", &sent.is_signaled())
                .finish(),
            PipeEnd::Reader { fd, seen } => f
                .debug_struct("PipeSignal")
                .field("end", &"reader")
                .field("fd", fd)
                .field("signaled", &seen.load(Ordering::Relaxed))
                .finish(),
        }
    }
}
