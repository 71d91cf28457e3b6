use std::process::Command;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

/// Runs a demo binary with its output piped, so the indicator stays hidden.
fn run_demo(path: &str) -> (String, Duration) {
    let started = Instant::now();
    let output = Command::new(path).output().unwrap();
    let elapsed = started.elapsed();
    assert!(output.status.success(), "{path} failed: {output:?}");
    (String::from_utf8(output.stdout).unwrap(), elapsed)
}

fn assert_answered(path: &str) {
    let (stdout, elapsed) = run_demo(path);
    assert_eq!(stdout, "Answer: 42\n");
    assert!(elapsed >= spindle::work::WORK_DURATION);
    assert!(elapsed < spindle::work::WORK_DURATION + Duration::from_secs(2));
}

#[test]
fn thread_demo() {
    assert_answered(env!("CARGO_BIN_EXE_spinner_thread"));
}

#[cfg(unix)]
#[test]
fn process_demo() {
    assert_answered(env!("CARGO_BIN_EXE_spinner_proc"));
}

#[cfg(feature = "tokio")]
#[test]
fn async_demo() {
    assert_answered(env!("CARGO_BIN_EXE_spinner_async"));
}

#[cfg(unix)]
#[test]
fn process_spawner_stops_its_child() {
    use spindle::{DrawTarget, Indicator, ProcessSpawner, Supervisor};

    let spawner = ProcessSpawner::with_program(env!("CARGO_BIN_EXE_spinner_proc"));
    let indicator = Indicator::new("thinking!").with_draw_target(DrawTarget::hidden());
    let supervisor = Supervisor::new(spawner, indicator);

    let started = Instant::now();
    let answer = supervisor
        .run(|| spindle::work::slow_for(Duration::from_millis(300)))
        .unwrap();

    assert_eq!(answer, 42);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[cfg(unix)]
#[test]
fn dropping_a_process_handle_reaps_the_child() {
    use spindle::{DrawTarget, Indicator, ProcessSpawner, Spawner};

    let spawner = ProcessSpawner::with_program(env!("CARGO_BIN_EXE_spinner_proc"));
    let indicator = Indicator::new("thinking!").with_draw_target(DrawTarget::hidden());
    let handle = spawner.spawn(indicator).unwrap();
    let pid = handle.id() as libc::pid_t;
    std::thread::sleep(Duration::from_millis(100));

    let started = Instant::now();
    drop(handle);
    assert!(started.elapsed() < Duration::from_secs(2));

    // an unreaped zombie still accepts signal 0
    assert_eq!(unsafe { libc::kill(pid, 0) }, -1);
}

/// Opens a pseudo terminal, returning the master and slave ends.
#[cfg(unix)]
fn open_pty() -> (std::fs::File, std::fs::File) {
    use std::os::unix::io::FromRawFd;
    use std::ptr;

    let (mut master, mut slave) = (0, 0);
    let rc = unsafe {
        libc::openpty(
            &mut master,
            &mut slave,
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
        )
    };
    assert_eq!(rc, 0, "openpty: {}", std::io::Error::last_os_error());
    for fd in [master, slave] {
        unsafe { libc::fcntl(fd, libc::F_SETFD, libc::FD_CLOEXEC) };
    }
    unsafe { (std::fs::File::from_raw_fd(master), std::fs::File::from_raw_fd(slave)) }
}

#[cfg(unix)]
#[test]
fn process_demo_draws_and_blanks_on_a_terminal() {
    use std::io::Read;
    use std::process::Stdio;

    let (mut master, slave) = open_pty();
    let mut child = Command::new(env!("CARGO_BIN_EXE_spinner_proc"))
        .stdin(Stdio::null())
        .stdout(Stdio::from(slave))
        .spawn()
        .unwrap();

    // reads fail with EIO once every process holding the slave end has exited
    let mut transcript = Vec::new();
    let mut buf = [0; 4096];
    loop {
        match master.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => transcript.extend_from_slice(&buf[..n]),
        }
    }
    assert!(child.wait().unwrap().success());

    let transcript = String::from_utf8(transcript).unwrap();
    assert!(
        transcript.starts_with("\r\\ thinking!"),
        "no first frame: {transcript:?}"
    );
    // the terminal turns the final newline into CRLF
    assert!(
        transcript.ends_with("\r           \rAnswer: 42\r\n"),
        "last frame not blanked: {transcript:?}"
    );
}
