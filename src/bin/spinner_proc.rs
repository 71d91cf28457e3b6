use std::io;

#[cfg(unix)]
fn main() -> io::Result<()> {
    use spindle::process::{self, ProcessSpawner};
    use spindle::Supervisor;

    // the indicator process is this same executable
    process::run_if_child()?;

    let supervisor = Supervisor::with_message(ProcessSpawner::new(), "thinking!");
    let result = supervisor.run(spindle::work::slow)?;
    println!("Answer: {result}");
    Ok(())
}

#[cfg(not(unix))]
fn main() -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "process-backed indicators need a unix platform",
    ))
}
