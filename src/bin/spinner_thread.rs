use std::io;

use spindle::{Supervisor, ThreadSpawner};

fn main() -> io::Result<()> {
    let supervisor = Supervisor::with_message(ThreadSpawner::new(), "thinking!");
    let result = supervisor.run(spindle::work::slow)?;
    println!("Answer: {result}");
    Ok(())
}
