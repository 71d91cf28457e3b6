use std::io;

use spindle::{Cooperative, Supervisor};

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    let supervisor = Supervisor::with_message(Cooperative::new(), "thinking!");
    let result = supervisor.run_async(spindle::work::slow_async()).await?;
    println!("Answer: {result}");
    Ok(())
}
