//! Streaming Client — connects to an A2A agent and streams task snapshots.
//!
//! Demonstrates the `tasks/stream` method, which returns `StreamChunk`
//! snapshots of a task as it progresses via Server-Sent Events.
//!
//! Run the echo agent first:
//! ```sh
//! cargo run --example echo_agent
//! ```
//!
//! Then in another terminal:
//! ```sh
//! cargo run --example streaming_client
//! ```

use a2a_rs::client::A2AClient;
use a2a_rs::types::StreamChunk;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = A2AClient::from_url("http://localhost:3000").await?;

    let card = client.get_card()?;
    println!("Streaming from: {} (v{})", card.name, card.version);
    println!();

    let mut stream = client
        .send_text_stream("Tell me something interesting about Rust!")
        .await?;

    println!("--- Stream started ---");

    while let Some(chunk) = stream.next().await {
        match chunk? {
            StreamChunk::TaskChunk { task, last_chunk, .. } => {
                println!(
                    "[task] {} — status: {} (last: {:?})",
                    task.id, task.status.state, last_chunk
                );
                for artifact in &task.artifacts {
                    for part in &artifact.parts {
                        if let Some(text) = part.text_value() {
                            println!("  artifact: {}", text);
                        }
                    }
                }
            }
            StreamChunk::MessageChunk { content, last_chunk, .. } => {
                println!("[message] {} (last: {:?})", content, last_chunk);
            }
        }
    }

    println!("--- Stream ended ---");

    Ok(())
}
