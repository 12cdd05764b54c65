//! Multi-Turn Conversation — demonstrates `session_id` for multi-turn
//! conversations.
//!
//! Shows how to use `session_id` to group related messages into a single
//! conversation thread. The echo agent processes each message independently,
//! but tasks sharing a `session_id` belong to the same conversation.
//!
//! Run the echo agent first:
//! ```sh
//! cargo run --example echo_agent
//! ```
//!
//! Then in another terminal:
//! ```sh
//! cargo run --example multi_turn
//! ```

use a2a_rs::client::A2AClient;
use a2a_rs::types::Task;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = A2AClient::from_url("http://localhost:3000").await?;

    let card = client.get_card()?;
    println!("Multi-turn conversation with: {}", card.name);
    println!();

    // --- Turn 1: Initial message ---
    println!("=== Turn 1 ===");
    let task1 = client.send_text("What is the A2A protocol?").await?;

    println!("Task: {}", task1.id);
    println!("Session: {}", task1.session_id);
    println!("Status: {}", task1.status.state);
    print_task_output(&task1);

    // Save the session_id from the first turn to thread the conversation.
    let session_id = task1.session_id.clone();
    println!();

    // --- Turn 2: Follow-up in the same session ---
    println!("=== Turn 2 (same session: {}) ===", &session_id[..8.min(session_id.len())]);
    let task2 = client
        .send_text_in_session("Tell me more about streaming.", &session_id)
        .await?;

    println!("Task: {}", task2.id);
    println!("Session: {}", task2.session_id);
    println!("Status: {}", task2.status.state);
    print_task_output(&task2);
    println!();

    // --- Turn 3: Another follow-up ---
    println!("=== Turn 3 (same session: {}) ===", &session_id[..8.min(session_id.len())]);
    let task3 = client
        .send_text_in_session("Thanks, that's helpful!", &session_id)
        .await?;

    println!("Task: {}", task3.id);
    println!("Session: {}", task3.session_id);
    println!("Status: {}", task3.status.state);
    print_task_output(&task3);
    println!();

    // --- New session: independent conversation ---
    println!("=== New conversation (different session) ===");
    let task4 = client.send_text("This is a fresh conversation.").await?;

    println!("Task: {}", task4.id);
    println!("Session: {}", task4.session_id);
    println!("Status: {}", task4.status.state);
    print_task_output(&task4);

    assert_ne!(
        task1.session_id, task4.session_id,
        "New conversation should have a different session_id"
    );
    println!();
    println!("Session IDs:");
    println!("  Turns 1-3 shared session: {}", &task1.session_id[..8.min(task1.session_id.len())]);
    println!("  Turn 4 new session:       {}", &task4.session_id[..8.min(task4.session_id.len())]);

    Ok(())
}

fn print_task_output(task: &Task) {
    for artifact in &task.artifacts {
        for part in &artifact.parts {
            if let Some(text) = part.text_value() {
                println!("  -> {}", text);
            }
        }
    }
}
