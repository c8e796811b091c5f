//! Run one task against a local agent-team backend and print its progress.
//!
//! Run with:
//! ```bash
//! RUST_LOG=agentstream=debug cargo run --example agent_task -- "Research the history of Rust"
//! ```

use agentstream::options::{ClientOptions, Framing};
use agentstream::{AgentTaskClient, TaskStreaming};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let prompt = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let prompt = if prompt.is_empty() {
        "Write a haiku about Rust programming.".to_string()
    } else {
        prompt
    };

    // The backend terminates every object with a newline; line framing
    // survives proxies that merge or split chunks.
    let client = AgentTaskClient::new(ClientOptions::default().with_framing(Framing::Lines))?;

    println!("Streaming agent task from {}...\n", client.options().task_url());

    let outcome = client
        .run_task(vec![prompt], |current, next| {
            if current == agentstream::model::SUPERVISOR {
                println!("[supervisor] routing to {next}");
            } else {
                println!("[{current}] done");
            }
        })
        .await;

    match outcome {
        Ok(transcript) => {
            println!("\n=== Transcript ({} steps) ===", transcript.chunks());
            print!("{transcript}");
        }
        Err(failure) => {
            eprintln!("\nTask failed: {}", failure.error);
            if !failure.transcript.is_empty() {
                eprintln!("\n=== Partial transcript ===");
                eprint!("{}", failure.transcript);
            }
            return Err(failure.into());
        }
    }

    Ok(())
}
