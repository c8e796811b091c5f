//! # agentstream - Streaming client for an agent-team backend
//!
//! Posts a conversation to the backend's `/agentTask` endpoint and turns the
//! streamed NDJSON progress updates into a readable transcript.
//!
//! ## Pipeline
//!
//! 1. **Open**: [`TaskStreaming::open_stream`] sends one POST and returns the
//!    raw byte stream, failing on a bad status or a missing body.
//! 2. **Process**: [`process_stream`] decodes the bytes, parses each
//!    [`AgentChunk`], grows the [`Transcript`] and reports
//!    `(current_agent, next_agent)` per chunk.
//!
//! A failure while processing does not lose work: the [`StreamFailure`]
//! carries the transcript recorded up to that point.
//!
//! ## Example
//! ```no_run
//! use agentstream::{AgentTaskClient, TaskStreaming};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AgentTaskClient::local()?;
//!
//!     let messages = vec!["Write a short report on Rust async runtimes".to_string()];
//!     let transcript = client
//!         .run_task(messages, |current, next| println!("{current} -> {next}"))
//!         .await?;
//!
//!     print!("{transcript}");
//!     Ok(())
//! }
//! ```

pub mod agent_task;
pub mod client;
pub mod decode;
pub mod http;
pub mod log;
pub mod model;
pub mod ndjson;
pub mod options;
pub mod stream;

// Re-exports for convenience
pub use agent_task::AgentTaskClient;
pub use client::{ChunkError, ClientError, TaskStreaming};
pub use log::{ErrorLog, TracingLog};
pub use model::{AgentChunk, AgentTask};
pub use options::{ClientOptions, Framing};
pub use stream::{process_stream, process_stream_with_callbacks, StreamFailure, StreamOutcome, Transcript};
