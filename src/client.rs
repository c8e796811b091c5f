//! Core client trait and error types.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::log::ErrorLog;
use crate::options::Framing;
use crate::stream::{process_stream, StreamFailure, StreamOutcome, Transcript};

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Raw, not yet decoded byte stream returned by [`TaskStreaming::open_stream`].
pub type ByteStream = BoxStream<'static, std::result::Result<Bytes, reqwest::Error>>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("agent task request failed: {status} {reason}")]
    Status { status: u16, reason: String },

    /// The backend answered without a body to stream from.
    #[error("response body unreadable")]
    BodyUnreadable,

    /// Network-level failure, propagated as-is.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A stream chunk could not be read, decoded or parsed.
    #[error("chunk error: {0}")]
    Chunk(#[from] ChunkError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether the error came from the request phase rather than from a chunk.
    pub fn is_request_error(&self) -> bool {
        matches!(self, ClientError::Status { .. } | ClientError::BodyUnreadable)
    }
}

/// Failures while turning one stream chunk into an [`AgentChunk`](crate::model::AgentChunk).
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("read failed: {0}")]
    Read(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("invalid UTF-8 at byte {offset}")]
    Utf8 { offset: usize },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client side of the agent-team task endpoint.
///
/// Implementors only provide [`open_stream`](TaskStreaming::open_stream); the
/// full open-then-process pipeline comes for free through
/// [`run_task`](TaskStreaming::run_task).
#[async_trait]
pub trait TaskStreaming: Send + Sync {
    /// Send the task and hand back the raw response byte stream.
    ///
    /// # Errors
    /// - [`ClientError::Status`] on a non-success status
    /// - [`ClientError::BodyUnreadable`] when the response carries no body
    /// - [`ClientError::Http`] when the request never completes
    async fn open_stream(&self, messages: Vec<String>) -> Result<ByteStream>;

    /// Chunk framing used by [`run_task`](TaskStreaming::run_task).
    fn framing(&self) -> Framing;

    /// Logger receiving every error detected while processing.
    fn log(&self) -> &dyn ErrorLog;

    /// Open the stream and drive it to completion.
    ///
    /// `on_data` receives `(current_agent, next_agent)` once per chunk. A
    /// failure to open the stream is reported as a [`StreamFailure`]
    /// with an empty transcript.
    async fn run_task<F>(&self, messages: Vec<String>, on_data: F) -> StreamOutcome
    where
        F: FnMut(&str, &str) + Send,
    {
        match self.open_stream(messages).await {
            Ok(stream) => process_stream(stream, self.framing(), self.log(), on_data).await,
            Err(error) => Err(StreamFailure::new(Transcript::default(), error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_code() {
        let err = ClientError::Status {
            status: 500,
            reason: "Internal Server Error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "agent task request failed: 500 Internal Server Error"
        );
        assert!(err.is_request_error());
    }

    #[test]
    fn chunk_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: ClientError = ChunkError::from(parse).into();
        assert!(matches!(err, ClientError::Chunk(ChunkError::Json(_))));
        assert!(!err.is_request_error());
    }
}
