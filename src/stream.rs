//! Stream processing: byte stream in, transcript out.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::fmt;
use thiserror::Error;

use crate::client::ClientError;
use crate::log::ErrorLog;
use crate::model::AgentChunk;
use crate::ndjson::agent_chunks;
use crate::options::Framing;

/// Human-readable record of a task run, one line per chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    text: String,
    chunks: usize,
}

impl Transcript {
    /// Append the line for `chunk`.
    pub fn push(&mut self, chunk: &AgentChunk) {
        self.text.push_str(&chunk.transcript_line());
        self.chunks += 1;
    }

    /// Number of chunks recorded.
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn is_empty(&self) -> bool {
        self.chunks == 0
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<Transcript> for String {
    fn from(transcript: Transcript) -> Self {
        transcript.text
    }
}

/// A run that stopped early, with everything recorded before the failure.
#[derive(Debug, Error)]
#[error("stream aborted after {count} chunks: {error}", count = .transcript.chunks())]
pub struct StreamFailure {
    pub transcript: Transcript,
    #[source]
    pub error: ClientError,
}

impl StreamFailure {
    pub fn new(transcript: Transcript, error: ClientError) -> Self {
        Self { transcript, error }
    }

    pub fn into_parts(self) -> (Transcript, ClientError) {
        (self.transcript, self.error)
    }
}

/// Single-shot result of processing a stream.
pub type StreamOutcome = Result<Transcript, StreamFailure>;

/// Drive `stream` to completion.
///
/// Each decoded chunk is appended to the transcript, then `on_data` is
/// called with `(current_agent, next_agent)`. The first read, decode or parse
/// failure stops processing; it is reported to `log` and returned together
/// with the partial transcript. `stream` is dropped exactly once before this
/// returns, on every path.
pub async fn process_stream<S, E, F>(
    stream: S,
    framing: Framing,
    log: &dyn ErrorLog,
    mut on_data: F,
) -> StreamOutcome
where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
    F: FnMut(&str, &str),
{
    let mut chunks = Box::pin(agent_chunks(stream, framing));
    let mut transcript = Transcript::default();

    while let Some(item) = chunks.next().await {
        match item {
            Ok(chunk) => {
                tracing::debug!(
                    current_agent = %chunk.current_agent,
                    next_agent = %chunk.next_agent,
                    "agent chunk"
                );
                transcript.push(&chunk);
                on_data(&chunk.current_agent, &chunk.next_agent);
            }
            Err(error) => {
                drop(chunks);
                log.error("processing stream", &error);
                return Err(StreamFailure::new(transcript, error));
            }
        }
    }

    Ok(transcript)
}

/// Callback form of [`process_stream`].
///
/// `on_complete` receives the transcript text and, if processing failed,
/// the error. Being `FnOnce`, it runs exactly once.
pub async fn process_stream_with_callbacks<S, E, F, C>(
    stream: S,
    framing: Framing,
    log: &dyn ErrorLog,
    on_data: F,
    on_complete: C,
) where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
    F: FnMut(&str, &str),
    C: FnOnce(String, Option<ClientError>),
{
    match process_stream(stream, framing, log, on_data).await {
        Ok(transcript) => on_complete(transcript.into_string(), None),
        Err(failure) => {
            let (transcript, error) = failure.into_parts();
            on_complete(transcript.into_string(), Some(error));
        }
    }
}
