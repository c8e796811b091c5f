//! Turning the response byte stream into [`AgentChunk`]s.
//!
//! The backend writes one JSON object per line:
//! ```text
//! {"currentAgent": "supervisor", "nextAgent": "search", "messages": "Routing to next node: search"}
//! {"currentAgent": "search", "nextAgent": "supervisor", "messages": "..."}
//! ```
//!
//! How the bytes are cut into objects depends on [`Framing`].

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;

use crate::client::{ChunkError, ClientError};
use crate::decode::Utf8Decoder;
use crate::model::AgentChunk;
use crate::options::Framing;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Decode a byte stream into agent chunks.
///
/// The returned stream ends after the first error. It owns `bytes` and drops
/// it when it ends or is itself dropped.
///
/// # Example
/// ```
/// use agentstream::ndjson::agent_chunks;
/// use agentstream::options::Framing;
/// use bytes::Bytes;
/// use futures::{stream, StreamExt};
///
/// # futures::executor::block_on(async {
/// let body = stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from_static(
///     b"{\"currentAgent\":\"search\",\"nextAgent\":\"supervisor\",\"messages\":\"done\"}\n",
/// ))]);
/// let chunks: Vec<_> = agent_chunks(body, Framing::PerChunk).collect().await;
/// assert_eq!(chunks[0].as_ref().unwrap().current_agent, "search");
/// # });
/// ```
pub fn agent_chunks<S, E>(
    bytes: S,
    framing: Framing,
) -> impl Stream<Item = Result<AgentChunk, ClientError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: Into<BoxError> + Send,
{
    let reader = ChunkReader {
        bytes: Box::pin(bytes),
        decoder: Utf8Decoder::new(),
        lines: LineBuffer::default(),
        framing,
        ended: false,
        failed: false,
    };

    stream::unfold(reader, |mut reader| async move {
        let item = reader.next_chunk().await?;
        Some((item.map_err(ClientError::from), reader))
    })
}

/// Parse one complete JSON object.
pub fn parse_chunk(text: &str) -> Result<AgentChunk, ChunkError> {
    Ok(serde_json::from_str(text)?)
}

struct ChunkReader<S> {
    bytes: Pin<Box<S>>,
    decoder: Utf8Decoder,
    lines: LineBuffer,
    framing: Framing,
    ended: bool,
    failed: bool,
}

impl<S, E> ChunkReader<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    async fn next_chunk(&mut self) -> Option<Result<AgentChunk, ChunkError>> {
        if self.failed {
            return None;
        }
        let item = match self.framing {
            Framing::PerChunk => self.next_per_chunk().await,
            Framing::Lines => self.next_line().await,
        };
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }

    async fn next_per_chunk(&mut self) -> Option<Result<AgentChunk, ChunkError>> {
        let item = match self.bytes.next().await? {
            Ok(bytes) => self
                .decoder
                .decode(&bytes)
                .and_then(|text| parse_chunk(&text)),
            Err(e) => Err(ChunkError::Read(e.into())),
        };
        Some(item)
    }

    async fn next_line(&mut self) -> Option<Result<AgentChunk, ChunkError>> {
        loop {
            if let Some(line) = self.lines.next_line() {
                return Some(parse_chunk(&line));
            }

            if self.ended {
                return self.lines.finish().map(|line| parse_chunk(&line));
            }

            match self.bytes.next().await {
                Some(Ok(bytes)) => match self.decoder.decode(&bytes) {
                    Ok(text) => self.lines.push(&text),
                    Err(e) => return Some(Err(e)),
                },
                Some(Err(e)) => return Some(Err(ChunkError::Read(e.into()))),
                None => {
                    self.ended = true;
                    if let Err(e) = self.decoder.finish() {
                        return Some(Err(e));
                    }
                }
            }
        }
    }
}

impl<S> Drop for ChunkReader<S> {
    fn drop(&mut self) {
        tracing::trace!("stream reader released");
    }
}

/// Accumulates decoded text and yields complete, non-empty lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buffer: String,
}

impl LineBuffer {
    /// Append decoded text.
    pub fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Next complete line, trimmed. Blank lines are skipped.
    pub fn next_line(&mut self) -> Option<String> {
        while let Some(pos) = self.buffer.find('\n') {
            let line = self.buffer[..pos].trim().to_string();
            self.buffer.drain(..=pos);

            if !line.is_empty() {
                return Some(line);
            }
        }
        None
    }

    /// Whatever unterminated text is left, trimmed, if any.
    pub fn finish(&mut self) -> Option<String> {
        let line = self.buffer.trim().to_string();
        self.buffer.clear();
        (!line.is_empty()).then_some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(chunks: &[&'static [u8]]) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send {
        stream::iter(
            chunks
                .iter()
                .map(|c| Ok::<_, std::io::Error>(Bytes::from_static(*c)))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn line_buffer_splits_and_skips_blank_lines() {
        let mut buffer = LineBuffer::default();
        buffer.push("{\"a\":1}\n\n  \n{\"b\"");
        assert_eq!(buffer.next_line().as_deref(), Some("{\"a\":1}"));
        assert_eq!(buffer.next_line(), None);
        buffer.push(":2}\r\n{\"c\":3}");
        assert_eq!(buffer.next_line().as_deref(), Some("{\"b\":2}"));
        assert_eq!(buffer.next_line(), None);
        assert_eq!(buffer.finish().as_deref(), Some("{\"c\":3}"));
        assert_eq!(buffer.finish(), None);
    }

    #[tokio::test]
    async fn per_chunk_accepts_trailing_newline() {
        let bytes = raw(&[
            b"{\"currentAgent\":\"search\",\"nextAgent\":\"supervisor\",\"messages\":\"hi\"}\n",
        ]);
        let chunks: Vec<_> = agent_chunks(bytes, Framing::PerChunk).collect().await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap().messages, "hi");
    }

    #[tokio::test]
    async fn per_chunk_rejects_two_objects_in_one_chunk() {
        let bytes = raw(&[
            b"{\"currentAgent\":\"a\"}\n{\"currentAgent\":\"b\"}\n",
            b"{\"currentAgent\":\"c\"}",
        ]);
        let chunks: Vec<_> = agent_chunks(bytes, Framing::PerChunk).collect().await;
        assert_eq!(chunks.len(), 1);
        assert!(matches!(
            chunks[0],
            Err(ClientError::Chunk(ChunkError::Json(_)))
        ));
    }

    #[tokio::test]
    async fn lines_reassemble_objects_across_chunks() {
        let bytes = raw(&[
            b"{\"currentAgent\":\"a\"}\n{\"currentAgent\":",
            b"\"caf\xC3",
            b"\xA9\"}\n{\"currentAgent\":\"tail\"}",
        ]);
        let agents: Vec<String> = agent_chunks(bytes, Framing::Lines)
            .map(|c| c.unwrap().current_agent)
            .collect()
            .await;
        assert_eq!(agents, vec!["a", "caf\u{e9}", "tail"]);
    }

    #[tokio::test]
    async fn lines_reject_truncated_character_at_end() {
        let bytes = raw(&[b"{\"currentAgent\":\"a\"}\n\xC3"]);
        let chunks: Vec<_> = agent_chunks(bytes, Framing::Lines).collect().await;
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].is_ok());
        assert!(matches!(
            chunks[1],
            Err(ClientError::Chunk(ChunkError::Utf8 { .. }))
        ));
    }

    #[tokio::test]
    async fn read_error_ends_the_stream() {
        let bytes = stream::iter(vec![
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
            Ok(Bytes::from_static(b"{\"currentAgent\":\"a\"}")),
        ]);
        let chunks: Vec<_> = agent_chunks(bytes, Framing::PerChunk).collect().await;
        assert_eq!(chunks.len(), 1);
        assert!(matches!(
            chunks[0],
            Err(ClientError::Chunk(ChunkError::Read(_)))
        ));
    }
}
