//! Streaming UTF-8 decoding.

use crate::client::ChunkError;

const BOM: char = '\u{feff}';

/// Decodes a byte stream chunk by chunk.
///
/// A multi-byte character split across two chunks is held back until its
/// remaining bytes arrive. Invalid sequences are fatal. A leading byte order
/// mark is dropped.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
    consumed: usize,
    started: bool,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`, returning all text that is complete so far.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String, ChunkError> {
        self.pending.extend_from_slice(chunk);

        let complete = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                return Err(ChunkError::Utf8 {
                    offset: self.consumed + e.valid_up_to(),
                });
            }
        };

        let bytes: Vec<u8> = self.pending.drain(..complete).collect();
        let offset = self.consumed;
        self.consumed += complete;
        let mut text = String::from_utf8(bytes).map_err(|e| ChunkError::Utf8 {
            offset: offset + e.utf8_error().valid_up_to(),
        })?;

        if !self.started && !text.is_empty() {
            self.started = true;
            if text.starts_with(BOM) {
                text.replace_range(..BOM.len_utf8(), "");
            }
        }
        Ok(text)
    }

    /// Fail if the stream ended in the middle of a character.
    pub fn finish(&mut self) -> Result<(), ChunkError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(ChunkError::Utf8 {
                offset: self.consumed,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"{\"a\":1}").unwrap(), "{\"a\":1}");
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn split_character_is_held_back() {
        let mut decoder = Utf8Decoder::new();
        // "café" with the two bytes of 'é' in separate chunks
        assert_eq!(decoder.decode(b"caf\xC3").unwrap(), "caf");
        assert!(decoder.finish().is_err());
        assert_eq!(decoder.decode(b"\xA9!").unwrap(), "\u{e9}!");
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn invalid_bytes_report_offset() {
        let mut decoder = Utf8Decoder::new();
        decoder.decode(b"ok").unwrap();
        let err = decoder.decode(b"\xFFrest").unwrap_err();
        assert!(matches!(err, ChunkError::Utf8 { offset: 2 }));
    }

    #[test]
    fn leading_bom_is_dropped_once() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"\xEF\xBB\xBF{}").unwrap(), "{}");
        assert_eq!(
            decoder.decode("\u{feff}x".as_bytes()).unwrap(),
            "\u{feff}x"
        );
    }
}
