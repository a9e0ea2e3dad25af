//! Server-sent event decoding for streamed chat completions.
//!
//! Network chunks do not respect line boundaries, so the decoder keeps the
//! trailing partial line (as raw bytes, a code point may be split too) until
//! the rest of it arrives.

use crate::{Error, Result, StreamChunk};

const DONE: &str = "[DONE]";

/// Incremental decoder from SSE bytes to stream chunks
#[derive(Debug, Default)]
pub struct Decoder {
    buffer: Vec<u8>,
    done: bool,
}

impl Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the `[DONE]` marker has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed a network chunk, returning every event completed by it
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Result<StreamChunk>> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = self.line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a final line that was not newline-terminated
    pub fn finish(&mut self) -> Option<Result<StreamChunk>> {
        let line = std::mem::take(&mut self.buffer);
        self.line(&line)
    }

    fn line(&mut self, line: &[u8]) -> Option<Result<StreamChunk>> {
        if self.done {
            return None;
        }

        let line = String::from_utf8_lossy(line);
        let data = line.trim_end_matches(['\r', '\n']).strip_prefix("data:")?.trim();
        if data.is_empty() {
            return None;
        }

        if data == DONE {
            tracing::debug!("received [DONE] marker");
            self.done = true;
            return None;
        }

        Some(
            serde_json::from_str::<StreamChunk>(data).map_err(|source| Error::Decode {
                data: data.to_owned(),
                source,
            }),
        )
    }
}
