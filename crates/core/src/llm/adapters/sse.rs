//! Minimal server-sent events decoding for streaming completions.

/// Splits a byte stream into SSE `data:` payloads.
///
/// Bytes are buffered until a full line is available, so a multi-byte
/// character split across network reads is decoded intact.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes; returns the `data:` payloads of every completed line.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(|c| c == '\r' || c == '\n');
            if let Some(payload) = line.strip_prefix("data:") {
                payloads.push(payload.trim_start().to_string());
            }
        }
        payloads
    }
}
