//! Chunk-to-line frame decoder
//!
//! The backend streams frames as newline-terminated lines over a chunked
//! response body, and chunk boundaries fall anywhere — between frames,
//! inside a line, even inside a multi-byte UTF-8 sequence. The decoder
//! buffers raw bytes and emits text only for complete lines, so splits
//! inside a code point are harmless.
//!
//! Purely syntactic: no JSON awareness, no retry.

/// Splits an unbounded sequence of byte chunks into complete lines.
///
/// Keeps a single pending-partial-line buffer between calls; never emits a
/// line until its terminating `\n` has arrived.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    pending: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one chunk and return all newly completed lines, in order.
    ///
    /// Line terminators (`\n`, with a preceding `\r` if present) are
    /// stripped. Invalid UTF-8 within a complete line is replaced rather
    /// than rejected — framing is not the layer that validates payloads.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let search_from = self.pending.len();
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        // Only the newly appended bytes can contain a fresh newline.
        let mut scan = search_from;
        while let Some(offset) = self.pending[scan..].iter().position(|&b| b == b'\n') {
            let end = scan + offset;
            let mut line: Vec<u8> = self.pending.drain(..=end).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
            scan = 0;
        }
        lines
    }

    /// Take whatever partial line is still buffered.
    ///
    /// At stream end a non-empty remainder was never newline-terminated and
    /// cannot be a complete frame; callers log it and move on.
    pub fn take_pending(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_chunked<C: AsRef<[u8]>>(chunks: &[C]) -> Vec<String> {
        let mut decoder = FrameDecoder::new();
        chunks
            .iter()
            .flat_map(|chunk| decoder.push(chunk.as_ref()))
            .collect()
    }

    #[test]
    fn test_single_chunk_multiple_lines() {
        let lines = decode_chunked(&[b"data: 1\ndata: 2\n\n"]);
        assert_eq!(lines, vec!["data: 1", "data: 2", ""]);
    }

    #[test]
    fn test_line_split_across_chunks() {
        let lines = decode_chunked(&[
            b"data: {\"type\":".as_slice(),
            b" \"done\"}".as_slice(),
            b"\n".as_slice(),
        ]);
        assert_eq!(lines, vec!["data: {\"type\": \"done\"}"]);
    }

    #[test]
    fn test_chunk_boundary_invariance() {
        let stream = b"data: alpha\ndata: beta\r\n\ndata: gamma\n";
        let expected = decode_chunked(&[stream]);

        // Every split position of the same byte stream yields the same
        // line sequence.
        for split in 0..stream.len() {
            let (a, b) = stream.split_at(split);
            assert_eq!(decode_chunked(&[a, b]), expected, "split at {split}");
        }
        // And fully byte-by-byte.
        let single: Vec<&[u8]> = stream.chunks(1).collect();
        assert_eq!(decode_chunked(&single), expected);
    }

    #[test]
    fn test_crlf_terminator_stripped() {
        let lines = decode_chunked(&[b"data: x\r\n"]);
        assert_eq!(lines, vec!["data: x"]);
    }

    #[test]
    fn test_utf8_split_inside_code_point() {
        let text = "data: ことわり\n".as_bytes();
        // Split in the middle of a 3-byte sequence.
        let lines = decode_chunked(&[&text[..8], &text[8..]]);
        assert_eq!(lines, vec!["data: ことわり"]);
    }

    #[test]
    fn test_incomplete_line_is_held_back() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(b"data: partial").is_empty());
        assert_eq!(decoder.push(b" frame\n"), vec!["data: partial frame"]);
    }

    #[test]
    fn test_take_pending_reports_trailing_remainder() {
        let mut decoder = FrameDecoder::new();
        decoder.push(b"data: complete\ndata: trunca");
        assert_eq!(decoder.take_pending().as_deref(), Some("data: trunca"));
        assert_eq!(decoder.take_pending(), None);
    }
}
