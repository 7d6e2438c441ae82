//! Stream framing: slice delimiter-bounded KISS frames out of a byte stream.
//!
//! A TNC connection delivers arbitrary-length reads. The assembler buffers
//! them and yields each complete `0xC0 ... 0xC0` frame exactly once,
//! delimiters included; a trailing partial frame is retained for the next
//! feed. End-of-stream detection (a zero-byte read) is the caller's job.

use crate::kiss::FEND;

/// Stateful frame assembler for one TNC connection.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buf: Vec<u8>,
}

impl FrameAssembler {
    pub fn new() -> Self {
        FrameAssembler { buf: Vec::new() }
    }

    /// Buffer `data` and return every frame it completes.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Vec<u8>> {
        self.buf.extend_from_slice(data);

        let mut frames = Vec::new();
        loop {
            let Some(start) = self.buf.iter().position(|&b| b == FEND) else {
                // Nothing here can ever start a frame.
                self.buf.clear();
                break;
            };
            let Some(len) = self.buf[start + 1..].iter().position(|&b| b == FEND) else {
                // Partial frame: keep it, drop the junk ahead of it.
                self.buf.drain(..start);
                break;
            };
            let end = start + 1 + len;
            frames.push(self.buf[start..=end].to_vec());
            self.buf.drain(..=end);
        }
        frames
    }

    /// Bytes currently held over for the next feed.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame() {
        let mut assembler = FrameAssembler::new();
        let frames = assembler.feed(b"\xC0\x00hello\xC0");
        assert_eq!(frames, vec![b"\xC0\x00hello\xC0".to_vec()]);
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn test_frame_split_across_feeds() {
        let mut assembler = FrameAssembler::new();
        assert!(assembler.feed(b"\xC0\x00hel").is_empty());
        assert_eq!(assembler.pending(), 5);
        let frames = assembler.feed(b"lo\xC0");
        assert_eq!(frames, vec![b"\xC0\x00hello\xC0".to_vec()]);
    }

    #[test]
    fn test_multiple_frames_in_one_feed() {
        let mut assembler = FrameAssembler::new();
        let frames = assembler.feed(b"\xC0\x00a\xC0\xC0\x00b\xC0");
        assert_eq!(
            frames,
            vec![b"\xC0\x00a\xC0".to_vec(), b"\xC0\x00b\xC0".to_vec()]
        );
    }

    #[test]
    fn test_junk_before_frame_is_discarded() {
        let mut assembler = FrameAssembler::new();
        let frames = assembler.feed(b"noise\xC0\x00x\xC0");
        assert_eq!(frames, vec![b"\xC0\x00x\xC0".to_vec()]);
    }

    #[test]
    fn test_delimiter_free_data_is_dropped() {
        let mut assembler = FrameAssembler::new();
        assert!(assembler.feed(b"no delimiters here").is_empty());
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn test_frame_emitted_only_once() {
        let mut assembler = FrameAssembler::new();
        assert_eq!(assembler.feed(b"\xC0\x00a\xC0").len(), 1);
        assert!(assembler.feed(b"").is_empty());
        assert!(assembler.feed(b"trailing").is_empty());
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut assembler = FrameAssembler::new();
        let stream = b"\xC0\x00abc\xC0";
        let mut frames = Vec::new();
        for &b in stream {
            frames.extend(assembler.feed(&[b]));
        }
        assert_eq!(frames, vec![stream.to_vec()]);
    }
}
