//! Bounded record tokenizer.
//!
//! Pulls fixed-size blocks from a reader into a small working buffer and
//! hands out one newline-terminated record at a time. The unconsumed part of
//! the buffer is tracked as a `start..end` window; bytes are only moved back
//! to the front when the window runs into the end of the buffer.

use super::buffers::{block_len_for, READ_BLOCK_LEN, RECORD_BUFFER_CAPACITY};
use crate::config::is_keep_unterminated;
use crate::relation::RECORD_DELIMITER;
use crate::relations::{Result, RouteError};
use log::warn;
use memchr::memchr;
use std::io::{ErrorKind, Read};

/// Streaming record tokenizer with a fixed-capacity buffer.
///
/// # Memory Complexity
///
/// O(capacity) regardless of input size. A record (plus its newline) longer
/// than the buffer is reported as [`RouteError::RecordOverflow`].
pub struct RecordTokenizer<R: Read> {
    reader: R,
    buf: Box<[u8]>,
    /// First unconsumed byte.
    start: usize,
    /// One past the last buffered byte.
    end: usize,
    block_len: usize,
    exhausted: bool,
    keep_unterminated: bool,
    bytes_read: u64,
}

impl<R: Read> RecordTokenizer<R> {
    /// Create a tokenizer with the default 256-byte buffer and 100-byte blocks.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, RECORD_BUFFER_CAPACITY, READ_BLOCK_LEN)
    }

    /// Create a tokenizer with a custom buffer capacity and refill block length.
    ///
    /// The block length is clamped to `1..=capacity`.
    pub fn with_capacity(reader: R, capacity: usize, block_len: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            reader,
            buf: vec![0u8; capacity].into_boxed_slice(),
            start: 0,
            end: 0,
            block_len: block_len_for(capacity, block_len),
            exhausted: false,
            keep_unterminated: is_keep_unterminated(),
            bytes_read: 0,
        }
    }

    /// Override the global unterminated-record policy for this tokenizer.
    pub fn with_keep_unterminated(mut self, keep: bool) -> Self {
        self.keep_unterminated = keep;
        self
    }

    /// Buffer capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Total bytes pulled from the underlying reader.
    #[inline]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Return the next record with its newline stripped.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. A trailing fragment
    /// without a newline is dropped (and logged) unless unterminated records
    /// are kept.
    pub fn next_record(&mut self) -> Result<Option<&[u8]>> {
        loop {
            if let Some(pos) = memchr(RECORD_DELIMITER, &self.buf[self.start..self.end]) {
                let record_start = self.start;
                self.start += pos + 1;
                return Ok(Some(&self.buf[record_start..record_start + pos]));
            }
            if self.exhausted {
                return Ok(self.take_fragment());
            }
            self.fill()?;
        }
    }

    /// Read one more block into the window.
    fn fill(&mut self) -> Result<()> {
        if self.start == self.end {
            self.start = 0;
            self.end = 0;
        } else if self.end == self.buf.len() {
            if self.start == 0 {
                return Err(RouteError::RecordOverflow {
                    line: 0,
                    capacity: self.capacity(),
                });
            }
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }

        let want = self.block_len.min(self.buf.len() - self.end);
        let n = loop {
            match self.reader.read(&mut self.buf[self.end..self.end + want]) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(RouteError::Io(e)),
            }
        };

        if n == 0 {
            self.exhausted = true;
        } else {
            self.end += n;
            self.bytes_read += n as u64;
        }
        Ok(())
    }

    /// Handle whatever is left once the reader has no more bytes.
    fn take_fragment(&mut self) -> Option<&[u8]> {
        if self.start == self.end {
            return None;
        }
        let (start, end) = (self.start, self.end);
        self.start = self.end;
        if self.keep_unterminated {
            Some(&self.buf[start..end])
        } else {
            warn!(
                "Dropping {} trailing bytes without a terminating newline",
                end - start
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn collect<R: Read>(tok: &mut RecordTokenizer<R>) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(rec) = tok.next_record().unwrap() {
            out.push(String::from_utf8(rec.to_vec()).unwrap());
        }
        out
    }

    #[test]
    fn test_splits_records() {
        let mut tok = RecordTokenizer::new(&b"A,B\nB,C\nD,E\n"[..]).with_keep_unterminated(false);
        assert_eq!(collect(&mut tok), vec!["A,B", "B,C", "D,E"]);
        assert_eq!(tok.bytes_read(), 12);
    }

    #[test]
    fn test_empty_input() {
        let mut tok = RecordTokenizer::new(&b""[..]).with_keep_unterminated(false);
        assert!(tok.next_record().unwrap().is_none());
        // Stays exhausted.
        assert!(tok.next_record().unwrap().is_none());
    }

    #[test]
    fn test_empty_record() {
        let mut tok = RecordTokenizer::new(&b"\nA,B\n"[..]).with_keep_unterminated(false);
        assert_eq!(collect(&mut tok), vec!["", "A,B"]);
    }

    #[test]
    fn test_drops_unterminated_fragment() {
        let mut tok = RecordTokenizer::new(&b"A,B\nC,D"[..]).with_keep_unterminated(false);
        assert_eq!(collect(&mut tok), vec!["A,B"]);
    }

    #[test]
    fn test_keeps_unterminated_fragment() {
        let mut tok = RecordTokenizer::new(&b"A,B\nC,D"[..]).with_keep_unterminated(true);
        assert_eq!(collect(&mut tok), vec!["A,B", "C,D"]);
    }

    #[test]
    fn test_records_across_block_boundaries() {
        // Block length 3 forces every record to straddle several reads.
        let input = b"Melbourne,Sydney\nJerusalem,Haifa\nHaifa,Tel-Aviv\n";
        let mut tok = RecordTokenizer::with_capacity(&input[..], 20, 3).with_keep_unterminated(false);
        assert_eq!(
            collect(&mut tok),
            vec!["Melbourne,Sydney", "Jerusalem,Haifa", "Haifa,Tel-Aviv"]
        );
    }

    #[test]
    fn test_window_compaction() {
        // 8-byte buffer: the second record only fits once the first is shifted out.
        let mut tok = RecordTokenizer::with_capacity(&b"AB,C\nDE,FG\n"[..], 8, 4)
            .with_keep_unterminated(false);
        assert_eq!(collect(&mut tok), vec!["AB,C", "DE,FG"]);
    }

    #[test]
    fn test_record_exactly_fills_buffer() {
        let mut tok =
            RecordTokenizer::with_capacity(&b"ABC,DEF\n"[..], 8, 8).with_keep_unterminated(false);
        assert_eq!(collect(&mut tok), vec!["ABC,DEF"]);
    }

    #[test]
    fn test_record_overflow() {
        let mut tok =
            RecordTokenizer::with_capacity(&b"ABCD,EFGH\n"[..], 8, 4).with_keep_unterminated(false);
        match tok.next_record() {
            Err(RouteError::RecordOverflow { capacity, .. }) => assert_eq!(capacity, 8),
            other => panic!("expected overflow, got {:?}", other.map(|r| r.map(<[u8]>::to_vec))),
        }
    }

    #[test]
    fn test_default_capacity_overflow() {
        let long = format!("{}\n", "x".repeat(RECORD_BUFFER_CAPACITY));
        let mut tok = RecordTokenizer::new(long.as_bytes()).with_keep_unterminated(false);
        assert_eq!(tok.capacity(), RECORD_BUFFER_CAPACITY);
        match tok.next_record() {
            Err(RouteError::RecordOverflow { capacity, .. }) => {
                assert_eq!(capacity, RECORD_BUFFER_CAPACITY)
            }
            other => panic!("expected overflow, got {:?}", other.map(|r| r.map(<[u8]>::to_vec))),
        }
    }

    /// Reader that yields one byte per call and interrupts every other call.
    struct Trickle<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::new(ErrorKind::Interrupted, "retry"));
            }
            if self.data.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[0];
            self.data = &self.data[1..];
            Ok(1)
        }
    }

    #[test]
    fn test_short_and_interrupted_reads() {
        let reader = Trickle {
            data: b"Boston,Miami\nMiami,New-York\n",
            interrupt: false,
        };
        let mut tok = RecordTokenizer::new(reader).with_keep_unterminated(false);
        assert_eq!(collect(&mut tok), vec!["Boston,Miami", "Miami,New-York"]);
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_io_error_propagates() {
        let mut tok = RecordTokenizer::new(Broken);
        assert!(matches!(tok.next_record(), Err(RouteError::Io(_))));
    }
}
