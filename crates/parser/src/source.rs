//! Immutable source snapshot with a line-start index.

use std::ops::Range;
use std::sync::Arc;

/// Stands in for each byte of an invalid UTF-8 sequence in the lexed text.
/// One byte wide, so offsets into the text and into the input agree.
const STAND_IN: char = '\0';

/// One file snapshot.
///
/// The input bytes are kept as given. The lexer reads a text view of the same
/// length in which every byte of an invalid UTF-8 sequence is replaced by
/// `STAND_IN`; the first such offset is remembered so the parser can report
/// it. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    bytes: Arc<[u8]>,
    text: Arc<str>,
    line_starts: Arc<[u32]>,
    invalid_utf8: Option<usize>,
}

impl SourceBuffer {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        match String::from_utf8(bytes) {
            Ok(text) => Self::from_text(text),
            Err(err) => {
                let bytes = err.into_bytes();
                let (text, first_bad) = text_view(&bytes);
                Self {
                    line_starts: Arc::from(compute_line_starts(&bytes)),
                    bytes: Arc::from(bytes),
                    text: Arc::from(text),
                    invalid_utf8: first_bad,
                }
            }
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        let text: String = text.into();
        let line_starts = compute_line_starts(text.as_bytes());
        Self {
            bytes: Arc::from(text.as_bytes()),
            text: Arc::from(text),
            line_starts: Arc::from(line_starts),
            invalid_utf8: None,
        }
    }

    /// Text the lexer reads. Equal to the input unless it held invalid UTF-8.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The input bytes, unchanged.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    /// Offset of the first byte that was not valid UTF-8 in the input.
    #[inline]
    pub fn invalid_utf8(&self) -> Option<usize> {
        self.invalid_utf8
    }

    /// Number of lines. A trailing newline does not start a new line.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based line containing `offset` (offsets past the end map to the last line).
    pub fn line_of(&self, offset: usize) -> usize {
        let offset = offset.min(u32::MAX as usize) as u32;
        match self.line_starts.binary_search(&offset) {
            Ok(i) => i + 1,
            Err(i) => i.max(1),
        }
    }

    /// Offset of the first byte of 1-based `line`.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        let idx = line.checked_sub(1)?;
        self.line_starts.get(idx).map(|&s| s as usize)
    }

    /// 1-based line and byte column of `offset`.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let line = self.line_of(offset);
        let start = self.line_start(line).unwrap_or(0);
        (line as u32, (offset.saturating_sub(start) + 1) as u32)
    }

    /// New buffer with `insert` spliced in at `offset`.
    pub fn splice(&self, offset: usize, insert: &str) -> SourceBuffer {
        let offset = offset.min(self.len());
        let mut bytes = Vec::with_capacity(self.len() + insert.len());
        bytes.extend_from_slice(&self.bytes[..offset]);
        bytes.extend_from_slice(insert.as_bytes());
        bytes.extend_from_slice(&self.bytes[offset..]);
        SourceBuffer::new(bytes)
    }

    /// New buffer holding the input bytes of `ranges`, in order.
    pub fn keep(&self, ranges: &[Range<usize>]) -> SourceBuffer {
        let mut bytes = Vec::with_capacity(self.len());
        for r in ranges {
            bytes.extend_from_slice(&self.bytes[r.start.min(self.len())..r.end.min(self.len())]);
        }
        SourceBuffer::new(bytes)
    }
}

impl PartialEq for SourceBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for SourceBuffer {}

/// Same-length text for `bytes`, and the offset of the first invalid byte.
fn text_view(bytes: &[u8]) -> (String, Option<usize>) {
    let mut text = String::with_capacity(bytes.len());
    let mut first_bad = None;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        let invalid = chunk.invalid();
        if !invalid.is_empty() {
            first_bad.get_or_insert(text.len());
            text.extend(std::iter::repeat_n(STAND_IN, invalid.len()));
        }
    }
    (text, first_bad)
}

fn compute_line_starts(bytes: &[u8]) -> Vec<u32> {
    let mut starts = Vec::with_capacity(bytes.len() / 32 + 1);
    starts.push(0);
    for nl in memchr::memchr_iter(b'\n', bytes) {
        let next = nl + 1;
        if next < bytes.len() {
            starts.push(next as u32);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_newline_does_not_open_a_line() {
        assert_eq!(SourceBuffer::from_text("a\n").line_count(), 1);
        assert_eq!(SourceBuffer::from_text("a\nb").line_count(), 2);
        assert_eq!(SourceBuffer::from_text("").line_count(), 1);
    }

    #[test]
    fn line_lookup() {
        let buf = SourceBuffer::from_text("ab\ncd\nef");
        assert_eq!(buf.line_of(0), 1);
        assert_eq!(buf.line_of(2), 1);
        assert_eq!(buf.line_of(3), 2);
        assert_eq!(buf.line_of(7), 3);
        assert_eq!(buf.line_start(3), Some(6));
        assert_eq!(buf.line_start(4), None);
        assert_eq!(buf.line_col(4), (2, 2));
    }

    #[test]
    fn invalid_utf8_keeps_offsets() {
        let input = b"a\xffb\xe9\n".to_vec();
        let buf = SourceBuffer::new(input.clone());
        assert_eq!(buf.invalid_utf8(), Some(1));
        assert_eq!(buf.as_bytes(), &input[..]);
        assert_eq!(buf.as_str(), "a\0b\0\n");
        assert_eq!(buf.len(), input.len());
        assert_eq!(buf.splice(3, "_").as_bytes(), b"a\xffb_\xe9\n");
        assert_eq!(buf.keep(&[0..1, 2..3]).as_str(), "ab");
    }

    #[test]
    fn splice_inserts() {
        let buf = SourceBuffer::from_text("if x\n");
        assert_eq!(buf.splice(4, "{}").as_str(), "if x{}\n");
    }
}
