//! Text buffer implementation using ropey
//!
//! All offsets are character indices. Cloning a buffer is cheap (the rope
//! shares its nodes), which lets the engine hand back a fresh buffer for
//! every edit and lets the history keep whole-document snapshots.

use ropey::Rope;
use std::ops::Range;

/// Text buffer wrapping ropey::Rope with version tracking
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// The underlying rope data structure
    rope: Rope,

    /// Version number, incremented on each change
    version: u64,

    /// Version number when last saved
    saved_version: u64,
}

impl TextBuffer {
    /// Create an empty text buffer
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            version: 0,
            saved_version: 0,
        }
    }

    /// Create a buffer from a string
    pub fn from_str(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            version: 0,
            saved_version: 0,
        }
    }

    /// Get the underlying rope
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Get the current version number
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check if buffer has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.version != self.saved_version
    }

    /// Mark buffer as saved
    pub fn mark_saved(&mut self) {
        self.saved_version = self.version;
    }

    /// Get total character count
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Clamp a character offset into `0..=len`
    pub fn clamp(&self, char_idx: usize) -> usize {
        char_idx.min(self.rope.len_chars())
    }

    /// Offset of the first character of the line containing `char_idx`
    ///
    /// Only `'\n'` ends a line; a lone `'\r'` or U+2028 is ordinary text.
    pub fn line_start(&self, char_idx: usize) -> usize {
        let idx = self.clamp(char_idx);
        self.rope
            .chars_at(idx)
            .reversed()
            .position(|c| c == '\n')
            .map_or(0, |n| idx - n)
    }

    /// Offset of the newline ending the line containing `char_idx`, or the
    /// buffer length on the last line
    pub fn line_end(&self, char_idx: usize) -> usize {
        let idx = self.clamp(char_idx);
        self.rope
            .chars_at(idx)
            .position(|c| c == '\n')
            .map_or(self.rope.len_chars(), |n| idx + n)
    }

    /// Get a slice of the buffer as a string; bounds are clamped
    pub fn slice(&self, range: Range<usize>) -> String {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end);
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    /// Replace a range of characters with `text`; bounds are clamped
    pub fn replace(&mut self, range: Range<usize>, text: &str) {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end).max(start);
        if start == end && text.is_empty() {
            return;
        }
        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        self.version += 1;
    }

    /// Return a copy of this buffer with `range` replaced by `text`
    pub fn spliced(&self, range: Range<usize>, text: &str) -> TextBuffer {
        let mut next = self.clone();
        next.replace(range, text);
        next
    }

    /// Replace the whole content
    pub fn set_content(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.version += 1;
    }

    /// Replace the whole content with a snapshot taken earlier, keeping the
    /// save marker of this buffer
    pub fn restore(&mut self, snapshot: &TextBuffer) {
        self.rope = snapshot.rope.clone();
        self.version += 1;
    }

    /// Check if the text equals `other`
    pub fn content_eq(&self, other: &str) -> bool {
        self.rope == other
    }

}

impl std::fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::from_str(text)
    }
}

impl From<String> for TextBuffer {
    fn from(text: String) -> Self {
        Self::from_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        let buf = TextBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len_chars(), 0);
        assert_eq!((buf.line_start(0), buf.line_end(0)), (0, 0));
    }

    #[test]
    fn test_char_offsets_not_bytes() {
        let buf = TextBuffer::from_str("日本語abc");
        assert_eq!(buf.len_chars(), 6);
        assert_eq!(buf.slice(1..4), "本語a");
    }

    #[test]
    fn test_line_bounds() {
        let buf = TextBuffer::from_str("one\ntwo\nthree");
        assert_eq!(buf.line_start(5), 4);
        assert_eq!(buf.line_end(5), 7);
        assert_eq!(buf.line_start(0), 0);
        assert_eq!(buf.line_end(0), 3);
        assert_eq!(buf.line_start(13), 8);
        assert_eq!(buf.line_end(100), 13);
    }

    #[test]
    fn test_line_bounds_at_newline() {
        let buf = TextBuffer::from_str("ab\ncd");
        // Offset 2 is the newline itself and still belongs to line 0
        assert_eq!(buf.line_start(2), 0);
        assert_eq!(buf.line_end(2), 2);
        // Offset 3 is the start of line 1
        assert_eq!(buf.line_start(3), 3);
    }

    #[test]
    fn test_replace_and_version() {
        let mut buf = TextBuffer::from_str("Hello World");
        buf.replace(5..5, ",");
        assert_eq!(buf.to_string(), "Hello, World");
        assert_eq!(buf.version(), 1);

        buf.replace(5..7, " ");
        assert_eq!(buf.to_string(), "Hello World");
        assert_eq!(buf.version(), 2);

        // A no-op splice does not bump the version
        buf.replace(3..3, "");
        assert_eq!(buf.version(), 2);
    }

    #[test]
    fn test_spliced_leaves_original_untouched() {
        let buf = TextBuffer::from_str("abc");
        let next = buf.spliced(1..2, "XYZ");
        assert_eq!(buf.to_string(), "abc");
        assert_eq!(next.to_string(), "aXYZc");
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let buf = TextBuffer::from_str("abc");
        assert_eq!(buf.slice(1..99), "bc");
        assert_eq!(buf.slice(5..2), "");
        let next = buf.spliced(10..20, "!");
        assert_eq!(next.to_string(), "abc!");
    }

    #[test]
    fn test_saved_state_tracking() {
        let mut buf = TextBuffer::from_str("a");
        assert!(!buf.is_modified());
        buf.replace(1..1, "b");
        assert!(buf.is_modified());
        buf.mark_saved();
        assert!(!buf.is_modified());
    }

    #[test]
    fn test_only_newline_ends_a_line() {
        let buf = TextBuffer::from_str("a\rb\u{2028}c\nd");
        assert_eq!(buf.line_start(2), 0);
        assert_eq!(buf.line_start(4), 0);
        assert_eq!(buf.line_end(0), 5);
        assert_eq!(buf.line_start(6), 6);
    }
}
