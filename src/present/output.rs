//! `OutputBuffer`: accumulates one frame of ANSI output for a single write.

use crate::buffer::{Modifiers, Rgb};
use std::io::Write;

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// A whole frame is accumulated here and flushed with one `write_all`, so
/// the terminal never shows a half-drawn frame.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { data: Vec::with_capacity(capacity) }
    }

    /// Create a buffer sized for a typical frame.
    pub fn new() -> Self {
        Self::with_capacity(16 * 1024)
    }

    /// Clear the buffer for reuse, keeping its allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write one character.
    #[inline]
    pub fn write_char(&mut self, ch: char) {
        self.data.extend_from_slice(ch.encode_utf8(&mut [0; 4]).as_bytes());
    }

    /// Move the cursor to the 0-indexed cell (x, y), in the shortest form.
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        let (row, col) = (u32::from(y) + 1, u32::from(x) + 1);
        // Writes into a Vec cannot fail.
        let _ = match (row, col) {
            (1, 1) => self.data.write_all(b"\x1b[H"),
            (row, 1) => write!(self.data, "\x1b[{row}H"),
            (row, col) => write!(self.data, "\x1b[{row};{col}H"),
        };
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25l");
    }

    /// Show cursor.
    #[inline]
    pub fn cursor_show(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25h");
    }

    /// Set foreground color (true color).
    #[inline]
    pub fn set_fg(&mut self, color: Rgb) {
        let _ = write!(self.data, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
    }

    /// Set background color (true color).
    #[inline]
    pub fn set_bg(&mut self, color: Rgb) {
        let _ = write!(self.data, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
    }

    /// Turn on every attribute in `modifiers`.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        const CODES: [(Modifiers, &[u8]); 8] = [
            (Modifiers::BOLD, b"\x1b[1m"),
            (Modifiers::DIM, b"\x1b[2m"),
            (Modifiers::ITALIC, b"\x1b[3m"),
            (Modifiers::UNDERLINE, b"\x1b[4m"),
            (Modifiers::BLINK, b"\x1b[5m"),
            (Modifiers::REVERSED, b"\x1b[7m"),
            (Modifiers::HIDDEN, b"\x1b[8m"),
            (Modifiers::STRIKETHROUGH, b"\x1b[9m"),
        ];
        for (flag, code) in CODES {
            if modifiers.contains(flag) {
                self.data.extend_from_slice(code);
            }
        }
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Clear the entire screen.
    #[inline]
    pub fn clear_screen(&mut self) {
        self.data.extend_from_slice(b"\x1b[2J");
    }

    /// Flush to a writer in a single write.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_move_shortest_form() {
        let mut out = OutputBuffer::new();
        out.cursor_move(0, 0);
        assert_eq!(out.as_bytes(), b"\x1b[H");

        out.clear();
        out.cursor_move(0, 5);
        assert_eq!(out.as_bytes(), b"\x1b[6H");

        out.clear();
        out.cursor_move(10, 5);
        assert_eq!(out.as_bytes(), b"\x1b[6;11H");
    }

    #[test]
    fn test_set_modifiers_in_sgr_order() {
        let mut out = OutputBuffer::new();
        out.set_modifiers(Modifiers::UNDERLINE | Modifiers::BOLD);
        assert_eq!(out.as_bytes(), b"\x1b[1m\x1b[4m");
    }

    #[test]
    fn test_flush_writes_everything() {
        let mut out = OutputBuffer::new();
        out.write_char('é');
        out.reset_attrs();
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, "é\x1b[0m".as_bytes());
    }
}
