//! Frame output.
//!
//! A paint pass writes every escape code and cell into one buffer; the painter
//! hands it to the sink in a single write and keeps the allocation for the
//! next frame.

use std::io::{self, Write};

/// Initial frame capacity. An 80x24 screen of plain cells plus a cursor move
/// per row fits without growing.
const FRAME_CAPACITY: usize = 16 * 1024;

/// Bytes of the frame being painted.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    frame: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self {
            frame: Vec::with_capacity(FRAME_CAPACITY),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    /// Start a new frame, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.frame.clear();
    }

    /// Append one cell byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.frame.push(byte);
    }

    /// Append a pre-rendered cell, such as a coloured border glyph.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.frame.extend_from_slice(bytes);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.frame
    }

    /// Write the frame to `writer` in one call and start a new one.
    ///
    /// Returns the number of bytes written; an empty frame writes nothing.
    pub fn flush_to<W: Write + ?Sized>(&mut self, writer: &mut W) -> io::Result<usize> {
        let written = self.frame.len();
        if written == 0 {
            return Ok(0);
        }
        writer.write_all(&self.frame)?;
        writer.flush()?;
        self.frame.clear();
        Ok(written)
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.frame.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_is_written_in_one_flush() {
        let mut out = OutputBuffer::new();
        write!(out, "\x1b[{};{}H", 1, 1).unwrap();
        out.write_byte(b'x');

        let mut sink = Vec::new();
        assert_eq!(out.flush_to(&mut sink).unwrap(), 7);
        assert_eq!(sink, b"\x1b[1;1Hx");
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_frame_writes_nothing() {
        let mut out = OutputBuffer::new();
        let mut sink = Vec::new();
        assert_eq!(out.flush_to(&mut sink).unwrap(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_clear_starts_a_new_frame() {
        let mut out = OutputBuffer::new();
        out.write_byte(b'a');
        out.clear();
        out.write_byte(b'b');
        assert_eq!(out.as_bytes(), b"b");
    }
}
