//! Circular window buffer for Yaz0 streams.
//!
//! The window holds the most recently produced (decompress) or consumed
//! (compress) bytes. Two cursors describe it:
//!
//! - `start`: oldest byte not yet flushed (decompress) or the current scan
//!   position (compress)
//! - `end`: where the next byte is written
//!
//! The occupied region is `[start, end)` with wraparound. Bytes before
//! `start` are still readable as history for backreferences until they are
//! overwritten. One slot is always kept free so that `start == end` means
//! empty.

use crate::error::{Result, Yaz0Error};

/// Window size shared by the Yaz0 encoder and decoder (8 KB).
pub const WINDOW_SIZE: usize = 0x2000;

/// A fixed-capacity circular byte buffer with explicit start/end cursors.
#[derive(Debug, Clone)]
pub struct Window {
    /// The underlying buffer.
    buffer: Vec<u8>,
    /// Oldest unconsumed byte.
    start: usize,
    /// Next write position.
    end: usize,
    /// Mask for efficient modulo (capacity - 1).
    mask: usize,
}

impl Window {
    /// Create a new zero-filled window with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of 2 or is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        assert!(
            capacity.is_power_of_two(),
            "Capacity must be a power of 2, got {}",
            capacity
        );

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|_| Yaz0Error::out_of_memory(capacity))?;
        buffer.resize(capacity, 0);

        Ok(Self {
            buffer,
            start: 0,
            end: 0,
            mask: capacity - 1,
        })
    }

    /// Map a logical position onto the buffer.
    ///
    /// Every index computation in this module and its callers goes through
    /// here; positions may be formed with wrapping arithmetic.
    #[inline]
    pub fn wrap(&self, position: usize) -> usize {
        position & self.mask
    }

    /// Get the capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of bytes in `[start, end)`.
    pub fn len(&self) -> usize {
        self.wrap(self.end.wrapping_sub(self.start))
    }

    /// Check if the occupied region is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Bytes that can be written before `end` would catch up with `start`.
    pub fn free(&self) -> usize {
        self.capacity() - 1 - self.len()
    }

    /// Physical start cursor.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Physical end cursor.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Read the byte at a logical position.
    #[inline]
    pub fn byte(&self, position: usize) -> u8 {
        self.buffer[self.wrap(position)]
    }

    /// Read the byte `offset` bytes after `start`.
    #[inline]
    pub fn peek(&self, offset: usize) -> u8 {
        self.byte(self.start.wrapping_add(offset))
    }

    /// Move `start` forward by `count` bytes.
    pub fn advance_start(&mut self, count: usize) {
        self.start = self.wrap(self.start.wrapping_add(count));
    }

    /// Write a single byte at `end`.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buffer[self.end] = byte;
        self.end = self.wrap(self.end + 1);
    }

    /// Copy `length` bytes starting `distance` bytes before `end`.
    ///
    /// The copy proceeds byte by byte so that `length > distance` repeats
    /// the bytes just written.
    pub fn copy_match(&mut self, distance: usize, length: usize) {
        let mut src = self.wrap(self.end.wrapping_sub(distance));
        for _ in 0..length {
            let byte = self.buffer[src];
            self.push(byte);
            src = self.wrap(src + 1);
        }
    }

    /// Append `input` at `end` with at most two contiguous copies.
    ///
    /// The caller is responsible for not overrunning history it still needs.
    pub fn fill_from(&mut self, input: &[u8]) {
        let first = input.len().min(self.capacity() - self.end);
        self.buffer[self.end..self.end + first].copy_from_slice(&input[..first]);
        let rest = &input[first..];
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.end = self.wrap(self.end + input.len());
    }

    /// Move bytes from `[start, end)` into `output` in FIFO order.
    ///
    /// Returns the number of bytes written.
    pub fn drain_into(&mut self, output: &mut [u8]) -> usize {
        let mut written = 0;
        while written < output.len() && !self.is_empty() {
            let contiguous = if self.start < self.end {
                self.end - self.start
            } else {
                self.capacity() - self.start
            };
            let n = contiguous.min(output.len() - written);
            output[written..written + n].copy_from_slice(&self.buffer[self.start..self.start + n]);
            written += n;
            self.advance_start(n);
        }
        written
    }

    /// Reset both cursors and zero the history.
    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
        self.buffer.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_basic() {
        let mut window = Window::new(8).unwrap();

        for &b in b"Hello" {
            window.push(b);
        }

        assert_eq!(window.len(), 5);
        assert_eq!(window.free(), 2);
        assert_eq!(window.peek(0), b'H');
        assert_eq!(window.peek(4), b'o');
    }

    #[test]
    fn test_window_wrap() {
        let mut window = Window::new(4).unwrap();
        let mut out = [0u8; 4];

        window.fill_from(b"ABC");
        assert_eq!(window.drain_into(&mut out[..2]), 2);
        window.fill_from(b"DE"); // Wraps around

        assert_eq!(window.end(), 1);
        assert_eq!(window.len(), 3);
        assert_eq!(window.drain_into(&mut out), 3);
        assert_eq!(&out[..3], b"CDE");
        assert!(window.is_empty());
    }

    #[test]
    fn test_window_copy_match() {
        let mut window = Window::new(32).unwrap();
        let mut out = [0u8; 16];

        window.fill_from(b"ABCD");
        window.copy_match(4, 4);

        let n = window.drain_into(&mut out);
        assert_eq!(&out[..n], b"ABCDABCD");
    }

    #[test]
    fn test_window_copy_overlap() {
        // "AB" -> copy distance=2, length=6 -> "ABABAB"
        let mut window = Window::new(32).unwrap();
        let mut out = [0u8; 16];

        window.fill_from(b"AB");
        window.copy_match(2, 6);

        let n = window.drain_into(&mut out);
        assert_eq!(&out[..n], b"ABABABAB");
    }

    #[test]
    fn test_window_single_byte_repeat() {
        // distance=1, length=10 -> repeat last byte 10 times
        let mut window = Window::new(32).unwrap();
        let mut out = [0u8; 16];

        window.push(b'X');
        window.copy_match(1, 10);

        let n = window.drain_into(&mut out);
        assert_eq!(&out[..n], b"XXXXXXXXXXX");
    }

    #[test]
    fn test_window_copy_across_boundary() {
        let mut window = Window::new(8).unwrap();
        let mut sink = [0u8; 8];

        window.fill_from(b"xxxxxx");
        window.drain_into(&mut sink);
        window.fill_from(b"abc"); // occupies slots 6, 7, 0
        window.copy_match(3, 3);

        let mut out = [0u8; 8];
        let n = window.drain_into(&mut out);
        assert_eq!(&out[..n], b"abcabc");
    }

    #[test]
    fn test_window_history_readable_after_drain() {
        let mut window = Window::new(16).unwrap();
        let mut out = [0u8; 16];

        window.fill_from(b"history");
        window.drain_into(&mut out);
        assert!(window.is_empty());

        // Drained bytes are still addressable by distance.
        window.copy_match(7, 7);
        let n = window.drain_into(&mut out);
        assert_eq!(&out[..n], b"history");
    }

    #[test]
    fn test_window_partial_drain_keeps_order() {
        let mut window = Window::new(16).unwrap();
        window.fill_from(b"0123456789");

        let mut collected = Vec::new();
        let mut one = [0u8; 1];
        while window.drain_into(&mut one) == 1 {
            collected.push(one[0]);
        }
        assert_eq!(collected, b"0123456789");
    }

    #[test]
    fn test_window_clear() {
        let mut window = Window::new(8).unwrap();
        window.fill_from(b"abc");
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.byte(0), 0);
    }

    #[test]
    #[should_panic(expected = "power of 2")]
    fn test_non_power_of_two_panics() {
        let _ = Window::new(100);
    }
}
