//! Cursors over caller buffers and the small staging buffers that let
//! headers and tokens straddle `run` calls.

use crate::format::MAX_GROUP_SIZE;

/// Input and output slices handed to one `run` call, with cursors.
#[derive(Debug)]
pub(crate) struct Buffers<'a> {
    input: &'a [u8],
    in_pos: usize,
    output: &'a mut [u8],
    out_pos: usize,
}

impl<'a> Buffers<'a> {
    pub(crate) fn new(input: &'a [u8], output: &'a mut [u8]) -> Self {
        Self {
            input,
            in_pos: 0,
            output,
            out_pos: 0,
        }
    }

    pub(crate) fn consumed(&self) -> usize {
        self.in_pos
    }

    pub(crate) fn produced(&self) -> usize {
        self.out_pos
    }

    pub(crate) fn input_remaining(&self) -> usize {
        self.input.len() - self.in_pos
    }

    /// Take one input byte.
    pub(crate) fn take_byte(&mut self) -> Option<u8> {
        let byte = *self.input.get(self.in_pos)?;
        self.in_pos += 1;
        Some(byte)
    }

    /// Take up to `count` input bytes.
    pub(crate) fn take(&mut self, count: usize) -> &'a [u8] {
        let count = count.min(self.input_remaining());
        let input = self.input;
        let chunk = &input[self.in_pos..self.in_pos + count];
        self.in_pos += count;
        chunk
    }

    /// Unwritten part of the output slice.
    pub(crate) fn output_remaining(&mut self) -> &mut [u8] {
        &mut self.output[self.out_pos..]
    }

    /// Mark `count` bytes of the output slice as written.
    pub(crate) fn commit(&mut self, count: usize) {
        self.out_pos += count;
    }
}

/// Assembles a header or token whose bytes arrive across calls.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct AuxBuffer {
    bytes: [u8; 16],
    len: usize,
}

impl AuxBuffer {
    /// Load input until `target` bytes are held. Returns `true` once complete.
    pub(crate) fn fill(&mut self, io: &mut Buffers<'_>, target: usize) -> bool {
        if self.len < target {
            let chunk = io.take(target - self.len);
            self.bytes[self.len..self.len + chunk.len()].copy_from_slice(chunk);
            self.len += chunk.len();
        }
        self.len >= target
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub(crate) fn bytes(&self) -> &[u8; 16] {
        &self.bytes
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }
}

/// Encoded bytes waiting for output space: the header or one group.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PendingOutput {
    bytes: [u8; MAX_GROUP_SIZE],
    pos: usize,
    len: usize,
}

impl Default for PendingOutput {
    fn default() -> Self {
        Self {
            bytes: [0; MAX_GROUP_SIZE],
            pos: 0,
            len: 0,
        }
    }
}

impl PendingOutput {
    pub(crate) fn is_empty(&self) -> bool {
        self.pos == self.len
    }

    /// Stage bytes for output. Only valid once the previous stage drained.
    pub(crate) fn stage(&mut self, bytes: &[u8]) {
        debug_assert!(self.is_empty());
        self.bytes[..bytes.len()].copy_from_slice(bytes);
        self.pos = 0;
        self.len = bytes.len();
    }

    /// Stage space for an encoder to write into directly.
    pub(crate) fn stage_with(&mut self, encode: impl FnOnce(&mut [u8; MAX_GROUP_SIZE]) -> usize) {
        debug_assert!(self.is_empty());
        self.len = encode(&mut self.bytes);
        self.pos = 0;
    }

    /// Copy as much as fits into the output. Returns `true` once drained.
    pub(crate) fn drain(&mut self, io: &mut Buffers<'_>) -> bool {
        let out = io.output_remaining();
        let n = out.len().min(self.len - self.pos);
        out[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
        self.pos += n;
        io.commit(n);
        self.is_empty()
    }
}
