//! Resumable Yaz0 decoder.
//!
//! The decoder is a state machine whose whole suspension state is the
//! current [`DecodeState`], the group flags, the auxiliary buffer and the
//! progress counter. Every return point leaves it ready to resume on the
//! next call with fresh buffers.

use crate::buffers::{AuxBuffer, Buffers};
use crate::format::{HEADER_SIZE, Header, MAX_GROUP_OUTPUT};
use crate::group::{GroupReader, decode_match, match_token_len};
use tracing::debug;
use yaz0_core::error::Result;
use yaz0_core::traits::StreamStatus;
use yaz0_core::window::Window;

/// Position of the decoder in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// Collecting the 16 header bytes.
    AwaitHeader,
    /// Waiting to read the next control byte.
    AwaitGroupHeader,
    /// Decoding the tokens of the current group.
    InGroup,
    /// Every byte has been reconstructed; draining the window.
    Done,
}

/// Decoder state owned by the stream context.
#[derive(Debug)]
pub(crate) struct Decoder {
    state: DecodeState,
    header: Option<Header>,
    aux: AuxBuffer,
    group: GroupReader,
    total_out: u32,
}

impl Decoder {
    pub(crate) fn new() -> Self {
        Self {
            state: DecodeState::AwaitHeader,
            header: None,
            aux: AuxBuffer::default(),
            group: GroupReader::default(),
            total_out: 0,
        }
    }

    pub(crate) fn state(&self) -> DecodeState {
        self.state
    }

    pub(crate) fn header(&self) -> Option<Header> {
        self.header
    }

    pub(crate) fn total_out(&self) -> u32 {
        self.total_out
    }

    fn remaining(&self) -> usize {
        self.header
            .map_or(0, |h| (h.decompressed_size - self.total_out) as usize)
    }

    /// Flush decoded bytes, then report that more input is needed.
    fn need_input(window: &mut Window, io: &mut Buffers<'_>) -> StreamStatus {
        let n = window.drain_into(io.output_remaining());
        io.commit(n);
        StreamStatus::NeedsInput
    }

    pub(crate) fn run(&mut self, window: &mut Window, io: &mut Buffers<'_>) -> Result<StreamStatus> {
        loop {
            match self.state {
                DecodeState::AwaitHeader => {
                    if !self.aux.fill(io, HEADER_SIZE) {
                        return Ok(StreamStatus::NeedsInput);
                    }
                    let header = Header::parse(self.aux.bytes())?;
                    self.aux.clear();
                    debug!(
                        decompressed_size = header.decompressed_size,
                        "parsed yaz0 header"
                    );
                    self.header = Some(header);
                    self.state = if header.decompressed_size == 0 {
                        DecodeState::Done
                    } else {
                        DecodeState::AwaitGroupHeader
                    };
                }

                DecodeState::AwaitGroupHeader => {
                    // A whole group must fit before its control byte is taken.
                    if window.free() < MAX_GROUP_OUTPUT {
                        let n = window.drain_into(io.output_remaining());
                        io.commit(n);
                        if window.free() < MAX_GROUP_OUTPUT {
                            return Ok(StreamStatus::NeedsOutput);
                        }
                    }
                    let Some(control) = io.take_byte() else {
                        return Ok(Self::need_input(window, io));
                    };
                    self.group = GroupReader::new(control);
                    self.state = DecodeState::InGroup;
                }

                DecodeState::InGroup => {
                    if self.group.is_exhausted() {
                        self.state = DecodeState::AwaitGroupHeader;
                        continue;
                    }

                    let produced = if self.group.current_is_literal() {
                        let Some(byte) = io.take_byte() else {
                            return Ok(Self::need_input(window, io));
                        };
                        window.push(byte);
                        1
                    } else {
                        if !self.aux.fill(io, 2) {
                            return Ok(Self::need_input(window, io));
                        }
                        let token_len = match_token_len(self.aux.as_slice()[0]);
                        if !self.aux.fill(io, token_len) {
                            return Ok(Self::need_input(window, io));
                        }
                        let (distance, length) = decode_match(self.aux.as_slice());
                        self.aux.clear();
                        // A corrupt length must not run past the declared size.
                        let length = length.min(self.remaining());
                        window.copy_match(distance, length);
                        length
                    };

                    self.group.advance();
                    self.total_out += produced as u32;
                    if self.remaining() == 0 {
                        self.state = DecodeState::Done;
                    }
                }

                DecodeState::Done => {
                    let n = window.drain_into(io.output_remaining());
                    io.commit(n);
                    return Ok(if window.is_empty() {
                        StreamStatus::Done
                    } else {
                        StreamStatus::NeedsOutput
                    });
                }
            }
        }
    }
}
