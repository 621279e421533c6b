//! Resumable Yaz0 encoder.
//!
//! The encoder scans the window with a lazy matcher: the best match at the
//! current position is compared with the best match one byte later, and a
//! literal is emitted whenever deferring gives a strictly longer match.
//! Tokens are collected eight at a time, encoded atomically into a staging
//! buffer and drained into whatever output space the caller offers.

use crate::buffers::{Buffers, PendingOutput};
use crate::config::{Yaz0Config, ZeroRunSearch};
use crate::format::{GROUP_TOKENS, Header, MAX_DISTANCE, MAX_MATCH, MIN_MATCH};
use crate::group::{GroupWriter, Token};
use crate::hash::{HashTable, hash3};
use tracing::{debug, trace};
use yaz0_core::error::Result;
use yaz0_core::traits::StreamStatus;
use yaz0_core::window::Window;

/// Bytes of lookahead kept in the window before each group.
///
/// Eight maximal matches, plus the byte after the last one that the lazy
/// comparison and the hash of the final covered position read.
pub(crate) const LOOKAHEAD: usize = GROUP_TOKENS * MAX_MATCH + 2;

/// A candidate backreference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match {
    distance: usize,
    length: usize,
}

/// Encoder state owned by the stream context.
#[derive(Debug)]
pub(crate) struct Encoder {
    table: HashTable,
    config: Yaz0Config,
    max_probes: usize,
    size: u32,
    /// Bytes consumed by emitted tokens; the scan position.
    total_out: u32,
    header_staged: bool,
    pending: PendingOutput,
}

impl Encoder {
    pub(crate) fn new(size: u32, config: Yaz0Config) -> Result<Self> {
        Ok(Self {
            table: HashTable::new()?,
            config,
            max_probes: config.max_probes(),
            size,
            total_out: 0,
            header_staged: false,
            pending: PendingOutput::default(),
        })
    }

    pub(crate) fn size(&self) -> u32 {
        self.size
    }

    pub(crate) fn total_out(&self) -> u32 {
        self.total_out
    }

    pub(crate) fn config(&self) -> &Yaz0Config {
        &self.config
    }

    fn remaining(&self) -> usize {
        (self.size - self.total_out) as usize
    }

    pub(crate) fn run(&mut self, window: &mut Window, io: &mut Buffers<'_>) -> Result<StreamStatus> {
        loop {
            if !self.pending.is_empty() && !self.pending.drain(io) {
                return Ok(StreamStatus::NeedsOutput);
            }

            if !self.header_staged {
                self.pending.stage(&Header::new(self.size).to_bytes());
                self.header_staged = true;
                debug!(decompressed_size = self.size, "staged yaz0 header");
                continue;
            }

            if self.total_out >= self.size {
                return Ok(StreamStatus::Done);
            }

            if !self.feed(window, io) {
                return Ok(StreamStatus::NeedsInput);
            }

            self.compress_group(window);
        }
    }

    /// Top up the window with lookahead.
    ///
    /// Keeps at least `min(remaining, LOOKAHEAD)` unconsumed bytes while
    /// never holding more than `capacity - MAX_DISTANCE`, so the history a
    /// backreference may reach is never overwritten. Returns `false` when
    /// the input ran out before the minimum was reached.
    fn feed(&mut self, window: &mut Window, io: &mut Buffers<'_>) -> bool {
        let avail = window.len();
        let wanted = self.remaining().min(LOOKAHEAD);
        if avail >= wanted {
            return true;
        }

        let min = wanted - avail;
        let max = (window.capacity() - MAX_DISTANCE - avail).min(self.remaining() - avail);
        let chunk = io.take(max);
        window.fill_from(chunk);
        chunk.len() >= min
    }

    /// Emit up to eight tokens as one staged group.
    fn compress_group(&mut self, window: &mut Window) {
        let mut group = GroupWriter::new();
        while !group.is_full() && self.total_out < self.size {
            let token = self.next_token(window);
            group.push(token);
        }

        if self.table.needs_compaction() {
            let before = self.table.live();
            self.table.compact(self.total_out);
            debug!(
                before,
                after = self.table.live(),
                position = self.total_out,
                "compacted hash table"
            );
        }

        trace!(tokens = group.len(), position = self.total_out, "emit group");
        self.pending.stage_with(|out| group.encode(out));
    }

    /// Choose the token at the scan position and advance past it.
    fn next_token(&mut self, window: &mut Window) -> Token {
        let (a, b, c, d) = (window.peek(0), window.peek(1), window.peek(2), window.peek(3));

        let h = hash3(a, b, c);
        let mut best = self.find_hash_match(window, h, 0);
        self.table
            .insert(h, self.total_out, self.total_out, self.max_probes);

        if a == 0 && (self.total_out as usize) < MAX_DISTANCE {
            if let Some(search) = self.config.zero_run {
                let zero = self.find_zero_run(window, search);
                if zero.map_or(0, |m| m.length) > best.map_or(0, |m| m.length) {
                    best = zero;
                }
            }
        }

        let next = self.find_hash_match(window, hash3(b, c, d), 1);

        match best {
            Some(m) if next.is_none_or(|n| n.length <= m.length) => {
                for i in 1..m.length {
                    let h = hash3(window.peek(i), window.peek(i + 1), window.peek(i + 2));
                    self.table.insert(
                        h,
                        self.total_out + i as u32,
                        self.total_out,
                        self.max_probes,
                    );
                }
                window.advance_start(m.length);
                self.total_out += m.length as u32;
                Token::Match {
                    distance: m.distance as u16,
                    length: m.length as u16,
                }
            }
            _ => {
                window.advance_start(1);
                self.total_out += 1;
                Token::Literal(a)
            }
        }
    }

    /// Length of the match between `offset` and `offset - distance`.
    ///
    /// Capped at [`MAX_MATCH`] and at the bytes left in the stream. When
    /// `hint` is non-zero the byte at `hint` is compared first, since a
    /// candidate that differs there cannot beat the current best.
    fn match_size(&self, window: &Window, offset: usize, distance: usize, hint: usize) -> usize {
        let cap = self.remaining().min(MAX_MATCH);
        let current = window.start().wrapping_add(offset);
        let source = current.wrapping_sub(distance);

        if hint > 0
            && window.byte(source.wrapping_add(hint)) != window.byte(current.wrapping_add(hint))
        {
            return 0;
        }

        let mut length = 0;
        while length < cap
            && window.byte(source.wrapping_add(length)) == window.byte(current.wrapping_add(length))
        {
            length += 1;
        }
        length
    }

    /// Longest reachable match for the prefix hashed to `h` at `offset`.
    fn find_hash_match(&self, window: &Window, h: u32, offset: usize) -> Option<Match> {
        let position = self.total_out + offset as u32;
        let mut best = Match {
            distance: 0,
            length: 0,
        };

        for entry in self.table.candidates(h, self.max_probes) {
            let Some(distance) = position.checked_sub(entry).map(|d| d as usize) else {
                continue;
            };
            if distance == 0 || distance > MAX_DISTANCE {
                continue;
            }
            let length = self.match_size(window, offset, distance, best.length);
            if length > best.length {
                best = Match { distance, length };
            }
        }

        (best.length >= MIN_MATCH).then_some(best)
    }

    /// Scan `(near, far]` for a run matching the zero at the scan position.
    ///
    /// Distances are limited to the bytes already consumed, so the result
    /// never points before the start of the stream.
    fn find_zero_run(&self, window: &Window, search: ZeroRunSearch) -> Option<Match> {
        let far = (search.far as usize)
            .min(MAX_DISTANCE)
            .min(self.total_out as usize);
        let near = search.near as usize;
        let mut best = Match {
            distance: 0,
            length: 0,
        };

        for distance in (near + 1..=far).rev() {
            let length = self.match_size(window, 0, distance, 0);
            if length > best.length {
                best = Match { distance, length };
            }
        }

        (best.length >= MIN_MATCH).then_some(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{decode_match, match_token_len};
    use yaz0_core::window::WINDOW_SIZE;

    /// Compress in one call and split the body back into tokens.
    fn tokens_of(data: &[u8], config: Yaz0Config) -> (Vec<u8>, Vec<Token>) {
        let mut window = Window::new(WINDOW_SIZE).unwrap();
        let mut encoder = Encoder::new(data.len() as u32, config).unwrap();
        let mut output = vec![0u8; data.len() * 2 + 64];
        let mut io = Buffers::new(data, &mut output);
        let status = encoder.run(&mut window, &mut io).unwrap();
        assert_eq!(status, StreamStatus::Done);
        let produced = io.produced();
        output.truncate(produced);

        let mut tokens = Vec::new();
        let mut pos = 16;
        let mut decoded = 0usize;
        while decoded < data.len() {
            let control = output[pos];
            pos += 1;
            for bit in 0..8 {
                if decoded >= data.len() {
                    break;
                }
                if control & (0x80 >> bit) != 0 {
                    tokens.push(Token::Literal(output[pos]));
                    pos += 1;
                    decoded += 1;
                } else {
                    let len = match_token_len(output[pos]);
                    let (distance, length) = decode_match(&output[pos..pos + len]);
                    tokens.push(Token::Match {
                        distance: distance as u16,
                        length: length as u16,
                    });
                    pos += len;
                    decoded += length;
                }
            }
        }
        assert_eq!(pos, output.len());
        (output, tokens)
    }

    #[test]
    fn test_run_of_twelve() {
        let (output, tokens) = tokens_of(b"AAAAAAAAAAAA", Yaz0Config::DEFAULT);
        assert_eq!(
            tokens,
            [
                Token::Literal(b'A'),
                Token::Match {
                    distance: 1,
                    length: 11
                }
            ]
        );
        assert_eq!(&output[16..], &[0x80, b'A', 0x90, 0x00]);
    }

    #[test]
    fn test_lazy_match_prefers_longer_later_match() {
        // At offset 11 the match "abc" (distance 11) is shorter than the
        // match "bcdef" one byte later, so 'a' is emitted as a literal.
        let data = b"abcXXbcdefYabcdef";
        let (_, tokens) = tokens_of(data, Yaz0Config::BEST);
        let position_of_a = tokens
            .iter()
            .scan(0usize, |pos, t| {
                let at = *pos;
                *pos += match t {
                    Token::Literal(_) => 1,
                    Token::Match { length, .. } => *length as usize,
                };
                Some((at, *t))
            })
            .find(|(at, _)| *at == 11)
            .map(|(_, t)| t);
        assert_eq!(position_of_a, Some(Token::Literal(b'a')));
        assert!(tokens.contains(&Token::Match {
            distance: 7,
            length: 5
        }));
    }

    #[test]
    fn test_matches_respect_limits() {
        let mut data = Vec::new();
        for i in 0..6000u32 {
            data.push((i % 251) as u8 ^ (i / 700) as u8);
        }
        data.extend(std::iter::repeat_n(7u8, 1000));

        let (_, tokens) = tokens_of(&data, Yaz0Config::BEST);
        let mut pos = 0usize;
        for token in tokens {
            match token {
                Token::Literal(_) => pos += 1,
                Token::Match { distance, length } => {
                    assert!((1..=MAX_DISTANCE).contains(&(distance as usize)));
                    assert!((MIN_MATCH..=MAX_MATCH).contains(&(length as usize)));
                    assert!(distance as usize <= pos, "reference before stream start");
                    pos += length as usize;
                }
            }
        }
        assert_eq!(pos, data.len());
    }

    #[test]
    fn test_zero_run_search_finds_distant_zeros() {
        // 0x9A0 zeros, then noise long enough that hash entries for the
        // zero run are no longer probed at level 1, then more zeros.
        let mut data = vec![0u8; 0x9A0];
        data.extend((0..0x600u32).map(|i| (i * 7 + 1) as u8 | 1));
        data.extend(vec![0u8; 0x20]);

        let (_, with) = tokens_of(&data, Yaz0Config::FAST);
        let (_, without) = tokens_of(&data, Yaz0Config::FAST.without_zero_runs());
        let long_zero = |tokens: &[Token]| {
            tokens.iter().any(|t| {
                matches!(t, Token::Match { distance, length }
                    if *distance as usize > 0x990 && *length >= 0x20)
            })
        };
        assert!(long_zero(&with));
        assert!(with.len() <= without.len());
    }

    #[test]
    fn test_group_is_staged_whole() {
        let data = b"abcdefghij";
        let mut window = Window::new(WINDOW_SIZE).unwrap();
        let mut encoder = Encoder::new(data.len() as u32, Yaz0Config::DEFAULT).unwrap();

        // Header alone: 16 bytes of room are enough to finish it.
        let mut out = [0u8; 16];
        let mut io = Buffers::new(data, &mut out);
        assert_eq!(
            encoder.run(&mut window, &mut io).unwrap(),
            StreamStatus::NeedsOutput
        );
        assert_eq!(io.produced(), 16);
        let consumed = io.consumed();
        assert_eq!(&out[..4], b"Yaz0");

        let mut rest = [0u8; 64];
        let mut io = Buffers::new(&data[consumed..], &mut rest);
        assert_eq!(
            encoder.run(&mut window, &mut io).unwrap(),
            StreamStatus::Done
        );
        assert_eq!(io.produced(), 1 + 8 + 1 + 2);
        assert_eq!(encoder.total_out(), 10);
    }

    #[test]
    fn test_feed_waits_for_minimum_lookahead() {
        let data = vec![1u8; 5000];
        let mut window = Window::new(WINDOW_SIZE).unwrap();
        let mut encoder = Encoder::new(data.len() as u32, Yaz0Config::DEFAULT).unwrap();
        let mut out = [0u8; 64];

        let mut io = Buffers::new(&data[..100], &mut out);
        assert_eq!(
            encoder.run(&mut window, &mut io).unwrap(),
            StreamStatus::NeedsInput
        );
        assert_eq!(io.consumed(), 100);
        assert_eq!(io.produced(), 16);
        assert_eq!(encoder.total_out(), 0);
        assert_eq!(window.len(), 100);
    }
}
