//! Group bitstream codec.
//!
//! A group is one control byte followed by up to eight tokens. Bit `7 - i`
//! of the control byte is set when token `i` is a literal byte and clear
//! when it is a backreference.
//!
//! Backreferences store `distance - 1` in 12 bits:
//!
//! ```text
//! length 3..=0x11:    [ (len-2) << 4 | d >> 8 ] [ d & 0xff ]
//! length 0x12..=0x111: [ d >> 8 ] [ d & 0xff ] [ len - 0x12 ]
//! ```

use crate::format::{GROUP_TOKENS, LONG_MATCH, MAX_GROUP_SIZE};

/// One literal byte or one backreference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A byte copied verbatim.
    Literal(u8),
    /// Copy `length` bytes from `distance` bytes back.
    Match {
        /// Distance back from the current position, 1..=0x1000.
        distance: u16,
        /// Number of bytes to copy, 3..=0x111.
        length: u16,
    },
}

impl Token {
    /// Whether this token is flagged as a literal in the control byte.
    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Literal(_))
    }

    /// Number of bytes this token occupies after the control byte.
    pub fn encoded_len(&self) -> usize {
        match *self {
            Token::Literal(_) => 1,
            Token::Match { length, .. } if (length as usize) < LONG_MATCH => 2,
            Token::Match { .. } => 3,
        }
    }

    /// Encode the token into `out`, returning the number of bytes written.
    pub fn encode(&self, out: &mut [u8]) -> usize {
        match *self {
            Token::Literal(byte) => {
                out[0] = byte;
                1
            }
            Token::Match { distance, length } => {
                let d = distance - 1;
                let length = length as usize;
                if length < LONG_MATCH {
                    out[0] = ((d >> 8) as u8) | (((length - 2) as u8) << 4);
                    out[1] = d as u8;
                    2
                } else {
                    out[0] = (d >> 8) as u8;
                    out[1] = d as u8;
                    out[2] = (length - LONG_MATCH) as u8;
                    3
                }
            }
        }
    }
}

/// Size of a backreference token given its first byte.
///
/// A zero high nibble selects the 3-byte form.
pub fn match_token_len(first: u8) -> usize {
    if first >> 4 == 0 { 3 } else { 2 }
}

/// Decode a complete 2- or 3-byte backreference into `(distance, length)`.
pub fn decode_match(bytes: &[u8]) -> (usize, usize) {
    let distance = ((((bytes[0] & 0x0F) as usize) << 8) | bytes[1] as usize) + 1;
    let nibble = (bytes[0] >> 4) as usize;
    let length = if nibble == 0 {
        bytes[2] as usize + LONG_MATCH
    } else {
        nibble + 2
    };
    (distance, length)
}

/// Collects up to eight tokens and serializes them as one group.
#[derive(Debug, Clone)]
pub struct GroupWriter {
    tokens: [Token; GROUP_TOKENS],
    count: usize,
}

impl Default for GroupWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupWriter {
    /// Create an empty group.
    pub fn new() -> Self {
        Self {
            tokens: [Token::Literal(0); GROUP_TOKENS],
            count: 0,
        }
    }

    /// Append a token. The group must not be full.
    pub fn push(&mut self, token: Token) {
        debug_assert!(!self.is_full(), "group already holds eight tokens");
        self.tokens[self.count] = token;
        self.count += 1;
    }

    /// Whether eight tokens have been collected.
    pub fn is_full(&self) -> bool {
        self.count == GROUP_TOKENS
    }

    /// Number of tokens collected.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no tokens have been collected.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Tokens collected so far.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens[..self.count]
    }

    /// Control byte for the collected tokens; unused low bits are zero.
    pub fn control_byte(&self) -> u8 {
        self.tokens()
            .iter()
            .enumerate()
            .filter(|(_, token)| token.is_literal())
            .fold(0u8, |header, (i, _)| header | (0x80 >> i))
    }

    /// Serialize the group, returning the number of bytes written.
    pub fn encode(&self, out: &mut [u8; MAX_GROUP_SIZE]) -> usize {
        out[0] = self.control_byte();
        let mut pos = 1;
        for token in self.tokens() {
            pos += token.encode(&mut out[pos..]);
        }
        pos
    }
}

/// Walks the flags of one control byte, most significant bit first.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupReader {
    header: u8,
    remaining: u8,
}

impl GroupReader {
    /// Start reading a freshly loaded control byte.
    pub fn new(header: u8) -> Self {
        Self {
            header,
            remaining: GROUP_TOKENS as u8,
        }
    }

    /// Whether every flag has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Flag of the current token: `true` for a literal.
    ///
    /// Does not consume the flag; call [`GroupReader::advance`] once the
    /// token has been fully decoded.
    pub fn current_is_literal(&self) -> bool {
        debug_assert!(!self.is_exhausted());
        self.header & (1 << (self.remaining - 1)) != 0
    }

    /// Move to the next flag.
    pub fn advance(&mut self) {
        self.remaining -= 1;
    }

    /// Flags not yet consumed.
    pub fn remaining(&self) -> u8 {
        self.remaining
    }
}
