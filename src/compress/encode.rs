//! Sequence encoders: the boundary between parsers and the output bitstream.
//!
//! A parser hands every literal-run-plus-match decision to a
//! [`SequenceEncoder`], and closes the block with
//! [`SequenceEncoder::encode_last_literals`].  Two encoders exist:
//!
//! - [`Lz4Format`] writes the LZ4 block layout
//!   (`token = LLLL MMMM`, 16-bit little-endian offset, match length − 4).
//! - [`NativeFormat`] writes the native layout described on its type.
//!
//! Encoders also expose a byte-cost model used by the price-driven parsers.

use super::error::Lz5Error;
use super::types::{OutputFormat, LASTLITERALS, MINMATCH, SHORT_OFFSET_MAX};
#[cfg(feature = "native-format")]
use super::types::Parameters;

// ─────────────────────────────────────────────────────────────────────────────
// Output sink
// ─────────────────────────────────────────────────────────────────────────────

/// Whether encoders must check capacity before each sequence.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LimitedOutputDirective {
    /// The caller guarantees at least `compress_bound(input)` bytes.
    NotLimited,
    /// Capacity is checked before every sequence; the call fails early when
    /// the worst case would not fit.  The check is conservative: each
    /// sequence also reserves room for the trailing literals plus one spare
    /// byte, so a destination exactly as large as the output can still fail
    /// with [`Lz5Error::OutputTooSmall`].
    LimitedOutput,
}

/// Write cursor over the destination buffer.
///
/// Every write is bounds checked, so even a dishonest "unbounded" caller gets
/// an [`Lz5Error::OutputTooSmall`] instead of a panic.
pub struct Sink<'a> {
    buf: &'a mut [u8],
    pos: usize,
    limit: LimitedOutputDirective,
}

impl<'a> Sink<'a> {
    pub fn new(buf: &'a mut [u8], limit: LimitedOutputDirective) -> Self {
        Self { buf, pos: 0, limit }
    }

    #[inline]
    pub fn written(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Under [`LimitedOutputDirective::LimitedOutput`], fail unless `worst_case`
    /// more bytes fit.
    #[inline]
    pub fn reserve(&self, worst_case: usize) -> Result<(), Lz5Error> {
        if self.limit == LimitedOutputDirective::LimitedOutput && worst_case > self.remaining() {
            return Err(Lz5Error::OutputTooSmall);
        }
        Ok(())
    }

    #[inline]
    pub fn push(&mut self, byte: u8) -> Result<(), Lz5Error> {
        let slot = self.buf.get_mut(self.pos).ok_or(Lz5Error::OutputTooSmall)?;
        *slot = byte;
        self.pos += 1;
        Ok(())
    }

    pub fn extend(&mut self, bytes: &[u8]) -> Result<(), Lz5Error> {
        let end = self.pos + bytes.len();
        let dst = self
            .buf
            .get_mut(self.pos..end)
            .ok_or(Lz5Error::OutputTooSmall)?;
        dst.copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    /// Length extension: a run of 255s followed by the remainder.
    pub fn push_length(&mut self, mut n: usize) -> Result<(), Lz5Error> {
        while n >= 255 {
            self.push(255)?;
            n -= 255;
        }
        self.push(n as u8)
    }
}

/// Bytes taken by a length extension that starts at `mask`.
#[inline]
fn extension_len(n: usize, mask: usize) -> usize {
    if n >= mask {
        1 + (n - mask) / 255
    } else {
        0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SequenceEncoder
// ─────────────────────────────────────────────────────────────────────────────

/// Serialises parser decisions into one wire format.
pub trait SequenceEncoder {
    fn format(&self) -> OutputFormat;

    /// Largest offset this format can carry.
    fn max_distance(&self) -> u32;

    /// Shortest match this format can carry at `offset`.
    fn min_match(&self, offset: u32) -> usize;

    /// Write `literals` followed by a match of `match_length` bytes at
    /// `offset`, and record `offset` as the new repeat offset.
    fn encode_sequence(
        &self,
        sink: &mut Sink<'_>,
        literals: &[u8],
        match_length: usize,
        offset: u32,
        last_offset: &mut u32,
    ) -> Result<(), Lz5Error>;

    /// Close the block with a literal-only run.
    fn encode_last_literals(&self, sink: &mut Sink<'_>, literals: &[u8]) -> Result<(), Lz5Error>;

    /// Bytes spent on `count` literals, including length extensions.
    fn literals_price(&self, count: usize) -> u32;

    /// Bytes spent on a full sequence.
    fn sequence_price(
        &self,
        literals: usize,
        match_length: usize,
        offset: u32,
        last_offset: u32,
    ) -> u32;
}

// ─────────────────────────────────────────────────────────────────────────────
// LZ4 block format
// ─────────────────────────────────────────────────────────────────────────────

pub const ML_BITS: u32 = 4;
pub const ML_MASK: usize = (1 << ML_BITS) - 1;
pub const RUN_MASK: usize = (1 << (8 - ML_BITS)) - 1;

/// LZ4-compatible sequences with 16-bit offsets.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lz4Format;

impl SequenceEncoder for Lz4Format {
    fn format(&self) -> OutputFormat {
        OutputFormat::Lz4
    }

    fn max_distance(&self) -> u32 {
        SHORT_OFFSET_MAX
    }

    fn min_match(&self, _offset: u32) -> usize {
        MINMATCH
    }

    fn encode_sequence(
        &self,
        sink: &mut Sink<'_>,
        literals: &[u8],
        match_length: usize,
        offset: u32,
        last_offset: &mut u32,
    ) -> Result<(), Lz5Error> {
        debug_assert!(match_length >= MINMATCH);
        debug_assert!(offset >= 1 && offset <= SHORT_OFFSET_MAX);
        let lit = literals.len();
        let ml_code = match_length - MINMATCH;
        sink.reserve(1 + lit + lit / 255 + 2 + ml_code / 255 + 1 + LASTLITERALS)?;

        let token = ((lit.min(RUN_MASK) as u8) << ML_BITS) | ml_code.min(ML_MASK) as u8;
        sink.push(token)?;
        if lit >= RUN_MASK {
            sink.push_length(lit - RUN_MASK)?;
        }
        sink.extend(literals)?;
        sink.extend(&(offset as u16).to_le_bytes())?;
        if ml_code >= ML_MASK {
            sink.push_length(ml_code - ML_MASK)?;
        }
        *last_offset = offset;
        Ok(())
    }

    fn encode_last_literals(&self, sink: &mut Sink<'_>, literals: &[u8]) -> Result<(), Lz5Error> {
        let lit = literals.len();
        sink.reserve(1 + lit + (lit + 255 - RUN_MASK) / 255)?;
        sink.push((lit.min(RUN_MASK) as u8) << ML_BITS)?;
        if lit >= RUN_MASK {
            sink.push_length(lit - RUN_MASK)?;
        }
        sink.extend(literals)
    }

    fn literals_price(&self, count: usize) -> u32 {
        (count + extension_len(count, RUN_MASK)) as u32
    }

    fn sequence_price(&self, literals: usize, match_length: usize, _offset: u32, _last: u32) -> u32 {
        1 + self.literals_price(literals)
            + 2
            + extension_len(match_length - MINMATCH, ML_MASK) as u32
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Native format
// ─────────────────────────────────────────────────────────────────────────────

/// Offset kind carried in the two low token bits.
#[cfg(feature = "native-format")]
pub mod kind {
    /// Reuse the previous offset; no offset bytes follow.
    pub const REPEAT: u8 = 0;
    /// 16-bit little-endian offset.
    pub const SHORT: u8 = 1;
    /// 24-bit little-endian offset; match length counts from the long
    /// minimum.
    pub const LONG: u8 = 2;
    /// Final literal-only token of a block.
    pub const LAST: u8 = 3;
}

#[cfg(feature = "native-format")]
pub const NATIVE_RUN_MASK: usize = 7;
#[cfg(feature = "native-format")]
pub const NATIVE_ML_MASK: usize = 7;

/// Native sequences: `token = LLL MMM KK`.
///
/// `LLL` is the literal count (7 = extended), `MMM` the match length above
/// its base (7 = extended), `KK` the offset kind from [`kind`].  Field order
/// after the token: literal extension, literals, offset bytes, match
/// extension.  Short and repeat matches have base length 4; long matches
/// use the level's long-offset minimum.
#[cfg(feature = "native-format")]
#[derive(Clone, Copy, Debug)]
pub struct NativeFormat {
    max_distance: u32,
    long_min: usize,
}

#[cfg(feature = "native-format")]
impl NativeFormat {
    pub fn new(params: &Parameters) -> Self {
        Self {
            max_distance: params.max_distance(),
            long_min: params.min_match_long_off as usize,
        }
    }

    /// Offset kind, offset byte count and base length for `offset`.
    #[inline]
    fn classify(&self, offset: u32, last_offset: u32) -> (u8, usize, usize) {
        if offset == last_offset {
            (kind::REPEAT, 0, MINMATCH)
        } else if offset <= SHORT_OFFSET_MAX {
            (kind::SHORT, 2, MINMATCH)
        } else {
            (kind::LONG, 3, self.long_min)
        }
    }
}

#[cfg(feature = "native-format")]
impl SequenceEncoder for NativeFormat {
    fn format(&self) -> OutputFormat {
        OutputFormat::Native
    }

    fn max_distance(&self) -> u32 {
        self.max_distance
    }

    fn min_match(&self, offset: u32) -> usize {
        if offset > SHORT_OFFSET_MAX {
            self.long_min
        } else {
            MINMATCH
        }
    }

    fn encode_sequence(
        &self,
        sink: &mut Sink<'_>,
        literals: &[u8],
        match_length: usize,
        offset: u32,
        last_offset: &mut u32,
    ) -> Result<(), Lz5Error> {
        let (code, offset_bytes, base) = self.classify(offset, *last_offset);
        debug_assert!(offset >= 1 && offset <= self.max_distance);
        debug_assert!(match_length >= base);
        let lit = literals.len();
        let ml_code = match_length - base;
        sink.reserve(1 + lit + lit / 255 + 1 + offset_bytes + ml_code / 255 + 1 + LASTLITERALS)?;

        let token = ((lit.min(NATIVE_RUN_MASK) as u8) << 5)
            | ((ml_code.min(NATIVE_ML_MASK) as u8) << 2)
            | code;
        sink.push(token)?;
        if lit >= NATIVE_RUN_MASK {
            sink.push_length(lit - NATIVE_RUN_MASK)?;
        }
        sink.extend(literals)?;
        sink.extend(&offset.to_le_bytes()[..offset_bytes])?;
        if ml_code >= NATIVE_ML_MASK {
            sink.push_length(ml_code - NATIVE_ML_MASK)?;
        }
        *last_offset = offset;
        Ok(())
    }

    fn encode_last_literals(&self, sink: &mut Sink<'_>, literals: &[u8]) -> Result<(), Lz5Error> {
        let lit = literals.len();
        sink.reserve(1 + lit + (lit + 255 - NATIVE_RUN_MASK) / 255)?;
        sink.push(((lit.min(NATIVE_RUN_MASK) as u8) << 5) | kind::LAST)?;
        if lit >= NATIVE_RUN_MASK {
            sink.push_length(lit - NATIVE_RUN_MASK)?;
        }
        sink.extend(literals)
    }

    fn literals_price(&self, count: usize) -> u32 {
        (count + extension_len(count, NATIVE_RUN_MASK)) as u32
    }

    fn sequence_price(
        &self,
        literals: usize,
        match_length: usize,
        offset: u32,
        last_offset: u32,
    ) -> u32 {
        let (_, offset_bytes, base) = self.classify(offset, last_offset);
        1 + self.literals_price(literals)
            + offset_bytes as u32
            + extension_len(match_length.saturating_sub(base), NATIVE_ML_MASK) as u32
    }
}
