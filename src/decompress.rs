//! Reference block decoder for both wire formats.
//!
//! A block is one level byte followed by its sequences.  The level byte
//! selects the format, so one decoder handles any block the engine
//! produces.  Decoding appends to a `Vec<u8>` whose existing contents act as
//! history: the tail of a dictionary, or the output of earlier blocks in a
//! stream.
//!
//! Malformed input is reported as [`DecompressError::MalformedInput`]; the
//! decoder never panics and never reads outside `src`.

use thiserror::Error;

#[cfg(feature = "native-format")]
use crate::compress::encode::kind;
use crate::compress::types::{params_for_level_byte, OutputFormat, MAX_WINDOW, MINMATCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecompressError {
    /// Truncated block, unknown level byte, or a reference outside history.
    #[error("malformed compressed block")]
    MalformedInput,
    /// The block decodes to more than the permitted output size.
    #[error("decompressed block exceeds the output limit")]
    OutputTooSmall,
}

// ─────────────────────────────────────────────────────────────────────────────
// Input cursor
// ─────────────────────────────────────────────────────────────────────────────

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    #[inline]
    fn byte(&mut self) -> Result<u8, DecompressError> {
        let b = *self.buf.get(self.pos).ok_or(DecompressError::MalformedInput)?;
        self.pos += 1;
        Ok(b)
    }

    #[inline]
    fn take(&mut self, n: usize) -> Result<&'a [u8], DecompressError> {
        let end = self.pos.checked_add(n).ok_or(DecompressError::MalformedInput)?;
        let bytes = self
            .buf
            .get(self.pos..end)
            .ok_or(DecompressError::MalformedInput)?;
        self.pos = end;
        Ok(bytes)
    }

    /// Little-endian integer of `width` bytes.
    fn le(&mut self, width: usize) -> Result<u32, DecompressError> {
        let bytes = self.take(width)?;
        Ok(bytes
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32))
    }

    /// Add a 255-run length extension to `n`.
    fn length(&mut self, mut n: usize) -> Result<usize, DecompressError> {
        loop {
            let b = self.byte()?;
            n = n.checked_add(b as usize).ok_or(DecompressError::MalformedInput)?;
            if b != 255 {
                return Ok(n);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Output helpers
// ─────────────────────────────────────────────────────────────────────────────

fn push_literals(out: &mut Vec<u8>, lits: &[u8], limit: usize) -> Result<(), DecompressError> {
    if out.len() + lits.len() > limit {
        return Err(DecompressError::OutputTooSmall);
    }
    out.extend_from_slice(lits);
    Ok(())
}

fn copy_match(
    out: &mut Vec<u8>,
    offset: usize,
    len: usize,
    limit: usize,
) -> Result<(), DecompressError> {
    if offset == 0 || offset > out.len() {
        return Err(DecompressError::MalformedInput);
    }
    if out.len() + len > limit {
        return Err(DecompressError::OutputTooSmall);
    }
    let start = out.len() - offset;
    if offset >= len {
        out.extend_from_within(start..start + len);
    } else {
        // overlapping copy repeats the last `offset` bytes
        for i in 0..len {
            let b = out[start + i];
            out.push(b);
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Format decoders
// ─────────────────────────────────────────────────────────────────────────────

fn decode_lz4(body: &[u8], out: &mut Vec<u8>, limit: usize) -> Result<(), DecompressError> {
    let mut r = Reader::new(body);
    loop {
        let token = r.byte()?;
        let mut lit = (token >> 4) as usize;
        if lit == 15 {
            lit = r.length(lit)?;
        }
        push_literals(out, r.take(lit)?, limit)?;
        if r.is_empty() {
            return Ok(());
        }

        let offset = r.le(2)? as usize;
        let mut ml = (token & 15) as usize;
        if ml == 15 {
            ml = r.length(ml)?;
        }
        copy_match(out, offset, ml + MINMATCH, limit)?;
    }
}

#[cfg(feature = "native-format")]
fn decode_native(
    body: &[u8],
    out: &mut Vec<u8>,
    limit: usize,
    long_min: usize,
) -> Result<(), DecompressError> {
    let mut r = Reader::new(body);
    let mut last_offset = 0usize;
    loop {
        let token = r.byte()?;
        let mut lit = (token >> 5) as usize;
        if lit == 7 {
            lit = r.length(lit)?;
        }
        push_literals(out, r.take(lit)?, limit)?;

        let (offset, base) = match token & 3 {
            kind::LAST => {
                return if r.is_empty() {
                    Ok(())
                } else {
                    Err(DecompressError::MalformedInput)
                };
            }
            kind::REPEAT => (last_offset, MINMATCH),
            kind::SHORT => (r.le(2)? as usize, MINMATCH),
            _ => (r.le(3)? as usize, long_min),
        };
        let mut ml = ((token >> 2) & 7) as usize;
        if ml == 7 {
            ml = r.length(ml)?;
        }
        copy_match(out, offset, ml + base, limit)?;
        last_offset = offset;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Decode one block and append it to `out`, using the current contents of
/// `out` as history.  At most `max_output` bytes are appended.
///
/// Returns the number of bytes appended.  On error `out` may hold a
/// partially decoded block.
pub fn decompress_into(
    src: &[u8],
    out: &mut Vec<u8>,
    max_output: usize,
) -> Result<usize, DecompressError> {
    let (&level, body) = src.split_first().ok_or(DecompressError::MalformedInput)?;
    let params = params_for_level_byte(level).ok_or(DecompressError::MalformedInput)?;
    let before = out.len();
    let limit = before.saturating_add(max_output);
    match params.format {
        OutputFormat::Lz4 => decode_lz4(body, out, limit)?,
        #[cfg(feature = "native-format")]
        OutputFormat::Native => {
            decode_native(body, out, limit, params.min_match_long_off as usize)?
        }
    }
    Ok(out.len() - before)
}

/// Decode one self-contained block.
pub fn decompress(src: &[u8], max_output: usize) -> Result<Vec<u8>, DecompressError> {
    let mut out = Vec::new();
    decompress_into(src, &mut out, max_output)?;
    Ok(out)
}

/// Decode one block compressed after loading `dict` as history.
pub fn decompress_using_dict(
    src: &[u8],
    dict: &[u8],
    max_output: usize,
) -> Result<Vec<u8>, DecompressError> {
    let tail = &dict[dict.len().saturating_sub(MAX_WINDOW as usize)..];
    let mut out = Vec::with_capacity(tail.len() + max_output.min(1 << 20));
    out.extend_from_slice(tail);
    decompress_into(src, &mut out, max_output)?;
    Ok(out.split_off(tail.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_only_lz4_block() {
        // level 1, token: 3 literals, no match
        let block = [1u8, 0x30, b'a', b'b', b'c'];
        assert_eq!(decompress(&block, 16), Ok(b"abc".to_vec()));
    }

    #[test]
    fn overlapping_lz4_match_repeats_pattern() {
        // "ab" then match offset 2, length 4+2, then 5 trailing literals
        let block = [2u8, 0x22, b'a', b'b', 2, 0, 0x50, b'v', b'w', b'x', b'y', b'z'];
        assert_eq!(decompress(&block, 64), Ok(b"ababababvwxyz".to_vec()));
    }

    #[test]
    fn rejects_unknown_level_and_truncation() {
        assert_eq!(decompress(&[], 8), Err(DecompressError::MalformedInput));
        assert_eq!(decompress(&[0, 0], 8), Err(DecompressError::MalformedInput));
        assert_eq!(decompress(&[1], 8), Err(DecompressError::MalformedInput));
        assert_eq!(
            decompress(&[1, 0x50, b'a'], 8),
            Err(DecompressError::MalformedInput)
        );
    }

    #[test]
    fn rejects_offsets_before_history() {
        let block = [1u8, 0x10, b'a', 9, 0, 0x00];
        assert_eq!(decompress(&block, 64), Err(DecompressError::MalformedInput));
    }

    #[test]
    fn output_limit_is_enforced() {
        let block = [1u8, 0x30, b'a', b'b', b'c'];
        assert_eq!(decompress(&block, 2), Err(DecompressError::OutputTooSmall));
    }

    #[test]
    fn dictionary_supplies_history() {
        // match offset 3 length 4 reaches into "xyz" of the dictionary
        let block = [1u8, 0x00, 3, 0, 0x00];
        assert_eq!(
            decompress_using_dict(&block, b"__xyz", 16),
            Ok(b"xyzx".to_vec())
        );
    }

    #[cfg(feature = "native-format")]
    #[test]
    fn native_repeat_and_terminator() {
        // level 8 (native): "abcd" + short match off 4 len 4,
        // then repeat match len 4, then terminator with "!"
        let block = [
            8u8,
            (4 << 5) | kind::SHORT,
            b'a',
            b'b',
            b'c',
            b'd',
            4,
            0,
            kind::REPEAT,
            (1 << 5) | kind::LAST,
            b'!',
        ];
        assert_eq!(
            decompress(&block, 64),
            Ok(b"abcdabcdabcd!".to_vec())
        );
    }

    #[cfg(feature = "native-format")]
    #[test]
    fn native_rejects_bytes_after_terminator() {
        let block = [8u8, kind::LAST, 0xAA];
        assert_eq!(decompress(&block, 64), Err(DecompressError::MalformedInput));
    }
}
