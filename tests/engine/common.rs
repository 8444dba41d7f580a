// Shared fixtures for the engine test suite.

use lz5::{compress_bound, decompress_into};

/// Text-like data with plenty of medium-distance repeats.
pub fn text(len: usize) -> Vec<u8> {
    const WORDS: [&str; 12] = [
        "stream ", "window ", "match ", "offset ", "literal ", "block ", "prefix ",
        "dictionary ", "hash ", "chain ", "level ", "token ",
    ];
    let mut out = Vec::with_capacity(len + 16);
    let mut seed = 0x1234_5678u32;
    while out.len() < len {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        out.extend_from_slice(WORDS[(seed >> 16) as usize % WORDS.len()].as_bytes());
    }
    out.truncate(len);
    out
}

/// Pseudo-random bytes: essentially incompressible.
pub fn noise(len: usize, mut seed: u64) -> Vec<u8> {
    (0..len)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed as u8
        })
        .collect()
}

pub fn bound_buf(len: usize) -> Vec<u8> {
    vec![0u8; compress_bound(len)]
}

/// Decode a sequence of blocks as one stream, starting from `history`.
pub fn decode_stream(blocks: &[Vec<u8>], history: &[u8], max_block: usize) -> Vec<u8> {
    let mut out = history.to_vec();
    for (i, b) in blocks.iter().enumerate() {
        decompress_into(b, &mut out, max_block)
            .unwrap_or_else(|e| panic!("block {i} failed to decode: {e}"));
    }
    out.split_off(history.len())
}
