//! Multiplicative hash family over 3 to 7 input bytes.
//!
//! Each width reads its bytes as a little-endian integer, multiplies by an odd
//! constant and keeps the top `bits` bits.  A width of `0` always yields
//! bucket `0`, which keeps disabled tables (one entry) addressable.

pub const PRIME3BYTES: u32 = 506_832_829;
pub const PRIME4BYTES: u32 = 2_654_435_761;
pub const PRIME5BYTES: u64 = 889_523_592_379;
pub const PRIME6BYTES: u64 = 227_718_039_650_203;
pub const PRIME7BYTES: u64 = 58_295_818_150_454_627;

#[inline(always)]
fn top32(v: u32, bits: u32) -> usize {
    v.checked_shr(32 - bits).unwrap_or(0) as usize
}

#[inline(always)]
fn top64(v: u64, bits: u32) -> usize {
    v.checked_shr(64 - bits).unwrap_or(0) as usize
}

/// Hash of the low three bytes of `u`.
#[inline(always)]
pub fn hash3(u: u32, bits: u32) -> usize {
    top32((u << 8).wrapping_mul(PRIME3BYTES), bits)
}

#[inline(always)]
pub fn hash4(u: u32, bits: u32) -> usize {
    top32(u.wrapping_mul(PRIME4BYTES), bits)
}

#[inline(always)]
pub fn hash5(u: u64, bits: u32) -> usize {
    top64((u << (64 - 40)).wrapping_mul(PRIME5BYTES), bits)
}

#[inline(always)]
pub fn hash6(u: u64, bits: u32) -> usize {
    top64((u << (64 - 48)).wrapping_mul(PRIME6BYTES), bits)
}

#[inline(always)]
pub fn hash7(u: u64, bits: u32) -> usize {
    top64((u << (64 - 56)).wrapping_mul(PRIME7BYTES), bits)
}

/// Hash the first `match_length` bytes of the little-endian word `sequence`.
///
/// `match_length` outside 4..=6 selects the 7-byte hash.
#[inline(always)]
pub fn hash_sequence(sequence: u64, bits: u32, match_length: u32) -> usize {
    match match_length {
        4 => hash4(sequence as u32, bits),
        5 => hash5(sequence, bits),
        6 => hash6(sequence, bits),
        _ => hash7(sequence, bits),
    }
}
