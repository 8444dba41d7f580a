// One-shot entry points, stream lifecycle and caller-owned state.

use lz5::{
    compress, compress_bound, compress_ext_state, compress_ext_state_level1, compress_level1,
    create_stream, create_stream_level1, decompress, free_stream, reset_stream,
    reset_stream_level1, size_of_state, size_of_state_level1, Lz5Error, Lz5Stream,
    LZ5_DEFAULT_CLEVEL, LZ5_MAX_CLEVEL, TRANSFORM_LEVEL,
};

use super::common::{bound_buf, noise, text};

fn roundtrip(src: &[u8], level: i32) -> usize {
    let mut dst = bound_buf(src.len());
    let n = compress(src, &mut dst, level).expect("compress");
    let back = decompress(&dst[..n], src.len()).expect("decompress");
    assert_eq!(back, src, "level {level}");
    n
}

#[test]
fn empty_input_produces_decodable_block() {
    for level in [1, 4, LZ5_DEFAULT_CLEVEL, LZ5_MAX_CLEVEL] {
        let n = roundtrip(b"", level);
        assert!(n >= 1);
    }
}

#[test]
fn tiny_inputs_are_stored_as_literals() {
    for len in 1..=13 {
        let src = text(len);
        roundtrip(&src, 3);
    }
}

#[test]
fn repeated_byte_compresses_well() {
    let src = vec![b'A'; 10_000];
    let n = roundtrip(&src, LZ5_DEFAULT_CLEVEL);
    assert!(n < 200, "got {n} bytes");
    assert!(n < compress_bound(src.len()));
}

#[test]
fn level_byte_records_clamped_level() {
    let src = text(1000);
    let mut dst = bound_buf(src.len());
    compress(&src, &mut dst, 0).expect("compress");
    assert_eq!(dst[0] as i32, LZ5_DEFAULT_CLEVEL);
    compress(&src, &mut dst, 1000).expect("compress");
    assert_eq!(dst[0] as i32, LZ5_MAX_CLEVEL);
}

#[test]
fn small_destination_reports_output_too_small() {
    let src = noise(4096, 7);
    let mut dst = vec![0u8; 100];
    assert_eq!(compress(&src, &mut dst, 2), Err(Lz5Error::OutputTooSmall));
}

#[test]
fn checked_destination_matches_unchecked_output() {
    let src = text(20_000);
    let mut big = bound_buf(src.len());
    let n = compress(&src, &mut big, 5).expect("compress");
    let mut snug = vec![0u8; n + 64];
    assert!(snug.len() < compress_bound(src.len()));
    assert_eq!(compress(&src, &mut snug, 5), Ok(n));
    assert_eq!(snug[..n], big[..n]);
}

#[test]
fn stream_lifecycle() {
    let stream = create_stream(4).expect("create");
    assert_eq!(stream.level(), 4);
    let small = stream.allocated_size();

    let stream = reset_stream(stream, LZ5_MAX_CLEVEL).expect("reset");
    assert_eq!(stream.level(), LZ5_MAX_CLEVEL);
    assert!(stream.allocated_size() >= small);
    assert_eq!(free_stream(stream), 0);
}

#[test]
fn reset_drops_history() {
    let src = text(8192);
    let mut stream = Lz5Stream::create(6).expect("create");
    let mut first = bound_buf(src.len());
    let n1 = unsafe { stream.compress_continue(&src, &mut first) }.expect("first");

    stream.reset(6).expect("reset");
    let mut second = bound_buf(src.len());
    let n2 = unsafe { stream.compress_continue(&src, &mut second) }.expect("second");
    assert_eq!(first[..n1], second[..n2]);
    assert_eq!(decompress(&second[..n2], src.len()).expect("decode"), src);
}

/// 8-byte aligned scratch memory viewed as bytes.
fn aligned_state(bytes: usize) -> Vec<u64> {
    vec![0u64; bytes / 8 + 1]
}

fn as_bytes(words: &mut [u64]) -> &mut [u8] {
    let len = words.len() * 8;
    unsafe { std::slice::from_raw_parts_mut(words.as_mut_ptr() as *mut u8, len) }
}

#[test]
fn ext_state_matches_owned_compression() {
    let src = text(30_000);
    for level in [2, 6, 9, 13] {
        let mut words = aligned_state(size_of_state(level));
        let mut a = bound_buf(src.len());
        let mut b = bound_buf(src.len());
        let na = compress_ext_state(as_bytes(&mut words), &src, &mut a, level).expect("ext");
        let nb = compress(&src, &mut b, level).expect("owned");
        assert_eq!(a[..na], b[..nb], "level {level}");
    }
}

#[test]
fn ext_state_rejects_bad_buffers() {
    let src = text(100);
    let mut dst = bound_buf(src.len());
    let need = size_of_state(4);
    let mut words = aligned_state(need);
    let bytes = as_bytes(&mut words);

    assert_eq!(
        compress_ext_state(&mut bytes[1..], &src, &mut dst, 4),
        Err(Lz5Error::MisalignedState)
    );
    assert_eq!(
        compress_ext_state(&mut bytes[..64], &src, &mut dst, 4),
        Err(Lz5Error::StateTooSmall { have: 64, need })
    );
}

#[test]
fn state_size_grows_with_level() {
    assert!(size_of_state(1) <= size_of_state(6));
    assert!(size_of_state(6) <= size_of_state(LZ5_MAX_CLEVEL));
}

#[test]
fn level1_shorthands_match_explicit_level_one() {
    assert_eq!(TRANSFORM_LEVEL, 1);
    assert_eq!(size_of_state_level1(), size_of_state(1));

    let src = text(25_000);
    let mut explicit = bound_buf(src.len());
    let n = compress(&src, &mut explicit, 1).expect("explicit");

    let mut short = bound_buf(src.len());
    assert_eq!(compress_level1(&src, &mut short), Ok(n));
    assert_eq!(short[..n], explicit[..n]);
    assert_eq!(short[0], 1);

    let mut words = aligned_state(size_of_state_level1());
    let mut ext = bound_buf(src.len());
    assert_eq!(compress_ext_state_level1(as_bytes(&mut words), &src, &mut ext), Ok(n));
    assert_eq!(ext[..n], explicit[..n]);
    assert_eq!(decompress(&ext[..n], src.len()).expect("decode"), src);
}

#[test]
fn level1_stream_create_and_reset() {
    let stream = create_stream_level1().expect("create");
    assert_eq!(stream.level(), 1);

    let stream = reset_stream(stream, LZ5_MAX_CLEVEL).expect("raise");
    assert_eq!(stream.level(), LZ5_MAX_CLEVEL);
    let mut stream = reset_stream_level1(stream).expect("lower");
    assert_eq!(stream.level(), 1);

    let src = text(8192);
    let mut dst = bound_buf(src.len());
    let n = unsafe { stream.compress_continue(&src, &mut dst) }.expect("block");
    assert_eq!(dst[0], 1);
    assert_eq!(decompress(&dst[..n], src.len()).expect("decode"), src);
    assert_eq!(free_stream(stream), 0);
}
