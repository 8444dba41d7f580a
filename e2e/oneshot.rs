//! E2E: one-shot block API.
//!
//! Exercises `compress`, `compress_ext_state`, `compress_bound` and the
//! reference decoder together, on inputs shaped like real files.

use lz5::{
    compress, compress_bound, compress_ext_state, decompress, size_of_state, version_number,
    version_string, Lz5Error, LZ5_MAX_CLEVEL, LZ5_MIN_CLEVEL,
};

fn source_like(len: usize) -> Vec<u8> {
    let line = b"    fn step(&mut self, ip: u32) -> Option<Match> { self.finder.best(ip) }\n";
    let mut out = Vec::with_capacity(len);
    let mut n = 0u32;
    while out.len() < len {
        out.extend_from_slice(line);
        out.extend_from_slice(format!("// line {n}\n").as_bytes());
        n += 1;
    }
    out.truncate(len);
    out
}

#[test]
fn version_is_consistent() {
    assert_eq!(version_number(), 10500);
    assert_eq!(version_string(), "1.5.0");
}

#[test]
fn roundtrip_all_levels_on_source_like_text() {
    let src = source_like(128 * 1024);
    let mut previous = usize::MAX;
    for level in LZ5_MIN_CLEVEL..=LZ5_MAX_CLEVEL {
        let mut dst = vec![0u8; compress_bound(src.len())];
        let n = compress(&src, &mut dst, level).expect("compress");
        assert!(n < src.len() / 3, "level {level}: {n}");
        assert_eq!(decompress(&dst[..n], src.len()).expect("decode"), src);
        previous = previous.min(n);
    }
    assert!(previous < src.len() / 5);
}

#[test]
fn ext_state_roundtrip_all_levels() {
    let src = source_like(40_000);
    for level in LZ5_MIN_CLEVEL..=LZ5_MAX_CLEVEL {
        let mut words = vec![0u64; size_of_state(level) / 8 + 1];
        let len = words.len() * 8;
        let state = unsafe { std::slice::from_raw_parts_mut(words.as_mut_ptr() as *mut u8, len) };
        let mut dst = vec![0u8; compress_bound(src.len())];
        let n = compress_ext_state(state, &src, &mut dst, level).expect("compress");
        assert_eq!(decompress(&dst[..n], src.len()).expect("decode"), src);
    }
}

#[test]
fn too_small_destination_is_an_error_not_a_panic() {
    let src = source_like(10_000);
    for cap in [0usize, 1, 16, 100] {
        let mut dst = vec![0u8; cap];
        let r = compress(&src, &mut dst, 8);
        assert_eq!(r, Err(Lz5Error::OutputTooSmall), "capacity {cap}");
    }
}
