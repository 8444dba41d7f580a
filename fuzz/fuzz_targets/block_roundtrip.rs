#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the level, the rest is the payload.
    let Some((&sel, payload)) = data.split_first() else {
        return;
    };
    let level = 1 + (sel as i32) % lz5::LZ5_MAX_CLEVEL;

    let mut dst = vec![0u8; lz5::compress_bound(payload.len())];
    let n = lz5::compress(payload, &mut dst, level).expect("compression into a bound-sized buffer");
    let recovered = lz5::decompress(&dst[..n], payload.len()).expect("decoding our own output");
    assert_eq!(recovered, payload, "level {level}");
});
