#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode cleanly or fail with an error.
    let _ = lz5::decompress(data, 1 << 20);
    let _ = lz5::decompress_using_dict(data, b"a small fixed dictionary for fuzzing", 1 << 16);
});
