#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Two selector bytes: level and block length; the rest is the payload,
    // compressed block by block from one contiguous buffer.
    if data.len() < 2 {
        return;
    }
    let level = 1 + (data[0] as i32) % lz5::LZ5_MAX_CLEVEL;
    let block = 1 + data[1] as usize * 4;
    let payload = &data[2..];

    let mut stream = lz5::Lz5Stream::create(level).expect("stream allocation");
    let mut history = Vec::new();
    for piece in payload.chunks(block) {
        let mut dst = vec![0u8; lz5::compress_bound(piece.len())];
        let n = unsafe { stream.compress_continue(piece, &mut dst) }.expect("compress");
        lz5::decompress_into(&dst[..n], &mut history, piece.len()).expect("decode");
    }
    assert_eq!(history, payload);
});
