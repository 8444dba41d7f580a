use lz5::{
    compress, compress_bound, decompress, decompress_using_dict, Lz5Stream, LZ5_MAX_CLEVEL,
};
use proptest::prelude::*;

use super::common::decode_stream;

/// Bytes drawn from a small alphabet, so matches are common.
fn low_entropy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(prop_oneof![Just(b'a'), Just(b'b'), Just(b'c'), any::<u8>()], 0..max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_oneshot_roundtrip(
        src in low_entropy(8192),
        level in 1i32..=LZ5_MAX_CLEVEL
    ) {
        let mut dst = vec![0u8; compress_bound(src.len())];
        let n = compress(&src, &mut dst, level).unwrap();
        prop_assert!(n >= 1 && n <= compress_bound(src.len()));
        prop_assert_eq!(decompress(&dst[..n], src.len()).unwrap(), src);
    }

    #[test]
    fn prop_streaming_roundtrip(
        src in low_entropy(16_384),
        cuts in proptest::collection::vec(1usize..3000, 1..8),
        level in 1i32..=LZ5_MAX_CLEVEL
    ) {
        let mut stream = Lz5Stream::create(level).unwrap();
        let mut blocks = Vec::new();
        let mut pos = 0usize;
        let mut i = 0usize;
        while pos < src.len() {
            let len = cuts[i % cuts.len()].min(src.len() - pos);
            let piece = &src[pos..pos + len];
            let mut dst = vec![0u8; compress_bound(len)];
            let n = unsafe { stream.compress_continue(piece, &mut dst) }.unwrap();
            dst.truncate(n);
            blocks.push(dst);
            pos += len;
            i += 1;
        }
        prop_assert_eq!(decode_stream(&blocks, &[], 3000), src);
    }

    #[test]
    fn prop_dictionary_roundtrip(
        dict in low_entropy(4096),
        src in low_entropy(4096),
        level in 1i32..=LZ5_MAX_CLEVEL
    ) {
        let mut stream = Lz5Stream::create(level).unwrap();
        stream.load_dictionary(&dict);
        let mut dst = vec![0u8; compress_bound(src.len())];
        let n = unsafe { stream.compress_continue(&src, &mut dst) }.unwrap();
        prop_assert_eq!(decompress_using_dict(&dst[..n], &dict, src.len()).unwrap(), src);
    }

    #[test]
    fn prop_decoder_survives_garbage(
        block in proptest::collection::vec(any::<u8>(), 0..512)
    ) {
        let _ = decompress(&block, 1 << 16);
    }
}
