// Reference decoder behaviour on hostile input.

use lz5::{compress, decompress, decompress_into, DecompressError};

use super::common::{bound_buf, text};

#[test]
fn truncated_blocks_never_panic() {
    let src = text(5000);
    for level in [2, 7, 9, 13, 17] {
        let mut dst = bound_buf(src.len());
        let n = compress(&src, &mut dst, level).expect("compress");
        for cut in [1, 2, n / 3, n / 2, n - 1] {
            // Either a clean error or a shorter, wrong result; never a panic.
            if let Ok(out) = decompress(&dst[..cut], src.len()) {
                assert_ne!(out, src, "level {level} cut {cut}");
            }
        }
    }
}

#[test]
fn output_limit_applies_per_call() {
    let src = text(5000);
    let mut dst = bound_buf(src.len());
    let n = compress(&src, &mut dst, 6).expect("compress");
    assert_eq!(
        decompress(&dst[..n], src.len() - 1),
        Err(DecompressError::OutputTooSmall)
    );
}

#[test]
fn decompress_into_appends_after_history() {
    let first = text(3000);
    let mut dst = bound_buf(first.len());
    let n = compress(&first, &mut dst, 4).expect("compress");

    let mut out = b"prefix".to_vec();
    assert_eq!(decompress_into(&dst[..n], &mut out, first.len()), Ok(first.len()));
    assert_eq!(&out[..6], b"prefix");
    assert_eq!(&out[6..], &first[..]);
}

#[test]
fn unknown_level_byte_is_malformed() {
    assert_eq!(decompress(&[0x00, 0x00], 16), Err(DecompressError::MalformedInput));
    assert_eq!(decompress(&[0xFF, 0x00], 16), Err(DecompressError::MalformedInput));
}
