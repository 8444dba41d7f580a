//! E2E: framed streams through the in-memory and file APIs.

use std::fs;

use lz5::io::{
    compress_filename, compress_stream, decompress_filename, decompress_stream, FrameOptions,
    LZ5_MAGICNUMBER,
};
use tempfile::TempDir;

fn corpus(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut x = 1u32;
    while out.len() < len {
        x = x.wrapping_mul(69069).wrapping_add(1);
        let word = ["lorem ", "ipsum ", "dolor ", "sit ", "amet ", "\n"][(x >> 24) as usize % 6];
        out.extend_from_slice(word.as_bytes());
    }
    out.truncate(len);
    out
}

fn frame(data: &[u8], opts: &FrameOptions) -> Vec<u8> {
    let mut out = Vec::new();
    compress_stream(&mut &data[..], &mut out, opts).expect("compress");
    out
}

#[test]
fn frame_starts_with_magic_and_block_log() {
    let f = frame(b"hello", &FrameOptions::default());
    assert_eq!(&f[..4], &LZ5_MAGICNUMBER.to_le_bytes());
    assert_eq!(f[4], 22);
}

#[test]
fn small_blocks_at_several_levels() {
    let data = corpus(700_000);
    for level in [1, 6, 10, 14] {
        let opts = FrameOptions {
            level,
            block_size_log: 16,
            ..FrameOptions::default()
        };
        let f = frame(&data, &opts);
        assert!(f.len() < data.len() / 2, "level {level}");
        let mut back = Vec::new();
        let stats = decompress_stream(&mut &f[..], &mut back, None).expect("decode");
        assert_eq!(back, data, "level {level}");
        assert_eq!(stats.blocks, (data.len() as u64).div_ceil(1 << 16));
    }
}

#[test]
fn truncated_frame_is_an_error() {
    let data = corpus(50_000);
    let f = frame(&data, &FrameOptions::default());
    for cut in [3, 5, f.len() / 2, f.len() - 4, f.len() - 1] {
        let mut back = Vec::new();
        assert!(decompress_stream(&mut &f[..cut], &mut back, None).is_err(), "cut {cut}");
    }
}

#[test]
fn file_api_roundtrip() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("input.txt");
    let packed = dir.path().join("input.txt.lz5");
    let restored = dir.path().join("restored.txt");
    let data = corpus(300_000);
    fs::write(&src, &data).unwrap();

    let opts = FrameOptions::default();
    let stats = compress_filename(src.to_str().unwrap(), packed.to_str().unwrap(), &opts)
        .expect("compress");
    assert_eq!(stats.bytes_in, data.len() as u64);
    assert_eq!(stats.bytes_out, fs::metadata(&packed).unwrap().len());

    decompress_filename(packed.to_str().unwrap(), restored.to_str().unwrap(), &opts)
        .expect("decompress");
    assert_eq!(fs::read(&restored).unwrap(), data);
}

#[test]
fn existing_destination_needs_overwrite() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("a");
    let dst = dir.path().join("a.lz5");
    fs::write(&src, b"some content").unwrap();
    fs::write(&dst, b"occupied").unwrap();

    let mut opts = FrameOptions::default();
    let err = compress_filename(src.to_str().unwrap(), dst.to_str().unwrap(), &opts).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
    assert_eq!(fs::read(&dst).unwrap(), b"occupied");

    opts.overwrite = true;
    compress_filename(src.to_str().unwrap(), dst.to_str().unwrap(), &opts).expect("overwrite");
    assert_ne!(fs::read(&dst).unwrap(), b"occupied");
}
