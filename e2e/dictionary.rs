//! E2E: preset dictionaries through the frame container.

use std::fs;

use lz5::io::{compress_stream, decompress_stream, load_dict_file, FrameOptions};
use lz5::MAX_WINDOW;
use tempfile::TempDir;

fn record(i: u32) -> Vec<u8> {
    format!(
        "{{\"id\":{i},\"kind\":\"sensor\",\"unit\":\"celsius\",\"status\":\"nominal\",\"value\":{}}}\n",
        (i * 37) % 1000
    )
    .into_bytes()
}

fn records(range: std::ops::Range<u32>) -> Vec<u8> {
    range.flat_map(record).collect()
}

#[test]
fn dictionary_shrinks_small_payloads() {
    let dict = records(0..200);
    let payload = records(5000..5010);

    let plain = FrameOptions { level: 12, ..FrameOptions::default() };
    let with_dict = FrameOptions {
        dictionary: Some(dict.clone()),
        ..plain.clone()
    };

    let mut a = Vec::new();
    compress_stream(&mut &payload[..], &mut a, &plain).expect("plain");
    let mut b = Vec::new();
    compress_stream(&mut &payload[..], &mut b, &with_dict).expect("dict");
    assert!(b.len() < a.len(), "with dictionary {} vs without {}", b.len(), a.len());

    let mut back = Vec::new();
    decompress_stream(&mut &b[..], &mut back, Some(&dict)).expect("decode");
    assert_eq!(back, payload);
}

#[test]
fn missing_dictionary_is_detected() {
    let dict = records(0..200);
    let payload = records(300..400);
    let opts = FrameOptions {
        dictionary: Some(dict),
        ..FrameOptions::default()
    };
    let mut f = Vec::new();
    compress_stream(&mut &payload[..], &mut f, &opts).expect("compress");

    let mut back = Vec::new();
    assert!(decompress_stream(&mut &f[..], &mut back, None).is_err());
}

#[test]
fn dictionary_file_keeps_last_window() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dict.bin");
    let mut content = vec![0xAB; 1000];
    content.extend(records(0..60_000));
    assert!(content.len() > MAX_WINDOW as usize);
    fs::write(&path, &content).unwrap();

    let dict = load_dict_file(path.to_str().unwrap()).expect("load");
    assert_eq!(dict.len(), MAX_WINDOW as usize);
    assert_eq!(&dict[..], &content[content.len() - MAX_WINDOW as usize..]);

    let payload = records(59_000..59_500);
    let opts = FrameOptions {
        level: 4,
        dictionary: Some(dict.clone()),
        ..FrameOptions::default()
    };
    let mut f = Vec::new();
    compress_stream(&mut &payload[..], &mut f, &opts).expect("compress");
    let mut back = Vec::new();
    decompress_stream(&mut &f[..], &mut back, Some(&dict)).expect("decode");
    assert_eq!(back, payload);
}
