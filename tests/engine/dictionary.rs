// Preset dictionaries: loading, truncation to the window, and decoding with
// the matching history.

use lz5::{
    compress, decompress_using_dict, load_dictionary, Lz5Stream, LZ5_MAX_CLEVEL, MAX_WINDOW,
};

use super::common::{bound_buf, noise};

fn compress_with_dict(dict: &[u8], src: &[u8], level: i32) -> Vec<u8> {
    let mut stream = Lz5Stream::create(level).expect("create");
    load_dictionary(&mut stream, dict);
    let mut dst = bound_buf(src.len());
    let n = unsafe { stream.compress_continue(src, &mut dst) }.expect("compress");
    dst.truncate(n);
    dst
}

#[test]
fn dictionary_content_is_referenced() {
    let dict = noise(16 * 1024, 21);
    let src = dict[4000..12_000].to_vec();

    for level in [1, 5, 8, 11, 14, LZ5_MAX_CLEVEL] {
        let with = compress_with_dict(&dict, &src, level);
        let mut without = bound_buf(src.len());
        let n = compress(&src, &mut without, level).expect("plain");
        assert!(with.len() < n / 4, "level {level}: {} vs {n}", with.len());
        assert_eq!(
            decompress_using_dict(&with, &dict, src.len()).expect("decode"),
            src
        );
    }
}

#[test]
fn load_reports_retained_size() {
    let mut stream = Lz5Stream::create(6).expect("create");
    assert_eq!(stream.load_dictionary(b"abc"), 3);
    assert_eq!(stream.load_dictionary(&[]), 0);
    let big = vec![7u8; MAX_WINDOW as usize + 12_345];
    assert_eq!(stream.load_dictionary(&big), MAX_WINDOW as usize);
}

#[test]
fn oversized_dictionary_keeps_its_tail() {
    let dict = noise(MAX_WINDOW as usize + 64 * 1024, 99);
    // content only present in the last window's worth of the dictionary
    let src = dict[dict.len() - 10_000..dict.len() - 2_000].to_vec();

    let block = compress_with_dict(&dict, &src, 12);
    assert!(block.len() < src.len() / 4);
    assert_eq!(
        decompress_using_dict(&block, &dict, src.len()).expect("decode"),
        src
    );
}

#[test]
fn short_dictionaries_are_harmless() {
    let src = noise(2000, 3);
    for dict_len in [0usize, 1, 4, 7, 8, 9] {
        let dict = noise(dict_len, 77);
        let block = compress_with_dict(&dict, &src, 6);
        assert_eq!(
            decompress_using_dict(&block, &dict, src.len()).expect("decode"),
            src,
            "dict length {dict_len}"
        );
    }
}

#[test]
fn wrong_dictionary_does_not_reproduce_input() {
    let dict = noise(8192, 1);
    let src = dict[100..6000].to_vec();
    let block = compress_with_dict(&dict, &src, 6);
    let other = noise(8192, 2);
    let decoded = decompress_using_dict(&block, &other, src.len());
    assert!(decoded.map(|d| d != src).unwrap_or(true));
}
