// Streaming compression: contiguous blocks, detached blocks, saved history
// and ring buffers whose new input overwrites old history.

use lz5::{compress, compress_continue, decompress, save_dictionary, Lz5Stream, MAX_WINDOW};

use super::common::{bound_buf, decode_stream, noise, text};

/// Compress `data` in `chunk`-sized pieces taken from the same buffer.
fn compress_contiguous(data: &[u8], chunk: usize, level: i32) -> Vec<Vec<u8>> {
    let mut stream = Lz5Stream::create(level).expect("create");
    data.chunks(chunk)
        .map(|piece| {
            let mut dst = bound_buf(piece.len());
            let n = unsafe { compress_continue(&mut stream, piece, &mut dst) }.expect("block");
            dst.truncate(n);
            dst
        })
        .collect()
}

#[test]
fn split_calls_roundtrip_like_one_call() {
    let data = text(200_000);
    for level in [1, 4, 6, 8, 12, 15] {
        let mut whole = bound_buf(data.len());
        let n = compress(&data, &mut whole, level).expect("one-shot");
        assert_eq!(decompress(&whole[..n], data.len()).expect("decode"), data);

        let blocks = compress_contiguous(&data, 16 * 1024, level);
        assert_eq!(decode_stream(&blocks, &[], 16 * 1024), data, "level {level}");
    }
}

#[test]
fn later_blocks_reference_earlier_ones() {
    let piece = noise(32 * 1024, 11);
    let mut data = piece.clone();
    data.extend_from_slice(&piece);

    let blocks = compress_contiguous(&data, piece.len(), 6);
    assert!(
        blocks[1].len() < blocks[0].len() / 4,
        "second block {} vs first {}",
        blocks[1].len(),
        blocks[0].len()
    );
    assert_eq!(decode_stream(&blocks, &[], piece.len()), data);
}

#[test]
fn detached_buffers_keep_previous_block_as_dictionary() {
    let a = noise(20_000, 5);
    let b = a.clone();
    let mut stream = Lz5Stream::create(9).expect("create");

    let mut out_a = bound_buf(a.len());
    let na = unsafe { stream.compress_continue(&a, &mut out_a) }.expect("a");
    let mut out_b = bound_buf(b.len());
    let nb = unsafe { stream.compress_continue(&b, &mut out_b) }.expect("b");
    assert!(nb < na / 4);

    let blocks = vec![out_a[..na].to_vec(), out_b[..nb].to_vec()];
    let mut expected = a.clone();
    expected.extend_from_slice(&b);
    assert_eq!(decode_stream(&blocks, &[], 20_000), expected);
}

#[test]
fn saved_dictionary_survives_buffer_reuse() {
    let data = text(96 * 1024);
    let block = 16 * 1024;
    let mut stream = Lz5Stream::create(7).expect("create");
    let mut in_buf = vec![0u8; block];
    let mut history = vec![0u8; 64 * 1024];
    let mut blocks = Vec::new();

    for piece in data.chunks(block) {
        in_buf[..piece.len()].copy_from_slice(piece);
        let mut dst = bound_buf(piece.len());
        let n = unsafe { stream.compress_continue(&in_buf[..piece.len()], &mut dst) }.expect("block");
        dst.truncate(n);
        blocks.push(dst);
        let kept = unsafe { save_dictionary(&mut stream, &mut history) };
        assert!(kept <= history.len());
        // scribble over the old input
        in_buf.fill(0xEE);
    }
    assert_eq!(decode_stream(&blocks, &[], block), data);
}

#[test]
fn save_dictionary_clamps_size() {
    let data = text(10_000);
    let mut stream = Lz5Stream::create(3).expect("create");

    let mut dst = bound_buf(data.len());
    unsafe { stream.compress_continue(&data, &mut dst) }.expect("block");

    let mut tiny = [0u8; 3];
    assert_eq!(unsafe { stream.save_dictionary(&mut tiny) }, 0);

    let mut stream = Lz5Stream::create(3).expect("create");
    unsafe { stream.compress_continue(&data, &mut dst) }.expect("block");
    let mut large = vec![0u8; 64 * 1024];
    assert_eq!(unsafe { stream.save_dictionary(&mut large) }, data.len());
    assert_eq!(&large[..data.len()], &data[..]);
}

#[test]
fn save_dictionary_on_fresh_stream_keeps_nothing() {
    let mut stream = Lz5Stream::create(3).expect("create");
    let mut buf = vec![0u8; 1024];
    assert_eq!(unsafe { stream.save_dictionary(&mut buf) }, 0);
}

#[test]
fn ring_buffer_overwrites_old_history() {
    const BLOCK: usize = 8 * 1024;
    const RING: usize = 3 * BLOCK + 1000;
    let data = text(40 * BLOCK);

    for level in [2, 6, 10, 16] {
        let mut stream = Lz5Stream::create(level).expect("create");
        let mut ring = vec![0u8; RING];
        let mut pos = 0usize;
        let mut blocks = Vec::new();

        for piece in data.chunks(BLOCK) {
            if pos + piece.len() > RING {
                pos = 0;
            }
            ring[pos..pos + piece.len()].copy_from_slice(piece);
            let src = &ring[pos..pos + piece.len()];
            let mut dst = bound_buf(piece.len());
            let n = unsafe { stream.compress_continue(src, &mut dst) }.expect("block");
            dst.truncate(n);
            blocks.push(dst);
            pos += piece.len();
        }
        assert_eq!(decode_stream(&blocks, &[], BLOCK), data, "level {level}");
    }
}

#[test]
fn long_streams_stay_decodable_beyond_one_window() {
    // 3 windows of input through one stream, fed from a single buffer.
    let data = text(3 * MAX_WINDOW as usize);
    let blocks = compress_contiguous(&data, 1 << 20, 3);
    assert_eq!(decode_stream(&blocks, &[], 1 << 20), data);
}
