//! Criterion benchmarks for the LZ5 engine.
//!
//! Run with:
//!   cargo bench --bench engine
//!
//! Set LZ5_BENCH_FILE to benchmark a real file instead of synthetic text.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const CHUNK: usize = 256 * 1024;

/// Lorem-ipsum text with a little variation, so that parsers have choices.
fn synthetic_data(size: usize) -> Vec<u8> {
    const WORDS: [&str; 10] = [
        "lorem ", "ipsum ", "dolor ", "sit ", "amet, ", "consectetur ", "adipiscing ", "elit ",
        "sed ", "tempor\n",
    ];
    let mut out = Vec::with_capacity(size + 16);
    let mut x = 0x2545_F491u32;
    while out.len() < size {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        out.extend_from_slice(WORDS[x as usize % WORDS.len()].as_bytes());
    }
    out.truncate(size);
    out
}

fn bench_input() -> Vec<u8> {
    if let Ok(path) = std::env::var("LZ5_BENCH_FILE") {
        if let Ok(mut buf) = std::fs::read(path) {
            if !buf.is_empty() {
                while buf.len() < CHUNK {
                    let take = (CHUNK - buf.len()).min(buf.len());
                    buf.extend_from_within(..take);
                }
                buf.truncate(CHUNK);
                return buf;
            }
        }
    }
    synthetic_data(CHUNK)
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    let chunk = bench_input();
    let mut dst = vec![0u8; lz5::compress_bound(chunk.len())];

    for &level in &[1i32, 4, 7, 9, 12, 15, 17] {
        group.throughput(Throughput::Bytes(chunk.len() as u64));
        group.bench_with_input(BenchmarkId::new("level", level), &chunk, |b, chunk| {
            b.iter(|| {
                let n = lz5::compress(chunk, &mut dst, level).expect("compress failed");
                assert!(n > 0);
                n
            })
        });
    }
    group.finish();
}

fn bench_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress_continue");
    let chunk = bench_input();
    let block = 16 * 1024;
    let mut dst = vec![0u8; lz5::compress_bound(block)];

    for &level in &[2i32, 6, 10] {
        group.throughput(Throughput::Bytes(chunk.len() as u64));
        group.bench_with_input(BenchmarkId::new("16k_blocks", level), &chunk, |b, chunk| {
            b.iter(|| {
                let mut stream = lz5::Lz5Stream::create(level).expect("create failed");
                let mut total = 0;
                for piece in chunk.chunks(block) {
                    total += unsafe { stream.compress_continue(piece, &mut dst) }
                        .expect("compress failed");
                }
                total
            })
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    let chunk = bench_input();
    let mut packed = vec![0u8; lz5::compress_bound(chunk.len())];

    for &level in &[4i32, 12] {
        let n = lz5::compress(&chunk, &mut packed, level).expect("compress failed");
        let block = packed[..n].to_vec();
        group.throughput(Throughput::Bytes(chunk.len() as u64));
        group.bench_with_input(BenchmarkId::new("level", level), &block, |b, block| {
            b.iter(|| lz5::decompress(block, CHUNK).expect("decompress failed").len())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_stream, bench_decompress);
criterion_main!(benches);
