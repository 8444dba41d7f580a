// Every level, every parser, on data shapes that stress different paths.

use lz5::{compress, decompress, LZ5_MAX_CLEVEL, LZ5_MIN_CLEVEL};

use super::common::{bound_buf, noise, text};

fn shapes() -> Vec<(&'static str, Vec<u8>)> {
    let mut mixed = text(20_000);
    mixed.extend_from_slice(&noise(5_000, 9));
    mixed.extend_from_slice(&text(20_000));
    mixed.extend(std::iter::repeat(0u8).take(3_000));

    let mut periodic = Vec::new();
    for i in 0..30_000u32 {
        periodic.push((i % 7) as u8 + b'a');
    }

    vec![
        ("text", text(60_000)),
        ("noise", noise(30_000, 42)),
        ("zeros", vec![0u8; 50_000]),
        ("mixed", mixed),
        ("periodic", periodic),
        ("short", b"hello hello hello hello!".to_vec()),
    ]
}

#[test]
fn every_level_roundtrips_every_shape() {
    for (name, src) in shapes() {
        for level in LZ5_MIN_CLEVEL..=LZ5_MAX_CLEVEL {
            let mut dst = bound_buf(src.len());
            let n = compress(&src, &mut dst, level)
                .unwrap_or_else(|e| panic!("{name} level {level}: {e}"));
            assert!(n <= dst.len());
            let back = decompress(&dst[..n], src.len())
                .unwrap_or_else(|e| panic!("{name} level {level}: {e}"));
            assert_eq!(back, src, "{name} level {level}");
        }
    }
}

#[test]
fn incompressible_data_stays_within_bound() {
    let src = noise(100_000, 1234);
    for level in LZ5_MIN_CLEVEL..=LZ5_MAX_CLEVEL {
        let mut dst = bound_buf(src.len());
        let n = compress(&src, &mut dst, level).expect("compress");
        assert!(n <= src.len() + src.len() / 255 + 17, "level {level}: {n}");
    }
}

#[test]
fn strongest_level_beats_fastest_on_text() {
    let src = text(100_000);
    let mut fast = bound_buf(src.len());
    let mut strong = bound_buf(src.len());
    let nf = compress(&src, &mut fast, LZ5_MIN_CLEVEL).expect("fast");
    let ns = compress(&src, &mut strong, LZ5_MAX_CLEVEL).expect("strong");
    assert!(ns < nf, "max level {ns} vs min level {nf}");
}

#[test]
fn output_is_deterministic() {
    let src = text(40_000);
    for level in [1, 6, LZ5_MAX_CLEVEL] {
        let mut a = bound_buf(src.len());
        let mut b = bound_buf(src.len());
        let na = compress(&src, &mut a, level).expect("a");
        let nb = compress(&src, &mut b, level).expect("b");
        assert_eq!(a[..na], b[..nb]);
    }
}
