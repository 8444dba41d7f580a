//! Price-driven lazy strategies.
//!
//! Every candidate at a position, the repeat offset included, is scored by
//! the bytes it saves: its length minus the encoder's price for the
//! sequence.  A candidate starting `k` positions later pays `k` extra
//! literal bytes.  `PriceFast` looks one position ahead, `LowestPrice` two.

use super::{emit, Span};
use crate::compress::encode::{SequenceEncoder, Sink};
use crate::compress::error::Lz5Error;
use crate::compress::search::{Match, MatchFinder};

/// Best-scoring candidate at `ip` and its saving in bytes.
fn best_priced<E: SequenceEncoder>(
    mf: &mut MatchFinder<'_, '_>,
    enc: &E,
    ip: u32,
    limit: u32,
    last_offset: u32,
    scratch: &mut Vec<Match>,
) -> Option<(Match, i64)> {
    mf.collect_matches(ip, limit, last_offset, scratch);
    let mut best: Option<(Match, i64)> = None;
    for &m in scratch.iter() {
        let saved = m.len as i64 - enc.sequence_price(0, m.len, m.offset, last_offset) as i64;
        match best {
            Some((b, s)) if s > saved || (s == saved && b.len >= m.len) => {}
            _ => best = Some((m, saved)),
        }
    }
    best.filter(|&(_, saved)| saved > 0)
}

pub fn compress<E: SequenceEncoder>(
    mf: &mut MatchFinder<'_, '_>,
    enc: &E,
    span: Span,
    sink: &mut Sink<'_>,
    last_offset: &mut u32,
    lazy_depth: u32,
) -> Result<u32, Lz5Error> {
    let win = mf.window();
    let sufficient = mf.params().sufficient_length as usize;
    let mut scratch = Vec::new();
    let mut ip = span.start;
    let mut anchor = span.start;

    while ip <= span.mflimit {
        let Some((mut m, mut saved)) =
            best_priced(mf, enc, ip, span.matchlimit, *last_offset, &mut scratch)
        else {
            ip += 1;
            continue;
        };
        let mut start = ip;

        let mut misses = 0;
        let mut probe = start + 1;
        while misses < lazy_depth && m.len < sufficient && probe <= span.mflimit {
            let delay = (probe - start) as i64;
            match best_priced(mf, enc, probe, span.matchlimit, *last_offset, &mut scratch) {
                Some((next, next_saved)) if next_saved - delay > saved => {
                    m = next;
                    saved = next_saved;
                    start = probe;
                    misses = 0;
                }
                _ => misses += 1,
            }
            probe += 1;
        }

        emit(enc, sink, &win, anchor, start, m, last_offset)?;
        ip = start + m.len as u32;
        anchor = ip;
    }
    Ok(anchor)
}
