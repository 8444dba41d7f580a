//! Fast strategy: one table probe per position, greedy, with an
//! accelerating skip over incompressible regions.

use super::{emit, Span};
use crate::compress::encode::{SequenceEncoder, Sink};
use crate::compress::error::Lz5Error;
use crate::compress::search::{Match, MatchFinder};

/// After `1 << SKIP_TRIGGER` misses in a row the step grows by one.
const SKIP_TRIGGER: u32 = 6;

pub fn compress<E: SequenceEncoder>(
    mf: &mut MatchFinder<'_, '_>,
    enc: &E,
    span: Span,
    sink: &mut Sink<'_>,
    last_offset: &mut u32,
) -> Result<u32, Lz5Error> {
    let win = mf.window();
    let mut ip = span.start;
    let mut anchor = span.start;

    'sequences: while ip <= span.mflimit {
        let mut search_count = 1u32 << SKIP_TRIGGER;
        let found = loop {
            if ip > span.mflimit {
                break 'sequences;
            }
            if let Some(m) = mf.find_best_match(ip, span.matchlimit) {
                break m;
            }
            ip += search_count >> SKIP_TRIGGER;
            search_count += 1;
        };

        let back = win.count_back(ip, ip - found.offset, anchor, mf.lowest_index(ip));
        let start = ip - back as u32;
        let m = Match {
            len: found.len + back,
            offset: found.offset,
        };
        emit(enc, sink, &win, anchor, start, m, last_offset)?;
        ip = start + m.len as u32;
        anchor = ip;
    }
    Ok(anchor)
}
