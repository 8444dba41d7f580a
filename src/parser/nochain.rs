//! No-chain strategy: the hash head and the repeat offset are the only
//! candidates; one position of lazy evaluation.

use super::{emit, Span};
use crate::compress::encode::{SequenceEncoder, Sink};
use crate::compress::error::Lz5Error;
use crate::compress::search::{Match, MatchFinder};

/// Longer of the repeat-offset match and the table match at `ip`.
fn best_at(mf: &mut MatchFinder<'_, '_>, ip: u32, limit: u32, last_offset: u32) -> Option<Match> {
    let rep = mf.repeat_match(ip, limit, last_offset);
    let head = mf.find_best_match(ip, limit);
    match (rep, head) {
        (Some(r), Some(h)) if h.len > r.len => Some(h),
        (Some(r), _) => Some(r),
        (None, h) => h,
    }
}

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

    while ip <= span.mflimit {
        let Some(mut m) = best_at(mf, ip, span.matchlimit, *last_offset) else {
            ip += 1;
            continue;
        };
        let mut start = ip;
        if ip < span.mflimit {
            if let Some(next) = best_at(mf, ip + 1, span.matchlimit, *last_offset) {
                if next.len > m.len + 1 {
                    m = next;
                    start = ip + 1;
                }
            }
        }

        let back = win.count_back(start, start - m.offset, anchor, mf.lowest_index(start));
        start -= back as u32;
        m.len += back;
        emit(enc, sink, &win, anchor, start, m, last_offset)?;
        ip = start + m.len as u32;
        anchor = ip;
    }
    Ok(anchor)
}
