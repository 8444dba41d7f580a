//! Hash-chain strategy: bounded chain walk, backward extension, and lazy
//! evaluation at the following positions for as long as it finds a longer
//! match.

use super::{emit, Span};
use crate::compress::encode::{SequenceEncoder, Sink};
use crate::compress::error::Lz5Error;
use crate::compress::search::MatchFinder;
use crate::compress::types::MINMATCH;

pub fn compress<E: SequenceEncoder>(
    mf: &mut MatchFinder<'_, '_>,
    enc: &E,
    span: Span,
    sink: &mut Sink<'_>,
    last_offset: &mut u32,
) -> Result<u32, Lz5Error> {
    let win = mf.window();
    let sufficient = mf.params().sufficient_length as usize;
    let mut ip = span.start;
    let mut anchor = span.start;

    while ip <= span.mflimit {
        let Some((mut start, mut m)) =
            mf.find_wider_match(ip, anchor, span.matchlimit, MINMATCH - 1)
        else {
            ip += 1;
            continue;
        };

        // lazy evaluation
        let mut probe = ip + 1;
        while m.len < sufficient && probe <= span.mflimit {
            match mf.find_wider_match(probe, anchor, span.matchlimit, m.len) {
                Some((s, better)) if s + better.len as u32 > start + m.len as u32 => {
                    start = s;
                    m = better;
                    probe += 1;
                }
                _ => break,
            }
        }

        emit(enc, sink, &win, anchor, start, m, last_offset)?;
        ip = start + m.len as u32;
        anchor = ip;
    }
    Ok(anchor)
}
