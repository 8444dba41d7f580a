//! Price-optimal strategy.
//!
//! From each starting position the parser fills a table of [`Node`]s, one per
//! byte ahead, holding the cheapest known way to reach that byte.  Literal
//! runs and every length of every candidate match are relaxed into the
//! table; once the frontier stops moving the cheapest path is walked back
//! and emitted.
//!
//! `full_update` (the binary-tree tag) refreshes candidates at every
//! position.  Without it, a position only contributes matches that reach
//! past the current frontier.

use super::{emit, Span};
use crate::compress::encode::{SequenceEncoder, Sink};
use crate::compress::error::Lz5Error;
use crate::compress::search::{Match, MatchFinder};
use crate::compress::types::MINMATCH;

/// Positions covered by one parse.
pub const OPT_NUM: usize = 1 << 12;
/// Literal slots kept valid past the frontier.
const TRAILING_LITERALS: usize = 3;
const INVALID: u32 = u32::MAX;

/// Cheapest known arrival at one position.
#[derive(Clone, Copy, Debug)]
struct Node {
    price: u32,
    /// Price paid before the literal run that ends here; equals `price` for
    /// match nodes.
    base: u32,
    /// Length of the literal run ending here; `0` after a match.
    litlen: usize,
    /// `1` for a literal step, otherwise the length of the match ending here.
    mlen: usize,
    off: u32,
    /// Repeat offset in effect after this node.
    rep: u32,
}

impl Node {
    const UNREACHED: Node = Node {
        price: INVALID,
        base: INVALID,
        litlen: 0,
        mlen: 1,
        off: 0,
        rep: 0,
    };
}

struct Table {
    nodes: Vec<Node>,
    /// Highest index holding a node written during the current parse.
    filled: usize,
    /// End of the longest match seen so far.
    frontier: usize,
}

impl Table {
    fn new() -> Self {
        Self {
            nodes: vec![Node::UNREACHED; OPT_NUM + TRAILING_LITERALS + 1],
            filled: 0,
            frontier: 0,
        }
    }

    fn start<E: SequenceEncoder>(&mut self, enc: &E, pending: usize, rep: u32) {
        self.nodes[0] = Node {
            price: enc.literals_price(pending),
            base: 0,
            litlen: pending,
            mlen: 1,
            off: 0,
            rep,
        };
        self.filled = 0;
        self.frontier = 0;
    }

    fn touch(&mut self, pos: usize) {
        while self.filled < pos {
            self.filled += 1;
            self.nodes[self.filled] = Node::UNREACHED;
        }
    }

    /// Arrive at `cur + 1 ..= cur + count` with literals.
    fn relax_literals<E: SequenceEncoder>(&mut self, enc: &E, cur: usize, count: usize) {
        let from = self.nodes[cur];
        if from.price == INVALID {
            return;
        }
        for k in 1..=count {
            let (litlen, base) = if from.mlen == 1 {
                (from.litlen + k, from.base)
            } else {
                (k, from.price)
            };
            let price = base + enc.literals_price(litlen);
            let pos = cur + k;
            self.touch(pos);
            if price < self.nodes[pos].price {
                self.nodes[pos] = Node {
                    price,
                    base,
                    litlen,
                    mlen: 1,
                    off: 0,
                    rep: from.rep,
                };
            }
        }
    }

    /// Arrive with every usable length of every candidate at `cur`.
    /// `candidates` is sorted by strictly increasing length.
    fn relax_matches<E: SequenceEncoder>(&mut self, enc: &E, cur: usize, candidates: &[Match]) {
        let from = self.nodes[cur];
        let mut covered = 0;
        for m in candidates {
            let lo = enc.min_match(m.offset).max(covered + 1);
            for ml in lo..=m.len {
                let price =
                    from.base + enc.sequence_price(from.litlen, ml, m.offset, from.rep);
                let pos = cur + ml;
                self.touch(pos);
                if price < self.nodes[pos].price {
                    self.nodes[pos] = Node {
                        price,
                        base: price,
                        litlen: 0,
                        mlen: ml,
                        off: m.offset,
                        rep: m.offset,
                    };
                }
            }
            covered = covered.max(m.len);
            self.frontier = self.frontier.max(cur + m.len);
        }
    }

    fn relax_trailing<E: SequenceEncoder>(&mut self, enc: &E) {
        self.relax_literals(enc, self.frontier, TRAILING_LITERALS);
    }

    /// Matches on the cheapest path to `target`, in reverse order, as
    /// `(position, match)` pairs.
    fn backtrack(&self, target: usize, out: &mut Vec<(usize, Match)>) {
        let mut pos = target;
        while pos > 0 {
            let n = self.nodes[pos];
            if n.mlen == 1 {
                pos = pos.saturating_sub(n.litlen.max(1));
            } else {
                pos -= n.mlen;
                out.push((
                    pos,
                    Match {
                        len: n.mlen,
                        offset: n.off,
                    },
                ));
            }
        }
    }
}

pub fn compress<E: SequenceEncoder>(
    mf: &mut MatchFinder<'_, '_>,
    enc: &E,
    span: Span,
    sink: &mut Sink<'_>,
    last_offset: &mut u32,
    full_update: bool,
) -> Result<u32, Lz5Error> {
    let win = mf.window();
    let sufficient = (mf.params().sufficient_length as usize).min(OPT_NUM - 1);
    let mut table = Table::new();
    let mut candidates = Vec::new();
    let mut path = Vec::new();
    let mut ip = span.start;
    let mut anchor = span.start;

    while ip <= span.mflimit {
        mf.collect_matches(ip, span.matchlimit, *last_offset, &mut candidates);
        let Some(&first) = candidates.last() else {
            ip += 1;
            continue;
        };
        if first.len > sufficient {
            emit(enc, sink, &win, anchor, ip, first, last_offset)?;
            ip += first.len as u32;
            anchor = ip;
            continue;
        }

        table.start(enc, (ip - anchor) as usize, *last_offset);
        table.relax_literals(enc, 0, MINMATCH - 1);
        table.relax_matches(enc, 0, &candidates);
        table.relax_trailing(enc);

        let mut tail: Option<(usize, Match)> = None;
        let mut cur = 1;
        while cur < table.frontier {
            if ip + cur as u32 > span.mflimit {
                break;
            }
            let here = table.nodes[cur].price;
            if here == INVALID {
                cur += 1;
                continue;
            }
            let next_cheaper = table.nodes[cur + 1].price <= here;
            let skip = if full_update {
                next_cheaper && table.nodes[cur + MINMATCH].price < here.saturating_add(3)
            } else {
                next_cheaper
            };
            if skip {
                cur += 1;
                continue;
            }

            let at = ip + cur as u32;
            mf.collect_matches(at, span.matchlimit, table.nodes[cur].rep, &mut candidates);
            if !full_update {
                let reach = table.frontier - cur;
                candidates.retain(|m| m.len > reach);
            }
            let Some(&longest) = candidates.last() else {
                cur += 1;
                continue;
            };
            if longest.len > sufficient || cur + longest.len >= OPT_NUM {
                tail = Some((cur, longest));
                break;
            }

            table.relax_literals(enc, cur, MINMATCH - 1);
            table.relax_matches(enc, cur, &candidates);
            table.relax_trailing(enc);
            cur += 1;
        }

        path.clear();
        let advance = match tail {
            Some((pos, m)) => {
                path.push((pos, m));
                table.backtrack(pos, &mut path);
                pos + m.len
            }
            None => {
                table.backtrack(table.frontier, &mut path);
                table.frontier
            }
        };

        for &(pos, m) in path.iter().rev() {
            let start = ip + pos as u32;
            emit(enc, sink, &win, anchor, start, m, last_offset)?;
            anchor = start + m.len as u32;
        }
        ip += advance as u32;
    }
    Ok(anchor)
}
