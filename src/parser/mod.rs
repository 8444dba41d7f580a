//! Parser strategies.
//!
//! A parser walks one input span, asks the [`MatchFinder`] for candidates and
//! turns its decisions into sequences through a [`SequenceEncoder`].  Each
//! strategy returns the anchor (first byte not yet emitted); [`run`] closes
//! the block with the trailing literals.
//!
//! | strategy       | search                  | decision               |
//! |----------------|-------------------------|------------------------|
//! | `Fast`         | one probe, skip on miss | greedy                 |
//! | `NoChain`      | head + repeat offset    | one-step lazy          |
//! | `HashChain`    | chain walk              | lazy while improving   |
//! | `PriceFast`    | chain walk + repeat     | priced, one-step lazy  |
//! | `LowestPrice`  | chain walk + repeat     | priced, two-step lazy  |
//! | `OptimalPrice` | all lengths             | forward DP over prices |

pub mod fast;
pub mod hashchain;
pub mod nochain;
#[cfg(feature = "native-format")]
pub mod optimal;
#[cfg(feature = "native-format")]
pub mod pricefast;

use crate::compress::encode::{SequenceEncoder, Sink};
use crate::compress::error::Lz5Error;
use crate::compress::search::{Match, MatchFinder};
use crate::compress::types::{ParserKind, LASTLITERALS, MFLIMIT, MIN_LENGTH};
use crate::compress::window::Window;

/// Input positions of one call and the points where matching stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    /// Last position a match may start at.
    pub mflimit: u32,
    /// Matches never extend past this position.
    pub matchlimit: u32,
}

impl Span {
    /// `None` when the input is too short to hold any match.
    pub fn new(start: u32, end: u32) -> Option<Self> {
        if ((end - start) as usize) < MIN_LENGTH {
            return None;
        }
        Some(Self {
            start,
            end,
            mflimit: end - MFLIMIT as u32,
            matchlimit: end - LASTLITERALS as u32,
        })
    }
}

/// Emit the literals in `[anchor, start)` followed by `m`.
#[inline]
pub(crate) fn emit<E: SequenceEncoder>(
    enc: &E,
    sink: &mut Sink<'_>,
    win: &Window<'_>,
    anchor: u32,
    start: u32,
    m: Match,
    last_offset: &mut u32,
) -> Result<(), Lz5Error> {
    enc.encode_sequence(sink, win.input(anchor, start), m.len, m.offset, last_offset)
}

/// Run `kind` over the input `[start, end)` and close the block.
pub fn run<E: SequenceEncoder>(
    kind: ParserKind,
    mf: &mut MatchFinder<'_, '_>,
    enc: &E,
    start: u32,
    end: u32,
    sink: &mut Sink<'_>,
    last_offset: &mut u32,
) -> Result<(), Lz5Error> {
    let anchor = match Span::new(start, end) {
        None => start,
        Some(span) => match kind {
            ParserKind::Fast => fast::compress(mf, enc, span, sink, last_offset)?,
            ParserKind::NoChain => nochain::compress(mf, enc, span, sink, last_offset)?,
            ParserKind::HashChain => hashchain::compress(mf, enc, span, sink, last_offset)?,
            #[cfg(feature = "native-format")]
            ParserKind::PriceFast => pricefast::compress(mf, enc, span, sink, last_offset, 1)?,
            #[cfg(feature = "native-format")]
            ParserKind::LowestPrice => pricefast::compress(mf, enc, span, sink, last_offset, 2)?,
            #[cfg(feature = "native-format")]
            ParserKind::OptimalPrice => optimal::compress(mf, enc, span, sink, last_offset, false)?,
            #[cfg(feature = "native-format")]
            ParserKind::OptimalPriceBt => {
                optimal::compress(mf, enc, span, sink, last_offset, true)?
            }
        },
    };
    let win = mf.window();
    enc.encode_last_literals(sink, win.input(anchor, end))
}
