//! Compression driver and streaming pre-processing.
//!
//! [`compress_generic`] runs one block: level byte, per-call reset of the
//! repeat offset, one parser run through the encoder selected by the level,
//! then the window advance.  [`compress_continue_generic`] prepares the
//! window for a streaming call first:
//!
//! 1. initialise the window on first use,
//! 2. re-origin positions that have grown past 2 GiB,
//! 3. demote the prefix to a dictionary when the input does not follow it,
//! 4. clip any dictionary bytes the input itself occupies.

use super::context::CompressionContext;
#[cfg(feature = "native-format")]
use super::encode::NativeFormat;
use super::encode::{Lz4Format, LimitedOutputDirective, Sink};
use super::error::Lz5Error;
use super::search::{MatchFinder, Tables};
use super::types::{OutputFormat, INITIAL_OFFSET, LZ5_MAX_INPUT_SIZE};
use crate::parser;

/// Compress `src_len` bytes starting at the context's `end` into `dst`.
///
/// Returns the bytes written, level byte included.  The window advances by
/// `src_len` whether or not the call succeeds.
///
/// # Safety
/// The window must be initialised.  Its dictionary segment and the range
/// `[prefix_start, end + src_len)` must be readable and must not overlap
/// `dst`.
pub unsafe fn compress_generic(
    ctx: &mut CompressionContext<'_>,
    src_len: usize,
    dst: &mut [u8],
    limit: LimitedOutputDirective,
) -> Result<usize, Lz5Error> {
    let Some((level_byte, body)) = dst.split_first_mut() else {
        ctx.window.advance(src_len);
        return Err(Lz5Error::OutputTooSmall);
    };
    *level_byte = ctx.level as u8;
    ctx.window.last_offset = INITIAL_OFFSET;

    let params = ctx.params;
    let start = ctx.window.end_index();
    let end = start + src_len as u32;
    let win = ctx.window.view(src_len);
    let tables = Tables::split(ctx.arena.slots(), &params);
    let mut mf = MatchFinder::new(win, tables, params, ctx.window.next_to_update);
    let mut sink = Sink::new(body, limit);
    let mut last_offset = ctx.window.last_offset;

    let result = match params.format {
        OutputFormat::Lz4 => parser::run(
            params.parser,
            &mut mf,
            &Lz4Format,
            start,
            end,
            &mut sink,
            &mut last_offset,
        ),
        #[cfg(feature = "native-format")]
        OutputFormat::Native => parser::run(
            params.parser,
            &mut mf,
            &NativeFormat::new(&params),
            start,
            end,
            &mut sink,
            &mut last_offset,
        ),
    };

    ctx.window.next_to_update = mf.next_to_update();
    ctx.window.last_offset = last_offset;
    ctx.window.advance(src_len);
    result?;

    let written = sink.written() + 1;
    log::trace!(
        "level {} block: {} -> {} bytes ({:?}, {:?})",
        ctx.level,
        src_len,
        written,
        params.parser,
        params.format
    );
    Ok(written)
}

/// Streaming entry: bring the window in line with `src`, then compress it.
///
/// # Safety
/// Every byte the window still references (the previous input, a loaded
/// dictionary or a saved dictionary buffer) must be readable and, outside
/// of `src` itself, unchanged since it was fed to the context.
pub unsafe fn compress_continue_generic(
    ctx: &mut CompressionContext<'_>,
    src: &[u8],
    dst: &mut [u8],
    limit: LimitedOutputDirective,
) -> Result<usize, Lz5Error> {
    if src.len() > LZ5_MAX_INPUT_SIZE {
        return Err(Lz5Error::InputTooLarge(src.len()));
    }
    if !ctx.window.is_initialized() {
        ctx.init(src.as_ptr());
    }
    if ctx.window.needs_rebase() {
        ctx.rebase();
    }
    if !ctx.window.follows(src.as_ptr()) {
        ctx.attach_external_dictionary(src.as_ptr());
    }
    ctx.window.clip_overlap(src);
    compress_generic(ctx, src.len(), dst, limit)
}
