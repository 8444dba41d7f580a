//! Public compression API.
//!
//! ## Function map
//!
//! | Operation                 | Rust                                        |
//! |---------------------------|---------------------------------------------|
//! | size of state             | [`size_of_state`]                           |
//! | create stream             | [`create_stream`] / [`Lz5Stream::create`]   |
//! | reset stream              | [`reset_stream`] / [`Lz5Stream::reset`]     |
//! | free stream               | [`free_stream`] (or drop the `Box`)         |
//! | load dictionary           | [`load_dictionary`]                         |
//! | save dictionary           | [`save_dictionary`]                         |
//! | one-shot compression      | [`compress`]                                |
//! | streaming compression     | [`compress_continue`]                       |
//! | caller-owned state        | [`compress_ext_state`]                      |
//! | level 1 state size        | [`size_of_state_level1`]                    |
//! | level 1 one-shot          | [`compress_level1`]                         |
//! | level 1 caller-owned      | [`compress_ext_state_level1`]               |
//! | level 1 stream            | [`create_stream_level1`] / [`reset_stream_level1`] |
//!
//! Sizes are returned as `Ok(bytes)`; every failure is an [`Lz5Error`].
//!
//! ## Streaming hazard
//!
//! A failed [`compress_continue`] still moves the stream's window past the
//! input.  Retrying the same input on the same stream compresses it as if it
//! followed itself; to recover, reset the stream (or reload a dictionary)
//! before retrying.

use core::mem;

use super::context::{self, CompressionContext};
use super::dispatch::{compress_continue_generic, compress_generic};
use super::encode::LimitedOutputDirective;
use super::error::Lz5Error;
use super::types::{LZ5_MAX_INPUT_SIZE, TRANSFORM_LEVEL};

// ─────────────────────────────────────────────────────────────────────────────
// Bounds
// ─────────────────────────────────────────────────────────────────────────────

/// Worst-case compressed size of `input_size` bytes, level byte included.
/// Returns `0` when `input_size` exceeds [`LZ5_MAX_INPUT_SIZE`].
#[inline]
pub fn compress_bound(input_size: usize) -> usize {
    if input_size > LZ5_MAX_INPUT_SIZE {
        0
    } else {
        input_size + input_size / 255 + 16 + 1
    }
}

/// Bytes a caller-owned state buffer needs for `level`.
#[inline]
pub fn size_of_state(level: i32) -> usize {
    context::size_of_state(level)
}

/// Capacity checks are skipped only when `dst` holds the worst case.
#[inline]
fn limit_for(src_len: usize, dst_len: usize) -> LimitedOutputDirective {
    if dst_len < compress_bound(src_len) {
        LimitedOutputDirective::LimitedOutput
    } else {
        LimitedOutputDirective::NotLimited
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lz5Stream
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming compression state.
///
/// Created with [`Lz5Stream::create`], released by dropping the box.
pub struct Lz5Stream {
    pub(crate) ctx: CompressionContext<'static>,
}

// SAFETY: the raw window pointers refer to caller memory whose validity the
// caller already guarantees for every `unsafe` call; the stream itself has
// no thread affinity.
unsafe impl Send for Lz5Stream {}

impl Lz5Stream {
    /// Allocate a stream for `level`.  Returns `None` if table memory cannot
    /// be reserved.
    pub fn create(level: i32) -> Option<Box<Self>> {
        match CompressionContext::new(level) {
            Ok(ctx) => Some(Box::new(Self { ctx })),
            Err(e) => {
                log::debug!("cannot create stream: {e}");
                None
            }
        }
    }

    /// Switch to `level` and drop all history, growing the tables if the
    /// level needs more room.
    pub fn reset(&mut self, level: i32) -> Result<(), Lz5Error> {
        self.ctx.reset(level)
    }

    #[inline]
    pub fn level(&self) -> i32 {
        self.ctx.level()
    }

    pub fn allocated_size(&self) -> usize {
        self.ctx.allocated_size()
    }

    /// Use `dict` as history for the next block.  Dictionaries longer than
    /// the window keep only their tail; the retained size is returned.
    ///
    /// `dict` must stay readable and unchanged until the stream moves past
    /// it; [`Lz5Stream::compress_continue`] relies on this.
    pub fn load_dictionary(&mut self, dict: &[u8]) -> usize {
        self.ctx.load_dictionary(dict)
    }

    /// Copy the most recent history into `buf` and continue from there.
    ///
    /// # Safety
    /// The previous input must still be readable.  `buf` becomes the
    /// stream's history and must stay unchanged until the next call.
    pub unsafe fn save_dictionary(&mut self, buf: &mut [u8]) -> usize {
        self.ctx.save_dictionary(buf)
    }

    /// Compress `src` as the next block of the stream.
    ///
    /// When `src` starts exactly where the previous block ended, the blocks
    /// form one contiguous history; otherwise the previous block becomes
    /// the dictionary.
    ///
    /// # Safety
    /// All history the stream still references (previous blocks, a loaded
    /// or saved dictionary) must be readable and unchanged, except where
    /// `src` itself now occupies that memory.
    pub unsafe fn compress_continue(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize, Lz5Error> {
        let limit = limit_for(src.len(), dst.len());
        compress_continue_generic(&mut self.ctx, src, dst, limit)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Free-function surface
// ─────────────────────────────────────────────────────────────────────────────

pub fn create_stream(level: i32) -> Option<Box<Lz5Stream>> {
    Lz5Stream::create(level)
}

/// Reset `stream` to `level`, reallocating its tables when they are too
/// small.  Returns `None` (and frees the stream) if that allocation fails.
pub fn reset_stream(mut stream: Box<Lz5Stream>, level: i32) -> Option<Box<Lz5Stream>> {
    match stream.reset(level) {
        Ok(()) => Some(stream),
        Err(e) => {
            log::debug!("cannot reset stream: {e}");
            None
        }
    }
}

/// Release `stream`.  Always returns `0`.
pub fn free_stream(stream: Box<Lz5Stream>) -> i32 {
    drop(stream);
    0
}

pub fn load_dictionary(stream: &mut Lz5Stream, dict: &[u8]) -> usize {
    stream.load_dictionary(dict)
}

/// See [`Lz5Stream::save_dictionary`].
///
/// # Safety
/// Same contract as [`Lz5Stream::save_dictionary`].
pub unsafe fn save_dictionary(stream: &mut Lz5Stream, buf: &mut [u8]) -> usize {
    stream.save_dictionary(buf)
}

/// See [`Lz5Stream::compress_continue`].
///
/// # Safety
/// Same contract as [`Lz5Stream::compress_continue`].
pub unsafe fn compress_continue(
    stream: &mut Lz5Stream,
    src: &[u8],
    dst: &mut [u8],
) -> Result<usize, Lz5Error> {
    stream.compress_continue(src, dst)
}

fn compress_single(
    ctx: &mut CompressionContext<'_>,
    src: &[u8],
    dst: &mut [u8],
) -> Result<usize, Lz5Error> {
    if src.len() > LZ5_MAX_INPUT_SIZE {
        return Err(Lz5Error::InputTooLarge(src.len()));
    }
    ctx.init(src.as_ptr());
    let limit = limit_for(src.len(), dst.len());
    // SAFETY: the window holds nothing but `src`, borrowed for this call;
    // `dst` is a separate exclusive borrow.
    unsafe { compress_generic(ctx, src.len(), dst, limit) }
}

/// Compress `src` into `dst` in one call.
///
/// `dst` smaller than [`compress_bound`] is allowed; the call then fails
/// with [`Lz5Error::OutputTooSmall`] if the output does not fit.
pub fn compress(src: &[u8], dst: &mut [u8], level: i32) -> Result<usize, Lz5Error> {
    let mut ctx = CompressionContext::new(level)?;
    compress_single(&mut ctx, src, dst)
}

/// [`compress`] with tables placed in caller memory.
///
/// `state` must be pointer-aligned and hold at least
/// [`size_of_state`]`(level)` bytes; otherwise nothing is touched and an
/// error is returned.
pub fn compress_ext_state(
    state: &mut [u8],
    src: &[u8],
    dst: &mut [u8],
    level: i32,
) -> Result<usize, Lz5Error> {
    if state.as_ptr() as usize % mem::align_of::<*const u8>() != 0 {
        return Err(Lz5Error::MisalignedState);
    }
    let need = size_of_state(level);
    if state.len() < need {
        return Err(Lz5Error::StateTooSmall {
            have: state.len(),
            need,
        });
    }

    let header = mem::size_of::<CompressionContext<'static>>();
    // SAFETY: every bit pattern is a valid `u32`.
    let (head, slots, _) = unsafe { state[header..].align_to_mut::<u32>() };
    if !head.is_empty() {
        return Err(Lz5Error::MisalignedState);
    }
    let mut ctx = CompressionContext::with_slots(slots, level)?;
    compress_single(&mut ctx, src, dst)
}

// ─────────────────────────────────────────────────────────────────────────────
// Level 1 shorthands
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
pub fn size_of_state_level1() -> usize {
    size_of_state(TRANSFORM_LEVEL)
}

pub fn compress_level1(src: &[u8], dst: &mut [u8]) -> Result<usize, Lz5Error> {
    compress(src, dst, TRANSFORM_LEVEL)
}

pub fn compress_ext_state_level1(
    state: &mut [u8],
    src: &[u8],
    dst: &mut [u8],
) -> Result<usize, Lz5Error> {
    compress_ext_state(state, src, dst, TRANSFORM_LEVEL)
}

pub fn create_stream_level1() -> Option<Box<Lz5Stream>> {
    create_stream(TRANSFORM_LEVEL)
}

pub fn reset_stream_level1(stream: Box<Lz5Stream>) -> Option<Box<Lz5Stream>> {
    reset_stream(stream, TRANSFORM_LEVEL)
}
