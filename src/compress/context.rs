//! Compression context: parameter selection, table storage and the window
//! transitions that must keep tables and addressing consistent.
//!
//! A context owns its hash/chain tables ([`TableArena::Owned`]) or borrows
//! them from a caller-supplied state buffer ([`TableArena::Borrowed`]).  The
//! window pointers always refer to caller memory; every transition that moves
//! them is `unsafe` unless the memory is borrowed for the duration of the
//! call.

use core::mem;
use core::ptr;
use core::slice;

use super::error::Lz5Error;
use super::search::{MatchFinder, Tables};
use super::types::{clamp_level, level_params, Parameters, HASH_UPDATE_LIMIT, MAX_WINDOW};
use super::window::WindowState;

// ─────────────────────────────────────────────────────────────────────────────
// Table storage
// ─────────────────────────────────────────────────────────────────────────────

/// Backing storage for the hash, 3-byte hash and chain tables.
pub enum TableArena<'s> {
    Owned(Vec<u32>),
    Borrowed(&'s mut [u32]),
}

impl<'s> TableArena<'s> {
    /// Reserve `entries` zeroed slots, reporting failure instead of aborting.
    pub fn allocate(entries: usize) -> Result<Self, Lz5Error> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(entries)
            .map_err(|_| Lz5Error::AllocationFailed(entries * mem::size_of::<u32>()))?;
        slots.resize(entries, 0);
        Ok(TableArena::Owned(slots))
    }

    /// Number of `u32` slots available.
    pub fn capacity(&self) -> usize {
        match self {
            TableArena::Owned(v) => v.len(),
            TableArena::Borrowed(s) => s.len(),
        }
    }

    pub fn slots(&mut self) -> &mut [u32] {
        match self {
            TableArena::Owned(v) => v,
            TableArena::Borrowed(s) => s,
        }
    }

    /// Make room for `entries` slots.  Owned storage is replaced when too
    /// small; borrowed storage cannot grow.
    pub fn ensure_capacity(&mut self, entries: usize) -> Result<(), Lz5Error> {
        let have = self.capacity();
        if have >= entries {
            return Ok(());
        }
        if let TableArena::Borrowed(_) = self {
            return Err(Lz5Error::StateTooSmall {
                have: have * mem::size_of::<u32>(),
                need: entries * mem::size_of::<u32>(),
            });
        }
        log::debug!("growing match tables from {} to {} entries", have, entries);
        *self = Self::allocate(entries)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CompressionContext
// ─────────────────────────────────────────────────────────────────────────────

/// Session state shared by the driver, the match finder and the encoder.
pub struct CompressionContext<'s> {
    pub(crate) level: i32,
    pub(crate) params: Parameters,
    pub(crate) window: WindowState,
    pub(crate) arena: TableArena<'s>,
}

/// Bytes needed for a context header plus its tables at `level`.
pub fn size_of_state(level: i32) -> usize {
    mem::size_of::<CompressionContext<'static>>()
        + level_params(level).table_entries() * mem::size_of::<u32>()
}

impl CompressionContext<'static> {
    /// Context with owned tables sized for `level`.
    pub fn new(level: i32) -> Result<Self, Lz5Error> {
        let level = clamp_level(level);
        let params = level_params(level);
        let arena = TableArena::allocate(params.table_entries())?;
        Ok(Self {
            level,
            params,
            window: WindowState::unset(),
            arena,
        })
    }
}

impl<'s> CompressionContext<'s> {
    /// Context whose tables live in caller-provided `slots`.
    pub fn with_slots(slots: &'s mut [u32], level: i32) -> Result<Self, Lz5Error> {
        let level = clamp_level(level);
        let params = level_params(level);
        let mut arena = TableArena::Borrowed(slots);
        arena.ensure_capacity(params.table_entries())?;
        Ok(Self {
            level,
            params,
            window: WindowState::unset(),
            arena,
        })
    }

    /// Switch to `level` and forget all history.  Tables are reinitialised
    /// lazily by the next compression call.
    pub fn reset(&mut self, level: i32) -> Result<(), Lz5Error> {
        let level = clamp_level(level);
        let params = level_params(level);
        self.arena.ensure_capacity(params.table_entries())?;
        self.level = level;
        self.params = params;
        self.window = WindowState::unset();
        Ok(())
    }

    #[inline]
    pub fn level(&self) -> i32 {
        self.level
    }

    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    #[inline]
    pub fn window(&self) -> &WindowState {
        &self.window
    }

    /// Bytes held by the context header and its table storage.
    pub fn allocated_size(&self) -> usize {
        mem::size_of::<Self>() + self.arena.capacity() * mem::size_of::<u32>()
    }

    pub(crate) fn tables(&mut self) -> Tables<'_> {
        Tables::split(self.arena.slots(), &self.params)
    }

    /// Clear the tables and open an empty window at `start`.
    pub fn init(&mut self, start: *const u8) {
        self.tables().clear();
        self.window.init(start);
    }

    /// Index every prefix position below `target`.
    ///
    /// # Safety
    /// The prefix `[prefix_start, end)` must be readable.
    unsafe fn index_until(&mut self, target: u32) {
        let win = self.window.prefix_view();
        let tables = Tables::split(self.arena.slots(), &self.params);
        let mut mf = MatchFinder::new(win, tables, self.params, self.window.next_to_update);
        mf.insert(target);
        self.window.next_to_update = mf.next_to_update();
    }

    /// Reset the window to `dict` and index it.  Only the last
    /// [`MAX_WINDOW`] bytes are kept.  Returns the number of bytes retained.
    ///
    /// The dictionary stays referenced by the context: it must remain
    /// readable and unchanged until the next call that replaces the window.
    pub fn load_dictionary(&mut self, dict: &[u8]) -> usize {
        let dict = if dict.len() > MAX_WINDOW as usize {
            log::debug!(
                "dictionary of {} bytes truncated to its last {} bytes",
                dict.len(),
                MAX_WINDOW
            );
            &dict[dict.len() - MAX_WINDOW as usize..]
        } else {
            dict
        };

        self.init(dict.as_ptr());
        self.window.end = dict.as_ptr().wrapping_add(dict.len());
        if dict.len() >= HASH_UPDATE_LIMIT as usize {
            let target = self.window.end_index() - (HASH_UPDATE_LIMIT - 1);
            // SAFETY: the only segment is `dict`, borrowed for this call.
            unsafe { self.index_until(target) };
        }
        dict.len()
    }

    /// Retire the current prefix as the dictionary and open a new prefix at
    /// `new_start`.
    ///
    /// # Safety
    /// The current prefix `[prefix_start, end)` must still be readable.
    pub unsafe fn attach_external_dictionary(&mut self, new_start: *const u8) {
        let end_index = self.window.end_index();
        if end_index >= self.window.dict_limit + HASH_UPDATE_LIMIT {
            self.index_until(end_index - (HASH_UPDATE_LIMIT - 1));
        }
        self.window.demote_prefix(new_start);
    }

    /// Re-origin logical positions near [`MAX_WINDOW`], keeping the most
    /// recent window of the prefix as a dictionary.
    ///
    /// # Safety
    /// The current prefix must still be readable.
    pub unsafe fn rebase(&mut self) {
        let keep = self.window.prefix_len().min(MAX_WINDOW as usize);
        log::debug!(
            "logical position {} past rebase threshold; keeping {} bytes",
            self.window.end_index(),
            keep
        );
        let tail = slice::from_raw_parts(self.window.end.wrapping_sub(keep), keep);
        self.load_dictionary(tail);
    }

    /// Copy up to `buf.len()` trailing prefix bytes into `buf` and make that
    /// copy the context's only history.  Returns the number of bytes kept;
    /// requests below four bytes keep nothing.
    ///
    /// # Safety
    /// The current prefix must still be readable.  `buf` must stay readable
    /// and unchanged until the next call that replaces the window.
    pub unsafe fn save_dictionary(&mut self, buf: &mut [u8]) -> usize {
        if !self.window.is_initialized() {
            return 0;
        }
        let mut size = buf.len().min(MAX_WINDOW as usize);
        if size < 4 {
            size = 0;
        }
        size = size.min(self.window.prefix_len());

        let end_index = self.window.end_index();
        ptr::copy(self.window.end.wrapping_sub(size), buf.as_mut_ptr(), size);

        let start = buf.as_ptr();
        self.window.prefix_start = start;
        self.window.dict_start = start;
        self.window.end = start.wrapping_add(size);
        self.window.dict_limit = end_index - size as u32;
        self.window.low_limit = self.window.dict_limit;
        if self.window.next_to_update < self.window.dict_limit {
            self.window.next_to_update = self.window.dict_limit;
        }
        size
    }
}
