//! Logical addressing over a two-segment sliding window.
//!
//! Every byte ever fed to a context has a logical position (`u32`).  Only two
//! physical segments stay addressable:
//!
//! ```text
//!   logical:  low_limit        dict_limit                 end_index
//!                 |  dictionary    |   prefix (current)        |
//!   physical:  dict_start ...   prefix_start ...              end
//! ```
//!
//! [`WindowState`] is the persistent part stored in a context.  It holds raw
//! pointers because the segments live in caller memory across calls.
//! [`Window`] is the bounds-checked view built for the duration of one call;
//! match finders only ever read bytes through it.

use core::ptr;
use core::slice;

use super::types::{INITIAL_OFFSET, MAX_WINDOW, REBASE_THRESHOLD};

// ─────────────────────────────────────────────────────────────────────────────
// WindowState
// ─────────────────────────────────────────────────────────────────────────────

/// Window bookkeeping kept between calls.
///
/// A null `prefix_start` marks a window that has never been initialised (or
/// was reset); the next compression call initialises it at its input.
#[derive(Clone, Copy, Debug)]
pub struct WindowState {
    /// One past the last byte fed to the context.
    pub(crate) end: *const u8,
    /// Physical address of logical position `dict_limit`.
    pub(crate) prefix_start: *const u8,
    /// Physical address of logical position `low_limit`.
    pub(crate) dict_start: *const u8,
    /// First logical position of the prefix segment.
    pub(crate) dict_limit: u32,
    /// First logical position still valid as history.
    pub(crate) low_limit: u32,
    /// Positions below this are already in the hash and chain tables.
    pub(crate) next_to_update: u32,
    /// Repeat-offset predictor shared by parser and encoder.
    pub(crate) last_offset: u32,
}

impl WindowState {
    pub const fn unset() -> Self {
        Self {
            end: ptr::null(),
            prefix_start: ptr::null(),
            dict_start: ptr::null(),
            dict_limit: 0,
            low_limit: 0,
            next_to_update: 0,
            last_offset: INITIAL_OFFSET,
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        !self.prefix_start.is_null()
    }

    /// Start an empty window whose prefix begins at `start`.
    ///
    /// Logical positions start at [`MAX_WINDOW`] so that `0` can mean "no
    /// entry" in the hash table.
    pub fn init(&mut self, start: *const u8) {
        self.prefix_start = start;
        self.dict_start = start;
        self.end = start;
        self.dict_limit = MAX_WINDOW;
        self.low_limit = MAX_WINDOW;
        self.next_to_update = MAX_WINDOW;
        self.last_offset = INITIAL_OFFSET;
    }

    /// Bytes currently in the prefix segment.
    #[inline]
    pub fn prefix_len(&self) -> usize {
        (self.end as usize).wrapping_sub(self.prefix_start as usize)
    }

    /// Bytes of valid dictionary history.
    #[inline]
    pub fn dict_len(&self) -> usize {
        (self.dict_limit - self.low_limit) as usize
    }

    /// Logical position one past the last byte fed.
    #[inline]
    pub fn end_index(&self) -> u32 {
        self.dict_limit.wrapping_add(self.prefix_len() as u32)
    }

    /// Whether `src` starts exactly where the previous input ended.
    #[inline]
    pub fn follows(&self, src: *const u8) -> bool {
        ptr::eq(src, self.end)
    }

    /// Whether logical positions have grown past the rebase threshold.
    #[inline]
    pub fn needs_rebase(&self) -> bool {
        self.is_initialized() && self.end_index() > REBASE_THRESHOLD
    }

    /// Retire the prefix as the dictionary and open a new prefix at
    /// `new_start`.  Any older dictionary is dropped.
    pub fn demote_prefix(&mut self, new_start: *const u8) {
        let end_index = self.end_index();
        self.low_limit = self.dict_limit;
        self.dict_start = self.prefix_start;
        self.dict_limit = end_index;
        self.prefix_start = new_start;
        self.end = new_start;
        self.next_to_update = end_index;
    }

    /// Shrink the dictionary so it no longer covers memory that `src`
    /// occupies.
    ///
    /// `low_limit` moves forward to the end of the overlapping region; when
    /// fewer than four bytes would remain the dictionary is dropped entirely.
    pub fn clip_overlap(&mut self, src: &[u8]) {
        if self.dict_len() == 0 {
            return;
        }
        let src_begin = src.as_ptr() as usize;
        let src_end = src_begin + src.len();
        let dict_begin = self.dict_start as usize;
        let dict_end = dict_begin + self.dict_len();
        if src_end <= dict_begin || src_begin >= dict_end {
            return;
        }

        let advance = src_end.min(dict_end) - dict_begin;
        self.low_limit += advance as u32;
        self.dict_start = self.dict_start.wrapping_add(advance);
        if self.dict_limit - self.low_limit < 4 {
            let rest = self.dict_len();
            self.low_limit = self.dict_limit;
            self.dict_start = self.dict_start.wrapping_add(rest);
        }
        log::debug!(
            "input overlaps dictionary; {} dictionary bytes remain",
            self.dict_len()
        );
    }

    /// Move `end` forward over `n` freshly compressed bytes.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.end = self.end.wrapping_add(n);
    }

    /// Build a read view of both segments, with the prefix extended by the
    /// `input_len` bytes that follow `end`.
    ///
    /// # Safety
    /// The dictionary range `[dict_start, dict_start + dict_len)` and the
    /// prefix range `[prefix_start, end + input_len)` must be readable and
    /// must not be written for the lifetime `'a`.
    pub unsafe fn view<'a>(&self, input_len: usize) -> Window<'a> {
        let dict: &'a [u8] = if self.dict_len() == 0 {
            &[]
        } else {
            slice::from_raw_parts(self.dict_start, self.dict_len())
        };
        let prefix_len = self.prefix_len() + input_len;
        let prefix: &'a [u8] = if prefix_len == 0 {
            &[]
        } else {
            slice::from_raw_parts(self.prefix_start, prefix_len)
        };
        Window::new(dict, prefix, self.low_limit, self.dict_limit)
    }

    /// View of the prefix alone, for indexing that never reaches back into
    /// the dictionary.
    ///
    /// # Safety
    /// `[prefix_start, end)` must be readable and must not be written for
    /// the lifetime `'a`.
    pub unsafe fn prefix_view<'a>(&self) -> Window<'a> {
        let prefix: &'a [u8] = if self.prefix_len() == 0 {
            &[]
        } else {
            slice::from_raw_parts(self.prefix_start, self.prefix_len())
        };
        Window::new(&[], prefix, self.dict_limit, self.dict_limit)
    }
}

impl Default for WindowState {
    fn default() -> Self {
        Self::unset()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window view
// ─────────────────────────────────────────────────────────────────────────────

/// Bounds-checked view of the dictionary and prefix segments.
///
/// Logical position `p` resolves to `dict[p - low_limit]` when
/// `p < dict_limit`, otherwise to `prefix[p - dict_limit]`.  The two
/// segments read as one contiguous stream.
#[derive(Clone, Copy, Debug)]
pub struct Window<'a> {
    dict: &'a [u8],
    prefix: &'a [u8],
    low_limit: u32,
    dict_limit: u32,
}

impl<'a> Window<'a> {
    pub fn new(dict: &'a [u8], prefix: &'a [u8], low_limit: u32, dict_limit: u32) -> Self {
        debug_assert_eq!(dict.len(), (dict_limit - low_limit) as usize);
        Self {
            dict,
            prefix,
            low_limit,
            dict_limit,
        }
    }

    #[inline]
    pub fn low_limit(&self) -> u32 {
        self.low_limit
    }

    #[inline]
    pub fn dict_limit(&self) -> u32 {
        self.dict_limit
    }

    #[inline]
    pub fn end_index(&self) -> u32 {
        self.dict_limit + self.prefix.len() as u32
    }

    /// Byte at logical position `idx`, which must lie in `[low_limit, end)`.
    #[inline]
    pub fn byte(&self, idx: u32) -> u8 {
        if idx >= self.dict_limit {
            self.prefix[(idx - self.dict_limit) as usize]
        } else {
            self.dict[(idx - self.low_limit) as usize]
        }
    }

    #[inline]
    fn byte_or_zero(&self, idx: u32) -> u8 {
        if idx < self.low_limit || idx >= self.end_index() {
            0
        } else {
            self.byte(idx)
        }
    }

    fn read<const N: usize>(&self, idx: u32) -> [u8; N] {
        let (segment, offset) = if idx >= self.dict_limit {
            (self.prefix, (idx - self.dict_limit) as usize)
        } else {
            (self.dict, idx.wrapping_sub(self.low_limit) as usize)
        };
        if let Some(bytes) = segment.get(offset..offset + N) {
            let mut out = [0u8; N];
            out.copy_from_slice(bytes);
            return out;
        }
        // Straddles the segment boundary or the window end.
        let mut out = [0u8; N];
        for (i, b) in out.iter_mut().enumerate() {
            *b = self.byte_or_zero(idx.wrapping_add(i as u32));
        }
        out
    }

    /// Little-endian 32-bit word at `idx`; bytes past the end read as zero.
    #[inline]
    pub fn read32(&self, idx: u32) -> u32 {
        u32::from_le_bytes(self.read::<4>(idx))
    }

    /// Little-endian 64-bit word at `idx`; bytes past the end read as zero.
    #[inline]
    pub fn read64(&self, idx: u32) -> u64 {
        u64::from_le_bytes(self.read::<8>(idx))
    }

    /// Prefix bytes in `[from, to)`.  Both bounds must be prefix positions.
    #[inline]
    pub fn input(&self, from: u32, to: u32) -> &'a [u8] {
        &self.prefix[(from - self.dict_limit) as usize..(to - self.dict_limit) as usize]
    }

    /// Length of the match between `ip` and the earlier position `m`,
    /// counting no further than `limit`.
    ///
    /// `ip` must be a prefix position.  When `m` lies in the dictionary and
    /// the match runs into the dictionary end, counting continues from the
    /// start of the prefix.
    pub fn count(&self, ip: u32, m: u32, limit: u32) -> usize {
        debug_assert!(ip >= self.dict_limit && m < ip && limit >= ip);
        let ip_off = (ip - self.dict_limit) as usize;
        let limit_off = (limit - self.dict_limit) as usize;
        let input = &self.prefix[ip_off..limit_off];

        if m >= self.dict_limit {
            let m_off = (m - self.dict_limit) as usize;
            return common_prefix(input, &self.prefix[m_off..]);
        }

        let dict_tail = &self.dict[(m - self.low_limit) as usize..];
        let n = common_prefix(input, dict_tail);
        if n < dict_tail.len() {
            return n;
        }
        n + common_prefix(&input[n..], self.prefix)
    }

    /// Number of equal bytes directly before `ip` and `m`, stopping at
    /// `ip_min` and `m_min`.
    pub fn count_back(&self, ip: u32, m: u32, ip_min: u32, m_min: u32) -> usize {
        let mut back = 0u32;
        while ip - back > ip_min
            && m - back > m_min
            && self.byte(ip - back - 1) == self.byte(m - back - 1)
        {
            back += 1;
        }
        back as usize
    }
}

/// Number of leading bytes `a` and `b` have in common.
pub fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    let n = a.len().min(b.len());
    let mut i = 0;
    while i + 8 <= n {
        let mut x = [0u8; 8];
        let mut y = [0u8; 8];
        x.copy_from_slice(&a[i..i + 8]);
        y.copy_from_slice(&b[i..i + 8]);
        let diff = u64::from_le_bytes(x) ^ u64::from_le_bytes(y);
        if diff != 0 {
            return i + (diff.trailing_zeros() / 8) as usize;
        }
        i += 8;
    }
    while i < n && a[i] == b[i] {
        i += 1;
    }
    i
}
