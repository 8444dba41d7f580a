//! Hash/chain tables and the match-finding primitives every parser uses.
//!
//! The tables live in one `u32` arena, laid out as
//! `[hash: 2^hash_log][hash3: 2^hash_log3][chain: 2^chain_log]`.
//!
//! - `hash` maps a hash of the next `search_length` bytes to the most recent
//!   logical position with that hash (`0` = empty).
//! - `hash3` does the same for three bytes when `hash_log3 > 0`.
//! - `chain[pos & chain_mask]` holds the distance from `pos` back to the
//!   previous position in the same bucket (`u32::MAX` = none).
//!
//! [`MatchFinder::insert`] is the single insertion primitive: it indexes every
//! position in `[next_to_update, target)` and is called before any lookup.

use super::hash::{hash3, hash_sequence};
use super::types::{Parameters, MINMATCH};
use super::window::Window;

// ─────────────────────────────────────────────────────────────────────────────
// Tables
// ─────────────────────────────────────────────────────────────────────────────

/// Chain entry meaning "no predecessor".
pub const CHAIN_END: u32 = u32::MAX;

/// Mutable views over the three table regions of an arena.
pub struct Tables<'t> {
    pub hash: &'t mut [u32],
    pub hash3: &'t mut [u32],
    pub chain: &'t mut [u32],
}

impl<'t> Tables<'t> {
    /// Partition `slots` according to `params`.  `slots` must hold at least
    /// `params.table_entries()` entries.
    pub fn split(slots: &'t mut [u32], params: &Parameters) -> Self {
        let (hash, rest) = slots.split_at_mut(1usize << params.hash_log);
        let (hash3, rest) = rest.split_at_mut(1usize << params.hash_log3);
        let chain = &mut rest[..params.chain_entries()];
        Self { hash, hash3, chain }
    }

    /// Empty every bucket and terminate every chain.
    pub fn clear(&mut self) {
        self.hash.fill(0);
        self.hash3.fill(0);
        self.chain.fill(CHAIN_END);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Match
// ─────────────────────────────────────────────────────────────────────────────

/// A candidate back-reference found at some position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Match {
    pub len: usize,
    pub offset: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// MatchFinder
// ─────────────────────────────────────────────────────────────────────────────

/// Tables plus window view for the duration of one call.
pub struct MatchFinder<'w, 't> {
    win: Window<'w>,
    tables: Tables<'t>,
    params: Parameters,
    next_to_update: u32,
    chain_mask: u32,
    max_distance: u32,
}

impl<'w, 't> MatchFinder<'w, 't> {
    pub fn new(win: Window<'w>, tables: Tables<'t>, params: Parameters, next_to_update: u32) -> Self {
        Self {
            win,
            tables,
            params,
            next_to_update,
            chain_mask: (params.chain_entries() - 1) as u32,
            max_distance: params.max_distance(),
        }
    }

    #[inline]
    pub fn window(&self) -> Window<'w> {
        self.win
    }

    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    #[inline]
    pub fn next_to_update(&self) -> u32 {
        self.next_to_update
    }

    #[inline]
    fn hash_at(&self, idx: u32) -> usize {
        hash_sequence(self.win.read64(idx), self.params.hash_log, self.params.search_length)
    }

    #[inline]
    fn hash3_at(&self, idx: u32) -> usize {
        hash3(self.win.read32(idx), self.params.hash_log3)
    }

    /// Index every position in `[next_to_update, target)`.
    pub fn insert(&mut self, target: u32) {
        let chain_on = self.params.parser.uses_chain();
        let hash3_on = self.params.hash_log3 > 0;
        let mut idx = self.next_to_update;
        while idx < target {
            let h = self.hash_at(idx);
            if chain_on {
                let prev = self.tables.hash[h];
                let delta = if prev == 0 || prev >= idx {
                    CHAIN_END
                } else {
                    idx - prev
                };
                self.tables.chain[(idx & self.chain_mask) as usize] = delta;
            }
            self.tables.hash[h] = idx;
            if hash3_on {
                let h3 = self.hash3_at(idx);
                self.tables.hash3[h3] = idx;
            }
            idx += 1;
        }
        if target > self.next_to_update {
            self.next_to_update = target;
        }
    }

    /// Oldest position a match from `ip` may reference.
    #[inline]
    pub fn lowest_index(&self, ip: u32) -> u32 {
        self.win.low_limit().max(ip.saturating_sub(self.max_distance))
    }

    /// Whether the wire format can carry a match of `len` at `offset`.
    #[inline]
    pub fn acceptable(&self, len: usize, offset: u32) -> bool {
        offset >= 1 && offset <= self.max_distance && len >= self.params.min_match_for(offset)
    }

    /// Match at `ip` reusing `last_offset`, if it is long enough.
    pub fn repeat_match(&self, ip: u32, limit: u32, last_offset: u32) -> Option<Match> {
        if last_offset == 0 || ip - self.lowest_index(ip) < last_offset {
            return None;
        }
        let len = self.win.count(ip, ip - last_offset, limit);
        if len >= MINMATCH && self.acceptable(len, last_offset) {
            Some(Match {
                len,
                offset: last_offset,
            })
        } else {
            None
        }
    }

    /// Insert up to `ip`, then report candidates from the 3-byte table and
    /// the hash chain in order of strictly increasing length, starting above
    /// `min_len`.  `visit` returns `true` to stop the search.
    pub fn longer_matches(
        &mut self,
        ip: u32,
        limit: u32,
        min_len: usize,
        mut visit: impl FnMut(Match) -> bool,
    ) {
        self.insert(ip);
        let lowest = self.lowest_index(ip);
        let max_len = (limit - ip) as usize;
        let mut best = min_len;
        if best >= max_len {
            return;
        }

        if self.params.hash_log3 > 0 {
            let cand = self.tables.hash3[self.hash3_at(ip)];
            if cand >= lowest && cand < ip {
                let len = self.win.count(ip, cand, limit);
                let offset = ip - cand;
                if len > best && self.acceptable(len, offset) {
                    best = len;
                    if visit(Match { len, offset }) || len == max_len {
                        return;
                    }
                }
            }
        }

        let chain_on = self.params.parser.uses_chain();
        let mut cand = self.tables.hash[self.hash_at(ip)];
        let mut attempts = self.params.search_num;
        while cand >= lowest && cand < ip && attempts > 0 {
            attempts -= 1;
            // quick reject: the byte that would extend the best match
            if self.win.byte(cand + best as u32) == self.win.byte(ip + best as u32) {
                let len = self.win.count(ip, cand, limit);
                let offset = ip - cand;
                if len > best && self.acceptable(len, offset) {
                    best = len;
                    if visit(Match { len, offset }) || len == max_len {
                        return;
                    }
                }
            }
            if !chain_on {
                break;
            }
            let delta = self.tables.chain[(cand & self.chain_mask) as usize];
            if delta == 0 || delta > cand - lowest {
                break;
            }
            cand -= delta;
        }
    }

    /// Longest acceptable match at `ip`.
    pub fn find_best_match(&mut self, ip: u32, limit: u32) -> Option<Match> {
        let sufficient = self.params.sufficient_length as usize;
        let mut best = None;
        self.longer_matches(ip, limit, MINMATCH - 1, |m| {
            best = Some(m);
            m.len >= sufficient
        });
        best
    }

    /// Longest match at `ip` counting bytes recovered by extending it
    /// backwards, no further than `ip_min`.
    ///
    /// Returns the extended start position and the extended match.
    pub fn find_wider_match(
        &mut self,
        ip: u32,
        ip_min: u32,
        limit: u32,
        min_len: usize,
    ) -> Option<(u32, Match)> {
        let sufficient = self.params.sufficient_length as usize;
        let lowest = self.lowest_index(ip);
        let win = self.win;
        let mut best: Option<(u32, Match)> = None;
        let mut best_total = min_len;
        self.longer_matches(ip, limit, MINMATCH - 1, |m| {
            let back = win.count_back(ip, ip - m.offset, ip_min, lowest);
            let total = m.len + back;
            if total > best_total {
                best_total = total;
                best = Some((
                    ip - back as u32,
                    Match {
                        len: total,
                        offset: m.offset,
                    },
                ));
            }
            total >= sufficient
        });
        best
    }

    /// Every useful candidate at `ip`, shortest first: the repeat-offset
    /// match (if any) followed by strictly longer table matches.
    pub fn collect_matches(&mut self, ip: u32, limit: u32, last_offset: u32, out: &mut Vec<Match>) {
        out.clear();
        let sufficient = self.params.sufficient_length as usize;
        let mut floor = MINMATCH - 1;
        if let Some(rep) = self.repeat_match(ip, limit, last_offset) {
            floor = rep.len;
            out.push(rep);
        }
        self.longer_matches(ip, limit, floor, |m| {
            out.push(m);
            m.len >= sufficient
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::types::{level_params, MAX_WINDOW};

    fn finder<'w, 't>(data: &'w [u8], slots: &'t mut Vec<u32>, level: i32) -> MatchFinder<'w, 't> {
        let params = level_params(level);
        slots.resize(params.table_entries(), 0);
        let mut tables = Tables::split(slots, &params);
        tables.clear();
        let win = Window::new(&[], data, MAX_WINDOW, MAX_WINDOW);
        MatchFinder::new(win, tables, params, MAX_WINDOW)
    }

    #[test]
    fn split_partitions_in_declared_order() {
        let params = level_params(5);
        let mut slots = vec![7u32; params.table_entries()];
        let mut t = Tables::split(&mut slots, &params);
        assert_eq!(t.hash.len(), 1 << params.hash_log);
        assert_eq!(t.hash3.len(), 1 << params.hash_log3);
        assert_eq!(t.chain.len(), params.chain_entries());
        t.clear();
        assert!(slots[..params.hash_entries()].iter().all(|&v| v == 0));
        assert!(slots[params.hash_entries()..].iter().all(|&v| v == CHAIN_END));
    }

    #[test]
    fn insert_advances_next_to_update() {
        let data = vec![b'x'; 64];
        let mut slots = Vec::new();
        let mut mf = finder(&data, &mut slots, 6);
        mf.insert(MAX_WINDOW + 20);
        assert_eq!(mf.next_to_update(), MAX_WINDOW + 20);
        // never moves backwards
        mf.insert(MAX_WINDOW + 10);
        assert_eq!(mf.next_to_update(), MAX_WINDOW + 20);
    }

    #[test]
    fn finds_repeated_phrase() {
        let mut data = b"the quick brown fox ".to_vec();
        data.extend_from_slice(b"jumps; the quick brown fox again......");
        let mut slots = Vec::new();
        let mut mf = finder(&data, &mut slots, 6);
        let ip = MAX_WINDOW + 27; // second "the quick brown fox "
        let limit = MAX_WINDOW + data.len() as u32;
        let m = mf.find_best_match(ip, limit).expect("match");
        assert_eq!(m.offset, 27);
        assert_eq!(m.len, 20);
    }

    #[test]
    fn matches_beyond_window_are_rejected() {
        let mut seed = 0x2545_F491u32;
        let mut data: Vec<u8> = (0..70_000)
            .map(|_| {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (seed >> 16) as u8
            })
            .collect();
        data.copy_within(0..32, 69_000);
        let mut slots = Vec::new();
        let mut mf = finder(&data, &mut slots, 7);
        let limit = MAX_WINDOW + data.len() as u32;
        if let Some(m) = mf.find_best_match(MAX_WINDOW + 69_000, limit) {
            assert!(m.offset <= 65_535);
        }
    }

    #[test]
    fn repeat_match_uses_last_offset() {
        let data = b"abcdefgh__abcdefgh__abcdefgh".to_vec();
        let mut slots = Vec::new();
        let mf = finder(&data, &mut slots, 5);
        let limit = MAX_WINDOW + data.len() as u32;
        let m = mf.repeat_match(MAX_WINDOW + 10, limit, 10).expect("repeat");
        assert_eq!(m.offset, 10);
        assert_eq!(m.len, 18);
        assert!(mf.repeat_match(MAX_WINDOW + 10, limit, 0).is_none());
        assert!(mf.repeat_match(MAX_WINDOW + 10, limit, 11).is_none());
    }

    #[test]
    fn collect_matches_is_sorted_by_length() {
        let data = b"abcdXabcdeYabcdefZabcdefg_________".to_vec();
        let mut slots = Vec::new();
        let mut mf = finder(&data, &mut slots, 7);
        let limit = MAX_WINDOW + data.len() as u32 - 5;
        let mut out = Vec::new();
        mf.collect_matches(MAX_WINDOW + 18, limit, 0, &mut out);
        assert!(!out.is_empty());
        assert!(out.windows(2).all(|w| w[0].len < w[1].len));
        assert_eq!(out.last().map(|m| m.len), Some(6));
    }

    #[test]
    fn wider_match_extends_backwards() {
        let data = b"0123456789ABCDEF--0123456789ABCDEF--".to_vec();
        let mut slots = Vec::new();
        let mut mf = finder(&data, &mut slots, 6);
        let limit = MAX_WINDOW + data.len() as u32 - 5;
        let ip = MAX_WINDOW + 22; // inside the second copy
        let (start, m) = mf
            .find_wider_match(ip, MAX_WINDOW + 18, limit, 0)
            .expect("match");
        assert_eq!(start, MAX_WINDOW + 18);
        assert_eq!(m.offset, 18);
        assert_eq!(m.len, 13);
    }
}
