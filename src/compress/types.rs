//! Engine constants, the per-level parameter table, and level clamping.
//!
//! Every compression level maps to exactly one [`Parameters`] row.  A row
//! fixes the table geometry (hash, secondary 3-byte hash, chain), the search
//! budget, the parser strategy and the wire format the sequence encoder
//! produces.  Levels are always clamped with [`clamp_level`] before lookup.

// ─────────────────────────────────────────────────────────────────────────────
// Window and block constants
// ─────────────────────────────────────────────────────────────────────────────

/// Largest history the engine ever keeps addressable (4 MiB).
///
/// Dictionaries larger than this are truncated to their most recent
/// `MAX_WINDOW` bytes, and the overflow rebase keeps at most this much.
pub const MAX_WINDOW: u32 = 1 << 22;

/// Initial value of the repeat-offset predictor, restored at every call.
pub const INITIAL_OFFSET: u32 = 0;

/// Logical end position beyond which the window is re-origined (2 GiB).
pub const REBASE_THRESHOLD: u32 = 1 << 31;

/// Positions within `HASH_UPDATE_LIMIT - 1` bytes of a segment end are never
/// indexed; hashing reads up to eight bytes of lookahead.
pub const HASH_UPDATE_LIMIT: u32 = 8;

pub const MINMATCH: usize = 4;
/// The last five bytes of a block are always literals.
pub const LASTLITERALS: usize = 5;
/// The last match must start at least twelve bytes before the block end.
pub const MFLIMIT: usize = 12;
/// Blocks shorter than this are emitted as a single literal run.
pub const MIN_LENGTH: usize = MFLIMIT + 1;

/// Largest offset a 16-bit offset field can carry.
pub const SHORT_OFFSET_MAX: u32 = 0xFFFF;

/// Largest accepted single-call input (same ceiling as the LZ4 block API).
pub const LZ5_MAX_INPUT_SIZE: usize = 0x7E00_0000;

// ─────────────────────────────────────────────────────────────────────────────
// Compression levels
// ─────────────────────────────────────────────────────────────────────────────

pub const LZ5_MIN_CLEVEL: i32 = 1;
/// Substituted for zero and negative levels.
pub const LZ5_DEFAULT_CLEVEL: i32 = 6;
#[cfg(feature = "native-format")]
pub const LZ5_MAX_CLEVEL: i32 = 17;
#[cfg(not(feature = "native-format"))]
pub const LZ5_MAX_CLEVEL: i32 = 7;
/// Fixed level behind the `*_level1` entry points.
pub const TRANSFORM_LEVEL: i32 = 1;

// ─────────────────────────────────────────────────────────────────────────────
// Strategy and format tags
// ─────────────────────────────────────────────────────────────────────────────

/// Match-finding strategy selected by a level.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParserKind {
    /// Single probe per position, accelerating skip on misses.
    Fast,
    /// Hash head plus repeat-offset probe, one-step lazy evaluation.
    NoChain,
    /// Chain walk with lazy evaluation at the next position.
    HashChain,
    #[cfg(feature = "native-format")]
    PriceFast,
    #[cfg(feature = "native-format")]
    LowestPrice,
    #[cfg(feature = "native-format")]
    OptimalPrice,
    /// Optimal parsing with a full match refresh at every position.
    #[cfg(feature = "native-format")]
    OptimalPriceBt,
}

impl ParserKind {
    /// Whether the strategy threads positions through the chain table.
    pub fn uses_chain(self) -> bool {
        !matches!(self, ParserKind::Fast | ParserKind::NoChain)
    }
}

/// Wire format produced by the sequence encoder.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputFormat {
    /// LZ4 block layout: 4-bit literal/match nibbles, 16-bit offsets.
    Lz4,
    /// Native layout: repeat-offset codes and 24-bit long offsets.
    #[cfg(feature = "native-format")]
    Native,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parameters
// ─────────────────────────────────────────────────────────────────────────────

/// One row of the level table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Parameters {
    /// log2 of the largest match distance the format may emit.
    pub window_log: u32,
    /// log2 of the chain table entry count.
    pub chain_log: u32,
    /// log2 of the main hash table entry count.
    pub hash_log: u32,
    /// log2 of the 3-byte hash table entry count; `0` disables it.
    pub hash_log3: u32,
    /// Candidates examined per position.
    pub search_num: u32,
    /// Bytes hashed by the main table (4..=7).
    pub search_length: u32,
    /// Shortest match allowed with a long (over 16-bit) offset.
    pub min_match_long_off: u32,
    /// Matches at least this long are accepted without further search.
    pub sufficient_length: u32,
    pub parser: ParserKind,
    pub format: OutputFormat,
}

impl Parameters {
    /// Entries needed by the main and the 3-byte hash tables together.
    pub fn hash_entries(&self) -> usize {
        (1usize << self.hash_log) + (1usize << self.hash_log3)
    }

    pub fn chain_entries(&self) -> usize {
        1usize << self.chain_log
    }

    /// Total `u32` slots backing all tables at this level.
    pub fn table_entries(&self) -> usize {
        self.hash_entries() + self.chain_entries()
    }

    /// Largest match distance the row's wire format can express.
    pub fn max_distance(&self) -> u32 {
        let window = (1u32 << self.window_log) - 1;
        match self.format {
            OutputFormat::Lz4 => window.min(SHORT_OFFSET_MAX),
            #[cfg(feature = "native-format")]
            OutputFormat::Native => window,
        }
    }

    /// Shortest match allowed for `offset`.
    pub fn min_match_for(&self, offset: u32) -> usize {
        if offset > SHORT_OFFSET_MAX {
            self.min_match_long_off as usize
        } else {
            MINMATCH
        }
    }
}

macro_rules! row {
    ($wl:expr, $cl:expr, $hl:expr, $h3:expr, $sn:expr, $sl:expr, $suf:expr, $parser:ident, $fmt:ident) => {
        Parameters {
            window_log: $wl,
            chain_log: $cl,
            hash_log: $hl,
            hash_log3: $h3,
            search_num: $sn,
            search_length: $sl,
            min_match_long_off: 5,
            sufficient_length: $suf,
            parser: ParserKind::$parser,
            format: OutputFormat::$fmt,
        }
    };
}

//                    window chain hash hash3 search  len  suff   parser      format
static LZ4_LEVELS: [Parameters; 7] = [
    row!(16,  0, 14,  0,   1, 6,  16, Fast,      Lz4), /* 1 */
    row!(16,  0, 16,  0,   1, 5,  16, Fast,      Lz4), /* 2 */
    row!(16,  0, 16,  0,   1, 5,  16, NoChain,   Lz4), /* 3 */
    row!(16,  0, 18,  0,   1, 4,  16, NoChain,   Lz4), /* 4 */
    row!(16, 16, 16,  0,   4, 5,  16, HashChain, Lz4), /* 5 */
    row!(16, 16, 17,  0,  16, 4,  32, HashChain, Lz4), /* 6 */
    row!(16, 16, 18,  0,  64, 4,  64, HashChain, Lz4), /* 7 */
];

#[cfg(feature = "native-format")]
static NATIVE_LEVELS: [Parameters; 10] = [
    row!(22,  0, 18,  0,   1, 6,   16, Fast,           Native), /* 8 */
    row!(22,  0, 20,  0,   1, 5,   16, NoChain,        Native), /* 9 */
    row!(22, 20, 20,  0,   8, 5,   32, HashChain,      Native), /* 10 */
    row!(22, 20, 20,  0,   8, 5,   32, PriceFast,      Native), /* 11 */
    row!(22, 21, 21,  0,  32, 4,   64, PriceFast,      Native), /* 12 */
    row!(22, 20, 20,  0,  16, 5,   64, LowestPrice,    Native), /* 13 */
    row!(22, 22, 22,  0,  64, 4,  128, LowestPrice,    Native), /* 14 */
    row!(22, 20, 20, 16,  16, 5,   64, OptimalPrice,   Native), /* 15 */
    row!(22, 22, 22, 16,  64, 4,  256, OptimalPrice,   Native), /* 16 */
    row!(22, 22, 22, 16, 256, 4, 1024, OptimalPriceBt, Native), /* 17 */
];

/// Clamp `level` into `[LZ5_MIN_CLEVEL, LZ5_MAX_CLEVEL]`.
///
/// Zero and negative levels become [`LZ5_DEFAULT_CLEVEL`].
#[inline]
pub fn clamp_level(level: i32) -> i32 {
    if level < LZ5_MIN_CLEVEL {
        return LZ5_DEFAULT_CLEVEL;
    }
    level.min(LZ5_MAX_CLEVEL)
}

#[cfg(feature = "native-format")]
fn native_rows() -> &'static [Parameters] {
    &NATIVE_LEVELS
}

#[cfg(not(feature = "native-format"))]
fn native_rows() -> &'static [Parameters] {
    &[]
}

/// Parameter row for `level` (clamped first).
pub fn level_params(level: i32) -> Parameters {
    let index = clamp_level(level) as usize - 1;
    match LZ4_LEVELS.get(index) {
        Some(row) => *row,
        None => native_rows()[index - LZ4_LEVELS.len()],
    }
}

/// Parameter row for an exact level byte read back from a compressed block,
/// or `None` when the byte names no level of this build.
pub fn params_for_level_byte(byte: u8) -> Option<Parameters> {
    let level = byte as i32;
    if (LZ5_MIN_CLEVEL..=LZ5_MAX_CLEVEL).contains(&level) {
        Some(level_params(level))
    } else {
        None
    }
}
