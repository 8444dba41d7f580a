// lz5 — streaming LZ77 compression engine with LZ4-compatible and native
// block formats, a reference decoder, a framed file container and a CLI.

pub mod compress;
pub mod parser;
pub mod decompress;
pub mod config;
pub mod io;
pub mod cli;

// ── Version constants ─────────────────────────────────────────────────────────
pub const LZ5_VERSION_MAJOR: u32 = 1;
pub const LZ5_VERSION_MINOR: u32 = 5;
pub const LZ5_VERSION_RELEASE: u32 = 0;
pub const LZ5_VERSION_NUMBER: u32 =
    LZ5_VERSION_MAJOR * 100 * 100 + LZ5_VERSION_MINOR * 100 + LZ5_VERSION_RELEASE;
pub const LZ5_VERSION_STRING: &str = "1.5.0";

pub fn version_number() -> u32 {
    LZ5_VERSION_NUMBER
}

pub fn version_string() -> &'static str {
    LZ5_VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use compress::{
    compress, compress_bound, compress_continue, compress_ext_state, compress_ext_state_level1,
    compress_level1, create_stream, create_stream_level1, free_stream, load_dictionary,
    reset_stream, reset_stream_level1, save_dictionary, size_of_state, size_of_state_level1,
    Lz5Error, Lz5Stream,
    LZ5_DEFAULT_CLEVEL, LZ5_MAX_CLEVEL, LZ5_MIN_CLEVEL, MAX_WINDOW, TRANSFORM_LEVEL,
};
pub use decompress::{decompress, decompress_into, decompress_using_dict, DecompressError};
