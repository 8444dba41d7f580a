// config.rs — Compile-time configuration constants and environment overrides.
//
// Engine constants (window size, level range) live in `compress::types`; this
// file only holds the defaults the command-line tool and the frame container
// start from.

use crate::compress::types::{clamp_level, LZ5_DEFAULT_CLEVEL};

// Default compression level.
// Can be overridden by the LZ5_CLEVEL environment variable at runtime,
// or by the -# command-line flag.
pub const CLEVEL_DEFAULT: i32 = LZ5_DEFAULT_CLEVEL;

// Name of the environment variable holding the default level.
pub const ENV_CLEVEL: &str = "LZ5_CLEVEL";

// Default block size log (22 = 4 MiB blocks, one full window).
// Can be overridden at runtime using the -B# command-line flag.
pub const BLOCK_SIZE_LOG_DEFAULT: u32 = 22;
pub const BLOCK_SIZE_DEFAULT: usize = 1 << BLOCK_SIZE_LOG_DEFAULT;

// Accepted range for -B#.
pub const BLOCK_SIZE_LOG_MIN: u32 = 16;
pub const BLOCK_SIZE_LOG_MAX: u32 = 24;

/// Read the default compression level from `LZ5_CLEVEL`.
pub fn clevel_from_env() -> i32 {
    clevel_from(std::env::var(ENV_CLEVEL).ok().as_deref())
}

/// Testable core of [`clevel_from_env`]: parse an optional `LZ5_CLEVEL` value.
///
/// A value that does not parse as an unsigned integer is ignored with a
/// warning and [`CLEVEL_DEFAULT`] is used instead.  Parsed values are clamped
/// into the supported level range.
pub fn clevel_from(env_val: Option<&str>) -> i32 {
    let Some(raw) = env_val else {
        return CLEVEL_DEFAULT;
    };
    match raw.trim().parse::<u32>() {
        Ok(level) => clamp_level(level.min(i32::MAX as u32) as i32),
        Err(_) => {
            log::warn!(
                "ignoring environment variable {}={}: not a valid unsigned value",
                ENV_CLEVEL,
                raw
            );
            CLEVEL_DEFAULT
        }
    }
}
