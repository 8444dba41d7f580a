//! Command-line interface for the `lz5` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings and the shared `DISPLAY_LEVEL` atomic with its display macros. |
//! | [`args`]      | clap-derived options resolved into a [`args::ParsedArgs`] value. |
//!
//! Typical call sequence: `parse_args` → set display level → dispatch to [`crate::io`].

pub mod constants;
pub mod args;
