//! Command-line argument parsing for the `lz5` binary.
//!
//! Options are declared with clap's derive API.  The classic numeric level
//! flags (`-1` .. `-17`) are rewritten to `--level=N` before clap sees them,
//! so `lz5 -9 file` and `lz5 --level 9 file` are equivalent.
//!
//! [`parse_args_from`] takes an explicit argument list, suitable for
//! unit-testing; [`parse_args`] reads `std::env::args()`.

use anyhow::{anyhow, Context};
use clap::{ArgAction, Parser};

use crate::cli::constants::LZ5_EXTENSION;
use crate::compress::types::clamp_level;
use crate::config::{clevel_from_env, BLOCK_SIZE_LOG_DEFAULT, BLOCK_SIZE_LOG_MAX, BLOCK_SIZE_LOG_MIN};
use crate::io::{load_dict_file, FrameOptions, STDIN_MARK, STDOUT_MARK};

/// Streaming LZ5 compressor.
#[derive(Parser, Debug)]
#[command(name = "lz5", version, about = "LZ5 streaming compressor")]
pub struct Cli {
    /// Compression level (also accepted as -1 .. -17).
    #[arg(short = 'l', long)]
    pub level: Option<i32>,

    /// Decompress.
    #[arg(short = 'd', long, conflicts_with = "test")]
    pub decompress: bool,

    /// Force compression, even for files ending in .lz5.
    #[arg(short = 'z', long, conflicts_with_all = ["decompress", "test"])]
    pub compress: bool,

    /// Decompress and verify without writing anything.
    #[arg(short = 't', long)]
    pub test: bool,

    /// Write to standard output.
    #[arg(short = 'c', long = "stdout")]
    pub stdout: bool,

    /// Overwrite existing output files.
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Raise verbosity (repeatable).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Lower verbosity (repeatable).
    #[arg(short = 'q', long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Block size as a power of two (16..=24).
    #[arg(
        short = 'B',
        long = "block-size-log",
        value_parser = clap::value_parser!(u32).range(BLOCK_SIZE_LOG_MIN as i64..=BLOCK_SIZE_LOG_MAX as i64)
    )]
    pub block_size_log: Option<u32>,

    /// Preset dictionary file.
    #[arg(short = 'D', long = "dict")]
    pub dictionary: Option<String>,

    /// Input file (default: standard input).
    pub input: Option<String>,

    /// Output file (default: derived from the input name).
    pub output: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    Compress,
    Decompress,
    Test,
}

/// Arguments after defaults, environment and file names are resolved.
#[derive(Debug)]
pub struct ParsedArgs {
    pub op_mode: OpMode,
    pub prefs: FrameOptions,
    pub input: String,
    /// `None` in test mode.
    pub output: Option<String>,
    pub display_level: u32,
}

/// Rewrite `-N` (N all digits) into `--level=N`.
fn expand_level_flags<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut end_of_options = false;
    args.into_iter()
        .map(Into::into)
        .map(|a| {
            if a == "--" {
                end_of_options = true;
                return a;
            }
            let digits = a.strip_prefix('-').unwrap_or("");
            if !end_of_options && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                format!("--level={digits}")
            } else {
                a
            }
        })
        .collect()
}

/// Output name for `input` when none is given.
fn derive_output(input: &str, mode: OpMode) -> anyhow::Result<String> {
    if input == STDIN_MARK {
        return Ok(STDOUT_MARK.to_owned());
    }
    match mode {
        OpMode::Compress => Ok(format!("{input}{LZ5_EXTENSION}")),
        _ => input
            .strip_suffix(LZ5_EXTENSION)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("cannot determine an output filename for {input}")),
    }
}

fn resolve(cli: Cli) -> anyhow::Result<ParsedArgs> {
    let input = cli.input.unwrap_or_else(|| STDIN_MARK.to_owned());
    let op_mode = if cli.test {
        OpMode::Test
    } else if cli.decompress {
        OpMode::Decompress
    } else if !cli.compress && input.ends_with(LZ5_EXTENSION) {
        OpMode::Decompress
    } else {
        OpMode::Compress
    };

    let output = match op_mode {
        OpMode::Test => None,
        _ if cli.stdout => Some(STDOUT_MARK.to_owned()),
        _ => match cli.output {
            Some(o) => Some(o),
            None => Some(derive_output(&input, op_mode)?),
        },
    };

    let dictionary = match &cli.dictionary {
        Some(path) => Some(
            load_dict_file(path).with_context(|| format!("cannot read dictionary {path}"))?,
        ),
        None => None,
    };

    let level = match cli.level {
        Some(l) => clamp_level(l),
        None => clevel_from_env(),
    };

    let display_level = (2 + cli.verbose as u32).saturating_sub(cli.quiet as u32);

    Ok(ParsedArgs {
        op_mode,
        prefs: FrameOptions {
            level,
            block_size_log: cli.block_size_log.unwrap_or(BLOCK_SIZE_LOG_DEFAULT),
            dictionary,
            overwrite: cli.force || cli.stdout,
        },
        input,
        output,
        display_level,
    })
}

/// Parse an explicit argument list (first element is the program name).
pub fn parse_args_from<I, S>(args: I) -> anyhow::Result<ParsedArgs>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let cli = Cli::try_parse_from(expand_level_flags(args))?;
    resolve(cli)
}

pub fn parse_args() -> anyhow::Result<ParsedArgs> {
    parse_args_from(std::env::args())
}
