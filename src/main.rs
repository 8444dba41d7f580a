//! Binary entry point for the `lz5` command-line tool.
//!
//! 1. [`parse_args`] resolves clap options into a [`ParsedArgs`] value.
//! 2. The display level is published and the logger initialised from it
//!    (`RUST_LOG` still takes precedence).
//! 3. [`run`] dispatches to the frame container and reports totals.

use std::io::IsTerminal;

use anyhow::{bail, Context};

use lz5::cli::args::{parse_args, OpMode, ParsedArgs};
use lz5::cli::constants::{log_filter_for, set_display_level, COMPRESSOR_NAME};
use lz5::io::{
    compress_filename, decompress_filename, decompress_stream, open_src_file, FrameStats,
    STDIN_MARK, STDOUT_MARK,
};

fn report(op: &str, src: &str, dst: &str, stats: &FrameStats) {
    let (raw, packed) = match op {
        "Compressed" => (stats.bytes_in, stats.bytes_out),
        _ => (stats.bytes_out, stats.bytes_in),
    };
    let ratio = if raw == 0 {
        100.0
    } else {
        packed as f64 * 100.0 / raw as f64
    };
    lz5::displaylevel!(
        2,
        "{} {} : {} -> {} bytes ({:.2}%), {} blocks -> {}\n",
        op,
        src,
        raw,
        packed,
        ratio,
        stats.blocks,
        dst
    );
}

fn run(args: ParsedArgs) -> anyhow::Result<()> {
    lz5::displaylevel!(
        3,
        "*** {} v{} {}-bit ***\n",
        COMPRESSOR_NAME,
        lz5::LZ5_VERSION_STRING,
        std::mem::size_of::<*const ()>() * 8
    );

    if args.input == STDIN_MARK && std::io::stdin().is_terminal() {
        bail!("refusing to read from a console");
    }

    match args.op_mode {
        OpMode::Compress => {
            let dst = args.output.as_deref().unwrap_or(STDOUT_MARK);
            if dst == STDOUT_MARK && std::io::stdout().is_terminal() {
                bail!("refusing to write to console without -c");
            }
            lz5::displaylevel!(
                4,
                "Level {} , block size {} KB\n",
                args.prefs.level,
                args.prefs.block_size() >> 10
            );
            let stats = compress_filename(&args.input, dst, &args.prefs)
                .with_context(|| format!("compression of {} failed", args.input))?;
            report("Compressed", &args.input, dst, &stats);
        }
        OpMode::Decompress => {
            let dst = args.output.as_deref().unwrap_or(STDOUT_MARK);
            let stats = decompress_filename(&args.input, dst, &args.prefs)
                .with_context(|| format!("decompression of {} failed", args.input))?;
            report("Decompressed", &args.input, dst, &stats);
        }
        OpMode::Test => {
            let mut reader = open_src_file(&args.input)
                .with_context(|| format!("cannot open {}", args.input))?;
            let stats = decompress_stream(
                &mut reader,
                &mut std::io::sink(),
                args.prefs.dictionary.as_deref(),
            )
            .with_context(|| format!("{} is corrupted", args.input))?;
            lz5::displaylevel!(2, "{} : OK ({} bytes)\n", args.input, stats.bytes_out);
        }
    }
    Ok(())
}

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            // clap formats its own help, version and usage errors
            if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
                clap_err.exit();
            }
            eprintln!("{}: {:#}", COMPRESSOR_NAME, e);
            std::process::exit(1);
        }
    };

    set_display_level(args.display_level);
    env_logger::Builder::new()
        .filter_level(log_filter_for(args.display_level))
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = run(args) {
        lz5::displaylevel!(1, "{}: {:#}\n", COMPRESSOR_NAME, e);
        std::process::exit(1);
    }
}
