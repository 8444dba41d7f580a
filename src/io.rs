//! Framed file container used by the command-line tool.
//!
//! ```text
//! frame   := magic:u32le  block_log:u8  block*  0:u32le  checksum:u32le
//! block   := size:u32le   bytes[size]            (one compressed block)
//! ```
//!
//! `magic` is [`LZ5_MAGICNUMBER`]; `block_log` bounds the decoded size of
//! every block (`1 << block_log`).  Blocks are produced by one
//! [`Lz5Stream`] so each block may reference the previous window of
//! content; `checksum` is the XXH32 (seed 0) of the whole decoded content.
//!
//! Between reads the compressor keeps its history alive with
//! [`Lz5Stream::save_dictionary`], so the input buffer can be reused for the
//! next block.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use xxhash_rust::xxh32::Xxh32;

use crate::compress::api::{compress_bound, Lz5Stream};
use crate::compress::types::MAX_WINDOW;
use crate::config::{BLOCK_SIZE_LOG_DEFAULT, BLOCK_SIZE_LOG_MAX, BLOCK_SIZE_LOG_MIN, CLEVEL_DEFAULT};
use crate::decompress::decompress_into;

/// Frame magic number, stored little-endian.
pub const LZ5_MAGICNUMBER: u32 = 0x184D_2205;

/// Sentinel: read from standard input.
pub const STDIN_MARK: &str = "stdin";
/// Sentinel: write to standard output.
pub const STDOUT_MARK: &str = "stdout";

// ─────────────────────────────────────────────────────────────────────────────
// Preferences
// ─────────────────────────────────────────────────────────────────────────────

/// Settings for one compression or decompression run.
#[derive(Clone, Debug)]
pub struct FrameOptions {
    pub level: i32,
    pub block_size_log: u32,
    /// Preset dictionary shared by compressor and decompressor.
    pub dictionary: Option<Vec<u8>>,
    /// Replace an existing destination file.
    pub overwrite: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            level: CLEVEL_DEFAULT,
            block_size_log: BLOCK_SIZE_LOG_DEFAULT,
            dictionary: None,
            overwrite: false,
        }
    }
}

impl FrameOptions {
    pub fn block_size(&self) -> usize {
        1usize << self.block_size_log.clamp(BLOCK_SIZE_LOG_MIN, BLOCK_SIZE_LOG_MAX)
    }
}

/// Totals reported after a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub blocks: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn invalid_data(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

/// Fill `buf` from `reader`, stopping early only at end of stream.
fn read_to_capacity(reader: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

fn read_u32(reader: &mut dyn Read) -> io::Result<u32> {
    let mut word = [0u8; 4];
    reader.read_exact(&mut word)?;
    Ok(u32::from_le_bytes(word))
}

/// Read a dictionary file, keeping only its last window of bytes.
pub fn load_dict_file(path: &str) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;
    if data.len() > MAX_WINDOW as usize {
        let cut = data.len() - MAX_WINDOW as usize;
        data.drain(..cut);
    }
    log::debug!("loaded {} dictionary bytes from {}", data.len(), path);
    Ok(data)
}

pub fn open_src_file(path: &str) -> io::Result<Box<dyn Read>> {
    if path == STDIN_MARK {
        return Ok(Box::new(io::stdin().lock()));
    }
    if Path::new(path).is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: is a directory", path),
        ));
    }
    Ok(Box::new(BufReader::new(File::open(path)?)))
}

pub fn open_dst_file(path: &str, overwrite: bool) -> io::Result<Box<dyn Write>> {
    if path == STDOUT_MARK {
        return Ok(Box::new(io::stdout().lock()));
    }
    if !overwrite && Path::new(path).exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{}: already exists; not overwritten", path),
        ));
    }
    let f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    Ok(Box::new(BufWriter::new(f)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Compression
// ─────────────────────────────────────────────────────────────────────────────

/// Compress everything `reader` yields into one frame on `writer`.
pub fn compress_stream(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    opts: &FrameOptions,
) -> io::Result<FrameStats> {
    let block_size = opts.block_size();
    let block_log = block_size.trailing_zeros() as u8;
    let mut stream = Lz5Stream::create(opts.level)
        .ok_or_else(|| io::Error::new(io::ErrorKind::OutOfMemory, "cannot allocate compression state"))?;

    let mut in_buf = vec![0u8; block_size];
    let mut out_buf = vec![0u8; compress_bound(block_size)];
    let mut history = vec![0u8; MAX_WINDOW as usize];
    let mut hasher = Xxh32::new(0);
    let mut stats = FrameStats::default();

    if let Some(dict) = &opts.dictionary {
        stream.load_dictionary(dict);
    }

    writer.write_all(&LZ5_MAGICNUMBER.to_le_bytes())?;
    writer.write_all(&[block_log])?;
    stats.bytes_out += 5;

    loop {
        let n = read_to_capacity(reader, &mut in_buf)?;
        if n == 0 {
            break;
        }
        let src = &in_buf[..n];
        hasher.update(src);

        // SAFETY: the stream's history is either `opts.dictionary`, which
        // outlives this loop, or `history`, which is only written by
        // `save_dictionary` below.
        let written = unsafe { stream.compress_continue(src, &mut out_buf) }
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        writer.write_all(&(written as u32).to_le_bytes())?;
        writer.write_all(&out_buf[..written])?;
        log::debug!("block {}: {} -> {} bytes", stats.blocks, n, written);

        stats.blocks += 1;
        stats.bytes_in += n as u64;
        stats.bytes_out += 4 + written as u64;

        // SAFETY: the previous input is still in `in_buf`, which is not
        // overwritten until the next read.
        unsafe { stream.save_dictionary(&mut history) };
    }

    writer.write_all(&0u32.to_le_bytes())?;
    writer.write_all(&hasher.digest().to_le_bytes())?;
    writer.flush()?;
    stats.bytes_out += 8;
    Ok(stats)
}

pub fn compress_filename(src: &str, dst: &str, opts: &FrameOptions) -> io::Result<FrameStats> {
    let mut reader = open_src_file(src)?;
    let mut writer = open_dst_file(dst, opts.overwrite)?;
    compress_stream(&mut reader, &mut writer, opts)
}

// ─────────────────────────────────────────────────────────────────────────────
// Decompression
// ─────────────────────────────────────────────────────────────────────────────

/// Decode one frame from `reader` onto `writer`.
pub fn decompress_stream(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    dictionary: Option<&[u8]>,
) -> io::Result<FrameStats> {
    let magic = read_u32(reader)?;
    if magic != LZ5_MAGICNUMBER {
        return Err(invalid_data(format!("unrecognised frame magic 0x{magic:08X}")));
    }
    let mut log_byte = [0u8; 1];
    reader.read_exact(&mut log_byte)?;
    let block_log = log_byte[0] as u32;
    if !(BLOCK_SIZE_LOG_MIN..=BLOCK_SIZE_LOG_MAX).contains(&block_log) {
        return Err(invalid_data(format!("unsupported block size log {block_log}")));
    }
    let block_size = 1usize << block_log;

    let mut history: Vec<u8> = dictionary
        .map(|d| d[d.len().saturating_sub(MAX_WINDOW as usize)..].to_vec())
        .unwrap_or_default();
    let mut block = Vec::with_capacity(compress_bound(block_size));
    let mut hasher = Xxh32::new(0);
    let mut stats = FrameStats {
        bytes_in: 5,
        ..FrameStats::default()
    };

    loop {
        let size = read_u32(reader)? as usize;
        stats.bytes_in += 4;
        if size == 0 {
            break;
        }
        if size > compress_bound(block_size) {
            return Err(invalid_data(format!("block of {size} bytes exceeds frame bound")));
        }
        block.resize(size, 0);
        reader.read_exact(&mut block)?;
        stats.bytes_in += size as u64;

        let before = history.len();
        decompress_into(&block, &mut history, block_size)
            .map_err(|e| invalid_data(format!("block {}: {e}", stats.blocks)))?;
        let decoded = &history[before..];
        hasher.update(decoded);
        writer.write_all(decoded)?;
        stats.bytes_out += decoded.len() as u64;
        stats.blocks += 1;

        if history.len() > 2 * MAX_WINDOW as usize {
            let cut = history.len() - MAX_WINDOW as usize;
            history.drain(..cut);
        }
    }

    let expected = read_u32(reader)?;
    stats.bytes_in += 4;
    let actual = hasher.digest();
    if expected != actual {
        return Err(invalid_data(format!(
            "content checksum mismatch: stored 0x{expected:08X}, computed 0x{actual:08X}"
        )));
    }
    writer.flush()?;
    Ok(stats)
}

pub fn decompress_filename(src: &str, dst: &str, opts: &FrameOptions) -> io::Result<FrameStats> {
    let mut reader = open_src_file(src)?;
    let mut writer = open_dst_file(dst, opts.overwrite)?;
    decompress_stream(&mut reader, &mut writer, opts.dictionary.as_deref())
}
