// e2e/cli_integration.rs — CLI integration tests
//
// Drives the `lz5` binary as a black box through std::process::Command:
// compress/decompress dispatch, level and block flags, dictionaries,
// test mode, overwrite protection and exit codes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn lz5_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lz5"))
}

fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("input.txt");
    let content = "Hello, LZ5! streaming window test line\n".repeat(2000);
    fs::write(&input_path, content).unwrap();
    (dir, input_path)
}

fn s(p: &Path) -> &str {
    p.to_str().unwrap()
}

// ── 1. Compress / decompress roundtrip ───────────────────────────────────────

#[test]
fn test_cli_compress_decompress_roundtrip() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();
    let compressed = dir.path().join("output.lz5");
    let roundtrip = dir.path().join("roundtrip.txt");

    let status = Command::new(lz5_bin())
        .args(["-f", s(&input), s(&compressed)])
        .status()
        .expect("failed to run lz5 compress");
    assert!(status.success(), "compress step should exit 0");
    assert!(fs::metadata(&compressed).unwrap().len() < original.len() as u64 / 4);

    let status = Command::new(lz5_bin())
        .args(["-d", "-f", s(&compressed), s(&roundtrip)])
        .status()
        .expect("failed to run lz5 decompress");
    assert!(status.success(), "decompress step should exit 0");
    assert_eq!(fs::read(&roundtrip).unwrap(), original);
}

// ── 2. Default output names ───────────────────────────────────────────────────

#[test]
fn test_cli_derives_output_names() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();

    let status = Command::new(lz5_bin()).arg(s(&input)).status().unwrap();
    assert!(status.success());
    let packed = dir.path().join("input.txt.lz5");
    assert!(packed.exists(), "input.txt.lz5 should be created");

    fs::remove_file(&input).unwrap();
    let status = Command::new(lz5_bin()).arg(s(&packed)).status().unwrap();
    assert!(status.success(), "a .lz5 input should be decompressed");
    assert_eq!(fs::read(&input).unwrap(), original);
}

// ── 3. Levels and block sizes ─────────────────────────────────────────────────

#[test]
fn test_cli_levels_and_block_size() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();

    for flag in ["-1", "-6", "-9", "-13", "-17", "--level=4"] {
        let packed = dir.path().join(format!("out{flag}.lz5"));
        let restored = dir.path().join(format!("back{flag}.txt"));
        let status = Command::new(lz5_bin())
            .args([flag, "-B16", "-f", s(&input), s(&packed)])
            .status()
            .unwrap();
        assert!(status.success(), "{flag} should exit 0");
        assert_eq!(fs::read(&packed).unwrap()[4], 16);

        let status = Command::new(lz5_bin())
            .args(["-d", "-f", s(&packed), s(&restored)])
            .status()
            .unwrap();
        assert!(status.success());
        assert_eq!(fs::read(&restored).unwrap(), original, "{flag}");
    }
}

// ── 4. Pipes ──────────────────────────────────────────────────────────────────

#[test]
fn test_cli_stdin_to_stdout() {
    let data = b"pipe pipe pipe pipe pipe pipe pipe pipe pipe\n".repeat(100);

    let mut child = Command::new(lz5_bin())
        .arg("-c")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&data).unwrap();
    let packed = child.wait_with_output().unwrap();
    assert!(packed.status.success());

    let mut child = Command::new(lz5_bin())
        .args(["-d", "-c"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&packed.stdout).unwrap();
    let restored = child.wait_with_output().unwrap();
    assert!(restored.status.success());
    assert_eq!(restored.stdout, data);
}

// ── 5. Dictionary ─────────────────────────────────────────────────────────────

#[test]
fn test_cli_dictionary_roundtrip() {
    let (dir, input) = make_temp_input();
    let dict = dir.path().join("dict");
    fs::write(&dict, "Hello, LZ5! streaming window test line\n".repeat(50)).unwrap();
    let packed = dir.path().join("d.lz5");
    let restored = dir.path().join("d.txt");

    let status = Command::new(lz5_bin())
        .args(["-D", s(&dict), "-f", s(&input), s(&packed)])
        .status()
        .unwrap();
    assert!(status.success());

    let status = Command::new(lz5_bin())
        .args(["-d", "-D", s(&dict), "-f", s(&packed), s(&restored)])
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(fs::read(&restored).unwrap(), fs::read(&input).unwrap());
}

// ── 6. Test mode ──────────────────────────────────────────────────────────────

#[test]
fn test_cli_integrity_check() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("t.lz5");
    assert!(Command::new(lz5_bin())
        .args(["-f", s(&input), s(&packed)])
        .status()
        .unwrap()
        .success());

    assert!(Command::new(lz5_bin())
        .args(["-t", s(&packed)])
        .status()
        .unwrap()
        .success());

    let mut bytes = fs::read(&packed).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&packed, bytes).unwrap();
    let out = Command::new(lz5_bin())
        .args(["-t", s(&packed)])
        .output()
        .unwrap();
    assert!(!out.status.success(), "corrupted frame must fail the test");
    assert!(String::from_utf8_lossy(&out.stderr).contains("checksum"));
}

// ── 7. Overwrite protection ───────────────────────────────────────────────────

#[test]
fn test_cli_refuses_to_overwrite_without_force() {
    let (dir, input) = make_temp_input();
    let dst = dir.path().join("exists.lz5");
    fs::write(&dst, b"keep me").unwrap();

    let status = Command::new(lz5_bin())
        .args([s(&input), s(&dst)])
        .status()
        .unwrap();
    assert!(!status.success());
    assert_eq!(fs::read(&dst).unwrap(), b"keep me");
}

// ── 8. --version / --help / bad flags ─────────────────────────────────────────

#[test]
fn test_cli_version() {
    let output = Command::new(lz5_bin()).arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1.5.0"), "got: {stdout}");
}

#[test]
fn test_cli_help() {
    let output = Command::new(lz5_bin()).arg("--help").output().unwrap();
    assert!(output.status.success());
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(combined.to_lowercase().contains("usage"));
}

#[test]
fn test_cli_rejects_bad_block_size() {
    let (_dir, input) = make_temp_input();
    let status = Command::new(lz5_bin())
        .args(["-B99", s(&input)])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn test_cli_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let status = Command::new(lz5_bin())
        .arg(s(&dir.path().join("nope.txt")))
        .stderr(Stdio::null())
        .status()
        .unwrap();
    assert!(!status.success());
}
