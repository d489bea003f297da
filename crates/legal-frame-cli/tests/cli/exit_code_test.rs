//! Exit code behavior.
//!
//! - 1: missing files, malformed JSON, bad config, unsupported pack version
//! - 2: bad magic, checksum mismatch, truncation

use tempfile::TempDir;

use super::helpers::*;

#[test]
fn test_missing_input_is_recoverable() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("nope.lgb");

    let result = run_cli(&["unpack", "--input", path_str(&missing)]);
    assert_eq!(result.exit_code, EXIT_RECOVERABLE);
    assert!(result.stderr.contains("Failed to read"));
}

#[test]
fn test_malformed_json_is_recoverable() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("bad.json");
    std::fs::write(&input, b"[{\"id\": ").expect("write");
    let output = dir.path().join("out.lgb");

    let result = run_cli(&["pack", "--input", path_str(&input), "--output", path_str(&output)]);
    assert_eq!(result.exit_code, EXIT_RECOVERABLE);
    assert!(result.stderr.contains("Invalid JSON"));
    assert!(!output.exists(), "no batch is written on bad input");
}

#[test]
fn test_unsupported_pack_version_is_recoverable() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_json(dir.path(), "docs.json", &sample_documents());
    let output = dir.path().join("out.lgb");

    let result = run_cli(&[
        "pack",
        "--input",
        path_str(&input),
        "--output",
        path_str(&output),
        "--frame-version",
        "7",
    ]);
    assert_eq!(result.exit_code, EXIT_RECOVERABLE);
}

#[test]
fn test_config_path_from_environment() {
    let dir = TempDir::new().expect("temp dir");
    let batch = packed_documents(dir.path());
    let config = dir.path().join("frame.toml");
    std::fs::write(&config, "[projector]\nembedding_width = 0\n").expect("write config");

    let result = run_cli_with_env(
        &["project", "--input", path_str(&batch)],
        &[("LEGAL_FRAME_CONFIG", path_str(&config))],
    );
    assert_eq!(result.exit_code, EXIT_RECOVERABLE);
    assert!(result.stderr.contains("[projector]"), "{}", result.stderr);
}

#[test]
fn test_frame_version_with_node_input_is_recoverable() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_json(dir.path(), "nodes.json", &sample_nodes());
    let output = dir.path().join("nodes.lgn");

    let result = run_cli(&[
        "pack",
        "--input",
        path_str(&input),
        "--output",
        path_str(&output),
        "--kind",
        "nodes",
        "--frame-version",
        "1",
    ]);
    println!("AFTER: exit={} stderr={}", result.exit_code, result.stderr);
    assert_eq!(result.exit_code, EXIT_RECOVERABLE);
    assert!(result.stderr.contains("--frame-version"), "{}", result.stderr);
    assert!(!output.exists());
}

#[test]
fn test_version_flag_prints_version() {
    let result = run_cli(&["--version"]);
    assert_eq!(result.exit_code, EXIT_SUCCESS);
    assert!(result.stdout.contains(env!("CARGO_PKG_VERSION")), "{}", result.stdout);

    let result = run_cli(&["pack", "--version"]);
    assert_eq!(result.exit_code, EXIT_SUCCESS);
}

#[test]
fn test_invalid_config_is_recoverable() {
    let dir = TempDir::new().expect("temp dir");
    let batch = packed_documents(dir.path());
    let config = dir.path().join("frame.toml");
    std::fs::write(&config, "[projector]\nembedding_width = 0\n").expect("write config");

    let result = run_cli(&["--config", path_str(&config), "project", "--input", path_str(&batch)]);
    assert_eq!(result.exit_code, EXIT_RECOVERABLE);
    assert!(result.stderr.contains("[projector]"), "{}", result.stderr);
}

#[test]
fn test_flipped_payload_byte_is_corruption() {
    let dir = TempDir::new().expect("temp dir");
    let batch = packed_documents(dir.path());
    let mut bytes = std::fs::read(&batch).expect("read");
    bytes[40] ^= 0xFF;
    std::fs::write(&batch, &bytes).expect("write");

    for command in [vec!["unpack", "--input"], vec!["project", "--input"]] {
        let mut args = command.clone();
        args.push(path_str(&batch));
        let result = run_cli(&args);
        assert_eq!(result.exit_code, EXIT_CORRUPTION, "{command:?}");
        assert!(result.stdout.is_empty(), "no partial records on stdout");
    }

    let result = run_cli(&["inspect", path_str(&batch)]);
    assert_eq!(result.exit_code, EXIT_CORRUPTION);
    assert_eq!(result.json()["checksum_ok"], false, "report still printed");
}

#[test]
fn test_foreign_magic_is_corruption() {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("foreign.bin");
    std::fs::write(&file, b"PK\x03\x04 definitely not a batch").expect("write");

    let result = run_cli(&["inspect", path_str(&file)]);
    assert_eq!(result.exit_code, EXIT_CORRUPTION);
}

#[test]
fn test_truncated_batch_is_corruption() {
    let dir = TempDir::new().expect("temp dir");
    let batch = packed_documents(dir.path());
    let bytes = std::fs::read(&batch).expect("read");
    std::fs::write(&batch, &bytes[..bytes.len() - 100]).expect("write");

    let result = run_cli(&["unpack", "--input", path_str(&batch)]);
    assert_eq!(result.exit_code, EXIT_CORRUPTION);
}
