//! Binary invocation and fixture helpers.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{json, Value};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_RECOVERABLE: i32 = 1;
pub const EXIT_CORRUPTION: i32 = 2;

pub struct CliResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|e| {
            panic!("stdout is not JSON ({e}):\n{}\nstderr:\n{}", self.stdout, self.stderr)
        })
    }
}

/// Run the binary with `args`, isolated from any ambient config.
pub fn run_cli(args: &[&str]) -> CliResult {
    run_cli_with_env(args, &[])
}

/// Like [`run_cli`], with extra environment variables set.
pub fn run_cli_with_env(args: &[&str], vars: &[(&str, &str)]) -> CliResult {
    let mut command = Command::new(env!("CARGO_BIN_EXE_legal-frame"));
    command
        .args(args)
        .env_remove("LEGAL_FRAME_CONFIG")
        .env_remove("RUST_LOG");
    for (key, value) in vars {
        command.env(key, value);
    }
    let output = command.output().expect("failed to spawn legal-frame");

    let result = CliResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    println!(
        "EVIDENCE: legal-frame {:?} -> exit {}\nstderr: {}",
        args, result.exit_code, result.stderr
    );
    result
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

pub fn sample_documents() -> Value {
    json!([
        {
            "id": "doc-1",
            "title": "Contract A",
            "type": "contract",
            "confidenceLevel": 0.95,
            "embedding": vec![0.25; 384],
            "neighbors": [2, 3]
        },
        {
            "id": "doc-2",
            "title": "Motion to dismiss",
            "type": "motion",
            "risk": "critical",
            "priority": 250
        },
        {
            "id": "doc-3",
            "type": "not-a-real-type",
            "tags": ["privileged"]
        }
    ])
}

pub fn sample_nodes() -> Value {
    json!([
        {"id": 30, "type": "person", "embedding": [1.0, 2.0], "metadata": {"name": "Witness"}},
        {"id": 10, "type": "case", "embedding": [0.5, 0.5, 0.5]},
        {"id": 20, "type": "citation"}
    ])
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec_pretty(value).expect("json")).expect("write fixture");
    path
}

/// Pack `value` as documents and return the batch path.
pub fn packed_documents(dir: &Path) -> PathBuf {
    let input = write_json(dir, "documents.json", &sample_documents());
    let output = dir.join("documents.lgb");
    let result = run_cli(&["pack", "--input", path_str(&input), "--output", path_str(&output)]);
    assert_eq!(result.exit_code, EXIT_SUCCESS, "pack failed: {}", result.stderr);
    output
}
