//! Pack, then read the batch back through every other command.

use tempfile::TempDir;

use super::helpers::*;

#[test]
fn test_pack_then_unpack_documents() {
    let dir = TempDir::new().expect("temp dir");
    let batch = packed_documents(dir.path());

    let bytes = std::fs::read(&batch).expect("read batch");
    assert_eq!(&bytes[0..4], b"LGDB");
    assert_eq!(bytes.len(), 20 + 3 * 2048);

    let result = run_cli(&["unpack", "--input", path_str(&batch)]);
    assert_eq!(result.exit_code, EXIT_SUCCESS);

    let records = result.json();
    let records = records.as_array().expect("array");
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["document_type"], "contract");
    assert_eq!(records[1]["risk_level"], "critical");
    assert_eq!(records[2]["document_type"], "evidence", "unknown type falls back");
}

#[test]
fn test_unpack_to_file() {
    let dir = TempDir::new().expect("temp dir");
    let batch = packed_documents(dir.path());
    let out = dir.path().join("out.json");

    let result = run_cli(&["unpack", "--input", path_str(&batch), "--output", path_str(&out)]);
    assert_eq!(result.exit_code, EXIT_SUCCESS);
    assert!(result.stdout.is_empty());

    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&out).expect("read output")).expect("json");
    assert_eq!(written.as_array().map(Vec::len), Some(3));
}

#[test]
fn test_inspect_reports_header() {
    let dir = TempDir::new().expect("temp dir");
    let batch = packed_documents(dir.path());

    let result = run_cli(&["inspect", path_str(&batch)]);
    assert_eq!(result.exit_code, EXIT_SUCCESS);

    let report = result.json();
    assert_eq!(report["format"], "documents");
    assert_eq!(report["count"], 3);
    assert_eq!(report["version"], 1);
    assert_eq!(report["checksum_ok"], true);
    assert_eq!(report["size"], report["expected_size"]);
}

#[test]
fn test_project_prints_shapes() {
    let dir = TempDir::new().expect("temp dir");
    let batch = packed_documents(dir.path());

    let result = run_cli(&["project", "--input", path_str(&batch), "--metadata-stride", "64"]);
    assert_eq!(result.exit_code, EXIT_SUCCESS);

    let shapes = &result.json()["shapes"];
    assert_eq!(shapes["count"], 3);
    assert_eq!(shapes["embeddings"], 3 * 384);
    assert_eq!(shapes["metadata"], 3 * 64);
    assert_eq!(shapes["positions"], 3 * 4);
}

#[test]
fn test_nodes_round_trip_and_canonical_order() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_json(dir.path(), "nodes.json", &sample_nodes());
    let batch = dir.path().join("nodes.lgb");

    let result = run_cli(&[
        "pack",
        "--kind",
        "nodes",
        "--canonical",
        "--input",
        path_str(&input),
        "--output",
        path_str(&batch),
    ]);
    assert_eq!(result.exit_code, EXIT_SUCCESS, "{}", result.stderr);
    assert_eq!(result.json()["format"], "nodes");

    let result = run_cli(&["unpack", "--input", path_str(&batch)]);
    assert_eq!(result.exit_code, EXIT_SUCCESS);
    let nodes = result.json();
    let ids: Vec<u64> = nodes
        .as_array()
        .expect("array")
        .iter()
        .map(|n| n["id"].as_u64().expect("id"))
        .collect();
    assert_eq!(ids, vec![10, 20, 30]);
    assert_eq!(nodes[2]["metadata"]["name"], "Witness");
    assert_eq!(nodes[2]["node_type"], "person");

    let result = run_cli(&["inspect", path_str(&batch)]);
    assert_eq!(result.exit_code, EXIT_SUCCESS);
    assert_eq!(result.json()["count"], 3);
}

#[test]
fn test_empty_input_packs_header_only_batch() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_json(dir.path(), "empty.json", &serde_json::json!([]));
    let batch = dir.path().join("empty.lgb");

    let result = run_cli(&["pack", "--input", path_str(&input), "--output", path_str(&batch)]);
    assert_eq!(result.exit_code, EXIT_SUCCESS);
    assert_eq!(std::fs::metadata(&batch).expect("stat").len(), 20);

    let result = run_cli(&["unpack", "--input", path_str(&batch)]);
    assert_eq!(result.exit_code, EXIT_SUCCESS);
    assert_eq!(result.json(), serde_json::json!([]));
}
