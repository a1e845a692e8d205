use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_scholard");
    let mut child = Command::new(exe)
        .env("SCHOLARD_LATENCY", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn scholard");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({ "id": id, "method": method, "params": params });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn toggle_complete_is_its_own_inverse() {
    let workspace = temp_dir("scholard-toggle");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.open",
        json!({ "path": workspace.to_string_lossy() }),
    );

    // Seeded assignment 2 starts pending.
    let once = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "assignments.toggleComplete",
        json!({ "id": 2 }),
    );
    assert_eq!(
        once.get("assignment")
            .and_then(|a| a.get("status"))
            .and_then(|v| v.as_str()),
        Some("completed")
    );

    let twice = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "assignments.toggleComplete",
        json!({ "id": 2 }),
    );
    assert_eq!(
        twice
            .get("assignment")
            .and_then(|a| a.get("status"))
            .and_then(|v| v.as_str()),
        Some("pending")
    );

    // Unknown id: a no-op reported as null, never an error.
    let missing = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "assignments.toggleComplete",
        json!({ "id": 999 }),
    );
    assert!(missing.get("assignment").expect("assignment key").is_null());
}

#[test]
fn delete_reports_true_no_matter_how_often_it_runs() {
    let workspace = temp_dir("scholard-delete");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.open",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let before = request_ok(&mut stdin, &mut reader, "2", "assignments.list", json!({}));
    let count_before = before
        .get("assignments")
        .and_then(|v| v.as_array())
        .expect("assignments array")
        .len();

    for (req_id, expected_remaining) in [("3", count_before - 1), ("4", count_before - 1)] {
        let deleted = request_ok(
            &mut stdin,
            &mut reader,
            req_id,
            "assignments.delete",
            json!({ "id": 5 }),
        );
        assert_eq!(deleted.get("deleted").and_then(|v| v.as_bool()), Some(true));

        let after = request_ok(
            &mut stdin,
            &mut reader,
            &format!("{req_id}-list"),
            "assignments.list",
            json!({}),
        );
        assert_eq!(
            after
                .get("assignments")
                .and_then(|v| v.as_array())
                .expect("assignments array")
                .len(),
            expected_remaining,
            "second delete must leave the collection unchanged"
        );
    }
}
