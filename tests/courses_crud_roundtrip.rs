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

fn request(
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
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn create_then_get_returns_an_equal_record() {
    let workspace = temp_dir("scholard-courses-roundtrip");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.open",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let seeded = request_ok(&mut stdin, &mut reader, "2", "courses.list", json!({}));
    let seeded_count = seeded
        .get("courses")
        .and_then(|v| v.as_array())
        .expect("courses array")
        .len();
    assert_eq!(seeded_count, 3, "bundled defaults seed three courses");

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "courses.create",
        json!({ "fields": {
            "name": "Organic Chemistry",
            "code": "CHEM 220",
            "instructor": "Dr. Patel",
            "schedule": "MWF 10:00-10:50",
            "credits": 4,
            "color": "#DC2626",
            "semester": "Fall 2025"
        }}),
    );
    let course = created.get("course").expect("created course");
    assert_eq!(course.get("Id").and_then(|v| v.as_i64()), Some(4));

    let fetched = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "courses.get",
        json!({ "id": 4 }),
    );
    assert_eq!(fetched.get("course"), Some(course));

    // String ids coerce to the same record; garbage ids match nothing.
    let by_string = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "courses.get",
        json!({ "id": "4" }),
    );
    assert_eq!(by_string.get("course"), Some(course));

    let by_garbage = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "courses.get",
        json!({ "id": "not-a-number" }),
    );
    assert!(by_garbage.get("course").expect("course key").is_null());
}

#[test]
fn update_merges_present_fields_and_preserves_the_rest() {
    let workspace = temp_dir("scholard-courses-update");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.open",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let before = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "courses.get",
        json!({ "id": 1 }),
    );
    let before = before.get("course").expect("seeded course");
    let original_name = before.get("name").cloned().expect("name");

    let updated = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "courses.update",
        json!({ "id": 1, "fields": { "instructor": "Dr. Lee", "credits": 5 } }),
    );
    let updated = updated.get("course").expect("updated course");
    assert_eq!(updated.get("instructor").and_then(|v| v.as_str()), Some("Dr. Lee"));
    assert_eq!(updated.get("credits").and_then(|v| v.as_i64()), Some(5));
    assert_eq!(updated.get("name"), Some(&original_name));

    // Updating an id that matches nothing is a null result, not an error.
    let missing = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "courses.update",
        json!({ "id": 99, "fields": { "name": "ghost" } }),
    );
    assert!(missing.get("course").expect("course key").is_null());
}
