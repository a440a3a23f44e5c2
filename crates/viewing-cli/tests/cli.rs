use assert_cmd::Command;
use predicates::prelude::*;

const SNAPSHOT: &str = r#"[
  {"id": "A", "property_id": "p1", "customer_group_id": "x", "customer_group_name": "Chan family",
   "party_role": "buyer", "start_time": "2026-03-16T10:00:00Z", "end_time": "2026-03-16T10:15:00Z"},
  {"id": "B", "property_id": "p2", "customer_group_id": "x", "customer_group_name": "Chan family",
   "party_role": "buyer", "start_time": "2026-03-16T10:20:00Z", "end_time": "2026-03-16T10:35:00Z"},
  {"id": "C", "property_id": "p3", "customer_info": "Ms Lee", "party_role": "tenant",
   "start_time": "2026-03-16T14:00:00Z", "end_time": "2026-03-16T14:15:00Z"},
  {"id": "D", "property_id": "p4", "customer_group_id": "y", "customer_group_name": "Wong",
   "status": "cancelled", "start_time": "2026-03-16T16:00:00Z", "end_time": "2026-03-16T16:30:00Z"}
]"#;

fn viewings() -> Command {
    let mut cmd = Command::cargo_bin("viewings").unwrap();
    cmd.env_remove("VIEWINGS_TIMEZONE")
        .env_remove("VIEWINGS_MERGE_GAP")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).unwrap()
}

// ── check tests ─────────────────────────────────────────────────────────────

#[test]
fn test_check_clear_window() {
    let output = viewings()
        .args(["check", "--start", "2026-03-16T10:35:00Z", "--end", "2026-03-16T11:00:00Z"])
        .write_stdin(SNAPSHOT)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(stdout_json(&output), serde_json::json!({ "has_conflict": false }));
}

#[test]
fn test_check_overlap_exits_nonzero() {
    let output = viewings()
        .args(["check", "-s", "2026-03-16T10:10:00Z", "-e", "2026-03-16T10:25:00Z"])
        .write_stdin(SNAPSHOT)
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let json = stdout_json(&output);
    assert_eq!(json["has_conflict"], true);
    assert_eq!(json["conflicting_id"], "A");
    assert_eq!(json["conflicting_with"]["start_time"], "2026-03-16T10:00:00Z");
}

#[test]
fn test_check_cancelled_does_not_block() {
    viewings()
        .args(["check", "-s", "2026-03-16T16:00:00Z", "-e", "2026-03-16T16:30:00Z"])
        .write_stdin(SNAPSHOT)
        .assert()
        .success();
}

#[test]
fn test_check_edit_excludes_itself() {
    viewings()
        .args([
            "check",
            "-s",
            "2026-03-16T14:00:00Z",
            "-e",
            "2026-03-16T14:15:00Z",
            "--exclude",
            "C",
        ])
        .write_stdin(SNAPSHOT)
        .assert()
        .success();
}

#[test]
fn test_check_reversed_window_text() {
    viewings()
        .args([
            "check",
            "-s",
            "2026-03-16T12:00:00Z",
            "-e",
            "2026-03-16T11:00:00Z",
            "--format",
            "text",
        ])
        .write_stdin("[]")
        .assert()
        .code(2)
        .stdout("End time must be after start time\n");
}

#[test]
fn test_check_overlap_text_in_local_time() {
    viewings()
        .args([
            "check",
            "-s",
            "2026-03-16T14:05:00Z",
            "-e",
            "2026-03-16T14:20:00Z",
            "--format",
            "text",
            "--timezone",
            "Asia/Hong_Kong",
        ])
        .write_stdin(SNAPSHOT)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("2026-03-16 22:00 - 22:15"));
}

#[test]
fn test_check_rejects_bad_timestamp() {
    viewings()
        .args(["check", "-s", "tomorrow", "-e", "2026-03-16T11:00:00Z"])
        .write_stdin("[]")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid candidate window"));
}

#[test]
fn test_check_unreadable_snapshot_is_not_a_rejection() {
    viewings()
        .args([
            "check",
            "-s",
            "2026-03-16T10:00:00Z",
            "-e",
            "2026-03-16T11:00:00Z",
            "--appointments",
            "/nonexistent/viewings/appointments.json",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read"));
}

// ── schedule tests ──────────────────────────────────────────────────────────

#[test]
fn test_schedule_json() {
    let output = viewings()
        .arg("schedule")
        .write_stdin(SNAPSHOT)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = stdout_json(&output);
    let day = json["2026-03-16"].as_array().unwrap();
    assert_eq!(day.len(), 3);
    assert_eq!(day[0]["kind"], "appointment");
    assert_eq!(day[0]["block"]["property_count"], 2);
    assert_eq!(day[1]["kind"], "free");
    assert_eq!(day[1]["duration_minutes"], 205);
    assert_eq!(day[2]["block"]["display_name"], "Ms Lee");
}

#[test]
fn test_schedule_text() {
    viewings()
        .args(["schedule", "--format", "text"])
        .write_stdin(SNAPSHOT)
        .assert()
        .success()
        .stdout(predicate::str::contains("10:00-10:35  Chan family (2 properties)"))
        .stdout(predicate::str::contains("10:35-14:00  free, 3 hours, 25 minutes"))
        .stdout(predicate::str::contains("Wong").not());
}

#[test]
fn test_schedule_include_inactive() {
    viewings()
        .args(["schedule", "--format", "text", "--include-inactive"])
        .write_stdin(SNAPSHOT)
        .assert()
        .success()
        .stdout(predicate::str::contains("16:00-16:30  Wong (1 property)"));
}

#[test]
fn test_schedule_merge_gap_from_env() {
    viewings()
        .args(["schedule", "--format", "text"])
        .env("VIEWINGS_MERGE_GAP", "0m")
        .write_stdin(SNAPSHOT)
        .assert()
        .success()
        // Stage 2 still collapses the split same-party blocks
        .stdout(predicate::str::contains("10:00-10:35  Chan family (2 properties)"));
}

#[test]
fn test_schedule_reads_file() {
    let dir = std::env::temp_dir().join(format!("viewings-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("appointments.json");
    std::fs::write(&path, SNAPSHOT).unwrap();

    viewings()
        .args(["schedule", "--format", "text", "--appointments"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("2026-03-16\n"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_schedule_rejects_bad_timezone() {
    viewings()
        .args(["schedule", "--timezone", "Mars/Olympus"])
        .write_stdin(SNAPSHOT)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn test_schedule_rejects_out_of_range_merge_gap() {
    viewings()
        .args(["schedule", "--merge-gap", "999999999999999999"])
        .write_stdin(SNAPSHOT)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid --merge-gap"));
}

#[test]
fn test_schedule_rejects_malformed_snapshot() {
    viewings()
        .arg("schedule")
        .write_stdin(r#"[{"id": "A"}]"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse appointments"));
}
