use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn folio_audit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("folio-audit").unwrap();
    cmd.env("FOLIO_AUDIT_DIR", dir.path())
        .env_remove("FOLIO_AUDIT_ACTOR")
        .env_remove("RUST_LOG");
    cmd
}

fn write_json(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn diff_prints_changed_fields() {
    let dir = TempDir::new().unwrap();
    let before = write_json(&dir, "before.json", r#"{"title": "A", "views": 1}"#);
    let after = write_json(&dir, "after.json", r#"{"title": "A", "views": 2}"#);

    let output = folio_audit(&dir)
        .args(["diff", before.as_str(), after.as_str()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let diff: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        diff["changes"],
        serde_json::json!({"views": {"before": 1, "after": 2}})
    );
    assert_eq!(diff["before"]["title"], "A");
}

#[test]
fn diff_summary_for_create() {
    let dir = TempDir::new().unwrap();
    let after = write_json(&dir, "after.json", r#"{"name": "X"}"#);

    folio_audit(&dir)
        .args(["diff", "--summary", "-", after.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: (added) -> \"X\""));
}

#[test]
fn diff_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    folio_audit(&dir)
        .args(["diff", "nope.json", "-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn record_then_log() {
    let dir = TempDir::new().unwrap();
    let before = write_json(&dir, "before.json", r#"{"label": "Hire me", "active": false}"#);
    let after = write_json(&dir, "after.json", r#"{"label": "Hire me", "active": true}"#);

    folio_audit(&dir)
        .args([
            "record",
            "--entity-type",
            "promo",
            "--entity-id",
            "12",
            "--actor",
            "admin@example.com",
            "--before",
            before.as_str(),
            "--after",
            after.as_str(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded audit entry"));

    folio_audit(&dir)
        .args(["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UPDATE promo 12 by admin@example.com"))
        .stdout(predicate::str::contains("active: false -> true"));
}

#[test]
fn record_without_actor_uses_unknown() {
    let dir = TempDir::new().unwrap();
    let after = write_json(&dir, "after.json", r#"{"name": "Rust"}"#);

    folio_audit(&dir)
        .args(["record", "-e", "skill", "-i", "4", "--after", after.as_str()])
        .assert()
        .success();

    let output = folio_audit(&dir).args(["log", "--json"]).output().unwrap();
    let line = String::from_utf8(output.stdout).unwrap();
    let entry: serde_json::Value = serde_json::from_str(line.trim()).unwrap();

    assert_eq!(entry["actor_identity"], "unknown");
    assert_eq!(entry["action"], "CREATE");
    assert_eq!(entry["entity_type"], "skill");
}

#[test]
fn record_rejects_unknown_entity_type() {
    let dir = TempDir::new().unwrap();

    folio_audit(&dir)
        .args(["record", "-e", "invoice", "-i", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown entity type"));
}

#[test]
fn record_with_store_disabled_succeeds() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"store": "none"}"#).unwrap();
    let after = write_json(&dir, "after.json", r#"{"name": "X"}"#);

    folio_audit(&dir)
        .args(["record", "-e", "tool", "-i", "1", "--after", after.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("not configured"));

    assert!(!dir.path().join("audit.log").exists());
}

#[test]
fn record_with_unavailable_store_still_succeeds() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let after = write_json(&dir, "after.json", r#"{"title": "Draft"}"#);

    folio_audit(&dir)
        .env("FOLIO_AUDIT_DIR", blocker.join("sub"))
        .args(["record", "-e", "post", "-i", "1", "--after", after.as_str()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Audit store unavailable"));
}

#[test]
fn sqlite_backend_round_trip() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"store": "sqlite"}"#).unwrap();
    let before = write_json(&dir, "before.json", r#"{"title": "Old"}"#);

    folio_audit(&dir)
        .args(["record", "-e", "post", "-i", "9", "--before", before.as_str()])
        .assert()
        .success();

    assert!(dir.path().join("audit.db").exists());

    folio_audit(&dir)
        .args(["log", "-e", "post", "-i", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DELETE post 9"));
}

#[test]
fn log_empty() {
    let dir = TempDir::new().unwrap();

    folio_audit(&dir)
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit entries found."));
}

#[test]
fn init_and_config() {
    let dir = TempDir::new().unwrap();

    folio_audit(&dir).arg("init").assert().success();
    assert!(dir.path().join("config.json").exists());

    folio_audit(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Store backend:  jsonl"));
}
