//! E2E CLI tests: `idoc init`, `insert`, `check`, `seed`, `select`.
//!
//! Each test runs the binary as a subprocess in an isolated temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

const BUG: &str = r#"{"id":1,"reporter_id":11,"priority":1,"status":"new","severity":"low","version_affected":"1.0.0"}"#;
const FEATURE: &str = r#"{"id":3,"reporter_id":33,"priority":3,"status":"new","sponsor_id":333}"#;
const BUG_MISSING_VERSION: &str =
    r#"{"id":5,"reporter_id":55,"priority":5,"status":"new","severity":"high"}"#;

/// Build a Command targeting the idoc binary, rooted in `dir`.
fn idoc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("idoc").expect("idoc binary must exist");
    cmd.current_dir(dir);
    cmd.env("ISSUEDOC_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd.env_remove("FORMAT");
    cmd.env_remove("ISSUEDOC_DB");
    cmd
}

fn init_project() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    idoc(dir.path()).args(["init"]).assert().success();
    dir
}

fn select_json(dir: &Path, kind: &str) -> Value {
    let output = idoc(dir)
        .args(["select", "--kind", kind, "--json"])
        .output()
        .expect("select should not crash");
    assert!(
        output.status.success(),
        "select failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("select --json should produce valid JSON")
}

fn ids(values: &Value) -> Vec<i64> {
    values
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v["id"].as_i64().expect("id"))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_store() {
    let dir = init_project();
    assert!(dir.path().join(".issuedoc/config.toml").exists());
    assert!(dir.path().join(".issuedoc/issues.sqlite3").exists());
}

#[test]
fn seed_then_select_keeps_three_bugs() {
    let dir = init_project();
    idoc(dir.path()).args(["seed"]).assert().success();

    let report = select_json(dir.path(), "bug");
    assert_eq!(report["total"], 6);
    let mut accepted = ids(&report["accepted"]);
    accepted.sort_unstable();
    assert_eq!(accepted, vec![1, 2, 4]);

    let rejected = report["rejected"].as_array().expect("array");
    let codes: Vec<&str> = rejected
        .iter()
        .map(|r| r["code"].as_str().expect("code"))
        .collect();
    assert_eq!(rejected.len(), 3);
    assert!(codes.contains(&"E2002"));
    assert!(codes.contains(&"E2003"));
    assert!(codes.contains(&"E2004"));

    // The extra key is gone from the projection.
    assert!(
        report["accepted"]
            .as_array()
            .expect("array")
            .iter()
            .all(|v| v.get("extra").is_none())
    );
}

#[test]
fn select_feature_requests() {
    let dir = init_project();
    idoc(dir.path()).args(["seed"]).assert().success();

    let report = select_json(dir.path(), "feature-request");
    assert_eq!(ids(&report["accepted"]), vec![3]);
    assert_eq!(report["accepted"][0]["sponsor_id"], 333);
}

#[test]
fn hide_other_drops_wrong_variant_rejections() {
    let dir = init_project();
    idoc(dir.path()).args(["seed"]).assert().success();

    let output = idoc(dir.path())
        .args(["select", "--hide-other", "--json"])
        .output()
        .expect("select");
    let report: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["rejected"].as_array().expect("array").len(), 2);
}

#[test]
fn insert_from_stdin_stores_valid_document() {
    let dir = init_project();
    idoc(dir.path())
        .args(["insert", "--format", "text"])
        .write_stdin(FEATURE)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok\t<stdin>\t3\tfeature-request"));

    let report = select_json(dir.path(), "all");
    assert_eq!(ids(&report["accepted"]), vec![3]);
}

#[test]
fn insert_rejects_invalid_and_stores_nothing_for_it() {
    let dir = init_project();
    std::fs::write(
        dir.path().join("batch.jsonl"),
        format!("{BUG}\n{BUG_MISSING_VERSION}\n"),
    )
    .expect("write batch");

    idoc(dir.path())
        .args(["insert", "--lines", "--format", "text", "batch.jsonl"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("ok\tbatch.jsonl:1\t1\tbug"))
        .stdout(predicate::str::contains(
            "rejected\tbatch.jsonl:2\tE2002\tmissing required field 'version_affected'",
        ));

    let report = select_json(dir.path(), "all");
    assert_eq!(ids(&report["accepted"]), vec![1]);
    assert_eq!(report["total"], 1);
}

#[test]
fn insert_dry_run_writes_nothing() {
    let dir = init_project();
    idoc(dir.path())
        .args(["insert", "--dry-run"])
        .write_stdin(BUG)
        .assert()
        .success();

    let report = select_json(dir.path(), "all");
    assert_eq!(report["total"], 0);
}

#[test]
fn check_reports_variant_conflict() {
    let dir = tempfile::tempdir().expect("temp dir");
    let both = r#"{"id":6,"reporter_id":66,"priority":6,"status":"new","severity":"high","version_affected":"1.0.0","sponsor_id":666}"#;
    let output = idoc(dir.path())
        .args(["check", "--json"])
        .write_stdin(both)
        .output()
        .expect("check");
    assert!(!output.status.success());

    let outcomes: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(outcomes[0]["ok"], false);
    assert_eq!(outcomes[0]["error_code"], "E2003");
}

#[test]
fn check_accepts_valid_bug() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = idoc(dir.path())
        .args(["check", "--json"])
        .write_stdin(BUG)
        .output()
        .expect("check");
    assert!(output.status.success());

    let outcomes: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(outcomes[0]["ok"], true);
    assert_eq!(outcomes[0]["issue"]["severity"], "low");
}

#[test]
fn db_flag_overrides_config() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db = dir.path().join("elsewhere/custom.sqlite3");
    idoc(dir.path())
        .args(["seed", "--db"])
        .arg(&db)
        .assert()
        .success();
    assert!(db.exists());
    assert!(!dir.path().join(".issuedoc/issues.sqlite3").exists());
}

#[test]
fn init_force_resets_table() {
    let dir = init_project();
    idoc(dir.path()).args(["seed"]).assert().success();
    idoc(dir.path())
        .args(["init", "--force", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("\tissue\t0\n"));
}

#[test]
fn malformed_config_fails_with_code() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::create_dir_all(dir.path().join(".issuedoc")).expect("mkdir");
    std::fs::write(dir.path().join(".issuedoc/config.toml"), "[store\n").expect("write");
    idoc(dir.path())
        .args(["select", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"));
}

#[test]
fn check_rejects_null_bug_key_on_feature_request() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = idoc(dir.path())
        .args(["check", "--json"])
        .write_stdin(
            r#"{"id":3,"reporter_id":33,"priority":3,"status":"new","sponsor_id":333,"severity":null}"#,
        )
        .output()
        .expect("check should not crash");
    assert!(!output.status.success());
    let outcomes: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(outcomes[0]["ok"], false);
    assert_eq!(outcomes[0]["error_code"], "E2002");
}

#[test]
fn bad_table_name_fails_with_store_code() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::create_dir_all(dir.path().join(".issuedoc")).expect("mkdir");
    std::fs::write(
        dir.path().join(".issuedoc/config.toml"),
        "[store]\ntable = \"1bad\"\n",
    )
    .expect("write");
    let output = idoc(dir.path())
        .args(["select", "--json"])
        .output()
        .expect("select should not crash");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let json_end = stderr.rfind('}').expect("json error on stderr") + 1;
    let json_start = stderr.find('{').expect("json error on stderr");
    let rendered: Value = serde_json::from_str(&stderr[json_start..json_end]).expect("json");
    assert_eq!(rendered["error"]["error_code"], "E4003");
}

#[test]
fn completions_for_bash() {
    let dir = tempfile::tempdir().expect("temp dir");
    idoc(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("idoc"));
}
