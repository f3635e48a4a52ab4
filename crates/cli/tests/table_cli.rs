// Integration tests for `lgrid show | export | emails | preview | keys`.
// Run with: cargo test -p leadgrid-cli --test table_cli

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn lgrid(config_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lgrid"));
    cmd.current_dir(config_dir);
    cmd.env("LEADGRID_CONFIG_DIR", config_dir);
    cmd.env_remove("APOLLO_KEY");
    cmd.env_remove("CONTACTOUT_KEY");
    cmd.env_remove("ZEROBOUNCE_KEY");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

// ── show ────────────────────────────────────────────────────────────

#[test]
fn show_renders_table() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "c.csv", "Name,Org\r\nAna,Acme\r\n\r\nBo,Initech\r\n");

    let output = lgrid(dir.path()).arg("show").arg(&csv).output().unwrap();
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "Name | Org\n\
         -----+--------\n\
         Ana  | Acme\n\
         Bo   | Initech\n"
    );
}

#[test]
fn show_empty_csv_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "empty.csv", "\n  \n");

    let output = lgrid(dir.path()).arg("show").arg(&csv).output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn show_missing_file_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let output = lgrid(dir.path())
        .args(["show", "does-not-exist.csv"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("cannot read"));
}

// ── export ──────────────────────────────────────────────────────────

#[test]
fn export_writes_default_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "c.csv", "Name,Org\r\nAna,Acme\r\n\r\n");

    let output = lgrid(dir.path()).arg("export").arg(&csv).arg("-q").output().unwrap();
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(dir.path().join("enriched_data.csv")).unwrap(),
        "Name,Org\nAna,Acme"
    );
}

#[test]
fn export_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "c.csv", "A,B\n1,2\n");

    let output = lgrid(dir.path())
        .arg("export")
        .arg(&csv)
        .args(["--out", "-"])
        .output()
        .unwrap();
    assert_eq!(stdout(&output), "A,B\n1,2\n");
}

// ── emails + preview ────────────────────────────────────────────────

#[test]
fn emails_then_preview_uses_handoff() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(
        dir.path(),
        "enriched.csv",
        "Name,Org,Apollo Email\nAna,Acme,ana@acme.io\nBo,Initech,\n",
    );

    let emails = lgrid(dir.path()).arg("emails").arg(&csv).output().unwrap();
    assert_eq!(emails.status.code(), Some(0), "stderr: {}", stderr(&emails));
    assert_eq!(stdout(&emails), "ana@acme.io\n");
    assert!(dir.path().join("handoff.csv").exists());

    let preview = lgrid(dir.path())
        .args(["preview", "--subject", "Hi {Name}", "--body", "Hi {Name}, from {Org}"])
        .output()
        .unwrap();
    assert_eq!(preview.status.code(), Some(0), "stderr: {}", stderr(&preview));
    let text = stdout(&preview);
    assert!(text.contains("── Preview for Row 1 ──\nSubject: Hi Ana\n\nHi Ana, from Acme\n"), "{}", text);
    assert!(text.contains("── Preview for Row 2 ──\nSubject: Hi Bo\n\nHi Bo, from Initech\n"), "{}", text);
}

#[test]
fn emails_without_email_column_exits_58() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "c.csv", "Name,Org\nAna,Acme\n");

    let output = lgrid(dir.path()).arg("emails").arg(&csv).output().unwrap();
    assert_eq!(output.status.code(), Some(58));
    assert!(stderr(&output).contains("no email column"));
}

#[test]
fn failed_emails_run_drops_previous_handoff() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "good.csv", "Name,Email\nAna,ana@acme.io\n");
    let bad = write(dir.path(), "bad.csv", "Name,Org\nBo,Initech\n");

    let first = lgrid(dir.path()).arg("emails").arg(&good).output().unwrap();
    assert_eq!(first.status.code(), Some(0), "stderr: {}", stderr(&first));
    assert!(dir.path().join("handoff.csv").exists());

    let second = lgrid(dir.path()).arg("emails").arg(&bad).output().unwrap();
    assert_eq!(second.status.code(), Some(58));
    assert!(!dir.path().join("handoff.csv").exists());

    let preview = lgrid(dir.path())
        .args(["preview", "--subject", "Hi {Name}"])
        .output()
        .unwrap();
    assert_eq!(preview.status.code(), Some(2));
    assert!(stderr(&preview).contains("load a CSV first"));
}

#[test]
fn unreadable_handoff_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("handoff.csv")).unwrap();

    let output = lgrid(dir.path())
        .args(["preview", "--subject", "Hi {Name}"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("handoff.csv"), "{}", stderr(&output));
    assert!(!stderr(&output).contains("load a CSV first"));
}

#[test]
fn preview_without_any_table_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let output = lgrid(dir.path())
        .args(["preview", "--subject", "Hi {Name}"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("load a CSV first"));
}

#[test]
fn preview_json_and_variables() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "c.csv", "Name,Org\nAna,Acme\n");

    let vars = lgrid(dir.path())
        .args(["preview", "--list-variables"])
        .arg(&csv)
        .output()
        .unwrap();
    assert_eq!(stdout(&vars), "{Name}\n{Org}\n");

    let json = lgrid(dir.path())
        .args(["preview", "--json", "--subject", "Hi {Name}, from {Org}", "--body", "{Missing}"])
        .arg(&csv)
        .output()
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&json.stdout).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([{"row": 1, "subject": "Hi Ana, from Acme", "body": "{Missing}"}])
    );
}

// ── keys ────────────────────────────────────────────────────────────

#[test]
fn keys_set_then_show_masks_values() {
    let dir = tempfile::tempdir().unwrap();

    let set = lgrid(dir.path())
        .args(["keys", "set", "--apollo", "ak_live_12345678"])
        .output()
        .unwrap();
    assert_eq!(set.status.code(), Some(0), "stderr: {}", stderr(&set));

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("keys.json")).unwrap()).unwrap();
    assert_eq!(stored, serde_json::json!({"APOLLO_KEY": "ak_live_12345678"}));

    let show = lgrid(dir.path())
        .env("ZEROBOUNCE_KEY", "zb_env_key")
        .args(["keys", "show"])
        .output()
        .unwrap();
    let text = stdout(&show);
    assert!(text.contains("************5678"), "{}", text);
    assert!(!text.contains("ak_live_12345678"), "{}", text);
    assert!(text.contains("keys.json"), "{}", text);
    assert!(text.contains("environment"), "{}", text);
    assert!(text.contains("(not set)"), "{}", text);
}

#[test]
fn keys_set_reports_nothing_saved_when_write_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("keys.json")).unwrap();

    let output = lgrid(dir.path())
        .args(["keys", "set", "--apollo", "ak_live_12345678"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let err = stderr(&output);
    assert!(!err.contains("key saved"), "{}", err);
    assert!(err.contains("Failed to write key store"), "{}", err);
}

#[test]
fn keys_set_without_flags_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let output = lgrid(dir.path()).args(["keys", "set"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
