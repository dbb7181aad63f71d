use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run(dir: &Path, text: &str, script: &str, extra: &[&str]) -> Output {
    let text_path = dir.join("input.txt");
    let script_path = dir.join("edit.tws");
    fs::write(&text_path, text).unwrap();
    fs::write(&script_path, script).unwrap();
    let config = dir.join("tabwright.toml");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tabwright"));
    cmd.env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .arg("--script")
        .arg(&script_path)
        .args(extra)
        .arg(&text_path);
    cmd.output().unwrap()
}

#[test]
fn indents_selection_and_reports_it() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), "a\nb", "select 0 3\nkey tab\n", &[]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "  a\n  b");
    assert_eq!(String::from_utf8(out.stderr).unwrap(), "selection 0 7\n");
}

#[test]
fn config_controls_tab_unit() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tabwright.toml"), "[editor]\ntab_size = 4\n").unwrap();
    let out = run(dir.path(), "", "key tab\n", &[]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "    ");
}

#[test]
fn history_listing_and_undo() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), "x", "key end\nkey tab\nundo\n", &["--history"]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "x");
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.starts_with("selection 1 1\nhistory 2/3\n"), "{stderr}");
}

#[test]
fn bad_script_fails_with_line_number() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), "x", "undo\nselect 0 99\n", &[]);
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("script line 2"), "{stderr}");
}

#[test]
fn log_file_receives_events() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("replay.log");
    let log_arg = log.to_string_lossy().into_owned();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tabwright"));
    let script = dir.path().join("s.tws");
    fs::write(&script, "type hi\n").unwrap();
    let out = cmd
        .env("RUST_LOG", "runtime=info")
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .arg("--log-file")
        .arg(&log_arg)
        .arg("--script")
        .arg(&script)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "hi");
    let logged = fs::read_to_string(&log).unwrap();
    assert!(logged.contains("replay_complete"), "{logged}");
}
