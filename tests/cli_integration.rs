//! Integration tests for the `asml` binary.
//!
//! Every test runs against a fresh temporary directory holding the assembly
//! file and an isolated global config location.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BIKE: &str = r#"{
  "name": "bike",
  "nodes": [
    {"id": 1, "tag": "bike"},
    {"id": 2, "tag": "frame", "parent": 1, "leaf": true},
    {"id": 3, "tag": "wheel", "parent": 1},
    {"id": 4, "tag": "spoke", "parent": 3},
    {"id": 5, "tag": "rim", "parent": 3}
  ]
}"#;

/// Temp workspace with `bike.json`.
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("bike.json");
    fs::write(&file, BIKE).expect("Failed to write fixture");
    (dir, file)
}

/// `asml` with config isolated to `home`.
fn asml(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("asml").expect("binary built");
    cmd.env("ASML_CONFIG", home.join("config.toml"))
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("RUST_LOG");
    cmd
}

// =============================================================================
// show / lattice
// =============================================================================

#[test]
fn show_prints_sorted_tree() {
    let (dir, file) = workspace();
    asml(dir.path())
        .arg("show")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "  bike [1] (assembly)\n    frame [2] (part)\n    wheel [3] (assembly)\n      rim [5] (part)\n      spoke [4] (part)\n",
        ));
}

#[test]
fn show_honours_project_config() {
    let (dir, file) = workspace();
    let project = dir.path().join(".assembly-lattice");
    fs::create_dir_all(&project).unwrap();
    fs::write(
        project.join("config.toml"),
        "[sort]\nmode = \"identity\"\ndirection = \"descending\"\n",
    )
    .unwrap();

    asml(dir.path())
        .arg("show")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("spoke [4] (part)\n      rim [5]").not())
        .stdout(predicate::str::contains("wheel [3] (assembly)\n      rim [5] (part)\n      spoke [4]"));
}

#[test]
fn show_reports_unreadable_assembly() {
    let (dir, _) = workspace();
    asml(dir.path())
        .arg("show")
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn show_rejects_malformed_assembly() {
    let (dir, _) = workspace();
    let bad = dir.path().join("bad.json");
    fs::write(&bad, r#"{"nodes":[{"id":1,"tag":"a"},{"id":2,"tag":"b"}]}"#).unwrap();
    asml(dir.path())
        .arg("show")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid assembly"));
}

#[test]
fn lattice_lists_levels() {
    let (dir, file) = workspace();
    asml(dir.path())
        .arg("lattice")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("level 0\n  1 bike (0, 0) gray\n"))
        .stdout(predicate::str::contains("level 2\n"))
        .stdout(predicate::str::contains("  3 -> 4\n"));
}

#[test]
fn lattice_json_is_machine_readable() {
    let (dir, file) = workspace();
    let output = asml(dir.path())
        .args(["lattice", "--json"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["levels"][0], serde_json::json!([1]));
    assert_eq!(doc["levels"][2].as_array().unwrap().len(), 2);
    assert_eq!(doc["vertices"].as_array().unwrap().len(), 5);
    assert_eq!(doc["edges"].as_array().unwrap().len(), 4);
}

// =============================================================================
// edit
// =============================================================================

#[test]
fn edit_with_yes_applies_commands() {
    let (dir, file) = workspace();
    asml(dir.path())
        .args(["edit", "--yes"])
        .arg(&file)
        .args(["-c", "select 2 3", "-c", "assemble", "-c", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("selected: 2, 3"))
        .stdout(predicate::str::contains("assembled 2, 3 into 6"))
        .stdout(predicate::str::contains("Unnamed item [6] (assembly)"));

    // Edits live only for the session.
    let saved = fs::read_to_string(&file).unwrap();
    assert_eq!(saved, BIKE);
}

#[test]
fn edit_without_approval_is_cancelled() {
    let (dir, file) = workspace();
    asml(dir.path())
        .args(["edit", "--no-interactive"])
        .arg(&file)
        .args(["-c", "select 4", "-c", "remove", "-c", "tree"])
        .assert()
        .success()
        .stderr(predicate::str::contains("edit cancelled"))
        .stdout(predicate::str::contains("spoke [4] (part)"));
}

#[test]
fn edit_reads_commands_from_stdin() {
    let (dir, file) = workspace();
    asml(dir.path())
        .args(["edit", "-y"])
        .arg(&file)
        .write_stdin("# split the frame\nselect 2\ndisaggregate\nquit\nselect 1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("split 2 into 6, 7"))
        .stdout(predicate::str::contains("selected: 1").not());
}

#[test]
fn edit_reports_invalid_operations_and_continues() {
    let (dir, file) = workspace();
    asml(dir.path())
        .args(["edit", "--yes"])
        .arg(&file)
        .args(["-c", "select 1", "-c", "remove", "-c", "frobnicate", "-c", "ops"])
        .assert()
        .success()
        .stderr(predicate::str::contains("node 1 is the root"))
        .stderr(predicate::str::contains("frobnicate"))
        .stdout(predicate::str::contains("flatten"));
}

#[test]
fn edit_select_with_unknown_id_keeps_selection() {
    let (dir, file) = workspace();
    asml(dir.path())
        .args(["edit", "--yes"])
        .arg(&file)
        .args(["-c", "select 4", "-c", "select 2 99", "-c", "select 5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("node 99 does not exist"))
        .stdout(predicate::str::contains("selected: 4, 5\n"))
        .stdout(predicate::str::contains("selected: 4, 2").not());
}

#[test]
fn edit_moves_between_levels() {
    let (dir, file) = workspace();
    asml(dir.path())
        .args(["edit", "--yes"])
        .arg(&file)
        .args(["-c", "move 4 2", "-c", "move 3 5", "-c", "move 5 1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("moved 4 under 1"))
        .stderr(predicate::str::contains("within its own subtree"))
        .stderr(predicate::str::contains("node 1 is the root"));
}

// =============================================================================
// config
// =============================================================================

#[test]
fn config_set_then_get() {
    let (dir, _) = workspace();

    asml(dir.path())
        .args(["config", "set", "labels.new_part", "Widget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set labels.new_part = Widget"));
    assert!(dir.path().join("config.toml").exists());

    asml(dir.path())
        .args(["config", "get", "labels.new_part"])
        .assert()
        .success()
        .stdout("Widget\n");
}

#[test]
fn config_list_shows_every_key() {
    let (dir, _) = workspace();
    asml(dir.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Global configuration (defaults)"))
        .stdout(predicate::str::contains("sort.mode = alphabetical"))
        .stdout(predicate::str::contains("confirm_edits = true"));
}

#[test]
fn config_rejects_unknown_keys() {
    let (dir, _) = workspace();
    asml(dir.path())
        .args(["config", "get", "no.such.key"])
        .assert()
        .failure();
    asml(dir.path())
        .args(["config", "set", "sort.mode", "sideways"])
        .assert()
        .failure();
}

#[test]
fn configured_labels_reach_the_session() {
    let (dir, file) = workspace();
    asml(dir.path())
        .args(["config", "set", "labels.new_part", "Bolt"])
        .assert()
        .success();

    asml(dir.path())
        .args(["edit", "--yes"])
        .arg(&file)
        .args(["-c", "select 1", "-c", "add", "-c", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bolt [6] (part)"));
}

// =============================================================================
// completion
// =============================================================================

#[test]
fn completion_generates_script() {
    let (dir, _) = workspace();
    asml(dir.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("asml"));
}
