use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Get the path to the tp-renumber binary
fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tp-renumber"))
}

/// Get the path to the fixtures directory
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Copy a fixture into `dir` under the same name
fn copy_fixture(name: &str, dir: &Path) -> PathBuf {
    let target = dir.join(name);
    fs::copy(fixtures_dir().join(name), &target).expect("Failed to copy fixture");
    target
}

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(bin_path())
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("Failed to execute binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_renumber_rewrites_file() {
    let dir = tempfile::tempdir().unwrap();
    let program = copy_fixture("MAIN.ls", dir.path());

    let output = run(&["renumber", "--file", program.to_str().unwrap()], dir.path());

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    let text = stdout(&output);
    assert!(text.contains("Renumbered 10 line(s)"), "Unexpected output: {}", text);
    assert!(text.contains("Final checksum:"), "Missing checksum in output");

    let expected = fs::read_to_string(fixtures_dir().join("MAIN.expected.ls")).unwrap();
    assert_eq!(fs::read_to_string(&program).unwrap(), expected);
}

#[test]
fn test_renumber_canonical_file_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let program = copy_fixture("MAIN.expected.ls", dir.path());

    let output = run(&["renumber", "--file", program.to_str().unwrap()], dir.path());

    assert!(output.status.success());
    assert!(stdout(&output).contains("already canonical"), "Unexpected output: {}", stdout(&output));
}

#[test]
fn test_check_mode_does_not_write() {
    let dir = tempfile::tempdir().unwrap();
    let program = copy_fixture("MAIN.ls", dir.path());
    let before = fs::read_to_string(&program).unwrap();

    let output = run(&["renumber", "--check", "--file", program.to_str().unwrap()], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("10 line(s) need renumbering"));
    assert_eq!(fs::read_to_string(&program).unwrap(), before);
}

#[test]
fn test_cursor_outside_body_skips_pass() {
    let dir = tempfile::tempdir().unwrap();
    let program = copy_fixture("MAIN.ls", dir.path());

    let output = run(&["renumber", "--line", "1", "--file", program.to_str().unwrap()], dir.path());

    assert!(output.status.success());
    assert!(stdout(&output).contains("Nothing to renumber"));
}

#[test]
fn test_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let program = copy_fixture("CONT.ls", dir.path());

    let output = run(&["renumber", "--json", "--file", program.to_str().unwrap()], dir.path());

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("Output should be valid JSON");
    assert!(json["success"].as_bool().unwrap());
    assert!(json["renumbered"].as_bool().unwrap());
    assert_eq!(json["applied_count"], 4);
    assert!(json["final_checksum"].is_string());
    assert!(json["execution_id"].is_string());
}

#[test]
fn test_report_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let program = copy_fixture("CONT.ls", dir.path());
    let report = dir.path().join("report.json");

    let output = run(
        &[
            "renumber",
            "--json",
            "--file",
            program.to_str().unwrap(),
            "--output",
            report.to_str().unwrap(),
        ],
        dir.path(),
    );

    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["file"], program.to_str().unwrap());
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = run(&["renumber", "--file", "NOPE.ls"], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Failed to read file"));
}

#[test]
fn test_disabled_auto_renumber_still_allows_manual_run() {
    let dir = tempfile::tempdir().unwrap();
    let program = copy_fixture("CONT.ls", dir.path());
    fs::write(dir.path().join("tp-renumber.toml"), "auto_line_renumber = false\n").unwrap();

    let output = run(&["renumber", "--file", program.to_str().unwrap()], dir.path());

    assert!(output.status.success());
    let expected = fs::read_to_string(fixtures_dir().join("CONT.expected.ls")).unwrap();
    assert_eq!(fs::read_to_string(&program).unwrap(), expected);
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let program = copy_fixture("CONT.ls", dir.path());
    let config = dir.path().join("bad.toml");
    fs::write(&config, "auto_line_renumber = \"yes\"\n").unwrap();

    let output = run(
        &["--config", config.to_str().unwrap(), "renumber", "--file", program.to_str().unwrap()],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid config"));
}

#[test]
fn test_rename_in_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("A.ls"), "   1:  R[1:COUNT]=0 ;\n").unwrap();
    fs::write(dir.path().join("B.LS"), "   1:  R[1:COUNT]=R[1:COUNT]+1 ;\n").unwrap();
    fs::write(dir.path().join("C.txt"), "R[1:COUNT]\n").unwrap();

    let output = run(
        &[
            "rename",
            "--dir",
            dir.path().to_str().unwrap(),
            "--item",
            "R[1:COUNT]",
            "--old-name",
            "COUNT",
            "--new-name",
            "PARTS",
        ],
        dir.path(),
    );

    assert!(output.status.success(), "Binary failed: {:?}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("Renamed 3 occurrence(s) in 2 of 2 file(s)"));
    assert_eq!(fs::read_to_string(dir.path().join("B.LS")).unwrap(), "   1:  R[1:PARTS]=R[1:PARTS]+1 ;\n");
    assert_eq!(fs::read_to_string(dir.path().join("C.txt")).unwrap(), "R[1:COUNT]\n");
}

#[test]
fn test_rename_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent");

    let output = run(
        &[
            "rename",
            "--json",
            "--dir",
            missing.to_str().unwrap(),
            "--item",
            "A",
            "--old-name",
            "A",
            "--new-name",
            "B",
        ],
        dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("Directory not found"));
}

#[test]
fn test_goto_finds_called_program() {
    let dir = tempfile::tempdir().unwrap();
    let program = dir.path().join("MAIN.ls");
    fs::write(&program, "/MN\n   1:  CALL PICK_PART ;\n/END\n").unwrap();
    fs::create_dir(dir.path().join("lib")).unwrap();
    fs::write(dir.path().join("lib").join("PICK_PART.ls"), "/PROG PICK_PART\n").unwrap();

    let found = run(
        &["goto", "--file", program.to_str().unwrap(), "--line", "2", "--column", "9"],
        dir.path(),
    );
    assert!(found.status.success());
    assert!(stdout(&found).trim_end().ends_with("PICK_PART.ls"));

    let with_root = run(
        &["goto", "--file", program.to_str().unwrap(), "--line", "2", "--column", "9", "--root", "lib"],
        dir.path(),
    );
    assert!(with_root.status.success());
    assert!(stdout(&with_root).contains("PICK_PART.ls"));

    fs::remove_file(dir.path().join("lib").join("PICK_PART.ls")).unwrap();
    let not_found = run(
        &["goto", "--file", program.to_str().unwrap(), "--line", "2", "--column", "9"],
        dir.path(),
    );
    assert_eq!(not_found.status.code(), Some(1));
    assert!(stdout(&not_found).contains("Program 'PICK_PART.ls' not found in workspace."));
}
