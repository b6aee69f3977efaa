use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/refFlat.txt")
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cdsmap"))
        .args(args)
        .output()
        .expect("failed to run cdsmap")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

#[test]
fn test_cli_terse_output() {
    let path = fixture();
    let output = run(&["NM_146145", "101153495", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "3462 1154");
}

#[test]
fn test_cli_terse_output_absent() {
    let path = fixture();
    let output = run(&["NM_146145", "101153494", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "None None");
}

#[test]
fn test_cli_verbose_output() {
    let path = fixture();
    let output = run(&["-v", "NM_000002", "2042", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "RefSeq ID: NM_000002\nGenomic Coordinate: 2042\nCDS Position: 1\nAmino Acid Position: 1"
    );
}

#[test]
fn test_cli_verbose_output_absent() {
    let path = fixture();
    let output = run(&["--verbose", "NM_899287", "101153495", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "RefSeq ID: NM_899287\nGenomic Coordinate: 101153495\nCDS Position: None\nAmino Acid Position: None"
    );
}

#[test]
fn test_cli_negative_coordinate_is_absent() {
    let path = fixture();
    let output = run(&["NM_146145", "-5", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "None None");

    let output = run(&["-v", "NM_146145", "-5", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "RefSeq ID: NM_146145\nGenomic Coordinate: -5\nCDS Position: None\nAmino Acid Position: None"
    );
}

#[test]
fn test_cli_custom_prefix() {
    let path = fixture();
    let output = run(&["-p", "XM", "XM_000005", "11", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "1 1");
}

#[test]
fn test_cli_rejects_missing_file() {
    let output = run(&["NM_146145", "101153495", "tests/data/does_not_exist.txt"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid file path"));
}

#[test]
fn test_cli_rejects_non_numeric_coordinate() {
    let path = fixture();
    let output = run(&["NM_146145", "chr7:101153495", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
