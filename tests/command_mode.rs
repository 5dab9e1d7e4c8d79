//! Integration tests for the sheets binary

use std::process::Command;

fn run(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_sheets"))
        // Tests must not depend on a user's ~/.config/sheets/config.toml.
        .arg("--config")
        .arg(temp_path("no_config.toml"))
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn temp_path(name: &str) -> String {
    std::env::temp_dir()
        .join(format!("sheets_cli_{}_{}", std::process::id(), name))
        .display()
        .to_string()
}

#[test]
fn test_basic_arithmetic() {
    let (stdout, _, code) = run(&["-c", "5 + 3"]);
    assert_eq!(stdout.trim(), "8");
    assert_eq!(code, 0);
}

#[test]
fn test_precedence() {
    let (stdout, _, code) = run(&["-c", "4*2.5 + 8.5+1.5 / 3.0 * (5.0005 + 0.0095)"]);
    assert_eq!(stdout.trim(), "21.005");
    assert_eq!(code, 0);
}

#[test]
fn test_auto_prepend_equals() {
    let (stdout1, _, _) = run(&["-c", "10 + 5"]);
    let (stdout2, _, _) = run(&["-c", "=10 + 5"]);
    assert_eq!(stdout1, stdout2);
}

#[test]
fn test_division_by_zero_is_not_an_error() {
    let (stdout, _, code) = run(&["-c", "22/0"]);
    assert_eq!(stdout.trim(), "Infinity");
    assert_eq!(code, 0);
}

#[test]
fn test_unknown_function_exit_code() {
    let (stdout, _, code) = run(&["-c", "length(\"abc\")"]);
    assert_eq!(stdout.trim(), "Unknown symbol length");
    assert_eq!(code, 1);
}

#[test]
fn test_reference_without_sheet_is_error() {
    let (stdout, _, code) = run(&["-c", "A1"]);
    assert_eq!(stdout.trim(), "Incorrect reference A1");
    assert_eq!(code, 1);
}

#[test]
fn test_pow_function() {
    let (stdout, _, code) = run(&["-c", "pow(2, 10)"]);
    assert_eq!(stdout.trim(), "1024");
    assert_eq!(code, 0);
}

#[test]
fn test_command_against_edits() {
    let (stdout, stderr, code) = run(&[
        "-v", "-s", "A1=20", "-s", "B1==A1+1", "-s", "A1=40", "-c", "B1",
    ]);
    assert_eq!(stdout.trim(), "41");
    assert!(stderr.contains("Invalidated: A1, B1"));
    assert_eq!(code, 0);
}

#[test]
fn test_markdown_to_stdout_uses_default_size() {
    let (stdout, _, code) = run(&["-s", "C8=last"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("|   | A | B | C |"));
    assert!(stdout.contains("| 8 |  |  | last |"));
}

#[test]
fn test_markdown_output_file() {
    let output_file = temp_path("export.md");
    let (_, stderr, code) = run(&["-s", "A1==pow(2, 10)", "-o", output_file.as_str()]);
    assert_eq!(code, 0);
    assert!(stderr.contains("Exported to"));

    let content = std::fs::read_to_string(&output_file).unwrap();
    assert!(content.contains("| 1 | 1024 |"));
    std::fs::remove_file(&output_file).ok();
}

#[test]
fn test_write_then_reopen() {
    let sheet_file = temp_path("sheet.json");
    let (_, _, code) = run(&["-s", "A1=2", "-s", "A2==A1*21", "-w", sheet_file.as_str()]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run(&[sheet_file.as_str(), "-c", "A2"]);
    assert_eq!(stdout.trim(), "42");
    assert_eq!(code, 0);

    let saved = std::fs::read_to_string(&sheet_file).unwrap();
    assert!(saved.contains("\"type\": \"SPARSE\""));
    std::fs::remove_file(&sheet_file).ok();
}

#[test]
fn test_deeply_nested_sheet_loads() {
    let sheet_file = temp_path("deep.json");
    let formula = format!("={}1{}", "-(".repeat(20_000), ")".repeat(20_000));
    let json = format!(
        r#"{{"type": "SPARSE", "rowCount": 8, "columnCount": 3, "cells": [{{"row": 0, "column": 0, "formula": "{}"}}]}}"#,
        formula
    );
    std::fs::write(&sheet_file, json).unwrap();

    let (stdout, _, code) = run(&[sheet_file.as_str(), "-c", "A1"]);
    std::fs::remove_file(&sheet_file).ok();
    assert_eq!(stdout.trim(), "Formula nested deeper than 512 levels");
    assert_eq!(code, 1);
}

#[test]
fn test_resize_flags() {
    let (stdout, _, code) = run(&["--extend", "0,2", "--shrink", "6,0"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("|   | A | B | C | D | E |"));
    assert_eq!(stdout.lines().count(), 4);
}

#[test]
fn test_cycle_is_reported() {
    let (stdout, _, code) = run(&["-s", "A1==B1+1", "-s", "B1==A1+1", "-c", "B1"]);
    assert_eq!(stdout.trim(), "Part of reference cycle");
    assert_eq!(code, 1);
}

#[test]
fn test_unknown_option() {
    let (_, stderr, code) = run(&["--frobnicate"]);
    assert!(stderr.contains("Unknown option: --frobnicate"));
    assert_eq!(code, 1);
}
