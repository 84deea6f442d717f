//! End-to-end round-trips through the real `toyc` binary: compile a source
//! string, assemble, link, run the result, and check its exit status.
//!
//! `spec.md` §8's six codegen scenarios are the out-of-process collaborators
//! this crate owns — the GNU assembler (`as`) and `ld` are explicitly
//! external, so when either is missing from `PATH` these tests print a
//! message and return early rather than failing; a CI image is not
//! guaranteed to carry them.

use assert_cmd::Command;
use predicates::str::contains;
use std::path::Path;
use tempfile::tempdir;

fn tool_available(tool: &str) -> bool {
    Command::new(tool).arg("--version").output().is_ok()
}

fn skip_if_tools_missing() -> bool {
    if !tool_available("as") || !tool_available("ld") {
        eprintln!("skipping: as/ld not found on PATH");
        return true;
    }
    false
}

/// Compiles `source`, runs the resulting binary, and returns its exit code.
fn run_and_get_exit_code(source: &str) -> i32 {
    let dir = tempdir().unwrap();
    let src_path = dir.path().join("prog.toy");
    std::fs::write(&src_path, source).unwrap();
    let out_path = dir.path().join("prog");

    Command::cargo_bin("toyc")
        .unwrap()
        .arg(&src_path)
        .arg("-o")
        .arg(&out_path)
        .assert()
        .success();

    let status = std::process::Command::new(&out_path).status().unwrap();
    status.code().expect("process terminated by signal")
}

#[test]
fn scenario_1_return_constant() {
    if skip_if_tools_missing() {
        return;
    }
    assert_eq!(run_and_get_exit_code("define main() { return 42; }"), 42);
}

#[test]
fn scenario_2_arithmetic_with_precedence() {
    if skip_if_tools_missing() {
        return;
    }
    let src = "define main() { let a = 2; let b = 3; return a + b * 4; }";
    assert_eq!(run_and_get_exit_code(src), 14);
}

#[test]
fn scenario_3_semicolon_separated_call_args() {
    if skip_if_tools_missing() {
        return;
    }
    let src = "define add(x; y) { return x + y; } define main() { return add(20; 22); }";
    assert_eq!(run_and_get_exit_code(src), 42);
}

#[test]
fn scenario_4_while_loop_sum() {
    if skip_if_tools_missing() {
        return;
    }
    let src = "define main() { let i = 0; let s = 0; while (i < 5) { s = s + i; i = i + 1; } return s; }";
    assert_eq!(run_and_get_exit_code(src), 10);
}

#[test]
fn scenario_5_if_else_equality() {
    if skip_if_tools_missing() {
        return;
    }
    let src = "define main() { if (1 == 1) { return 7; } else { return 9; } }";
    assert_eq!(run_and_get_exit_code(src), 7);
}

#[test]
fn scenario_6_recursive_factorial() {
    if skip_if_tools_missing() {
        return;
    }
    let src = "define fact(n) { if (n < 2) { return 1; } else { return n * fact(n - 1); } } define main() { return fact(5); }";
    assert_eq!(run_and_get_exit_code(src), 120);
}

#[test]
fn missing_source_argument_exits_with_clap_usage_error() {
    Command::cargo_bin("toyc").unwrap().assert().failure();
}

#[test]
fn lexical_error_exits_one() {
    let dir = tempdir().unwrap();
    let src_path = dir.path().join("bad.toy");
    std::fs::write(&src_path, "define main() { return 1 @ 2; }").unwrap();

    Command::cargo_bin("toyc")
        .unwrap()
        .arg(&src_path)
        .assert()
        .code(1)
        .stderr(contains("toyc: lexical error"));
}

#[test]
fn emit_asm_writes_file_and_skips_linking() {
    let dir = tempdir().unwrap();
    let src_path = dir.path().join("prog.toy");
    std::fs::write(&src_path, "define main() { return 1; }").unwrap();

    Command::cargo_bin("toyc")
        .unwrap()
        .arg(&src_path)
        .arg("--emit-asm")
        .assert()
        .success();

    let asm_path = src_path.with_extension("s");
    assert!(Path::new(&asm_path).exists());
    let contents = std::fs::read_to_string(&asm_path).unwrap();
    assert!(contents.contains(".text"));
    assert!(contents.contains("_start"));
}
