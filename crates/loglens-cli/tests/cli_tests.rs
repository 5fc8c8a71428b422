//! Binary-level behaviour: exit codes, destinations, flag handling

use loglens_test_utils::{clean_log, temp_log, write_log, MAVEN_SYMBOL_FAILURE, SUREFIRE_NPE};
use pretty_assertions::assert_eq;
use std::process::{Command, Output};

fn loglens(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_loglens"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn report_to_nested_file() {
    let (dir, log) = temp_log(MAVEN_SYMBOL_FAILURE);
    let out = dir.path().join("reports/today/report.md");
    let output = loglens(&["report", log.to_str().unwrap(), out.to_str().unwrap()]);
    assert!(output.status.success());
    let text = std::fs::read_to_string(out).unwrap();
    assert!(text.contains("## Error 1: BRACKET_ERROR / SymbolNotFound"));
    assert!(text.contains("Analyzed at:"));
}

#[test]
fn bug_report_to_stdout() {
    let (_dir, log) = temp_log(MAVEN_SYMBOL_FAILURE);
    let output = loglens(&["bug-report", log.to_str().unwrap(), "-"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("**Failure Type**: SymbolNotFound"));
    assert!(text.contains("OrderService.java:[27,9]"));
}

#[test]
fn no_timestamp_is_reproducible() {
    let (_dir, log) = temp_log(SUREFIRE_NPE);
    let log = log.to_str().unwrap();
    let first = loglens(&["report", log, "-", "--no-timestamp"]);
    let second = loglens(&["report", log, "-", "--no-timestamp"]);
    assert!(first.status.success());
    assert_eq!(stdout(&first), stdout(&second));
    assert!(!stdout(&first).contains("Analyzed at:"));
}

#[test]
fn clean_log_exits_zero_with_tail() {
    let (_dir, log) = temp_log(clean_log(80));
    let output = loglens(&["report", log.to_str().unwrap(), "-", "--tail", "5"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("No failure patterns matched."));
    assert!(text.contains("Last 5 of 80 lines:"));
}

#[test]
fn search_with_cap() {
    let (_dir, log) = temp_log(SUREFIRE_NPE);
    let output = loglens(&["search", log.to_str().unwrap(), "NullPointer", "-n", "1", "-c", "0"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("2 matching line(s)"));
    assert!(text.contains("1 more matching line(s) not shown"));
}

#[test]
fn tail_lines() {
    let (_dir, log) = temp_log(clean_log(10));
    let output = loglens(&["tail", log.to_str().unwrap(), "-n", "2"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Last 2 of 10 lines:\n       9 | [INFO] progress step 9\n      10 | [INFO] progress step 10\n"
    );
}

#[test]
fn config_file_applies_and_flags_override() {
    let (dir, log) = temp_log(loglens_test_utils::error_burst(9));
    let config = write_log(dir.path(), "loglens.toml", "max_errors = 2\n");
    let log = log.to_str().unwrap();
    let config = config.to_str().unwrap();

    let output = loglens(&["report", log, "-", "--no-timestamp", "--config", config]);
    assert!(stdout(&output).contains("Errors shown:  2 of 9 found"));

    let output = loglens(&["report", log, "-", "--no-timestamp", "--config", config, "-m", "4"]);
    assert!(stdout(&output).contains("Errors shown:  4 of 9 found"));
}

#[test]
fn operational_failures_exit_one() {
    let (_dir, log) = temp_log("x");
    let log = log.to_str().unwrap();

    let missing = loglens(&["report", "/no/such/build.log", "-"]);
    assert_eq!(missing.status.code(), Some(1));
    assert!(missing.stdout.is_empty());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("error:"));

    assert_eq!(loglens(&["report", log, "-", "-e", "klingon-8"]).status.code(), Some(1));
    assert_eq!(loglens(&["report", log, "-", "-m", "0"]).status.code(), Some(1));
    assert_eq!(loglens(&["search", log, "(", "--regex"]).status.code(), Some(1));
}
