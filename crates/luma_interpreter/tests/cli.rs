// CLI behavior: file mode, REPL mode, exit statuses.
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn luma() -> Command {
    Command::cargo_bin("luma").unwrap()
}

fn script(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn runs_a_script_file() {
    let file = script("local x = 40\nprint(x + 2)\n");
    luma()
        .arg(file.path())
        .assert()
        .success()
        .stdout("42\n");
}

#[test]
fn script_output_is_ordered() {
    let file = script("for i = 1, 3 do print(i) end\n");
    luma()
        .arg(file.path())
        .assert()
        .success()
        .stdout("1\n2\n3\n");
}

#[test]
fn syntax_errors_exit_nonzero_with_message() {
    let file = script("print(\n");
    luma()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected"));
}

#[test]
fn runtime_errors_exit_nonzero_and_suppress_output() {
    let file = script("print(1)\nprint(1 / 0)\n");
    luma()
        .arg(file.path())
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("divide by zero"));
}

#[test]
fn missing_file_reports_and_fails() {
    luma()
        .arg("definitely-not-a-real-file.luma")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open"));
}

#[test]
fn extra_arguments_print_usage() {
    luma()
        .arg("a")
        .arg("b")
        .assert()
        .failure()
        .stderr(predicate::str::contains("usage"));
}

#[test]
fn repl_interprets_each_line() {
    luma()
        .write_stdin("print(6 * 7)\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("42\n"));
}

#[test]
fn repl_state_does_not_persist_between_lines() {
    luma()
        .write_stdin("x = 1\nprint(x)\nquit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("undefined variable 'x'"));
}

#[test]
fn repl_survives_errors() {
    luma()
        .write_stdin("print(@)\nprint(2)\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2\n"))
        .stderr(predicate::str::contains("unexpected symbol"));
}
