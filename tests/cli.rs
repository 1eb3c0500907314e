#![allow(clippy::unwrap_used)]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ish(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ish").unwrap();
    cmd.current_dir(dir.path())
        .env("ISH_LOG_DIR", dir.path().join("logs"))
        .env("ISH_HISTORY", dir.path().join("history"))
        .env_remove("ISH_MODE")
        .env_remove("ISH_LOG_STDERR");
    cmd
}

#[test]
fn echoes_prompt_and_runs_command() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .write_stdin("echo hello\n")
        .assert()
        .success()
        .stdout("% echo hello\nhello\n% \n")
        .stderr("");
}

#[test]
fn blank_lines_are_silent() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .write_stdin("\n    \n\t\n")
        .assert()
        .success()
        .stderr("");
}

#[test]
fn redirections_without_spaces() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .write_stdin("echo \"a > b\">out.txt\ncat<out.txt\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("% cat<out.txt\na > b\n"));
    assert_eq!(
        fs::read_to_string(dir.path().join("out.txt")).unwrap(),
        "a > b\n"
    );
}

#[test]
fn environment_changes_reach_children() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .write_stdin(
            "setenv ISH_GREETING hola\nprintenv ISH_GREETING\nunsetenv ISH_GREETING\nprintenv ISH_GREETING >gone.txt\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("printenv ISH_GREETING\nhola\n"))
        .stderr("");
    assert_eq!(
        fs::read_to_string(dir.path().join("gone.txt")).unwrap(),
        ""
    );
}

#[test]
fn cd_changes_directory_for_children() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    ish(&dir)
        .write_stdin("cd sub\npwd >here.txt\n")
        .assert()
        .success()
        .stderr("");
    let recorded = fs::read_to_string(dir.path().join("sub/here.txt")).unwrap();
    assert!(recorded.trim_end().ends_with("/sub"), "pwd printed {:?}", recorded);
}

#[test]
fn cd_errors_are_reported() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .env_remove("HOME")
        .write_stdin("cd\ncd no-such-dir\ncd a b\n")
        .assert()
        .success()
        .stderr(
            "ish: HOME not set\nish: No such file or directory\nish: too many arguments\n",
        );
}

#[test]
fn builtin_argument_errors() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .write_stdin("setenv\nsetenv a b c\nunsetenv\nunsetenv a b\n")
        .assert()
        .success()
        .stderr(
            "ish: missing variable\nish: too many arguments\nish: missing variable\nish: too many arguments\n",
        );
}

#[test]
fn syntax_errors_are_reported_and_skipped() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .write_stdin("cat <\n>out\ncat <a <b\ncat >a >b\nsort <>x\necho \"open\necho fine\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("% echo fine\nfine\n"))
        .stderr(
            "ish: standard input redirection without file name\n\
             ish: missing command name\n\
             ish: multiple redirection of standard input\n\
             ish: multiple redirection of standard output\n\
             ish: standard input redirection without file name\n\
             ish: unmatched quote\n",
        );
    assert!(!dir.path().join("out").exists());
}

#[test]
fn missing_program_does_not_stop_the_shell() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .write_stdin("ish-no-such-program\necho still here\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("still here\n"))
        .stderr("ish: ish-no-such-program: No such file or directory\n");
}

#[test]
fn missing_input_file_fails_only_the_child() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .write_stdin("cat <missing.txt\necho next\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("next\n"))
        .stderr("ish: missing.txt: No such file or directory\n");
}

#[test]
fn exit_stops_reading() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .write_stdin("exit now\nexit\necho unreachable\n")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("unreachable\n").not())
        .stderr("ish: too many arguments\n");
}

#[test]
fn lex_mode_prints_tokens() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .env("ISH_MODE", "lex")
        .write_stdin("cat<\"in file\">out\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Token: cat (ordinary)\nToken: < (special)\nToken: in file (ordinary)\nToken: > (special)\nToken: out (ordinary)\n",
        ));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn syntax_mode_prints_commands() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .env("ISH_MODE", "syn")
        .write_stdin("sort -r <in >out\nexit\n<x\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Command name: sort\nCommand arg: -r\nCommand stdin: in\nCommand stdout: out\n",
        ))
        .stdout(predicate::str::contains("Command name: exit\n"))
        .stderr("ish: missing command name\n");
}

#[test]
fn writes_log_file() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .env("ISH_LOG_LEVEL", "debug")
        .write_stdin("true\n")
        .assert()
        .success();
    let logs: Vec<_> = fs::read_dir(dir.path().join("logs")).unwrap().collect();
    assert_eq!(logs.len(), 1);
}

#[test]
fn invalid_utf8_line_does_not_stop_the_shell() {
    let dir = TempDir::new().unwrap();
    ish(&dir)
        .write_stdin(&b"echo \xff\necho still-alive\n"[..])
        .assert()
        .success()
        .stdout(predicate::str::contains("echo \u{fffd}\n\u{fffd}\n"))
        .stdout(predicate::str::contains("% echo still-alive\nstill-alive\n"))
        .stderr("");
}

#[test]
fn user_errors_are_not_logged_to_stderr_fallback() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();
    ish(&dir)
        .env("ISH_LOG_DIR", blocker.join("logs"))
        .write_stdin("setenv\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("ish: missing variable\n"))
        .stderr(predicate::str::contains("- missing variable").not());
}
