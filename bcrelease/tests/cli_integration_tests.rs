// bcrelease/tests/cli_integration_tests.rs
//! Command-line integration tests for the `bcrelease` binary.
//!
//! Each test lays out a scratch bc project (manifest, header, sources with a
//! 22-line license block) and a scratch toybox tree in temp directories, runs
//! the binary with `assert_cmd`, and checks exit status, streams and the
//! written `toys/pending/bc.c`.

use assert_cmd::Command;
use assert_cmd::assert::Assert;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use test_log::test;

const LICENSE_LINES: usize = 22;

fn with_license(body: &str) -> String {
    let mut text = String::new();
    for i in 0..LICENSE_LINES {
        text.push_str(&format!("// license {}\n", i));
    }
    text.push_str(body);
    text
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn scratch_project() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "toybox/files.txt", "include/num.h\nsrc/num.c\n");
    write(root, "toybox/header.c", "/* bc.c - arbitrary precision calculator */\n");
    write(
        root,
        "include/num.h",
        &with_license("#ifndef BC_NUM_H\n#define BC_NUM_H\n\n#include <stdbool.h>\n\nbool bc_num_zero(int n);\n\n#endif // BC_NUM_H\n"),
    );
    write(
        root,
        "src/num.c",
        &with_license("#include <assert.h>\n\nstatic bool bc_num_zero(int n) {\n  assert(n >= 0);\n  return n == 0 ? true : false;\n}\n"),
    );
    write(
        root,
        "src/bc.c",
        &with_license("BcStatus bc_main(unsigned int flags, BcVec *files) {\n  if (!files->len)\n    return BC_STATUS_IO_ERR;\n  bcg.posix = flags & BC_FLAG_S;\n  if (flags & BC_FLAG_Q) bcg.tty = 0;\n}\n"),
    );
    dir
}

/// A toybox tree with the `toys/pending` directory bc.c is written into.
fn scratch_toybox() -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("toys/pending")).unwrap();
    dir
}

fn bcrelease(project: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("bcrelease"));
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("BCRELEASE_PROJECT_DIR");
    cmd.arg("--project-dir").arg(project);
    cmd
}

fn run(project: &Path, toybox: &Path, args: &[&str]) -> Assert {
    bcrelease(project).arg(toybox).args(args).assert()
}

const EXPECTED: &str = concat!(
    "/* bc.c - arbitrary precision calculator */\n",
    "\n",
    "int bc_num_zero(int n);\n",
    "\n",
    "int bc_num_zero(int n) {\n",
    "  return n == 0 ? 1 : 0;\n",
    "}\n",
    "void bc_main(void) {\n",
    "  if (!toys.optc)\n",
    "    return;\n",
    "\n",
    "  if (toys.optflags & FLAG_q) TT.tty = 0;\n",
    "}\n",
);

#[test]
fn missing_toybox_dir_prints_usage_and_exits_1() {
    let cwd = tempdir().unwrap();
    Command::new(assert_cmd::cargo_bin!("bcrelease"))
        .current_dir(cwd.path())
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("usage: ").and(predicate::str::contains("toybox_dir")));
    assert_eq!(fs::read_dir(cwd.path()).unwrap().count(), 0);
}

#[test]
fn writes_merged_bc_c() {
    let project = scratch_project();
    let toybox = scratch_toybox();

    run(project.path(), toybox.path(), &["--skip-build", "--quiet"]).success();

    let written = fs::read_to_string(toybox.path().join("toys/pending/bc.c")).unwrap();
    assert_eq!(written, EXPECTED);
}

#[test]
fn trailing_separator_on_toybox_dir_is_fine() {
    let project = scratch_project();
    let toybox = scratch_toybox();
    let with_slash = format!("{}/", toybox.path().display());

    bcrelease(project.path())
        .arg(&with_slash)
        .arg("--skip-build")
        .assert()
        .success();

    assert!(toybox.path().join("toys/pending/bc.c").exists());
}

#[cfg(unix)]
#[test]
fn failing_build_step_propagates_its_exit_code() {
    let project = scratch_project();
    let toybox = tempdir().unwrap();
    write(toybox.path(), "toys/pending/bc.c", "stale");

    run(
        project.path(),
        toybox.path(),
        &["--build-cmd", "sh", "--build-arg", "-c", "--build-arg", "exit 3"],
    )
    .code(3)
    .stdout("")
    .stderr("");

    assert_eq!(fs::read_to_string(toybox.path().join("toys/pending/bc.c")).unwrap(), "stale");
}

#[cfg(unix)]
#[test]
fn build_step_runs_in_project_dir() {
    let project = scratch_project();
    let toybox = scratch_toybox();

    run(
        project.path(),
        toybox.path(),
        &["--build-cmd", "sh", "--build-arg", "-c", "--build-arg", "touch lib-built"],
    )
    .success();

    assert!(project.path().join("lib-built").exists());
    assert!(toybox.path().join("toys/pending/bc.c").exists());
}

#[test]
fn stdout_mode_prints_without_writing() {
    let project = scratch_project();
    let toybox = tempdir().unwrap();

    run(project.path(), toybox.path(), &["--skip-build", "--stdout"])
        .success()
        .stdout(EXPECTED);

    assert!(!toybox.path().join("toys").exists());
}

#[test]
fn summary_lists_rules_on_stderr() {
    let project = scratch_project();
    let toybox = scratch_toybox();

    run(project.path(), toybox.path(), &["--skip-build", "--summary"])
        .success()
        .stderr(
            predicate::str::contains("Rewrite Summary")
                .and(predicate::str::contains("bc_main_signature"))
                .and(predicate::str::contains("matched nothing")),
        );
}

#[test]
fn diff_shows_changes_against_previous_output() {
    let project = scratch_project();
    let toybox = tempdir().unwrap();
    write(
        toybox.path(),
        "toys/pending/bc.c",
        &EXPECTED.replace("if (toys.optflags & FLAG_q) TT.tty = 0;", "TT.tty = 1;"),
    );

    run(project.path(), toybox.path(), &["--skip-build", "--diff"])
        .success()
        .stderr(
            predicate::str::contains("-  TT.tty = 1;")
                .and(predicate::str::contains("+  if (toys.optflags & FLAG_q) TT.tty = 0;")),
        );
}

#[test]
fn disabled_rules_are_not_applied() {
    let project = scratch_project();
    let toybox = scratch_toybox();

    run(project.path(), toybox.path(), &["--skip-build", "--disable", "include"]).success();

    let written = fs::read_to_string(toybox.path().join("toys/pending/bc.c")).unwrap();
    assert!(written.contains("#include <stdbool.h>"));
}

#[test]
fn user_config_adds_rules_and_layout() {
    let project = scratch_project();
    let toybox = tempdir().unwrap();
    fs::create_dir_all(toybox.path().join("toys/other")).unwrap();
    let config_path = project.path().join("release.yaml");
    fs::write(
        &config_path,
        r#"
layout:
  output: "toys/other/bc.c"
rules:
  replacements:
    - name: "rename_zero"
      pattern: 'bc_num_zero'
      replace_with: 'bc_num_is_zero'
"#,
    )
    .unwrap();

    run(
        project.path(),
        toybox.path(),
        &["--skip-build", "--config", config_path.to_str().unwrap()],
    )
    .success();

    let written = fs::read_to_string(toybox.path().join("toys/other/bc.c")).unwrap();
    assert!(written.contains("int bc_num_is_zero(int n) {"));
    assert!(!written.contains("#include"));
}

#[test]
fn invalid_user_config_fails() {
    let project = scratch_project();
    let toybox = tempdir().unwrap();
    let config_path = project.path().join("broken.yaml");
    fs::write(
        &config_path,
        "rules:\n  deletions:\n    - name: \"bad\"\n      pattern: '(unclosed'\n",
    )
    .unwrap();

    run(
        project.path(),
        toybox.path(),
        &["--skip-build", "--config", config_path.to_str().unwrap()],
    )
    .failure()
    .stderr(predicate::str::contains("invalid regex pattern"));

    assert!(!toybox.path().join("toys").exists());
}

#[test]
fn missing_manifest_fails_without_output() {
    let project = tempdir().unwrap();
    let toybox = tempdir().unwrap();

    run(project.path(), toybox.path(), &["--skip-build"])
        .failure()
        .stderr(predicate::str::contains("files.txt"));

    assert!(!toybox.path().join("toys").exists());
}

#[test]
fn stale_output_that_is_not_utf8_is_overwritten() {
    let project = scratch_project();
    let toybox = scratch_toybox();
    let out = toybox.path().join("toys/pending/bc.c");
    fs::write(&out, [0xff, 0xfe, 0x00, b'\n']).unwrap();

    run(project.path(), toybox.path(), &["--skip-build", "--quiet"]).success();
    assert_eq!(fs::read_to_string(&out).unwrap(), EXPECTED);

    fs::write(&out, [0xff, 0xfe, 0x00, b'\n']).unwrap();
    run(project.path(), toybox.path(), &["--skip-build", "--diff"])
        .success()
        .stderr(predicate::str::contains("+int bc_num_zero(int n);"));
    assert_eq!(fs::read_to_string(&out).unwrap(), EXPECTED);
}

#[test]
fn nonexistent_toybox_dir_fails_without_creating_it() {
    let project = scratch_project();
    let parent = tempdir().unwrap();
    let typo = parent.path().join("toybxo");

    bcrelease(project.path())
        .arg(&typo)
        .arg("--skip-build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("toybxo"));

    assert!(!typo.exists());
}
