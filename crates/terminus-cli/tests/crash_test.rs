//! Integration tests for `terminus crash` and `terminus config`.
//!
//! Every crash test runs the real binary and checks that it died by SIGABRT
//! after printing exactly the expected diagnostic.

use std::process::{Command, Output};

use terminus_core::VERSION_TAG;

/// Helper to run the terminus binary
fn terminus(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_terminus"))
        .args(args)
        .env_remove("TERMINUS_LOG")
        .output()
        .expect("Failed to execute terminus")
}

#[cfg(unix)]
fn assert_aborted(output: &Output) {
    use std::os::unix::process::ExitStatusExt;
    assert_eq!(
        output.status.signal(),
        Some(libc::SIGABRT),
        "status: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn callback_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .split("callback: ")
        .skip(1)
        .map(str::to_owned)
        .collect()
}

#[cfg(unix)]
#[test]
fn test_crash_with_pairs_delivers_exact_line() {
    let output = terminus(&[
        "crash",
        "--callback",
        "--message",
        "assertion failed",
        "--file",
        "storage.cpp",
        "--line",
        "42",
        "--detail",
        "expected=5",
        "--detail",
        "actual=7",
    ]);
    assert_aborted(&output);

    let lines = callback_lines(&output);
    assert_eq!(
        lines,
        vec![format!(
            "storage.cpp:42: {VERSION_TAG} assertion failed [expected: 5, actual: 7]\n"
        )]
    );
}

#[cfg(unix)]
#[test]
fn test_crash_without_callback_halts_without_notification() {
    let output = terminus(&[
        "crash", "--message", "bad state", "--file", "core.cpp", "--line", "7",
    ]);
    assert_aborted(&output);
    assert!(callback_lines(&output).is_empty());
}

#[cfg(unix)]
#[test]
fn test_crash_named_form() {
    let output = terminus(&[
        "crash",
        "--callback",
        "--message",
        "a < b",
        "--file",
        "btree.cpp",
        "--line",
        "311",
        "--named",
        "a, b",
        "--value",
        "9",
        "--value",
        "3",
    ]);
    assert_aborted(&output);
    assert_eq!(
        callback_lines(&output),
        vec![format!("btree.cpp:311: {VERSION_TAG} a < b with a, b = (9, 3). \n")]
    );
}

#[cfg(unix)]
#[test]
fn test_panicking_callback_still_aborts() {
    let output = terminus(&["crash", "--panicking-callback", "--message", "x"]);
    assert_aborted(&output);
}

#[cfg(unix)]
#[test]
fn test_racing_threads_all_converge_on_abort() {
    let output = terminus(&["crash", "--callback", "--threads", "4", "--message", "race"]);
    assert_aborted(&output);

    // A thread may be cut off mid-write by another thread's abort; only
    // newline-terminated segments are complete deliveries.
    let lines = callback_lines(&output);
    let complete: Vec<_> = lines.iter().filter(|l| l.ends_with('\n')).collect();
    assert!(!complete.is_empty());
    assert!(complete.len() <= 4);
    let expected = format!("terminus-cli:0: {VERSION_TAG} race\n");
    assert!(complete.iter().all(|l| **l == expected), "{lines:?}");
}

#[test]
fn test_too_many_pairs_rejected_without_abort() {
    let output = terminus(&[
        "crash", "--callback", "--detail", "a=1", "--detail", "b=2", "--detail", "c=3",
        "--detail", "d=4",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(callback_lines(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("too many --detail pairs"));
}

#[test]
fn test_config_show_outputs_toml() {
    let output = terminus(&["config", "show"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("[termination]"));
    assert!(stdout.contains("[logging]"));
}

#[test]
fn test_config_path() {
    let output = terminus(&["config", "path"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Global:"));
    assert!(stdout.contains("Project:"));
}

#[test]
fn test_config_init_in_temp_dir() {
    let temp = tempfile::tempdir().unwrap();
    let target = temp.path().join("cfg/config.toml");
    let target_str = target.to_string_lossy().into_owned();

    let output = terminus(&["config", "init", "--path", &target_str]);
    assert!(output.status.success());
    assert!(std::fs::read_to_string(&target)
        .unwrap()
        .contains("[termination]"));

    let again = terminus(&["config", "init", "--path", &target_str]);
    assert!(!again.status.success());
}
