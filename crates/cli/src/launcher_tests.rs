use super::*;
use serial_test::serial;
use std::io::Write;

#[test]
fn read_startup_error_finds_the_error_line_after_the_marker() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let log_path = dir.path().join("rqd.log");
    let mut file = std::fs::File::create(&log_path).expect("create log");
    writeln!(file, "--- rqd: starting (pid: 111) ---").expect("write");
    writeln!(file, "ERROR failed to start rqd: failed to load workspace").expect("write");

    let message = read_startup_error(&log_path).expect("error line");
    assert_eq!(message, "failed to start rqd: failed to load workspace");
}

#[test]
fn read_startup_error_uses_the_most_recent_startup_span() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let log_path = dir.path().join("rqd.log");
    let mut file = std::fs::File::create(&log_path).expect("create log");
    writeln!(file, "--- rqd: starting (pid: 1) ---").expect("write");
    writeln!(file, "ERROR stale failure").expect("write");
    writeln!(file, "--- rqd: starting (pid: 2) ---").expect("write");
    writeln!(file, "ERROR fresh failure").expect("write");

    let message = read_startup_error(&log_path).expect("error line");
    assert_eq!(message, "fresh failure");
}

#[test]
fn read_startup_error_returns_none_without_an_error_line() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let log_path = dir.path().join("rqd.log");
    let mut file = std::fs::File::create(&log_path).expect("create log");
    writeln!(file, "--- rqd: starting (pid: 1) ---").expect("write");

    assert_eq!(read_startup_error(&log_path), None);
}

#[tokio::test]
#[serial]
async fn probe_status_reports_not_running_without_a_pid_file() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let workspace = dir.path().join("workspace");
    std::fs::create_dir_all(&workspace).expect("create workspace");

    std::env::set_var("XDG_RUNTIME_DIR", dir.path());
    let status = probe_status(&workspace).await.expect("probe");
    std::env::remove_var("XDG_RUNTIME_DIR");

    assert!(!status.running);
    assert!(!status.responsive);
    assert_eq!(status.pid, None);
}
