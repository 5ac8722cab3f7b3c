//! S4 (idle watchdog shuts the daemon down on its own) from §8.
//!
//! The idle timeout is only configurable in whole minutes (§4.7), so this
//! waits out a real minute-plus rather than faking the clock — matching the
//! scenario's own "idle for 65s" framing.

use serial_test::serial;

use crate::prelude::*;

#[test]
#[serial]
fn s4_daemon_shuts_itself_down_after_the_idle_timeout_elapses() {
    let ws = Workspace::single_file();

    // A short check interval so the watchdog notices promptly once the
    // 1-minute threshold is crossed, without changing the threshold itself.
    std::env::set_var("RQ_IDLE_CHECK_MS", "500");
    let mut child = ws.spawn_daemon(Some(1));
    std::env::remove_var("RQ_IDLE_CHECK_MS");

    assert!(wait_for(10_000, || ws.pid_path().exists()), "daemon never wrote its PID file");

    assert!(
        wait_for(75_000, || !ws.pid_path().exists() && !ws.socket_path().exists()),
        "daemon did not shut itself down within the idle timeout"
    );

    let status = child.wait().expect("wait for daemon exit");
    assert!(status.success(), "daemon exited with {status}");
}
