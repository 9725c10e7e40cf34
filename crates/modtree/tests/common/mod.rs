//! Common test utilities shared across integration tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};

/// Path to the compiled modtree binary
pub fn modtree_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_modtree"))
}

/// Path to a file under `tests/fixtures`
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A modtree command with a clean, colorless environment
fn modtree_command(dir: &Path, args: &[&str]) -> Command {
    let mut command = Command::new(modtree_binary());
    command
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("MODTREE_GO")
        .env_remove("MODTREE_LAYOUT")
        .env_remove("MODTREE_TIMEOUT_SECS");
    command
}

/// Run the modtree binary in the specified directory
pub fn run_modtree_in_dir(dir: &Path, args: &[&str]) -> Output {
    modtree_command(dir, args)
        .output()
        .expect("Failed to execute modtree binary")
}

/// Run the modtree binary with extra environment variables
pub fn run_modtree_with_env(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut command = modtree_command(dir, args);
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().expect("Failed to execute modtree binary")
}

/// Run the modtree binary feeding `input` on stdin
pub fn run_modtree_with_stdin(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = modtree_command(dir, args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn modtree binary");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    child
        .wait_with_output()
        .expect("Failed to wait for modtree binary")
}

/// Start the modtree binary with a stdin pipe that stays open
pub fn spawn_modtree_with_open_stdin(dir: &Path, args: &[&str]) -> Child {
    modtree_command(dir, args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn modtree binary")
}

/// Wait for `child` to exit, killing it and failing the test after `limit`
pub fn wait_with_limit(mut child: Child, limit: Duration) -> Output {
    let deadline = Instant::now() + limit;
    while child.try_wait().expect("Failed to poll modtree binary").is_none() {
        if Instant::now() >= deadline {
            child.kill().expect("Failed to kill modtree binary");
            panic!("modtree did not exit within {limit:?}");
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    child
        .wait_with_output()
        .expect("Failed to collect modtree output")
}

/// Stdout as a string
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as a string
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
