//! End-to-end tests that drive the `clickflow` binary.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

fn clickflow(data_dir: &Path) -> Command {
  let mut command = Command::new(env!("CARGO_BIN_EXE_clickflow"));
  command
    .arg("--data-dir")
    .arg(data_dir)
    .env("RUST_LOG", "warn");
  command
}

#[test]
fn test_show_lists_saved_actions() {
  let temp_dir = tempfile::tempdir().unwrap();

  let status = clickflow(temp_dir.path())
    .args(["add", "showText", "text=Hello"])
    .status()
    .unwrap();
  assert!(status.success());

  let output = clickflow(temp_dir.path()).arg("show").output().unwrap();
  assert!(output.status.success());
  let stdout = String::from_utf8(output.stdout).unwrap();
  assert!(stdout.contains("[ Click Me! ]"));
  assert!(stdout.contains("1. "));
}

#[test]
fn test_prompt_answer_is_read_from_stdin() {
  let temp_dir = tempfile::tempdir().unwrap();

  let status = clickflow(temp_dir.path())
    .args(["add", "promptAndShow", "promptMessage=Name?", "prefix=Hi"])
    .status()
    .unwrap();
  assert!(status.success());

  let mut child = clickflow(temp_dir.path())
    .args(["--step-delay-ms", "0", "click"])
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::null())
    .spawn()
    .unwrap();

  {
    use std::io::Write;
    let mut stdin = child.stdin.take().unwrap();
    writeln!(stdin, "Ada").unwrap();
  }

  let output = child.wait_with_output().unwrap();
  assert!(output.status.success());
  assert!(String::from_utf8(output.stdout).unwrap().contains("Hi Ada"));
}

#[cfg(unix)]
#[test]
fn test_interrupt_exits_while_prompt_waits() {
  let temp_dir = tempfile::tempdir().unwrap();

  let status = clickflow(temp_dir.path())
    .args(["add", "promptAndShow", "promptMessage=Name?"])
    .status()
    .unwrap();
  assert!(status.success());

  // stdin stays open and silent, so the prompt never gets an answer.
  let mut child = clickflow(temp_dir.path())
    .arg("click")
    .stdin(Stdio::piped())
    .stdout(Stdio::null())
    .stderr(Stdio::piped())
    .spawn()
    .unwrap();
  let stdin = child.stdin.take().unwrap();

  let mut stderr = BufReader::new(child.stderr.take().unwrap());
  let mut line = String::new();
  loop {
    line.clear();
    let read = stderr.read_line(&mut line).unwrap();
    assert!(read > 0, "clickflow exited before prompting");
    if line.contains("[prompt] Name?") {
      break;
    }
  }

  // Give the signal listener time to install before interrupting.
  std::thread::sleep(Duration::from_millis(500));
  let status = Command::new("kill")
    .args(["-INT", &child.id().to_string()])
    .status()
    .unwrap();
  assert!(status.success());

  let deadline = Instant::now() + Duration::from_secs(5);
  let exit = loop {
    if let Some(exit) = child.try_wait().unwrap() {
      break Some(exit);
    }
    if Instant::now() >= deadline {
      break None;
    }
    std::thread::sleep(Duration::from_millis(50));
  };

  if exit.is_none() {
    child.kill().unwrap();
    child.wait().unwrap();
  }
  drop(stdin);

  let exit = exit.expect("clickflow kept running after SIGINT");
  assert!(exit.success());
}
