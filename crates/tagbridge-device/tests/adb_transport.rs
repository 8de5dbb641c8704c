use std::io;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use tagbridge_core::TransportError;
use tagbridge_core::domain::DeviceSession;
use tagbridge_core::ports::{DeviceDiscovery, DeviceTransport};
use tagbridge_device::{AdbTransport, CommandOutput, CommandRunner};

/// Records every invocation; answers with the first rule whose needle
/// appears in the joined argument list.
#[derive(Default)]
struct ScriptedRunner {
  rules: Vec<(&'static str, CommandOutput)>,
  calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
  fn on(mut self, needle: &'static str, status: i32, stdout: &str, stderr: &str) -> Self {
    self.rules.push((
      needle,
      CommandOutput { status: Some(status), stdout: stdout.as_bytes().to_vec(), stderr: stderr.as_bytes().to_vec() },
    ));
    self
  }

  fn calls(&self) -> Vec<Vec<String>> {
    self.calls.lock().unwrap().clone()
  }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
  async fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
    assert_eq!(program, "/opt/adb");
    self.calls.lock().unwrap().push(args.to_vec());
    let joined = args.join(" ");
    Ok(
      self
        .rules
        .iter()
        .find(|(needle, _)| joined.contains(needle))
        .map(|(_, out)| out.clone())
        .unwrap_or(CommandOutput { status: Some(0), ..CommandOutput::default() }),
    )
  }
}

fn adb(runner: ScriptedRunner) -> AdbTransport<ScriptedRunner> {
  AdbTransport::with_runner(runner, "/opt/adb")
}

fn session() -> DeviceSession {
  DeviceSession::open("emulator-5554")
}

#[tokio::test]
async fn list_runs_find_with_stat_and_parses_entries() {
  let out = "regular file|10|1700000000|/sdcard/Music/a.mp3\ndirectory|0|1700000000|/sdcard/Music/Rock\n";
  let t = adb(ScriptedRunner::default().on("find", 0, out, ""));

  let entries = t.list(&session(), "/sdcard/Music").await.unwrap();

  assert_eq!(entries.len(), 2);
  assert_eq!(entries[0].name, "a.mp3");
  assert!(entries[1].is_directory);

  let calls = t.runner().calls();
  assert_eq!(calls[0][..3], ["-s", "emulator-5554", "shell"]);
  assert_eq!(
    calls[0][3],
    "find '/sdcard/Music' -mindepth 1 -maxdepth 1 -exec stat -c '%F|%s|%Y|%n' {} +"
  );
}

#[tokio::test]
async fn list_of_missing_folder_is_not_found() {
  let t = adb(ScriptedRunner::default().on("find", 1, "", "find: '/nope': No such file or directory"));

  let err = t.list(&session(), "/nope").await.unwrap_err();

  assert!(matches!(err, TransportError::NotFound(p) if p == "/nope"));
}

#[tokio::test]
async fn push_goes_through_a_sibling_and_a_rename() {
  let t = adb(ScriptedRunner::default());

  t.push(&session(), Path::new("/tmp/stage/a.mp3"), "/sdcard/Music/a.mp3").await.unwrap();

  let calls = t.runner().calls();
  assert_eq!(calls.len(), 2);
  assert_eq!(calls[0][2], "push");
  assert_eq!(calls[0][3], "/tmp/stage/a.mp3");
  let staged = calls[0][4].clone();
  assert!(staged.starts_with("/sdcard/Music/.a.mp3.tagbridge-"));
  assert_eq!(calls[1][3], format!("mv -f '{staged}' '/sdcard/Music/a.mp3'"));
}

#[tokio::test]
async fn failed_rename_removes_the_sibling() {
  let t = adb(ScriptedRunner::default().on("mv -f", 1, "", "mv: Read-only file system"));

  let err = t.push(&session(), Path::new("/tmp/a.mp3"), "/sdcard/Music/a.mp3").await.unwrap_err();

  assert!(matches!(err, TransportError::Command { .. }));
  let calls = t.runner().calls();
  assert_eq!(calls.len(), 3);
  assert!(calls[2][3].starts_with("rm -f '/sdcard/Music/.a.mp3.tagbridge-"));
}

#[tokio::test]
async fn pull_passes_paths_unquoted() {
  let t = adb(ScriptedRunner::default());

  t.pull(&session(), "/sdcard/Music/It's.mp3", Path::new("/tmp/x/It's.mp3")).await.unwrap();

  assert_eq!(t.runner().calls()[0], ["-s", "emulator-5554", "pull", "/sdcard/Music/It's.mp3", "/tmp/x/It's.mp3"]);
}

#[tokio::test]
async fn inactive_session_never_reaches_adb() {
  let t = adb(ScriptedRunner::default());
  let s = session();
  s.invalidate();

  let err = t.delete(&s, "/sdcard/a.mp3").await.unwrap_err();

  assert!(matches!(err, TransportError::NoDeviceConnected));
  assert!(t.runner().calls().is_empty());
}

#[tokio::test]
async fn vanished_device_invalidates_the_session() {
  let t = adb(ScriptedRunner::default().on("pull", 1, "", "adb: device 'emulator-5554' not found"));
  let s = session();

  let err = t.pull(&s, "/sdcard/a.mp3", Path::new("/tmp/a.mp3")).await.unwrap_err();

  assert!(matches!(err, TransportError::NoDeviceConnected));
  assert!(!s.is_active());
}

#[tokio::test]
async fn devices_lists_ready_serials() {
  let t = adb(ScriptedRunner::default().on(
    "devices",
    0,
    "List of devices attached\nemulator-5554\tdevice\nZY22\toffline\n",
    "",
  ));

  assert_eq!(t.devices().await.unwrap(), ["emulator-5554"]);
  assert_eq!(t.runner().calls()[0], ["devices"]);
}
