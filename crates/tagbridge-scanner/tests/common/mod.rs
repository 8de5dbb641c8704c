//! A device backed by a local directory, plus tiny real audio containers.
#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use tagbridge_core::TransportError;
use tagbridge_core::domain::{DeviceSession, DirEntry};
use tagbridge_core::ports::DeviceTransport;

pub const T0: u64 = 1_700_000_000;

pub fn at(secs: u64) -> SystemTime {
  UNIX_EPOCH + Duration::from_secs(secs)
}

pub fn set_mtime(path: &Path, when: SystemTime) {
  fs::File::options().write(true).open(path).unwrap().set_modified(when).unwrap();
}

/// `fLaC` + one STREAMINFO block, no audio frames.
pub fn write_flac(path: &Path) {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  let mut bytes = b"fLaC".to_vec();
  bytes.extend_from_slice(&[0x80, 0x00, 0x00, 0x22]);
  bytes.extend_from_slice(&[0x10, 0x00, 0x10, 0x00]);
  bytes.extend_from_slice(&[0x00; 6]);
  bytes.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0, 0x00, 0x00, 0x00, 0x00]);
  bytes.extend_from_slice(&[0x00; 16]);
  fs::write(path, bytes).unwrap();
}

/// Three silent MPEG-1 Layer III frames, no tag.
pub fn write_mp3(path: &Path) {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  let mut bytes = Vec::new();
  for _ in 0..3 {
    let mut frame = vec![0u8; 417];
    frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
    bytes.extend_from_slice(&frame);
  }
  fs::write(path, bytes).unwrap();
}

pub struct DirTransport {
  root: PathBuf,
  fail_list_for: Mutex<HashSet<String>>,
}

impl DirTransport {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into(), fail_list_for: Mutex::default() }
  }

  pub fn local(&self, remote: &str) -> PathBuf {
    self.root.join(remote.trim_start_matches('/'))
  }

  pub fn fail_list_for(&self, remote: &str) {
    self.fail_list_for.lock().unwrap().insert(remote.to_string());
  }
}

#[async_trait]
impl DeviceTransport for DirTransport {
  async fn list(&self, session: &DeviceSession, path: &str) -> Result<Vec<DirEntry>, TransportError> {
    session.ensure_active()?;
    if self.fail_list_for.lock().unwrap().contains(path) {
      return Err(TransportError::Command {
        command: format!("ls {path}"),
        status: "1".into(),
        stderr: "Permission denied".into(),
      });
    }

    let dir = fs::read_dir(self.local(path)).map_err(|_| TransportError::NotFound(path.to_string()))?;
    let mut entries = Vec::new();
    for item in dir.filter_map(|e| e.ok()) {
      let meta = item.metadata()?;
      let name = item.file_name().to_string_lossy().to_string();
      entries.push(DirEntry {
        path: format!("{}/{}", path.trim_end_matches('/'), name),
        name,
        is_directory: meta.is_dir(),
        size_bytes: meta.len(),
        modified_at: meta.modified().ok(),
      });
    }
    Ok(entries)
  }

  async fn pull(&self, session: &DeviceSession, remote_path: &str, local_path: &Path) -> Result<(), TransportError> {
    session.ensure_active()?;
    fs::copy(self.local(remote_path), local_path)?;
    Ok(())
  }

  async fn push(&self, session: &DeviceSession, local_path: &Path, remote_path: &str) -> Result<(), TransportError> {
    session.ensure_active()?;
    fs::copy(local_path, self.local(remote_path))?;
    Ok(())
  }

  async fn delete(&self, session: &DeviceSession, path: &str) -> Result<(), TransportError> {
    session.ensure_active()?;
    fs::remove_file(self.local(path))?;
    Ok(())
  }
}
