//! In-memory collaborators for exercising the core without a device or real
//! tag containers.
//!
//! `FakeCodec` stores tags as `key=value` lines in the file body, so a staged
//! copy carries its tags through pull/push exactly like a real container.
#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use tagbridge_core::domain::directory::sort_entries;
use tagbridge_core::domain::record::base_name;
use tagbridge_core::domain::{AudioFormat, DeviceSession, DirEntry, DirectoryNode, FileRecord, Rating};
use tagbridge_core::ports::{DeviceTransport, DirectoryScanner, ScanError, ScanReport, Side, TagCodec, TagPatch};
use tagbridge_core::services::RemoteStaging;
use tagbridge_core::{TagWriteError, TransportError};

pub const T0: u64 = 1_700_000_000;

pub fn at(secs: u64) -> SystemTime {
  UNIX_EPOCH + Duration::from_secs(secs)
}

pub fn set_mtime(path: &Path, when: SystemTime) {
  let file = fs::File::options().write(true).open(path).unwrap();
  file.set_modified(when).unwrap();
}

pub fn mtime(path: &Path) -> SystemTime {
  fs::metadata(path).unwrap().modified().unwrap()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
  pub title: String,
  pub artist: String,
  pub album: String,
  pub rating: u8,
}

impl Tags {
  pub fn new(title: &str, artist: &str, album: &str, rating: u8) -> Self {
    Self { title: title.into(), artist: artist.into(), album: album.into(), rating }
  }

  fn render(&self) -> String {
    format!("title={}\nartist={}\nalbum={}\nrating={}\n", self.title, self.artist, self.album, self.rating)
  }

  fn parse(body: &str) -> Option<Self> {
    let mut tags = Tags::default();
    for line in body.lines() {
      let (key, value) = line.split_once('=')?;
      match key {
        "title" => tags.title = value.to_string(),
        "artist" => tags.artist = value.to_string(),
        "album" => tags.album = value.to_string(),
        "rating" => tags.rating = value.parse().ok()?,
        _ => return None,
      }
    }
    Some(tags)
  }
}

pub fn write_tagged(path: &Path, tags: &Tags, modified: SystemTime) {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(path, tags.render()).unwrap();
  set_mtime(path, modified);
}

pub fn read_tagged(path: &Path) -> Tags {
  Tags::parse(&fs::read_to_string(path).unwrap()).unwrap()
}

#[derive(Default)]
pub struct FakeCodec {
  fail_writes_for: Mutex<HashSet<String>>,
}

impl FakeCodec {
  pub fn fail_writes_for(&self, filename: &str) {
    self.fail_writes_for.lock().unwrap().insert(filename.to_string());
  }
}

#[async_trait]
impl TagCodec for FakeCodec {
  async fn read(&self, path: &Path, format: AudioFormat) -> FileRecord {
    let meta = fs::metadata(path).ok();
    let identity = path.to_string_lossy().to_string();
    let filename = base_name(&identity).to_string();
    let mut record = FileRecord::from_stat(
      identity,
      filename,
      format,
      meta.as_ref().map(|m| m.len()).unwrap_or(0),
      meta.and_then(|m| m.modified().ok()),
    );

    if let Some(tags) = fs::read_to_string(path).ok().and_then(|b| Tags::parse(&b)) {
      record.title = tags.title;
      record.artist = tags.artist;
      record.album = tags.album;
      record.rating = Rating::new(tags.rating).unwrap_or_default();
    }
    record
  }

  async fn write(&self, path: &Path, patch: &TagPatch) -> Result<(), TagWriteError> {
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    if self.fail_writes_for.lock().unwrap().contains(&name) {
      return Err(TagWriteError::new(path.display().to_string(), "injected failure"));
    }

    let body = fs::read_to_string(path).map_err(|e| TagWriteError::new(path.display().to_string(), e.to_string()))?;
    let mut tags = Tags::parse(&body).unwrap_or_default();
    if let Some(v) = &patch.title {
      tags.title = v.clone();
    }
    if let Some(v) = &patch.artist {
      tags.artist = v.clone();
    }
    if let Some(v) = &patch.album {
      tags.album = v.clone();
    }
    if let Some(r) = patch.rating {
      tags.rating = r.stars();
    }
    fs::write(path, tags.render()).map_err(|e| TagWriteError::new(path.display().to_string(), e.to_string()))?;
    set_mtime(path, SystemTime::now());
    Ok(())
  }
}

/// Device whose storage is a plain local directory.
pub struct FakeTransport {
  root: PathBuf,
  fail_push_for: Mutex<HashSet<String>>,
  pub log: Mutex<Vec<String>>,
}

impl FakeTransport {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into(), fail_push_for: Mutex::default(), log: Mutex::default() }
  }

  pub fn local(&self, remote: &str) -> PathBuf {
    self.root.join(remote.trim_start_matches('/'))
  }

  pub fn fail_push_for(&self, filename: &str) {
    self.fail_push_for.lock().unwrap().insert(filename.to_string());
  }

  pub fn ops(&self) -> Vec<String> {
    self.log.lock().unwrap().clone()
  }

  fn record(&self, op: String) {
    self.log.lock().unwrap().push(op);
  }
}

fn io_err(e: std::io::Error) -> TransportError {
  TransportError::Io(e)
}

#[async_trait]
impl DeviceTransport for FakeTransport {
  async fn list(&self, session: &DeviceSession, path: &str) -> Result<Vec<DirEntry>, TransportError> {
    session.ensure_active()?;
    self.record(format!("list {path}"));
    let dir = fs::read_dir(self.local(path)).map_err(|_| TransportError::NotFound(path.to_string()))?;

    let mut entries = Vec::new();
    for item in dir {
      let item = item.map_err(io_err)?;
      let meta = item.metadata().map_err(io_err)?;
      let name = item.file_name().to_string_lossy().to_string();
      entries.push(DirEntry {
        path: format!("{}/{}", path.trim_end_matches('/'), name),
        name,
        is_directory: meta.is_dir(),
        size_bytes: meta.len(),
        modified_at: meta.modified().ok(),
      });
    }
    sort_entries(&mut entries);
    Ok(entries)
  }

  async fn pull(&self, session: &DeviceSession, remote_path: &str, local_path: &Path) -> Result<(), TransportError> {
    session.ensure_active()?;
    self.record(format!("pull {remote_path}"));
    fs::copy(self.local(remote_path), local_path).map_err(io_err)?;
    Ok(())
  }

  async fn push(&self, session: &DeviceSession, local_path: &Path, remote_path: &str) -> Result<(), TransportError> {
    session.ensure_active()?;
    self.record(format!("push {remote_path}"));
    if self.fail_push_for.lock().unwrap().contains(base_name(remote_path)) {
      return Err(TransportError::Command {
        command: format!("push {remote_path}"),
        status: "1".into(),
        stderr: "injected failure".into(),
      });
    }
    fs::copy(local_path, self.local(remote_path)).map_err(io_err)?;
    Ok(())
  }

  async fn delete(&self, session: &DeviceSession, path: &str) -> Result<(), TransportError> {
    session.ensure_active()?;
    self.record(format!("delete {path}"));
    fs::remove_file(self.local(path)).map_err(io_err)
  }
}

/// One-level scanner: enough to drive the orchestrator in isolation.
pub struct FlatScanner {
  pub staging: RemoteStaging<FakeCodec, FakeTransport>,
}

#[async_trait]
impl DirectoryScanner for FlatScanner {
  async fn scan(&self, root: &str, side: &Side) -> Result<ScanReport, ScanError> {
    let mut report = ScanReport::default();
    match side {
      Side::Local => {
        let dir = fs::read_dir(root)
          .map_err(|e| ScanError::DirectoryNotAccessible { path: root.into(), reason: e.to_string() })?;
        let mut paths: Vec<PathBuf> = dir.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        paths.sort();
        for path in paths {
          let name = path.file_name().unwrap().to_string_lossy().to_string();
          if let Some(format) = AudioFormat::from_file_name(&name) {
            report.records.push(self.staging.codec().read(&path, format).await);
          }
        }
      }
      Side::Remote(session) => {
        let entries =
          self.staging.transport().list(session, root).await.map_err(|e| ScanError::not_accessible(root, e))?;
        for entry in entries.iter().filter(|e| !e.is_directory) {
          if AudioFormat::from_file_name(&entry.name).is_some() {
            let rec = self.staging.read_remote_entry(session, entry).await.map_err(|e| ScanError::Internal(e.to_string()))?;
            report.records.push(rec);
          }
        }
      }
    }
    Ok(report)
  }

  async fn list_one_level(&self, _path: &str, _side: &Side) -> Result<Vec<DirectoryNode>, ScanError> {
    Ok(Vec::new())
  }
}
