use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::domain::record::base_name;
use crate::domain::{AudioFormat, DeviceSession, DirEntry, FileRecord};
use crate::errors::CoreError;
use crate::ports::{DeviceTransport, TagCodec, TagPatch};

/// Remote Staging Controller.
///
/// The device only moves whole files, so every remote read or write goes
/// through a local copy: pull → read/mutate with the codec → (push) → clean up.
///
/// Each call stages into its own fresh temporary directory, which is removed
/// on every exit path. The staged copy keeps the remote file name so the
/// codec can detect the container from the extension.
pub struct RemoteStaging<C, T> {
  codec: Arc<C>,
  transport: Arc<T>,
  temp_root: Option<PathBuf>,
}

impl<C, T> Clone for RemoteStaging<C, T> {
  fn clone(&self) -> Self {
    Self { codec: Arc::clone(&self.codec), transport: Arc::clone(&self.transport), temp_root: self.temp_root.clone() }
  }
}

impl<C, T> RemoteStaging<C, T>
where
  C: TagCodec,
  T: DeviceTransport,
{
  pub fn new(codec: Arc<C>, transport: Arc<T>) -> Self {
    Self { codec, transport, temp_root: None }
  }

  /// Stage below `root` instead of the system temp directory.
  pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
    self.temp_root = Some(root.into());
    self
  }

  pub fn codec(&self) -> &Arc<C> {
    &self.codec
  }

  pub fn transport(&self) -> &Arc<T> {
    &self.transport
  }

  /// Reads the tags of a remote file.
  ///
  /// The parent directory is listed to obtain the device-reported
  /// modification time, which overrides the time of the staged copy.
  pub async fn read_remote(&self, session: &DeviceSession, remote_path: &str) -> Result<FileRecord, CoreError> {
    session.ensure_active()?;
    let entry = self.lookup_entry(session, remote_path).await;
    self.read_staged(session, remote_path, entry.as_ref()).await
  }

  /// Same as [`read_remote`](Self::read_remote) when the listing entry is
  /// already at hand (directory scans).
  pub async fn read_remote_entry(&self, session: &DeviceSession, entry: &DirEntry) -> Result<FileRecord, CoreError> {
    session.ensure_active()?;
    self.read_staged(session, &entry.path, Some(entry)).await
  }

  /// pull → write → push. A failure at any step leaves the device copy as
  /// it was: the mutated file only reaches the device through `push`.
  pub async fn write_remote(&self, session: &DeviceSession, remote_path: &str, patch: &TagPatch) -> Result<(), CoreError> {
    session.ensure_active()?;
    if patch.is_empty() {
      debug!(remote = remote_path, "empty patch, device untouched");
      return Ok(());
    }

    let stage = self.stage_dir()?;
    let local = stage.path().join(base_name(remote_path));

    let result = async {
      self.transport.pull(session, remote_path, &local).await?;
      self.codec.write(&local, patch).await?;
      self.transport.push(session, &local, remote_path).await?;
      debug!(remote = remote_path, "remote tags written");
      Ok::<(), CoreError>(())
    }
    .await;

    release(stage);
    result
  }

  async fn read_staged(
    &self,
    session: &DeviceSession,
    remote_path: &str,
    entry: Option<&DirEntry>,
  ) -> Result<FileRecord, CoreError> {
    let filename = base_name(remote_path).to_string();
    let format = AudioFormat::from_file_name(&filename)
      .ok_or_else(|| CoreError::Staging(format!("not a supported audio file: {remote_path}")))?;

    let stage = self.stage_dir()?;
    let local = stage.path().join(&filename);

    let result = async {
      self.transport.pull(session, remote_path, &local).await?;
      let mut record = self.codec.read(&local, format).await;

      record.identity = remote_path.to_string();
      record.filename = filename.clone();
      if let Some(entry) = entry {
        record.size_bytes = entry.size_bytes;
        if entry.modified_at.is_some() {
          record.last_modified = entry.modified_at;
        }
      }
      Ok::<FileRecord, CoreError>(record)
    }
    .await;

    release(stage);
    result
  }

  async fn lookup_entry(&self, session: &DeviceSession, remote_path: &str) -> Option<DirEntry> {
    let parent = parent_of(remote_path);
    match self.transport.list(session, parent).await {
      Ok(entries) => entries.into_iter().find(|e| e.path == remote_path || e.name == base_name(remote_path)),
      Err(e) => {
        debug!(remote = remote_path, error = %e, "no listing for remote file, keeping staged mtime");
        None
      }
    }
  }

  fn stage_dir(&self) -> Result<TempDir, CoreError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("tagbridge-stage-");

    let dir = match &self.temp_root {
      Some(root) => builder.tempdir_in(root),
      None => builder.tempdir(),
    };

    dir.map_err(|e| CoreError::Staging(format!("create staging dir: {e}")))
  }
}

fn release(stage: TempDir) {
  let path = stage.path().to_path_buf();
  if let Err(e) = stage.close() {
    warn!(path = %path.display(), error = %e, "failed to remove staging dir");
  }
}

fn parent_of(remote_path: &str) -> &str {
  match remote_path.trim_end_matches('/').rsplit_once('/') {
    Some(("", _)) => "/",
    Some((parent, _)) => parent,
    None => ".",
  }
}
