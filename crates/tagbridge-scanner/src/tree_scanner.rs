use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, info, warn};

use tagbridge_core::CoreError;
use tagbridge_core::domain::{AudioFormat, DirEntry, DirectoryNode, FileRecord, sort_nodes};
use tagbridge_core::ports::{DeviceTransport, DirectoryScanner, ScanError, ScanReport, Side, TagCodec};
use tagbridge_core::services::RemoteStaging;

use crate::config::ScannerConfig;
use crate::walker::{ListingSource, LocalListing, RemoteListing, WalkItem, walk};

/// Implementación de `DirectoryScanner` para ambos lados.
///
/// El recorrido es el mismo; sólo cambian el listado (filesystem o
/// transporte) y la lectura de cada archivo (codec directo o staging).
pub struct TreeScanner<C, T> {
  staging: RemoteStaging<C, T>,
  config: ScannerConfig,
}

impl<C, T> TreeScanner<C, T>
where
  C: TagCodec,
  T: DeviceTransport,
{
  pub fn new(staging: RemoteStaging<C, T>, config: ScannerConfig) -> Self {
    Self { staging, config }
  }

  pub fn config(&self) -> &ScannerConfig {
    &self.config
  }

  async fn collect<S: ListingSource>(&self, root: &str, source: &S, side: &Side) -> Result<ScanReport, ScanError> {
    let entries = walk(source, root, self.config.walk()).await?;
    futures::pin_mut!(entries);

    let mut report = ScanReport::default();

    // Secuencial: el transporte es un único canal con el dispositivo.
    while let Some(item) = entries.next().await {
      match item? {
        WalkItem::File { entry, format } => {
          report.records.push(self.read_record(entry, format, side).await?);
        }
        WalkItem::Skipped { path, reason } => {
          warn!(side = side.label(), path = %path, reason = %reason, "subdirectory skipped");
          report.skipped.push((path, reason));
        }
      }
    }

    info!(side = side.label(), root, records = report.records.len(), skipped = report.skipped.len(), "scan finished");
    Ok(report)
  }

  async fn read_record(&self, entry: DirEntry, format: AudioFormat, side: &Side) -> Result<FileRecord, ScanError> {
    match side {
      Side::Local => Ok(self.staging.codec().read(Path::new(&entry.path), format).await),
      Side::Remote(session) => match self.staging.read_remote_entry(session, &entry).await {
        Ok(record) => Ok(record),
        Err(CoreError::NoDeviceConnected) => Err(ScanError::NoDeviceConnected),
        Err(e) => {
          // Igual que un tag corrupto: el archivo sigue contando.
          warn!(path = %entry.path, error = %e, "remote read failed, using listing metadata");
          Ok(FileRecord::from_stat(entry.path, entry.name, format, entry.size_bytes, entry.modified_at))
        }
      },
    }
  }

  async fn list_dirs<S: ListingSource>(source: &S, path: &str) -> Result<Vec<DirectoryNode>, ScanError> {
    let mut nodes: Vec<DirectoryNode> =
      source.list(path).await?.iter().filter(|e| e.is_directory && !e.is_hidden()).map(DirectoryNode::from).collect();
    sort_nodes(&mut nodes);
    Ok(nodes)
  }
}

#[async_trait]
impl<C, T> DirectoryScanner for TreeScanner<C, T>
where
  C: TagCodec,
  T: DeviceTransport,
{
  async fn scan(&self, root: &str, side: &Side) -> Result<ScanReport, ScanError> {
    debug!(side = side.label(), root, "scan started");
    match side {
      Side::Local => self.collect(root, &LocalListing, side).await,
      Side::Remote(session) => {
        let source = RemoteListing::new(self.staging.transport().as_ref(), session);
        self.collect(root, &source, side).await
      }
    }
  }

  async fn list_one_level(&self, path: &str, side: &Side) -> Result<Vec<DirectoryNode>, ScanError> {
    match side {
      Side::Local => Self::list_dirs(&LocalListing, path).await,
      Side::Remote(session) => Self::list_dirs(&RemoteListing::new(self.staging.transport().as_ref(), session), path).await,
    }
  }
}
