use std::path::Path;

use async_trait::async_trait;
use futures::stream::{self, Stream};
use tracing::debug;

use tagbridge_core::domain::{AudioFormat, DeviceSession, DirEntry};
use tagbridge_core::ports::{DeviceTransport, ScanError};

/// Configuración para controlar el recorrido.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkConfig {
  pub ignore_hidden: bool,
  /// Niveles de subcarpeta bajo la raíz; 0 = sólo la raíz.
  pub max_depth: usize,
}

impl Default for WalkConfig {
  fn default() -> Self {
    Self { ignore_hidden: true, max_depth: 64 }
  }
}

#[derive(Debug)]
pub enum WalkItem {
  /// Archivo con extensión de audio reconocida.
  File { entry: DirEntry, format: AudioFormat },
  /// Subcarpeta que no se pudo listar; el recorrido sigue.
  Skipped { path: String, reason: String },
}

/// Listado de un nivel, local o remoto.
#[async_trait]
pub trait ListingSource: Send + Sync {
  async fn list(&self, path: &str) -> Result<Vec<DirEntry>, ScanError>;
}

pub struct LocalListing;

#[async_trait]
impl ListingSource for LocalListing {
  async fn list(&self, path: &str) -> Result<Vec<DirEntry>, ScanError> {
    tagbridge_fs::read_entries(Path::new(path))
      .await
      .map_err(|e| ScanError::DirectoryNotAccessible { path: path.to_string(), reason: e.to_string() })
  }
}

pub struct RemoteListing<'a, T> {
  transport: &'a T,
  session: &'a DeviceSession,
}

impl<'a, T> RemoteListing<'a, T> {
  pub fn new(transport: &'a T, session: &'a DeviceSession) -> Self {
    Self { transport, session }
  }
}

#[async_trait]
impl<T: DeviceTransport> ListingSource for RemoteListing<'_, T> {
  async fn list(&self, path: &str) -> Result<Vec<DirEntry>, ScanError> {
    let mut entries = self.transport.list(self.session, path).await.map_err(|e| ScanError::not_accessible(path, e))?;
    tagbridge_core::domain::sort_entries(&mut entries);
    Ok(entries)
  }
}

// Estado interno: carpeta por listar o listado en curso.
enum Frame {
  Pending { path: String, depth: usize },
  Open { entries: std::vec::IntoIter<DirEntry>, depth: usize },
}

/// Recorrido en profundidad con una pila explícita.
///
/// La raíz se lista antes de devolver el stream: si falla, el error es del
/// llamador. Después, una subcarpeta ilegible sale como
/// [`WalkItem::Skipped`]; cualquier otro error (dispositivo perdido) cierra
/// el stream tras emitirse.
pub async fn walk<S: ListingSource>(
  source: &S,
  root: &str,
  cfg: WalkConfig,
) -> Result<impl Stream<Item = Result<WalkItem, ScanError>> + Send, ScanError> {
  let entries = source.list(root).await?;
  let stack = vec![Frame::Open { entries: entries.into_iter(), depth: 0 }];

  Ok(stream::unfold(stack, move |mut stack| async move {
    loop {
      let top = stack.last_mut()?;

      match top {
        Frame::Pending { path, depth } => {
          let path = std::mem::take(path);
          let depth = *depth;
          stack.pop();

          match source.list(&path).await {
            Ok(entries) => stack.push(Frame::Open { entries: entries.into_iter(), depth }),
            Err(ScanError::DirectoryNotAccessible { path, reason }) => {
              return Some((Ok(WalkItem::Skipped { path, reason }), stack));
            }
            Err(e) => {
              stack.clear();
              return Some((Err(e), stack));
            }
          }
        }

        Frame::Open { entries, depth } => {
          let depth = *depth;
          let Some(entry) = entries.next() else {
            stack.pop();
            continue;
          };

          if cfg.ignore_hidden && entry.is_hidden() {
            continue;
          }

          if entry.is_directory {
            if depth < cfg.max_depth {
              stack.push(Frame::Pending { path: entry.path, depth: depth + 1 });
            } else {
              debug!(path = %entry.path, "max depth reached, not descending");
            }
            continue;
          }

          if let Some(format) = AudioFormat::from_file_name(&entry.name) {
            return Some((Ok(WalkItem::File { entry, format }), stack));
          }
        }
      }
    }
  }))
}

#[cfg(test)]
mod tests {
  use super::*;
  use futures::StreamExt;
  use std::collections::HashMap;

  /// Árbol en memoria: ruta → entradas.
  struct MapSource(HashMap<String, Vec<DirEntry>>);

  fn file(dir: &str, name: &str) -> DirEntry {
    DirEntry { name: name.into(), path: format!("{dir}/{name}"), is_directory: false, size_bytes: 1, modified_at: None }
  }

  fn folder(dir: &str, name: &str) -> DirEntry {
    DirEntry { is_directory: true, ..file(dir, name) }
  }

  #[async_trait]
  impl ListingSource for MapSource {
    async fn list(&self, path: &str) -> Result<Vec<DirEntry>, ScanError> {
      if path == "/m/gone" {
        return Err(ScanError::NoDeviceConnected);
      }
      self
        .0
        .get(path)
        .cloned()
        .ok_or_else(|| ScanError::DirectoryNotAccessible { path: path.into(), reason: "denied".into() })
    }
  }

  fn tree() -> MapSource {
    let mut map = HashMap::new();
    map.insert(
      "/m".to_string(),
      vec![
        file("/m", "a.mp3"),
        file("/m", "cover.jpg"),
        folder("/m", "A"),
        folder("/m", ".thumbs"),
        folder("/m", "locked"),
      ],
    );
    map.insert("/m/A".to_string(), vec![file("/m/A", "b.flac"), folder("/m/A", "B")]);
    map.insert("/m/A/B".to_string(), vec![file("/m/A/B", "c.ogg")]);
    map.insert("/m/.thumbs".to_string(), vec![file("/m/.thumbs", "x.mp3")]);
    MapSource(map)
  }

  async fn collect(source: &MapSource, cfg: WalkConfig) -> (Vec<String>, Vec<String>) {
    let stream = walk(source, "/m", cfg).await.unwrap();
    futures::pin_mut!(stream);
    let (mut files, mut skipped) = (Vec::new(), Vec::new());
    while let Some(item) = stream.next().await {
      match item.unwrap() {
        WalkItem::File { entry, .. } => files.push(entry.path),
        WalkItem::Skipped { path, .. } => skipped.push(path),
      }
    }
    files.sort();
    (files, skipped)
  }

  #[tokio::test]
  async fn walks_audio_files_and_skips_unreadable_folders() {
    let (files, skipped) = collect(&tree(), WalkConfig::default()).await;

    assert_eq!(files, ["/m/A/B/c.ogg", "/m/A/b.flac", "/m/a.mp3"]);
    assert_eq!(skipped, ["/m/locked"]);
  }

  #[tokio::test]
  async fn hidden_folders_are_entered_when_allowed() {
    let (files, _) = collect(&tree(), WalkConfig { ignore_hidden: false, max_depth: 64 }).await;

    assert!(files.contains(&"/m/.thumbs/x.mp3".to_string()));
  }

  #[tokio::test]
  async fn max_depth_limits_descent() {
    let (files, _) = collect(&tree(), WalkConfig { ignore_hidden: true, max_depth: 1 }).await;
    assert_eq!(files, ["/m/A/b.flac", "/m/a.mp3"]);

    let (files, skipped) = collect(&tree(), WalkConfig { ignore_hidden: true, max_depth: 0 }).await;
    assert_eq!(files, ["/m/a.mp3"]);
    assert!(skipped.is_empty());
  }

  #[tokio::test]
  async fn unreadable_root_is_an_error() {
    let err = walk(&tree(), "/nowhere", WalkConfig::default()).await.err().unwrap();
    assert!(matches!(err, ScanError::DirectoryNotAccessible { .. }));
  }

  #[tokio::test]
  async fn lost_device_ends_the_walk() {
    let mut source = tree();
    source.0.get_mut("/m").unwrap().push(folder("/m", "gone"));

    let stream = walk(&source, "/m", WalkConfig::default()).await.unwrap();
    futures::pin_mut!(stream);
    let mut items = Vec::new();
    while let Some(item) = stream.next().await {
      items.push(item);
    }

    assert!(matches!(items.last(), Some(Err(ScanError::NoDeviceConnected))));
  }
}
