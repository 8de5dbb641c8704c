use std::io;
use std::path::Path;

use tagbridge_core::domain::{DirEntry, sort_entries};
use tokio::fs;
use tracing::{debug, warn};

/// Lista un nivel de un directorio local.
///
/// - Symlinks are skipped, so a walk over these listings cannot loop.
/// - Un error al abrir `path` se propaga; errores de una entrada concreta se
///   registran y la entrada se omite.
/// - El resultado sale ordenado por nombre (case-insensitive).
pub async fn read_entries(path: &Path) -> io::Result<Vec<DirEntry>> {
  let mut rd = fs::read_dir(path).await?;
  let mut entries = Vec::new();

  loop {
    let entry = match rd.next_entry().await {
      Ok(Some(entry)) => entry,
      Ok(None) => break,
      Err(e) => {
        warn!(dir = %path.display(), error = %e, "directory read interrupted");
        break;
      }
    };

    let entry_path = entry.path();
    let ft = match entry.file_type().await {
      Ok(ft) => ft,
      Err(e) => {
        warn!(path = %entry_path.display(), error = %e, "file type unavailable, skipped");
        continue;
      }
    };

    if ft.is_symlink() {
      debug!(path = %entry_path.display(), "symlink skipped");
      continue;
    }

    let (size_bytes, modified_at) = match entry.metadata().await {
      Ok(meta) => (if ft.is_dir() { 0 } else { meta.len() }, meta.modified().ok()),
      Err(e) => {
        warn!(path = %entry_path.display(), error = %e, "metadata unavailable");
        (0, None)
      }
    };

    entries.push(DirEntry {
      name: entry.file_name().to_string_lossy().into_owned(),
      path: entry_path.to_string_lossy().into_owned(),
      is_directory: ft.is_dir(),
      size_bytes,
      modified_at,
    });
  }

  sort_entries(&mut entries);
  Ok(entries)
}
