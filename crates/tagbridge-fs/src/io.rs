use std::io::{self, Write};
use std::path::Path;

/// Escribe `contents` en un archivo hermano y lo renombra sobre `path`.
///
/// Readers never see a half-written file.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));

  let mut tmp_file = tempfile::Builder::new().prefix(".tagbridge-").suffix(".tmp").tempfile_in(parent)?;
  tmp_file.write_all(contents.as_bytes())?;
  tmp_file.as_file().sync_all()?;

  tmp_file.persist(path).map_err(|e| e.error)?;
  Ok(())
}
