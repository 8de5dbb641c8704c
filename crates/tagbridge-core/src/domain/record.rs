use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::audio_format::AudioFormat;
use crate::domain::rating::Rating;

/// Snapshot normalizado de los tags de un archivo de audio.
///
/// Uno por archivo físico, regenerado en cada escaneo (nunca se persiste).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
  /// Ruta absoluta en su lado (filesystem local o ruta del dispositivo).
  /// Es la clave única dentro de un mismo lado.
  pub identity: String,
  /// Nombre base con extensión; clave de cruce entre lados (sin mayúsculas).
  pub filename: String,
  /// Cadena vacía = sin valor.
  pub title: String,
  pub artist: String,
  pub album: String,
  pub rating: Rating,
  pub last_modified: Option<SystemTime>,
  pub format: AudioFormat,
  /// Informativo; no participa en matching ni en sync.
  pub size_bytes: u64,
}

impl FileRecord {
  /// Record built from filesystem facts alone, used when the tag container
  /// cannot be parsed. The title falls back to the file stem.
  pub fn from_stat(
    identity: impl Into<String>,
    filename: impl Into<String>,
    format: AudioFormat,
    size_bytes: u64,
    last_modified: Option<SystemTime>,
  ) -> Self {
    let filename = filename.into();
    let title = filename.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(&filename).to_string();

    Self {
      identity: identity.into(),
      filename,
      title,
      artist: String::new(),
      album: String::new(),
      rating: Rating::UNRATED,
      last_modified,
      format,
      size_bytes,
    }
  }

  /// Join key between sides.
  pub fn match_key(&self) -> String {
    self.filename.to_lowercase()
  }

  /// Modification instant, with "unknown" treated as the epoch.
  pub fn modified_or_epoch(&self) -> SystemTime {
    self.last_modified.unwrap_or(UNIX_EPOCH)
  }
}

/// Nombre base de una ruta local o de dispositivo.
pub fn base_name(path: &str) -> &str {
  path.trim_end_matches(['/', '\\']).rsplit(['/', '\\']).next().unwrap_or(path)
}
