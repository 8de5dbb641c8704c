use std::path::Path;

use crate::domain::{AudioFormat, FileRecord, Rating};
use crate::errors::TagWriteError;

/// Subconjunto de campos a escribir; `None` = no tocar.
///
/// An empty string is a value: it clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPatch {
  pub title: Option<String>,
  pub artist: Option<String>,
  pub album: Option<String>,
  pub rating: Option<Rating>,
}

impl TagPatch {
  /// The whole snapshot of a record: what a sync transfer copies.
  pub fn full(record: &FileRecord) -> Self {
    Self {
      title: Some(record.title.clone()),
      artist: Some(record.artist.clone()),
      album: Some(record.album.clone()),
      rating: Some(record.rating),
    }
  }

  pub fn rating(rating: Rating) -> Self {
    Self { rating: Some(rating), ..Self::default() }
  }

  pub fn is_empty(&self) -> bool {
    self.title.is_none() && self.artist.is_none() && self.album.is_none() && self.rating.is_none()
  }
}

/// Port que abstrae la lectura/escritura de tags embebidos.
///
/// Implementaciones posibles: Lofty, o un fake en memoria para tests.
#[async_trait::async_trait]
pub trait TagCodec: Send + Sync {
  /// Never fails: a container that cannot be parsed degrades to
  /// [`FileRecord::from_stat`].
  async fn read(&self, path: &Path, format: AudioFormat) -> FileRecord;

  /// Applies only the fields present in `patch` and stamps the file's
  /// modification time with "now". On error the file is left byte-for-byte
  /// as it was.
  async fn write(&self, path: &Path, patch: &TagPatch) -> Result<(), TagWriteError>;
}
