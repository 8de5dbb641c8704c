use crate::domain::{DeviceSession, DirectoryNode, FileRecord};
use crate::errors::{CoreError, TransportError};

/// Qué lado del par se está recorriendo.
#[derive(Debug, Clone)]
pub enum Side {
  Local,
  Remote(DeviceSession),
}

impl Side {
  pub fn label(&self) -> &'static str {
    match self {
      Side::Local => "local",
      Side::Remote(_) => "remote",
    }
  }
}

/// Resultado de un escaneo recursivo.
///
/// `skipped` acumula las subcarpetas que no se pudieron listar: el recorrido
/// sigue, pero el llamador puede enseñarlas.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
  pub records: Vec<FileRecord>,
  pub skipped: Vec<(String, String)>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
  #[error("directory not accessible: {path} ({reason})")]
  DirectoryNotAccessible { path: String, reason: String },

  #[error("no device connected")]
  NoDeviceConnected,

  #[error("internal error: {0}")]
  Internal(String),
}

impl From<ScanError> for CoreError {
  fn from(err: ScanError) -> Self {
    match err {
      ScanError::DirectoryNotAccessible { path, reason } => CoreError::DirectoryNotAccessible { path, reason },
      ScanError::NoDeviceConnected => CoreError::NoDeviceConnected,
      ScanError::Internal(msg) => CoreError::Scan(msg),
    }
  }
}

impl ScanError {
  /// Maps a failure to list `path`; losing the device wins over the path.
  pub fn not_accessible(path: &str, err: TransportError) -> Self {
    match err {
      TransportError::NoDeviceConnected => ScanError::NoDeviceConnected,
      other => ScanError::DirectoryNotAccessible { path: path.to_string(), reason: other.to_string() },
    }
  }
}

/// Port del Directory Scanner.
///
/// El adapter decide cómo recorrer cada lado; desde el dominio se ve como
/// dos operaciones: recorrido completo y listado de un nivel.
#[async_trait::async_trait]
pub trait DirectoryScanner: Send + Sync {
  async fn scan(&self, root: &str, side: &Side) -> Result<ScanReport, ScanError>;

  /// Non-recursive, directories only, hidden entries excluded, sorted
  /// case-insensitively.
  async fn list_one_level(&self, path: &str, side: &Side) -> Result<Vec<DirectoryNode>, ScanError>;
}
