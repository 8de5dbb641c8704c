// crates/tagbridge-core/src/errors.rs
use thiserror::Error;

/// Error genérico del núcleo de tagbridge.
///
/// Las capas superiores (CLI, etc.) mapean este error a mensajes de usuario
/// o logs. Los errores por archivo durante un escaneo nunca llegan aquí: se
/// degradan a metadatos mínimos en el adapter.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("directory not accessible: {path} ({reason})")]
  DirectoryNotAccessible { path: String, reason: String },

  #[error(transparent)]
  TagWrite(#[from] TagWriteError),

  #[error(transparent)]
  Transport(TransportError),

  #[error("no device connected")]
  NoDeviceConnected,

  #[error("staging error: {0}")]
  Staging(String),

  #[error("scan error: {0}")]
  Scan(String),

  #[error("sync of {filename} (item {index}) failed after {applied} applied: {source}")]
  TransferFailed {
    index: usize,
    filename: String,
    applied: usize,
    #[source]
    source: Box<CoreError>,
  },

  #[error("invalid state: {0}")]
  InvalidState(String),
}

impl From<TransportError> for CoreError {
  fn from(err: TransportError) -> Self {
    match err {
      TransportError::NoDeviceConnected => CoreError::NoDeviceConnected,
      other => CoreError::Transport(other),
    }
  }
}

/// The embedded tag container of one file could not be rewritten.
///
/// Whoever raises this guarantees the original file was left untouched.
#[derive(Debug, Error)]
#[error("tag write failed for {path}: {reason}")]
pub struct TagWriteError {
  pub path: String,
  pub reason: String,
}

impl TagWriteError {
  pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
    Self { path: path.into(), reason: reason.into() }
  }
}

/// Fallos del canal con el dispositivo (list/pull/push/delete).
#[derive(Debug, Error)]
pub enum TransportError {
  #[error("no device connected")]
  NoDeviceConnected,

  #[error("several devices attached, pick one of: {}", .0.join(", "))]
  AmbiguousDevice(Vec<String>),

  #[error("remote path not found: {0}")]
  NotFound(String),

  #[error("`{command}` exited with {status}: {stderr}")]
  Command { command: String, status: String, stderr: String },

  #[error("unexpected transport output: {0}")]
  Parse(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}
