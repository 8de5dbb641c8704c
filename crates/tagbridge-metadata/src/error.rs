use thiserror::Error;

/// Fallo al parsear el contenedor de tags de un archivo.
///
/// Nunca sale del crate: `LoftyTagCodec::read` lo registra y degrada a un
/// registro derivado del filesystem.
#[derive(Debug, Error)]
pub enum TagReadError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("container parse failed: {0}")]
  Parse(#[from] lofty::error::LoftyError),
}
