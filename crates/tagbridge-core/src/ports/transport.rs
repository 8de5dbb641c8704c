use std::path::Path;

use crate::domain::{DeviceSession, DirEntry};
use crate::errors::TransportError;

/// Canal con el dispositivo. Solo expone operaciones de archivo: no hay
/// forma de editar tags en remoto, de ahí el staging.
///
/// Implementations must refuse to work with an inactive session
/// ([`TransportError::NoDeviceConnected`]).
#[async_trait::async_trait]
pub trait DeviceTransport: Send + Sync {
  async fn list(&self, session: &DeviceSession, path: &str) -> Result<Vec<DirEntry>, TransportError>;

  async fn pull(&self, session: &DeviceSession, remote_path: &str, local_path: &Path) -> Result<(), TransportError>;

  async fn push(&self, session: &DeviceSession, local_path: &Path, remote_path: &str) -> Result<(), TransportError>;

  async fn delete(&self, session: &DeviceSession, path: &str) -> Result<(), TransportError>;
}

/// Enumerates the serials of currently attached devices.
#[async_trait::async_trait]
pub trait DeviceDiscovery: Send + Sync {
  async fn devices(&self) -> Result<Vec<String>, TransportError>;
}
