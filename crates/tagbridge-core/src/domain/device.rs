use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

use crate::errors::TransportError;

/// Handle explícito a un dispositivo conectado.
///
/// Se obtiene al conectar y se pasa a cada llamada remota; no existe un
/// "dispositivo actual" global. Los clones comparten el mismo estado, así
/// que invalidar uno invalida todos.
#[derive(Debug, Clone)]
pub struct DeviceSession {
  id: Uuid,
  serial: String,
  active: Arc<AtomicBool>,
}

impl DeviceSession {
  pub fn open(serial: impl Into<String>) -> Self {
    Self { id: Uuid::new_v4(), serial: serial.into(), active: Arc::new(AtomicBool::new(true)) }
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn serial(&self) -> &str {
    &self.serial
  }

  pub fn is_active(&self) -> bool {
    self.active.load(Ordering::Acquire)
  }

  pub fn invalidate(&self) {
    self.active.store(false, Ordering::Release);
  }

  /// Guard for every remote-facing operation.
  pub fn ensure_active(&self) -> Result<(), TransportError> {
    if self.is_active() { Ok(()) } else { Err(TransportError::NoDeviceConnected) }
  }
}

impl PartialEq for DeviceSession {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for DeviceSession {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
  Attached(String),
  Detached(String),
}

impl DeviceEvent {
  pub fn serial(&self) -> &str {
    match self {
      DeviceEvent::Attached(s) | DeviceEvent::Detached(s) => s,
    }
  }
}
