use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::DeviceEvent;

/// Hub de notificaciones attach/detach.
///
/// Cada suscriptor recibe todos los eventos publicados después de
/// suscribirse. Publicar sin suscriptores no es un error.
#[derive(Debug, Clone)]
pub struct DeviceEvents {
  tx: broadcast::Sender<DeviceEvent>,
}

impl DeviceEvents {
  pub fn new(capacity: usize) -> Self {
    let (tx, _) = broadcast::channel(capacity.max(1));
    Self { tx }
  }

  pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
    self.tx.subscribe()
  }

  pub fn publish(&self, event: DeviceEvent) {
    debug!(?event, "device event");
    let _ = self.tx.send(event);
  }
}

impl Default for DeviceEvents {
  fn default() -> Self {
    Self::new(32)
  }
}
