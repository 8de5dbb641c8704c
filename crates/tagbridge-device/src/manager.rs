use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use tagbridge_core::TransportError;
use tagbridge_core::domain::{DeviceEvent, DeviceSession};
use tagbridge_core::ports::{DeviceDiscovery, DeviceEvents};

/// Abre sesiones de dispositivo y las invalida al desconectarse.
///
/// Holds at most one live session. A `Detached` event for its serial makes
/// every clone of that session refuse further remote work.
pub struct DeviceManager<D> {
  discovery: Arc<D>,
  events: DeviceEvents,
  current: Mutex<Option<DeviceSession>>,
}

impl<D: DeviceDiscovery + 'static> DeviceManager<D> {
  pub fn new(discovery: Arc<D>, events: DeviceEvents) -> Self {
    Self { discovery, events, current: Mutex::new(None) }
  }

  pub fn events(&self) -> &DeviceEvents {
    &self.events
  }

  /// Conecta con `serial`, o con el único dispositivo presente si es `None`.
  pub async fn connect(&self, serial: Option<&str>) -> Result<DeviceSession, TransportError> {
    let attached = self.discovery.devices().await?;

    let chosen = match serial {
      Some(wanted) => attached.iter().find(|s| s.as_str() == wanted).cloned().ok_or(TransportError::NoDeviceConnected)?,
      None => match attached.len() {
        0 => return Err(TransportError::NoDeviceConnected),
        1 => attached[0].clone(),
        _ => return Err(TransportError::AmbiguousDevice(attached)),
      },
    };

    let mut current = self.current();
    if let Some(session) = current.as_ref().filter(|s| s.is_active() && s.serial() == chosen) {
      return Ok(session.clone());
    }
    if let Some(old) = current.take() {
      old.invalidate();
    }

    let session = DeviceSession::open(chosen);
    info!(serial = session.serial(), session = %session.id(), "device session opened");
    *current = Some(session.clone());
    Ok(session)
  }

  pub fn disconnect(&self, session: &DeviceSession) {
    session.invalidate();
    let mut current = self.current();
    if current.as_ref() == Some(session) {
      *current = None;
    }
    info!(serial = session.serial(), "device session closed");
  }

  /// Sesión viva, si la hay.
  pub fn current_session(&self) -> Option<DeviceSession> {
    self.current().as_ref().filter(|s| s.is_active()).cloned()
  }

  pub fn handle(&self, event: &DeviceEvent) {
    let DeviceEvent::Detached(serial) = event else {
      return;
    };

    let mut current = self.current();
    if current.as_ref().is_some_and(|s| s.serial() == serial) {
      if let Some(session) = current.take() {
        warn!(serial = %serial, "device detached, session invalidated");
        session.invalidate();
      }
    }
  }

  /// Escucha los eventos publicados hasta que se cierre el hub.
  pub fn spawn_listener(self: Arc<Self>) -> JoinHandle<()> {
    let mut rx = self.events.subscribe();
    tokio::spawn(async move {
      loop {
        match rx.recv().await {
          Ok(event) => self.handle(&event),
          Err(RecvError::Lagged(missed)) => warn!(missed, "device events lagged"),
          Err(RecvError::Closed) => break,
        }
      }
    })
  }

  fn current(&self) -> MutexGuard<'_, Option<DeviceSession>> {
    self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}
