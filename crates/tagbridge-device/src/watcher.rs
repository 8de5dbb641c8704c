use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use tagbridge_core::domain::DeviceEvent;
use tagbridge_core::ports::{DeviceDiscovery, DeviceEvents};

/// Sondea la lista de dispositivos y publica attach/detach por diferencia.
pub struct AdbDeviceWatcher<D> {
  discovery: Arc<D>,
  events: DeviceEvents,
  interval: Duration,
}

impl<D: DeviceDiscovery + 'static> AdbDeviceWatcher<D> {
  pub fn new(discovery: Arc<D>, events: DeviceEvents, interval: Duration) -> Self {
    Self { discovery, events, interval }
  }

  /// Una vuelta de sondeo. Un fallo de `adb` no cambia el conjunto conocido:
  /// no se inventan desconexiones.
  pub async fn poll_once(&self, known: &mut BTreeSet<String>) {
    let now: BTreeSet<String> = match self.discovery.devices().await {
      Ok(list) => list.into_iter().collect(),
      Err(e) => {
        warn!(error = %e, "device poll failed");
        return;
      }
    };

    for gone in known.difference(&now) {
      self.events.publish(DeviceEvent::Detached(gone.clone()));
    }
    for new in now.difference(known) {
      self.events.publish(DeviceEvent::Attached(new.clone()));
    }

    *known = now;
  }

  pub fn spawn(self) -> JoinHandle<()> {
    tokio::spawn(async move {
      let mut known = BTreeSet::new();
      let mut ticker = time::interval(self.interval);
      ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
      debug!(interval = ?self.interval, "device watcher started");

      loop {
        ticker.tick().await;
        self.poll_once(&mut known).await;
      }
    })
  }
}
