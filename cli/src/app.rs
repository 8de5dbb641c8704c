use std::sync::Arc;

use anyhow::Context;
use tagbridge_config::TomlConfigBackend;
use tagbridge_core::TransportError;
use tagbridge_core::domain::DeviceSession;
use tagbridge_core::ports::DeviceEvents;
use tagbridge_core::services::{RemoteStaging, SyncService};
use tagbridge_device::{AdbDeviceWatcher, AdbTransport, DeviceConfig, DeviceManager};
use tagbridge_metadata::LoftyTagCodec;
use tagbridge_scanner::{ScannerConfig, TreeScanner};
use tokio::task::JoinHandle;

use crate::infrastructure::reporter::TerminalReporter;

/// Type aliases to keep the generic signatures readable.
pub type Scanner = TreeScanner<LoftyTagCodec, AdbTransport>;
pub type Service = SyncService<Scanner, LoftyTagCodec, AdbTransport, TerminalReporter>;

/// Everything a command needs, wired once per process.
pub struct App {
  pub backend: &'static TomlConfigBackend,
  pub device_config: DeviceConfig,
  pub transport: Arc<AdbTransport>,
  pub devices: Arc<DeviceManager<AdbTransport>>,
  pub service: Service,
}

impl App {
  pub fn from_config() -> anyhow::Result<Self> {
    // 1. Config file (TAGBRIDGE_BASE_DIR or per-user dirs)
    let backend = tagbridge_config::config_backend().context("resolve config directory")?;
    let scanner_config = ScannerConfig::load(backend).context("load [scanner] config")?;
    let device_config = DeviceConfig::load(backend).context("load [device] config")?;

    // 2. Device transport (adb) and session bookkeeping
    let transport = Arc::new(AdbTransport::new(&device_config));
    let devices = Arc::new(DeviceManager::new(Arc::clone(&transport), DeviceEvents::default()));

    // 3. Tag codec (lofty) + remote staging on top of both
    let staging = RemoteStaging::new(Arc::new(LoftyTagCodec::new()), Arc::clone(&transport));

    // 4. Scanner and orchestrator
    let scanner = TreeScanner::new(staging.clone(), scanner_config);
    let service = SyncService::new(scanner, staging, TerminalReporter);

    Ok(Self { backend, device_config, transport, devices, service })
  }

  /// Serial explícito, si no el preferido en `[device]`, si no el único.
  pub async fn connect(&self, serial: Option<&str>) -> Result<DeviceSession, TransportError> {
    let serial = serial.or(self.device_config.serial.as_deref());
    self.devices.connect(serial).await
  }

  /// Sondeo de `adb devices` mientras dure una operación larga: si el
  /// dispositivo desaparece, la sesión deja de aceptar trabajo.
  pub fn watch_devices(&self) -> Vec<JoinHandle<()>> {
    let listener = Arc::clone(&self.devices).spawn_listener();
    let watcher = AdbDeviceWatcher::new(
      Arc::clone(&self.transport),
      self.devices.events().clone(),
      self.device_config.poll_interval(),
    )
    .spawn();
    vec![listener, watcher]
  }
}
