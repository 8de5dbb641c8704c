use std::time::Duration;

use serde::{Deserialize, Serialize};
use tagbridge_config::{ConfigBackend, ConfigError};

const SECTION: &str = "device";

/// Sección `[device]` de tagbridge.toml.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceConfig {
  /// Binario `adb`; por defecto se busca en el PATH.
  pub adb_path: String,

  /// Serial preferido cuando hay varios dispositivos.
  pub serial: Option<String>,

  pub poll_interval_ms: u64,
}

impl Default for DeviceConfig {
  fn default() -> Self {
    Self { adb_path: "adb".into(), serial: None, poll_interval_ms: 2000 }
  }
}

impl DeviceConfig {
  pub fn load<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    backend.load_section_or_default(SECTION)
  }

  pub fn save<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section(SECTION, self)
  }

  pub fn poll_interval(&self) -> Duration {
    Duration::from_millis(self.poll_interval_ms.max(100))
  }
}
