use serde::{Deserialize, Serialize};
use tagbridge_config::{ConfigBackend, ConfigError};

use crate::walker::WalkConfig;

const SECTION: &str = "scanner";

/// Sección `[scanner]` de tagbridge.toml.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ScannerConfig {
  /// Ignorar archivos/directorios ocultos (nombre con punto inicial).
  pub ignore_hidden: bool,

  /// Profundidad máxima de subcarpetas bajo la raíz.
  pub max_depth: usize,
}

impl Default for ScannerConfig {
  fn default() -> Self {
    Self { ignore_hidden: true, max_depth: 64 }
  }
}

impl ScannerConfig {
  /// Carga la sección y la reescribe, así el usuario ve los valores
  /// efectivos en el archivo.
  pub fn load<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    let cfg: Self = backend.load_section_or_default(SECTION)?;
    backend.save_section(SECTION, &cfg)?;
    Ok(cfg)
  }

  pub fn save<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section(SECTION, self)
  }

  pub fn walk(&self) -> WalkConfig {
    WalkConfig { ignore_hidden: self.ignore_hidden, max_depth: self.max_depth }
  }
}
