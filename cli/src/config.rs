use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tagbridge_config::{ConfigBackend, ConfigError};

const SECTION: &str = "sync";

/// Sección `[sync]`: últimas raíces usadas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
  pub local_root: Option<PathBuf>,
  pub remote_root: Option<String>,
}

impl SyncConfig {
  pub fn load<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    backend.load_section_or_default(SECTION)
  }

  pub fn save<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section(SECTION, self)
  }

  /// Los argumentos de la línea de comandos ganan sobre lo guardado.
  pub fn resolve(&self, local: Option<PathBuf>, remote: Option<String>) -> (Option<PathBuf>, Option<String>) {
    (local.or_else(|| self.local_root.clone()), remote.or_else(|| self.remote_root.clone()))
  }
}
