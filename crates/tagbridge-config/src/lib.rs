mod backend;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use paths::{ConfigError, TagbridgePaths};

use once_cell::sync::OnceCell;

// Paths del proceso (portable vía TAGBRIDGE_BASE_DIR o del sistema)
static PATHS: OnceCell<TagbridgePaths> = OnceCell::new();

// Backend de config sobre esos paths
static CONFIG_BACKEND: OnceCell<TomlConfigBackend> = OnceCell::new();

/// Paths detectados una sola vez por proceso.
pub fn paths() -> Result<&'static TagbridgePaths, ConfigError> {
  PATHS.get_or_try_init(TagbridgePaths::detect)
}

/// Backend global sobre `tagbridge.toml`.
pub fn config_backend() -> Result<&'static TomlConfigBackend, ConfigError> {
  CONFIG_BACKEND.get_or_try_init(|| paths().map(|p| TomlConfigBackend::new(p.clone())))
}
