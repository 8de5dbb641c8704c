use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BASE_DIR_ENV: &str = "TAGBRIDGE_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagbridgePaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
}

impl TagbridgePaths {
  /// `TAGBRIDGE_BASE_DIR` gana sobre los directorios del sistema.
  pub fn detect() -> Result<Self, ConfigError> {
    let paths = match std::env::var_os(BASE_DIR_ENV) {
      Some(base) => Self::portable(base),
      None => {
        let proj_dirs = ProjectDirs::from("com", "tagbridge", "tagbridge").ok_or(ConfigError::Directories)?;
        Self {
          base_dir: proj_dirs.config_dir().to_path_buf(),
          config_dir: proj_dirs.config_dir().to_path_buf(),
        }
      }
    };

    paths.ensure_dirs()?;
    Ok(paths)
  }

  /// Layout portable: todo bajo `base`.
  pub fn portable(base: impl Into<PathBuf>) -> Self {
    let base_dir = base.into();
    Self { config_dir: base_dir.join("config"), base_dir }
  }

  pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
    std::fs::create_dir_all(&self.config_dir)?;
    Ok(())
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("tagbridge.toml")
  }

  pub fn base_dir(&self) -> &Path {
    &self.base_dir
  }
}
