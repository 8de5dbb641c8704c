use crate::paths::{ConfigError, TagbridgePaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use tracing::debug;

// toml_edit para escribir preservando comentarios del usuario
use toml_edit::{DocumentMut, Item};

/// Acceso por secciones a `tagbridge.toml`.
pub trait ConfigBackend {
  /// `None` si el archivo o la sección no existen.
  fn read_section<T: DeserializeOwned>(&self, section: &str) -> Result<Option<T>, ConfigError>;

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;

  fn load_section_or_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    Ok(self.read_section(section)?.unwrap_or_default())
  }
}

#[derive(Debug, Clone)]
pub struct TomlConfigBackend {
  paths: TagbridgePaths,
}

impl TomlConfigBackend {
  pub fn new(paths: TagbridgePaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &TagbridgePaths {
    &self.paths
  }
}

impl ConfigBackend for TomlConfigBackend {
  fn read_section<T: DeserializeOwned>(&self, section: &str) -> Result<Option<T>, ConfigError> {
    let path = self.paths.config_file();
    let content = match fs::read_to_string(&path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(None);
      }
      Err(e) => return Err(e.into()),
    };

    let toml_val: toml::Value = toml::from_str(&content)?;
    let Some(table) = toml_val.get(section) else {
      return Ok(None);
    };

    let t: T = table
      .clone()
      .try_into()
      .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))?;

    Ok(Some(t))
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let path = self.paths.config_file();

    // 1) Documento actual, o uno vacío si todavía no existe.
    let mut doc: DocumentMut = match fs::read_to_string(&path) {
      Ok(content) => content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?,
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // 2) La sección se serializa con `toml` y se reparsea como tabla editable.
    //    `section_str` no lleva cabecera: "foo = 1\nbar = 2\n".
    let section_str =
      toml::to_string(value).map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;
    let section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();

    // 3) Sólo se reemplaza la sección; el resto del documento queda intacto.
    doc[section] = section_item;

    tagbridge_fs::io::atomic_write_str(&path, &doc.to_string())?;
    debug!(path = %path.display(), section, "config section saved");

    Ok(())
  }
}
