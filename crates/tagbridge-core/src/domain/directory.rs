use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::SystemTime;

/// Una entrada de un listado de directorio de un nivel, local o remoto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
  pub name: String,
  /// Ruta completa de la entrada en su lado.
  pub path: String,
  pub is_directory: bool,
  pub size_bytes: u64,
  pub modified_at: Option<SystemTime>,
}

impl DirEntry {
  pub fn is_hidden(&self) -> bool {
    self.name.starts_with('.')
  }
}

/// Nodo perezoso del árbol de carpetas para la UI de navegación.
///
/// `children` is `None` until the level has been listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
  pub name: String,
  pub path: String,
  children: Option<Vec<DirectoryNode>>,
}

impl DirectoryNode {
  pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
    Self { name: name.into(), path: path.into(), children: None }
  }

  pub fn is_loaded(&self) -> bool {
    self.children.is_some()
  }

  pub fn children(&self) -> &[DirectoryNode] {
    self.children.as_deref().unwrap_or(&[])
  }

  /// Populates this level, keeping the children in browse order.
  pub fn set_children(&mut self, mut children: Vec<DirectoryNode>) {
    sort_nodes(&mut children);
    self.children = Some(children);
  }
}

impl From<&DirEntry> for DirectoryNode {
  fn from(entry: &DirEntry) -> Self {
    DirectoryNode::new(entry.name.clone(), entry.path.clone())
  }
}

/// Alphabetical, case-insensitive; ties broken by the raw name so the order
/// is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
  a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

pub fn sort_nodes(nodes: &mut [DirectoryNode]) {
  nodes.sort_by(|a, b| compare_names(&a.name, &b.name));
}

pub fn sort_entries(entries: &mut [DirEntry]) {
  entries.sort_by(|a, b| compare_names(&a.name, &b.name));
}
