use serde::{Deserialize, Serialize};

use crate::domain::record::FileRecord;

/// Hacia dónde hay que copiar los metadatos de un par.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncDirection {
  /// Local is newer.
  ToRemote,
  /// Remote is newer.
  ToLocal,
  /// Same instant on both sides.
  None,
}

/// Par local/remoto producido por el matcher en cada ejecución.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPair {
  pub local: FileRecord,
  pub remote: FileRecord,
  pub direction: SyncDirection,
}

impl SyncPair {
  pub fn needs_action(&self) -> bool {
    self.direction != SyncDirection::None
  }

  pub fn filename(&self) -> &str {
    &self.local.filename
  }
}

/// Fases del orquestador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncPhase {
  Idle,
  Refreshing,
  Matching,
  Confirming,
  Applying,
  Completed,
  Failed,
}

impl SyncPhase {
  /// Phases during which a new run must not start.
  pub fn is_busy(&self) -> bool {
    matches!(self, SyncPhase::Refreshing | SyncPhase::Matching | SyncPhase::Applying)
  }
}

/// Coarse phase as seen by progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
  Idle,
  Running,
  Succeeded,
  Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRunProgress {
  pub current_index: usize,
  pub total_count: usize,
  pub current_filename: String,
  pub phase: RunPhase,
  pub error_message: Option<String>,
}

impl SyncRunProgress {
  pub fn idle() -> Self {
    Self {
      current_index: 0,
      total_count: 0,
      current_filename: String::new(),
      phase: RunPhase::Idle,
      error_message: None,
    }
  }

  pub fn running(current_index: usize, total_count: usize, filename: &str) -> Self {
    Self {
      current_index,
      total_count,
      current_filename: filename.to_string(),
      phase: RunPhase::Running,
      error_message: None,
    }
  }

  pub fn succeeded(total_count: usize) -> Self {
    Self {
      current_index: total_count,
      total_count,
      current_filename: String::new(),
      phase: RunPhase::Succeeded,
      error_message: None,
    }
  }

  pub fn failed(current_index: usize, total_count: usize, filename: &str, error: &str) -> Self {
    Self {
      current_index,
      total_count,
      current_filename: filename.to_string(),
      phase: RunPhase::Failed,
      error_message: Some(error.to_string()),
    }
  }
}

/// Lo que se enseña al usuario antes de aplicar nada.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPreview {
  pub total: usize,
  pub to_remote: usize,
  pub to_local: usize,
}

impl SyncPreview {
  pub fn from_pairs(pairs: &[SyncPair]) -> Self {
    pairs.iter().fold(SyncPreview::default(), |mut acc, pair| {
      match pair.direction {
        SyncDirection::ToRemote => acc.to_remote += 1,
        SyncDirection::ToLocal => acc.to_local += 1,
        SyncDirection::None => return acc,
      }
      acc.total += 1;
      acc
    })
  }
}
