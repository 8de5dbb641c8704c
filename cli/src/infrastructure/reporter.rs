use async_trait::async_trait;
use tagbridge_core::domain::{RunPhase, SyncRunProgress};
use tagbridge_core::ports::ProgressReporter;

/// `ProgressReporter` que escribe una línea por evento en stderr.
///
/// stdout queda libre para la salida de los comandos.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalReporter;

#[async_trait]
impl ProgressReporter for TerminalReporter {
  async fn report(&self, progress: SyncRunProgress) {
    if let Some(line) = render(&progress) {
      eprintln!("{line}");
    }
  }
}

pub fn render(p: &SyncRunProgress) -> Option<String> {
  match p.phase {
    RunPhase::Idle => None,
    RunPhase::Running => Some(format!("[{}/{}] {}", p.current_index + 1, p.total_count, p.current_filename)),
    RunPhase::Succeeded => Some(format!("done: {} file(s) synced", p.total_count)),
    RunPhase::Failed => {
      let reason = p.error_message.as_deref().unwrap_or("unknown error");
      if p.current_filename.is_empty() {
        Some(format!("sync failed: {reason}"))
      } else {
        Some(format!("sync failed at {} ({}/{}): {reason}", p.current_filename, p.current_index + 1, p.total_count))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_each_phase() {
    assert_eq!(render(&SyncRunProgress::idle()), None);
    assert_eq!(render(&SyncRunProgress::running(0, 3, "a.mp3")).as_deref(), Some("[1/3] a.mp3"));
    assert_eq!(render(&SyncRunProgress::succeeded(3)).as_deref(), Some("done: 3 file(s) synced"));
    assert_eq!(
      render(&SyncRunProgress::failed(1, 3, "b.flac", "disk full")).as_deref(),
      Some("sync failed at b.flac (2/3): disk full")
    );
    assert_eq!(render(&SyncRunProgress::failed(0, 0, "", "no device")).as_deref(), Some("sync failed: no device"));
  }
}
