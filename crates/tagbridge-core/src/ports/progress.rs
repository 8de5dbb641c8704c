use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::SyncRunProgress;

/// Port de salida para el progreso de una sincronización.
///
/// El frontend (CLI, GUI) lo implementa; solo lee, nunca muta.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
  async fn report(&self, progress: SyncRunProgress);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

#[async_trait]
impl ProgressReporter for NoopReporter {
  async fn report(&self, _progress: SyncRunProgress) {}
}

/// Forwards every update into an unbounded channel, in emission order.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
  tx: mpsc::UnboundedSender<SyncRunProgress>,
}

impl ChannelReporter {
  pub fn new() -> (Self, mpsc::UnboundedReceiver<SyncRunProgress>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Self { tx }, rx)
  }
}

#[async_trait]
impl ProgressReporter for ChannelReporter {
  async fn report(&self, progress: SyncRunProgress) {
    // Fire-and-forget: a dropped receiver must not fail the run.
    let _ = self.tx.send(progress);
  }
}
