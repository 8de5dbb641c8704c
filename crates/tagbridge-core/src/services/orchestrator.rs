use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use tracing::{info, warn};

use crate::domain::{DeviceSession, SyncDirection, SyncPair, SyncPhase, SyncPreview, SyncRunProgress};
use crate::errors::CoreError;
use crate::ports::{DeviceTransport, DirectoryScanner, ProgressReporter, ScanReport, Side, TagCodec, TagPatch};
use crate::services::matcher::match_records;
use crate::services::staging::RemoteStaging;

/// Resultado de la fase de matching.
#[derive(Debug)]
pub enum SyncPlan {
  /// Nothing to apply: no matches, or every match already agrees.
  UpToDate { matched: usize },
  /// At least one pair needs a transfer; waiting for the caller's go-ahead.
  Pending(PendingSync),
}

/// A plan held at the confirmation gate. Only the service that produced it
/// can apply it, and only while no newer run has started.
#[derive(Debug)]
pub struct PendingSync {
  run_id: u64,
  pairs: Vec<SyncPair>,
  preview: SyncPreview,
  local_root: String,
  remote_root: String,
}

impl PendingSync {
  pub fn preview(&self) -> SyncPreview {
    self.preview
  }

  pub fn pairs(&self) -> &[SyncPair] {
    &self.pairs
  }
}

/// Both sides as rescanned after a successful run.
#[derive(Debug)]
pub struct Refreshed {
  pub local: ScanReport,
  pub remote: ScanReport,
}

#[derive(Debug)]
pub struct SyncReport {
  pub applied: usize,
  /// `None` when the final rescan failed; the transfers still happened.
  pub refreshed: Option<Refreshed>,
}

struct RunState {
  phase: SyncPhase,
  run_id: u64,
}

/// Sync Orchestrator.
///
/// `prepare` runs Refreshing → Matching and stops at the confirmation gate;
/// `apply` or `decline` resolves the gate. Pairs are applied one at a time,
/// in order, and the first failure stops the queue. Nothing already applied
/// is rolled back.
pub struct SyncService<S, C, T, R> {
  scanner: S,
  staging: RemoteStaging<C, T>,
  reporter: R,
  state: Mutex<RunState>,
}

impl<S, C, T, R> SyncService<S, C, T, R>
where
  S: DirectoryScanner,
  C: TagCodec,
  T: DeviceTransport,
  R: ProgressReporter,
{
  pub fn new(scanner: S, staging: RemoteStaging<C, T>, reporter: R) -> Self {
    Self { scanner, staging, reporter, state: Mutex::new(RunState { phase: SyncPhase::Idle, run_id: 0 }) }
  }

  pub fn phase(&self) -> SyncPhase {
    self.state().phase
  }

  pub fn scanner(&self) -> &S {
    &self.scanner
  }

  pub fn staging(&self) -> &RemoteStaging<C, T> {
    &self.staging
  }

  /// Rescans both sides and computes what a sync would do.
  ///
  /// Cached records are never reused: both roots are scanned every time.
  /// Failing to scan either side aborts the run.
  pub async fn prepare(&self, local_root: &str, remote_root: &str, session: &DeviceSession) -> Result<SyncPlan, CoreError> {
    let run_id = self.begin()?;
    info!(local_root, remote_root, device = session.serial(), "sync: refreshing both sides");

    let (local, remote) = match self.refresh(local_root, remote_root, session).await {
      Ok(sides) => sides,
      Err(err) => {
        self.fail(0, 0, "", &err).await;
        return Err(err);
      }
    };

    self.set_phase(SyncPhase::Matching);
    let pairs = match_records(&local.records, &remote.records);
    let matched = pairs.len();
    let pairs: Vec<SyncPair> = pairs.into_iter().filter(SyncPair::needs_action).collect();

    if pairs.is_empty() {
      info!(matched, "sync: nothing to do");
      self.set_phase(SyncPhase::Completed);
      self.reporter.report(SyncRunProgress::succeeded(0)).await;
      return Ok(SyncPlan::UpToDate { matched });
    }

    let preview = SyncPreview::from_pairs(&pairs);
    info!(matched, to_remote = preview.to_remote, to_local = preview.to_local, "sync: awaiting confirmation");
    self.set_phase(SyncPhase::Confirming);

    Ok(SyncPlan::Pending(PendingSync {
      run_id,
      pairs,
      preview,
      local_root: local_root.to_string(),
      remote_root: remote_root.to_string(),
    }))
  }

  /// The caller backed out at the confirmation gate. Nothing was mutated.
  pub fn decline(&self, pending: PendingSync) {
    let mut state = self.state();
    if state.run_id == pending.run_id && state.phase == SyncPhase::Confirming {
      info!("sync: declined");
      state.phase = SyncPhase::Idle;
    }
  }

  /// Applies a confirmed plan, then rescans both sides for the caller.
  pub async fn apply(&self, pending: PendingSync, session: &DeviceSession) -> Result<SyncReport, CoreError> {
    self.enter_applying(pending.run_id)?;

    let total = pending.pairs.len();

    for (index, pair) in pending.pairs.iter().enumerate() {
      self.reporter.report(SyncRunProgress::running(index, total, pair.filename())).await;

      if let Err(err) = self.transfer(pair, session).await {
        warn!(file = pair.filename(), index, error = %err, "sync: transfer failed, stopping");
        self.fail(index, total, pair.filename(), &err).await;
        return Err(CoreError::TransferFailed {
          index,
          filename: pair.filename().to_string(),
          applied: index,
          source: Box::new(err),
        });
      }
    }

    let refreshed = match self.refresh(&pending.local_root, &pending.remote_root, session).await {
      Ok((local, remote)) => Some(Refreshed { local, remote }),
      Err(err) => {
        warn!(error = %err, "sync: final refresh failed");
        None
      }
    };

    info!(applied = total, "sync: completed");
    self.set_phase(SyncPhase::Completed);
    self.reporter.report(SyncRunProgress::succeeded(total)).await;

    Ok(SyncReport { applied: total, refreshed })
  }

  /// Copies the whole snapshot of the newer side onto the older one, read
  /// fresh at transfer time.
  async fn transfer(&self, pair: &SyncPair, session: &DeviceSession) -> Result<(), CoreError> {
    match pair.direction {
      SyncDirection::ToRemote => {
        let snapshot = self.staging.codec().read(Path::new(&pair.local.identity), pair.local.format).await;
        self.staging.write_remote(session, &pair.remote.identity, &TagPatch::full(&snapshot)).await
      }
      SyncDirection::ToLocal => {
        let snapshot = self.staging.read_remote(session, &pair.remote.identity).await?;
        self.staging.codec().write(Path::new(&pair.local.identity), &TagPatch::full(&snapshot)).await?;
        Ok(())
      }
      SyncDirection::None => Ok(()),
    }
  }

  async fn refresh(
    &self,
    local_root: &str,
    remote_root: &str,
    session: &DeviceSession,
  ) -> Result<(ScanReport, ScanReport), CoreError> {
    let local = self.scanner.scan(local_root, &Side::Local).await?;
    let remote = self.scanner.scan(remote_root, &Side::Remote(session.clone())).await?;
    info!(local = local.records.len(), remote = remote.records.len(), "sync: scanned");
    Ok((local, remote))
  }

  async fn fail(&self, index: usize, total: usize, filename: &str, err: &CoreError) {
    self.set_phase(SyncPhase::Failed);
    self.reporter.report(SyncRunProgress::failed(index, total, filename, &err.to_string())).await;
  }

  fn begin(&self) -> Result<u64, CoreError> {
    let mut state = self.state();
    if state.phase.is_busy() {
      return Err(CoreError::InvalidState(format!("a sync is already running ({:?})", state.phase)));
    }
    state.run_id += 1;
    state.phase = SyncPhase::Refreshing;
    Ok(state.run_id)
  }

  fn enter_applying(&self, run_id: u64) -> Result<(), CoreError> {
    let mut state = self.state();
    if state.run_id != run_id || state.phase != SyncPhase::Confirming {
      return Err(CoreError::InvalidState("plan is stale; run the sync again".into()));
    }
    state.phase = SyncPhase::Applying;
    Ok(())
  }

  fn set_phase(&self, phase: SyncPhase) {
    self.state().phase = phase;
  }

  fn state(&self) -> MutexGuard<'_, RunState> {
    // A poisoned lock only means a panic elsewhere; the phase is still valid.
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}
