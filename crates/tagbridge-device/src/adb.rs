use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use tagbridge_core::TransportError;
use tagbridge_core::domain::{DeviceSession, DirEntry};
use tagbridge_core::ports::{DeviceDiscovery, DeviceTransport};

use crate::config::DeviceConfig;
use crate::parse::{STAT_FORMAT, parse_devices, parse_listing, shell_quote};
use crate::runner::{CommandOutput, CommandRunner, ProcessRunner};

/// Transporte sobre el binario `adb`.
///
/// Cada operación es un proceso `adb -s <serial> ...`; el canal es único, así
/// que el llamador nunca lanza dos a la vez.
pub struct AdbTransport<R = ProcessRunner> {
  runner: R,
  adb_path: String,
}

impl AdbTransport<ProcessRunner> {
  pub fn new(config: &DeviceConfig) -> Self {
    Self::with_runner(ProcessRunner, config.adb_path.clone())
  }
}

impl<R: CommandRunner> AdbTransport<R> {
  pub fn with_runner(runner: R, adb_path: impl Into<String>) -> Self {
    Self { runner, adb_path: adb_path.into() }
  }

  pub fn runner(&self) -> &R {
    &self.runner
  }

  async fn adb(&self, args: Vec<String>) -> Result<CommandOutput, TransportError> {
    let output = self.runner.run(&self.adb_path, &args).await?;
    if output.success() {
      Ok(output)
    } else {
      Err(command_error(&args, &output))
    }
  }

  async fn on_device(&self, session: &DeviceSession, args: &[&str]) -> Result<CommandOutput, TransportError> {
    session.ensure_active()?;
    let mut full = vec!["-s".to_string(), session.serial().to_string()];
    full.extend(args.iter().map(|a| a.to_string()));
    self.adb(full).await.map_err(|e| lost_device(session, e))
  }

  async fn shell(&self, session: &DeviceSession, script: &str) -> Result<CommandOutput, TransportError> {
    self.on_device(session, &["shell", script]).await
  }
}

#[async_trait]
impl<R: CommandRunner> DeviceTransport for AdbTransport<R> {
  async fn list(&self, session: &DeviceSession, path: &str) -> Result<Vec<DirEntry>, TransportError> {
    let script = format!(
      "find {} -mindepth 1 -maxdepth 1 -exec stat -c {} {{}} +",
      shell_quote(path),
      shell_quote(STAT_FORMAT)
    );

    let output = match self.shell(session, &script).await {
      Ok(output) => output,
      Err(TransportError::Command { stderr, .. }) if stderr.contains("No such file") => {
        return Err(TransportError::NotFound(path.to_string()));
      }
      Err(e) => return Err(e),
    };

    let entries = parse_listing(&output.stdout_lossy());
    // Old adb servers report exit 0 for any shell command.
    if entries.is_empty() && output.stderr_lossy().contains("No such file") {
      return Err(TransportError::NotFound(path.to_string()));
    }

    debug!(path, entries = entries.len(), "remote listing");
    Ok(entries)
  }

  async fn pull(&self, session: &DeviceSession, remote_path: &str, local_path: &Path) -> Result<(), TransportError> {
    let local = local_path.to_string_lossy().into_owned();
    self.on_device(session, &["pull", remote_path, local.as_str()]).await?;
    debug!(remote = remote_path, local = %local_path.display(), "pulled");
    Ok(())
  }

  /// Sube a un hermano temporal y lo renombra encima del destino: el archivo
  /// remoto nunca queda a medias.
  async fn push(&self, session: &DeviceSession, local_path: &Path, remote_path: &str) -> Result<(), TransportError> {
    let staged = sibling_temp(remote_path);
    let local = local_path.to_string_lossy().into_owned();

    let result = async {
      self.on_device(session, &["push", local.as_str(), staged.as_str()]).await?;
      self.shell(session, &format!("mv -f {} {}", shell_quote(&staged), shell_quote(remote_path))).await?;
      Ok::<(), TransportError>(())
    }
    .await;

    if let Err(err) = &result {
      warn!(remote = remote_path, error = %err, "push failed, removing staged copy");
      if let Err(e) = self.shell(session, &format!("rm -f {}", shell_quote(&staged))).await {
        debug!(staged = %staged, error = %e, "staged copy not removed");
      }
    } else {
      debug!(remote = remote_path, "pushed");
    }
    result
  }

  async fn delete(&self, session: &DeviceSession, path: &str) -> Result<(), TransportError> {
    self.shell(session, &format!("rm -f {}", shell_quote(path))).await?;
    Ok(())
  }
}

#[async_trait]
impl<R: CommandRunner> DeviceDiscovery for AdbTransport<R> {
  async fn devices(&self) -> Result<Vec<String>, TransportError> {
    let output = self.adb(vec!["devices".to_string()]).await?;
    Ok(parse_devices(&output.stdout_lossy()))
  }
}

fn command_error(args: &[String], output: &CommandOutput) -> TransportError {
  TransportError::Command {
    command: format!("adb {}", args.join(" ")),
    status: output.status_label(),
    stderr: output.stderr_lossy(),
  }
}

/// `adb` reports a vanished device on stderr; the session is dead from then on.
fn lost_device(session: &DeviceSession, err: TransportError) -> TransportError {
  match &err {
    TransportError::Command { stderr, .. }
      if (stderr.contains("device '") && stderr.contains("not found")) || stderr.contains("device offline") =>
    {
      warn!(serial = session.serial(), "device went away");
      session.invalidate();
      TransportError::NoDeviceConnected
    }
    _ => err,
  }
}

/// `/dir/.name.tagbridge-<uuid>` junto al destino.
fn sibling_temp(remote_path: &str) -> String {
  let (parent, name) = match remote_path.trim_end_matches('/').rsplit_once('/') {
    Some((parent, name)) => (format!("{parent}/"), name),
    None => (String::new(), remote_path),
  };
  format!("{parent}.{name}.tagbridge-{}", Uuid::new_v4().simple())
}
