use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::trace;

/// Salida capturada de un proceso hijo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// `None` si el proceso murió por una señal.
  pub status: Option<i32>,
  pub stdout: Vec<u8>,
  pub stderr: Vec<u8>,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.status == Some(0)
  }

  pub fn stdout_lossy(&self) -> String {
    String::from_utf8_lossy(&self.stdout).into_owned()
  }

  pub fn stderr_lossy(&self) -> String {
    String::from_utf8_lossy(&self.stderr).trim().to_string()
  }

  pub fn status_label(&self) -> String {
    self.status.map_or_else(|| "signal".to_string(), |code| code.to_string())
  }
}

/// Ejecuta un programa y espera su salida completa.
#[async_trait]
pub trait CommandRunner: Send + Sync {
  async fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

/// Runner real sobre `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
  async fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
    trace!(program, ?args, "spawn");
    let output = Command::new(program)
      .args(args)
      .stdin(Stdio::null())
      .kill_on_drop(true)
      .output()
      .await?;

    Ok(CommandOutput { status: output.status.code(), stdout: output.stdout, stderr: output.stderr })
  }
}
