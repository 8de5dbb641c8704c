pub mod app;
pub mod cli;
mod commands;
pub mod config;
pub mod infrastructure;

use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::cli::{Cli, Command};

/// Logs a stderr; `RUST_LOG` manda, si no `info` (o `debug` con `-v`).
pub fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).try_init();
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
  let app = App::from_config()?;

  match cli.command {
    Command::Scan { side, root, serial } => commands::scan(&app, side, &root, serial.as_deref()).await,
    Command::Browse { side, path, serial } => commands::browse(&app, side, &path, serial.as_deref()).await,
    Command::Devices => commands::devices(&app).await,
    Command::Sync { local, remote, serial, yes } => commands::sync(&app, local, remote, serial.as_deref(), yes).await,
  }
}
