use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "tagbridge", version)]
#[command(about = "Sync title/artist/album/rating tags between a music folder and an Android device")]
pub struct Cli {
  /// Log at debug level (RUST_LOG still wins).
  #[arg(short, long, global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Recursively read every supported audio file under a root.
  Scan {
    side: SideArg,
    root: String,
    /// Device serial (remote side only).
    #[arg(long)]
    serial: Option<String>,
  },

  /// List the sub-folders of one folder.
  Browse {
    side: SideArg,
    path: String,
    #[arg(long)]
    serial: Option<String>,
  },

  /// Show the devices adb can talk to.
  Devices,

  /// Reconcile tags between the local folder and the device folder.
  Sync {
    /// Local music folder; defaults to the last one used.
    #[arg(long)]
    local: Option<PathBuf>,
    /// Device music folder; defaults to the last one used.
    #[arg(long)]
    remote: Option<String>,
    #[arg(long)]
    serial: Option<String>,
    /// Apply without asking.
    #[arg(short, long)]
    yes: bool,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
  Local,
  Remote,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_sync_flags() {
    let cli = Cli::parse_from(["tagbridge", "-v", "sync", "--local", "/music", "--remote", "/sdcard/Music", "--yes"]);

    assert!(cli.verbose);
    match cli.command {
      Command::Sync { local, remote, serial, yes } => {
        assert_eq!(local, Some(PathBuf::from("/music")));
        assert_eq!(remote.as_deref(), Some("/sdcard/Music"));
        assert_eq!(serial, None);
        assert!(yes);
      }
      other => panic!("unexpected command: {other:?}"),
    }
  }

  #[test]
  fn parses_scan_side() {
    let cli = Cli::parse_from(["tagbridge", "scan", "remote", "/sdcard/Music", "--serial", "emulator-5554"]);

    assert!(matches!(cli.command, Command::Scan { side: SideArg::Remote, ref serial, .. } if serial.as_deref() == Some("emulator-5554")));
  }

  #[test]
  fn clap_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
  }
}
