use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, bail};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

use tagbridge_core::domain::FileRecord;
use tagbridge_core::ports::{DeviceDiscovery, DirectoryScanner, Side};
use tagbridge_core::services::SyncPlan;

use crate::app::App;
use crate::cli::SideArg;
use crate::config::SyncConfig;

async fn side(app: &App, side: SideArg, serial: Option<&str>) -> anyhow::Result<Side> {
  Ok(match side {
    SideArg::Local => Side::Local,
    SideArg::Remote => Side::Remote(app.connect(serial).await.context("connect to device")?),
  })
}

pub async fn scan(app: &App, which: SideArg, root: &str, serial: Option<&str>) -> anyhow::Result<()> {
  let side = side(app, which, serial).await?;
  let report = app.service.scanner().scan(root, &side).await?;

  for (path, reason) in &report.skipped {
    warn!(path = %path, reason = %reason, "not scanned");
  }
  for record in &report.records {
    println!("{}", record_line(record));
  }
  eprintln!("{} file(s), {} folder(s) skipped", report.records.len(), report.skipped.len());
  Ok(())
}

pub async fn browse(app: &App, which: SideArg, path: &str, serial: Option<&str>) -> anyhow::Result<()> {
  let side = side(app, which, serial).await?;
  for node in app.service.scanner().list_one_level(path, &side).await? {
    println!("{}/\t{}", node.name, node.path);
  }
  Ok(())
}

pub async fn devices(app: &App) -> anyhow::Result<()> {
  let serials = app.transport.devices().await.context("run `adb devices`")?;
  if serials.is_empty() {
    eprintln!("no devices attached");
  }
  for serial in serials {
    println!("{serial}");
  }
  Ok(())
}

pub async fn sync(
  app: &App,
  local: Option<PathBuf>,
  remote: Option<String>,
  serial: Option<&str>,
  yes: bool,
) -> anyhow::Result<()> {
  let saved = SyncConfig::load(app.backend).context("load [sync] config")?;
  let (Some(local_root), Some(remote_root)) = saved.resolve(local, remote) else {
    bail!("both roots are needed: pass --local and --remote (they are remembered after a successful sync)");
  };
  let local_str = local_root.to_string_lossy().into_owned();

  let session = app.connect(serial).await.context("connect to device")?;
  let watchers = app.watch_devices();

  let result = async {
    match app.service.prepare(&local_str, &remote_root, &session).await? {
      SyncPlan::UpToDate { matched } => {
        println!("up to date: {matched} matched file(s), nothing to do");
      }
      SyncPlan::Pending(pending) => {
        let preview = pending.preview();
        println!(
          "{} file(s) to sync: {} local → device, {} device → local",
          preview.total, preview.to_remote, preview.to_local
        );

        if !yes && !confirm("apply?").await? {
          app.service.decline(pending);
          println!("cancelled, nothing changed");
          return Ok(false);
        }

        let report = app.service.apply(pending, &session).await?;
        println!("synced {} file(s)", report.applied);
      }
    }
    Ok::<bool, anyhow::Error>(true)
  }
  .await;

  for handle in watchers {
    handle.abort();
  }
  app.devices.disconnect(&session);

  if result? {
    let used = SyncConfig { local_root: Some(local_root), remote_root: Some(remote_root) };
    used.save(app.backend).context("save [sync] config")?;
  }
  Ok(())
}

async fn confirm(question: &str) -> anyhow::Result<bool> {
  let mut stdout = tokio::io::stdout();
  stdout.write_all(format!("{question} [y/N] ").as_bytes()).await?;
  stdout.flush().await?;

  let mut answer = String::new();
  BufReader::new(tokio::io::stdin()).read_line(&mut answer).await?;
  Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
  matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn record_line(r: &FileRecord) -> String {
  format!(
    "{}\t{}\t{}\t{}\t{}\t{}",
    r.filename,
    r.title,
    r.artist,
    r.album,
    r.rating,
    r.last_modified.map_or_else(|| "-".to_string(), unix_secs)
  )
}

fn unix_secs(t: SystemTime) -> String {
  t.duration_since(UNIX_EPOCH).map(|d| d.as_secs().to_string()).unwrap_or_else(|_| "-".into())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;
  use tagbridge_core::domain::{AudioFormat, Rating};

  #[test]
  fn only_explicit_yes_confirms() {
    assert!(is_yes("y\n"));
    assert!(is_yes(" YES "));
    assert!(!is_yes("\n"));
    assert!(!is_yes("n"));
    assert!(!is_yes("yep"));
  }

  #[test]
  fn record_line_is_tab_separated() {
    let mut r = FileRecord::from_stat("/m/a.mp3", "a.mp3", AudioFormat::Mp3, 10, Some(UNIX_EPOCH + Duration::from_secs(42)));
    r.artist = "Band".into();
    r.rating = Rating::new(2).unwrap();

    assert_eq!(record_line(&r), "a.mp3\ta\tBand\t\t★★☆☆☆\t42");

    r.last_modified = None;
    assert!(record_line(&r).ends_with("\t-"));
  }
}
