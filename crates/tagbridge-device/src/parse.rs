//! Parsers de la salida de `adb`.

use std::time::{Duration, UNIX_EPOCH};

use tagbridge_core::domain::DirEntry;
use tagbridge_core::domain::record::base_name;

/// Formato que pedimos a `stat -c`: tipo, tamaño, mtime (segundos), ruta.
pub const STAT_FORMAT: &str = "%F|%s|%Y|%n";

/// Seriales en estado `device` de la salida de `adb devices`.
///
/// `offline` and `unauthorized` entries cannot take commands, so they are
/// left out.
pub fn parse_devices(stdout: &str) -> Vec<String> {
  stdout
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty() && !line.starts_with("List of devices") && !line.starts_with('*'))
    .filter_map(|line| {
      let mut cols = line.split_whitespace();
      match (cols.next(), cols.next()) {
        (Some(serial), Some("device")) => Some(serial.to_string()),
        _ => None,
      }
    })
    .collect()
}

/// Una línea `%F|%s|%Y|%n`. Symlinks y otros tipos especiales dan `None`.
pub fn parse_stat_line(line: &str) -> Option<DirEntry> {
  let mut cols = line.splitn(4, '|');
  let kind = cols.next()?;
  let size: u64 = cols.next()?.trim().parse().ok()?;
  let mtime: u64 = cols.next()?.trim().parse().ok()?;
  let path = cols.next()?.trim_end_matches(['\r', '\n']);
  if path.is_empty() {
    return None;
  }

  let is_directory = match kind {
    "directory" => true,
    "regular file" | "regular empty file" => false,
    _ => return None,
  };

  Some(DirEntry {
    name: base_name(path).to_string(),
    path: path.to_string(),
    is_directory,
    size_bytes: if is_directory { 0 } else { size },
    modified_at: Some(UNIX_EPOCH + Duration::from_secs(mtime)),
  })
}

pub fn parse_listing(stdout: &str) -> Vec<DirEntry> {
  stdout.lines().filter(|l| !l.trim().is_empty()).filter_map(parse_stat_line).collect()
}

/// Para `adb shell`: el comando llega a `sh` del dispositivo como un único
/// string, así que cada argumento va entre comillas simples.
pub fn shell_quote(arg: &str) -> String {
  format!("'{}'", arg.replace('\'', r"'\''"))
}
