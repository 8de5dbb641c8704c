use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::domain::{FileRecord, SyncDirection, SyncPair};

/// Empareja registros locales y remotos por nombre de archivo (sin
/// mayúsculas) y clasifica la dirección de cada par.
///
/// - Un archivo presente en un solo lado no produce par.
/// - Si varios remotos comparten nombre, gana el primero en el orden del
///   escaneo remoto; el resto se ignora.
pub fn match_records(local: &[FileRecord], remote: &[FileRecord]) -> Vec<SyncPair> {
  let mut by_name: HashMap<String, &FileRecord> = HashMap::with_capacity(remote.len());

  for rec in remote {
    match by_name.entry(rec.match_key()) {
      Entry::Vacant(slot) => {
        slot.insert(rec);
      }
      Entry::Occupied(slot) => {
        debug!(kept = %slot.get().identity, ignored = %rec.identity, "duplicate remote filename");
      }
    }
  }

  local
    .iter()
    .filter_map(|l| {
      let r = by_name.get(&l.match_key())?;
      Some(SyncPair { local: l.clone(), remote: (*r).clone(), direction: classify(l.last_modified, r.last_modified) })
    })
    .collect()
}

/// Newer wins; an unknown instant counts as the epoch.
pub fn classify(local: Option<SystemTime>, remote: Option<SystemTime>) -> SyncDirection {
  let l = local.unwrap_or(UNIX_EPOCH);
  let r = remote.unwrap_or(UNIX_EPOCH);

  if l > r {
    SyncDirection::ToRemote
  } else if r > l {
    SyncDirection::ToLocal
  } else {
    SyncDirection::None
  }
}
