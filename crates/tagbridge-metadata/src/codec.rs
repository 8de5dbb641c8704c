use std::fs;
use std::path::Path;

use async_trait::async_trait;
use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::id3::v2::Id3v2Tag;
use lofty::mpeg::MpegFile;
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag, TagExt};
use tracing::{debug, warn};

use tagbridge_core::TagWriteError;
use tagbridge_core::domain::record::base_name;
use tagbridge_core::domain::{AudioFormat, FileRecord, Rating};
use tagbridge_core::ports::{TagCodec, TagPatch};

use crate::error::TagReadError;
use crate::popm;
use crate::tag_keys::{clean_text, find_rating, is_rating_key, rating_item};

/// Tag Codec basado en `lofty`.
///
/// - MP3 (ID3v2): valoración en el frame `POPM`.
/// - FLAC / OGG: valoración en el Vorbis comment `RATING`, escrita en forma
///   normalizada (`0.2` por estrella).
/// - M4A, WAV, AIFF: título/artista/álbum; la valoración se lee como 0 y no
///   se escribe.
/// - WMA: lofty no lo soporta; la lectura degrada a metadatos del
///   filesystem y la escritura falla con `TagWriteError`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagCodec;

impl LoftyTagCodec {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl TagCodec for LoftyTagCodec {
  async fn read(&self, path: &Path, format: AudioFormat) -> FileRecord {
    let owned = path.to_path_buf();

    // lofty es bloqueante: lo sacamos del executor.
    match tokio::task::spawn_blocking(move || read_record(&owned, format)).await {
      Ok(record) => record,
      Err(e) => {
        warn!(path = %path.display(), error = %e, "tag read task failed");
        stat_record(path, format)
      }
    }
  }

  async fn write(&self, path: &Path, patch: &TagPatch) -> Result<(), TagWriteError> {
    let owned = path.to_path_buf();
    let patch = patch.clone();

    tokio::task::spawn_blocking(move || write_tags(&owned, &patch))
      .await
      .map_err(|e| TagWriteError::new(path.display().to_string(), format!("write task failed: {e}")))?
  }
}

/// Lee un archivo; si el contenedor no se puede parsear, devuelve el
/// registro mínimo derivado del filesystem.
pub fn read_record(path: &Path, format: AudioFormat) -> FileRecord {
  let mut record = stat_record(path, format);

  match read_tag(path) {
    Ok(Some(tag)) => {
      record.title = clean_text(tag.title());
      record.artist = clean_text(tag.artist());
      record.album = clean_text(tag.album());
      if format.supports_rating() && format != AudioFormat::Mp3 {
        record.rating = find_rating(&tag).unwrap_or_default();
      }
    }
    Ok(None) => {
      debug!(path = %path.display(), "no tag in container");
    }
    Err(e) => {
      warn!(path = %path.display(), error = %e, "tag read failed, using filesystem metadata");
      return record;
    }
  }

  // POPM no llega al tag genérico.
  if format == AudioFormat::Mp3 {
    match read_id3v2_rating(path) {
      Ok(rating) => record.rating = rating.unwrap_or_default(),
      Err(e) => debug!(path = %path.display(), error = %e, "no id3v2 rating"),
    }
  }

  record
}

fn read_tag(path: &Path) -> Result<Option<Tag>, TagReadError> {
  let tagged = Probe::open(path)?.options(ParseOptions::new()).read()?;
  let tag = tagged.primary_tag().or_else(|| tagged.first_tag()).cloned();
  Ok(tag)
}

fn read_id3v2_rating(path: &Path) -> Result<Option<Rating>, TagReadError> {
  let mut file = fs::File::open(path)?;
  let mpeg = MpegFile::read_from(&mut file, ParseOptions::new())?;
  Ok(mpeg.id3v2().and_then(popm::read))
}

fn stat_record(path: &Path, format: AudioFormat) -> FileRecord {
  let identity = path.to_string_lossy().to_string();
  let filename = base_name(&identity).to_string();

  match fs::metadata(path) {
    Ok(meta) => FileRecord::from_stat(identity, filename, format, meta.len(), meta.modified().ok()),
    Err(e) => {
      warn!(path = %path.display(), error = %e, "stat failed");
      FileRecord::from_stat(identity, filename, format, 0, None)
    }
  }
}

/// Escribe el patch sobre una copia hermana y la promueve con un rename.
///
/// The original is never opened for writing: until the final rename nothing
/// observable changes, and any error drops the copy.
pub fn write_tags(path: &Path, patch: &TagPatch) -> Result<(), TagWriteError> {
  let fail = |reason: String| TagWriteError::new(path.display().to_string(), reason);

  let format = AudioFormat::from_file_name(&path.to_string_lossy())
    .ok_or_else(|| fail("not a supported audio file".into()))?;
  let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));

  let staged = tempfile::Builder::new()
    .prefix(".tagbridge-")
    .suffix(&format!(".{}", format.extension()))
    .tempfile_in(parent)
    .map_err(|e| fail(format!("create sibling copy: {e}")))?;

  fs::copy(path, staged.path()).map_err(|e| fail(format!("copy original: {e}")))?;
  apply_patch(staged.path(), format, patch).map_err(fail)?;
  tagbridge_fs::stamp::touch_now(staged.path()).map_err(|e| fail(format!("stamp mtime: {e}")))?;

  staged.persist(path).map_err(|e| fail(format!("replace original: {}", e.error)))?;
  debug!(path = %path.display(), "tags written");
  Ok(())
}

fn apply_patch(path: &Path, format: AudioFormat, patch: &TagPatch) -> Result<(), String> {
  match format {
    AudioFormat::Mp3 => apply_id3v2(path, patch),
    _ => apply_generic(path, format, patch),
  }
}

/// MP3: se trabaja sobre el `Id3v2Tag` concreto para conservar el POPM y
/// los frames que el tag genérico no representa.
fn apply_id3v2(path: &Path, patch: &TagPatch) -> Result<(), String> {
  let mut file = fs::File::open(path).map_err(|e| format!("open container: {e}"))?;
  let mut mpeg = MpegFile::read_from(&mut file, ParseOptions::new()).map_err(|e| format!("open container: {e}"))?;
  drop(file);

  // A new ID3v2 tag shadows the ID3v1 one on read, so it starts from its text.
  let mut tag = match mpeg.remove_id3v2() {
    Some(tag) => tag,
    None => {
      let mut fresh = Id3v2Tag::new();
      if let Some(v1) = mpeg.id3v1() {
        copy_text(v1, &mut fresh);
      }
      fresh
    }
  };

  apply_text(&mut tag, patch);
  if let Some(rating) = patch.rating {
    popm::write(&mut tag, rating);
  }

  tag.save_to_path(path, WriteOptions::default()).map_err(|e| format!("save container: {e}"))
}

fn apply_generic(path: &Path, format: AudioFormat, patch: &TagPatch) -> Result<(), String> {
  let mut tagged = Probe::open(path)
    .and_then(|p| p.options(ParseOptions::new()).read())
    .map_err(|e| format!("open container: {e}"))?;

  let tag_type = tagged.primary_tag_type();
  if tagged.primary_tag().is_none() {
    let mut fresh = Tag::new(tag_type);
    if let Some(existing) = tagged.first_tag() {
      copy_text(existing, &mut fresh);
    }
    tagged.insert_tag(fresh);
  }
  let tag = tagged.primary_tag_mut().ok_or_else(|| format!("container has no {tag_type:?} tag"))?;

  apply_text(tag, patch);

  if let Some(rating) = patch.rating {
    if format.supports_rating() {
      set_rating(tag, rating)?;
    } else {
      debug!(path = %path.display(), %format, "container has no rating field, skipped");
    }
  }

  tag.save_to_path(path, WriteOptions::default()).map_err(|e| format!("save container: {e}"))
}

fn copy_text<S: Accessor, D: Accessor>(from: &S, to: &mut D) {
  if let Some(title) = from.title() {
    to.set_title(title.into_owned());
  }
  if let Some(artist) = from.artist() {
    to.set_artist(artist.into_owned());
  }
  if let Some(album) = from.album() {
    to.set_album(album.into_owned());
  }
}

fn apply_text<T: Accessor>(tag: &mut T, patch: &TagPatch) {
  set_text(tag, &patch.title, T::set_title, T::remove_title);
  set_text(tag, &patch.artist, T::set_artist, T::remove_artist);
  set_text(tag, &patch.album, T::set_album, T::remove_album);
}

fn set_text<T>(tag: &mut T, value: &Option<String>, set: fn(&mut T, String), remove: fn(&mut T)) {
  match value.as_deref().map(str::trim) {
    None => {}
    Some("") => remove(tag),
    Some(v) => set(tag, v.to_string()),
  }
}

/// Vorbis comments: `RATING` vía `ItemKey::Popularimeter`.
fn set_rating(tag: &mut Tag, rating: Rating) -> Result<(), String> {
  tag.retain(|item| !is_rating_key(item.key()));
  if !rating.is_rated() {
    return Ok(());
  }

  if tag.insert(rating_item(rating)) { Ok(()) } else { Err(format!("{:?} tag rejected the rating item", tag.tag_type())) }
}
