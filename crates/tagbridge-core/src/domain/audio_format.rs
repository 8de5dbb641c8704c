use serde::{Deserialize, Serialize};
use std::fmt;

/// Contenedores de audio que el scanner reconoce.
///
/// Cualquier otra extensión es invisible: el archivo ni siquiera llega a
/// producir un [`FileRecord`](crate::domain::FileRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
  Mp3,
  Flac,
  M4a,
  Ogg,
  Wav,
  Aiff,
  Wma,
}

impl AudioFormat {
  pub const ALL: [AudioFormat; 7] = [
    AudioFormat::Mp3,
    AudioFormat::Flac,
    AudioFormat::M4a,
    AudioFormat::Ogg,
    AudioFormat::Wav,
    AudioFormat::Aiff,
    AudioFormat::Wma,
  ];

  /// Case-insensitive lookup of a bare extension (no leading dot).
  pub fn from_extension(ext: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|f| f.extension().eq_ignore_ascii_case(ext))
  }

  /// Derives the format from a file name or a `/`-separated device path.
  ///
  /// Names without a stem (`.mp3`) are treated like dotfiles, not audio.
  pub fn from_file_name(name: &str) -> Option<Self> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() {
      return None;
    }
    Self::from_extension(ext)
  }

  pub fn extension(&self) -> &'static str {
    match self {
      AudioFormat::Mp3 => "mp3",
      AudioFormat::Flac => "flac",
      AudioFormat::M4a => "m4a",
      AudioFormat::Ogg => "ogg",
      AudioFormat::Wav => "wav",
      AudioFormat::Aiff => "aiff",
      AudioFormat::Wma => "wma",
    }
  }

  /// Formats whose container carries a rating we know how to map.
  pub fn supports_rating(&self) -> bool {
    matches!(self, AudioFormat::Mp3 | AudioFormat::Flac | AudioFormat::Ogg)
  }
}

impl fmt::Display for AudioFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.extension())
  }
}
