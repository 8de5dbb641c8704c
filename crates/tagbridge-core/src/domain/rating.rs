use serde::{Deserialize, Serialize};
use std::fmt;

/// Valoración canónica en estrellas, entero en `[0, 5]`.
///
/// Es la única escala que circula por el núcleo; cada contenedor convierte
/// desde/hacia su codificación nativa en el borde (POPM para ID3v2, texto
/// para Vorbis comments).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rating(u8);

impl Rating {
  pub const UNRATED: Rating = Rating(0);
  pub const MAX_STARS: u8 = 5;

  /// Canonical star count to POPM byte. Fixed table, not a linear scale:
  /// it is what other players expect to find in the frame.
  const POPM_TABLE: [u8; 6] = [0, 1, 64, 128, 196, 255];

  /// Devuelve `None` si `stars` está fuera de `[0, 5]`.
  pub fn new(stars: u8) -> Option<Self> {
    (stars <= Self::MAX_STARS).then_some(Self(stars))
  }

  pub fn stars(&self) -> u8 {
    self.0
  }

  pub fn is_rated(&self) -> bool {
    self.0 > 0
  }

  /// POPM byte (0–255) to stars: `round(byte / 255 * 5)`.
  ///
  /// Bytes that appear in the write table map back to their own star count
  /// so that a value written by us survives a read unchanged.
  pub fn from_popm(byte: u8) -> Self {
    if let Some(stars) = Self::POPM_TABLE.iter().position(|&b| b == byte) {
      return Self(stars as u8);
    }
    Self::from_scaled(f64::from(byte) / 255.0 * 5.0)
  }

  pub fn to_popm(&self) -> u8 {
    Self::POPM_TABLE[usize::from(self.0)]
  }

  /// Star count as a fraction of the maximum (`0.2` per star).
  ///
  /// Text containers store this form: every value falls in the `v <= 1`
  /// branch of [`from_raw`](Self::from_raw) and reads back unchanged.
  pub fn to_normalized(&self) -> f64 {
    f64::from(self.0) / f64::from(Self::MAX_STARS)
  }

  /// Normaliza un valor numérico de escala desconocida.
  ///
  /// - `v > 5`  → byte POPM
  /// - `v <= 1` → flotante normalizado `0..=1`
  /// - resto    → ya está en estrellas
  ///
  /// A value in `(1, 5]` coming from a normalized reader is indistinguishable
  /// from a star count here; that ambiguity is accepted.
  pub fn from_raw(value: f64) -> Self {
    if !value.is_finite() || value <= 0.0 {
      return Self::UNRATED;
    }

    if value > 5.0 {
      Self::from_popm(value.round().min(255.0) as u8)
    } else if value <= 1.0 {
      Self::from_scaled(value * 5.0)
    } else {
      Self::from_scaled(value)
    }
  }

  fn from_scaled(stars: f64) -> Self {
    Self(stars.round().clamp(0.0, f64::from(Self::MAX_STARS)) as u8)
  }
}

impl fmt::Display for Rating {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for _ in 0..self.0 {
      write!(f, "★")?;
    }
    for _ in self.0..Self::MAX_STARS {
      write!(f, "☆")?;
    }
    Ok(())
  }
}
