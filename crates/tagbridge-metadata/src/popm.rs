//! Frame ID3v2 `POPM` (Popularimeter).
//!
//! lofty no lo pasa al `Tag` genérico, así que se lee y escribe sobre el
//! `Id3v2Tag` concreto.

use std::borrow::Cow;

use lofty::id3::v2::{Frame, FrameId, Id3v2Tag, PopularimeterFrame};

use tagbridge_core::domain::Rating;

/// Identifies who wrote the rating. Players that key their stars off the
/// e-mail field expect this one together with the fixed byte table.
pub const POPM_EMAIL: &str = "Windows Media Player 9 Series";

const POPM_ID: FrameId<'static> = FrameId::Valid(Cow::Borrowed("POPM"));

/// Valoración del tag. Con varios POPM gana el nuestro; si no está, el
/// primero que aparezca.
pub fn read(tag: &Id3v2Tag) -> Option<Rating> {
  let mut first = None;

  for frame in tag {
    if let Frame::Popularimeter(popm) = frame {
      if popm.email == POPM_EMAIL {
        return Some(Rating::from_popm(popm.rating));
      }
      first.get_or_insert(popm.rating);
    }
  }

  first.map(Rating::from_popm)
}

/// Replaces every POPM frame with ours. Unrated leaves none.
pub fn write(tag: &mut Id3v2Tag, rating: Rating) {
  tag.remove(&POPM_ID).for_each(drop);
  if rating.is_rated() {
    tag.insert(Frame::Popularimeter(PopularimeterFrame::new(POPM_EMAIL.to_string(), rating.to_popm(), 0)));
  }
}
