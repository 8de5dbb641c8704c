use lofty::tag::{ItemKey, ItemValue, Tag, TagItem};

use tagbridge_core::domain::Rating;

/// Claves de texto que algunos escritores usan para la valoración.
/// Se comparan sin mayúsculas.
pub const KEYS_RATING: &[&str] = &["rating", "fmps_rating"];

/// lofty mapea el Vorbis comment `RATING` a `ItemKey::Popularimeter`; el
/// resto llega como `Unknown`.
pub fn is_rating_key(key: &ItemKey) -> bool {
  match key {
    ItemKey::Popularimeter => true,
    ItemKey::Unknown(raw) => KEYS_RATING.iter().any(|k| raw.eq_ignore_ascii_case(k)),
    _ => false,
  }
}

/// Busca la primera valoración legible del tag y la lleva a estrellas.
///
/// Text values go through the scale heuristic of [`Rating::from_raw`].
pub fn find_rating(tag: &Tag) -> Option<Rating> {
  tag.items().filter(|item| is_rating_key(item.key())).find_map(rating_of)
}

/// Item de texto con la forma normalizada (`0.2` por estrella).
pub fn rating_item(rating: Rating) -> TagItem {
  TagItem::new(ItemKey::Popularimeter, ItemValue::Text(format!("{:.1}", rating.to_normalized())))
}

fn rating_of(item: &TagItem) -> Option<Rating> {
  match item.value() {
    ItemValue::Text(text) => text.trim().parse::<f64>().ok().map(Rating::from_raw),
    _ => None,
  }
}

/// Normaliza un campo de texto: recorta y descarta valores vacíos.
pub fn clean_text(value: Option<std::borrow::Cow<'_, str>>) -> String {
  value.map(|v| v.trim().to_string()).unwrap_or_default()
}
