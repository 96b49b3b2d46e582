//! Text normalization for names passed to a synthesizer

/// Replace characters that synthesizers pronounce badly.
///
/// - hyphens and colons become spaces
/// - semicolons and slashes become ", " (better intonation than the symbol)
/// - non-German voices get "ss" for "ß"
/// - English voices get "S R" for "SR", which would otherwise be read "Senior"
///
/// `language` is the active voice's language; `None` when no voice is loaded,
/// in which case only the punctuation rules apply.
pub fn speakable_point_name(name: &str, language: Option<&str>) -> String {
    let mut spoken = name
        .replace(['-', ':'], " ")
        .replace(';', ", ")
        .replace('/', ", ");

    if let Some(language) = language {
        if language != "de" {
            spoken = spoken.replace('\u{00df}', "ss");
        }
        if "en".starts_with(language) {
            spoken = spoken.replace("SR", "S R");
        }
    }
    spoken
}
