//! File name and display-string helpers.

/// Characters that are kept verbatim by [`slugify`] in addition to
/// alphanumerics.
pub const SLUG_ALLOWED: &str = "-_()[]{}";

/// Make a song name safe to use as a file name.
///
/// Path separators and characters rejected by common filesystems are
/// dropped, runs of whitespace collapse to a single space.
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') && !c.is_control())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Slug for export file names: lowercase, whitespace and other punctuation
/// become single dashes, characters in [`SLUG_ALLOWED`] survive.
///
/// "Road Trip: 2019 (Mix)" → "road-trip-2019-(mix)"
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() || (SLUG_ALLOWED.contains(c) && c != '-') {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Words kept lowercase by [`title_case`] unless they start the string.
const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "in", "of", "on", "or", "the", "to", "vs",
];

/// Title-case a genre name: "dance pop" → "Dance Pop", "rhythm and blues" →
/// "Rhythm and Blues".  Hyphenated parts are capitalized individually.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && SMALL_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                lower.split('-').map(capitalize).collect::<Vec<_>>().join("-")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
