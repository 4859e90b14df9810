//! Slug normalization for city and category identifiers.
use std::sync::LazyLock;

use regex::Regex;

static NON_SLUG_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_]+").unwrap());
static REPEATED_HYPHENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

/// Turns free text into a URL-safe slug.
///
/// The input is lower-cased, stripped of anything that isn't a word character, whitespace or a hyphen,
/// then whitespace and underscores become hyphens. Repeated hyphens are collapsed and leading/trailing ones trimmed.
///
/// ## Example
/// ```rust
/// use citypages::slug::slugify;
///
/// assert_eq!(slugify("  Arts & Crafts "), "arts-crafts");
/// assert_eq!(slugify("Kid's_Museums"), "kids-museums");
/// ```
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let hyphenated = SEPARATORS.replace_all(&stripped, "-");
    let collapsed = REPEATED_HYPHENS.replace_all(&hyphenated, "-");

    collapsed.trim_matches('-').to_string()
}

/// Human-readable form of a slug: hyphens become spaces and every word is capitalized.
pub fn title_case(slug: &str) -> String {
    let mut title = String::with_capacity(slug.len());
    let mut inside_word = false;

    for char in slug.chars() {
        let char = if char == '-' { ' ' } else { char };
        if char.is_alphabetic() {
            if inside_word {
                title.extend(char.to_lowercase());
            } else {
                title.extend(char.to_uppercase());
            }
            inside_word = true;
        } else {
            title.push(char);
            inside_word = false;
        }
    }

    title
}
