//! URL slugs for posts

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_\s-]").expect("slug pattern is valid"));
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_-]+").expect("separator pattern is valid"));

/// Lowercase, hyphen-separated form of `text`
///
/// Characters other than ASCII letters, digits, whitespace, `_` and `-` are
/// dropped; runs of separators collapse into a single `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let kept = DISALLOWED.replace_all(&lowered, "");
    let joined = SEPARATORS.replace_all(&kept, "-");
    joined.trim_matches('-').to_string()
}

/// `base`, or `base-N` with the smallest N >= 1 not in `taken`
#[must_use]
pub fn unique_slug<'a>(base: &str, taken: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = taken.into_iter().collect();
    if !taken.contains(base) {
        return base.to_string();
    }
    (1u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}
