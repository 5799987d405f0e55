//! Storage key derivation for address display text.
//!
//! # Responsibility
//! - Turn free-form address strings into stable, filesystem-safe keys.
//!
//! # Invariants
//! - `slugify` is pure and deterministic.
//! - Output contains only lowercase ASCII letters, digits, and underscores.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid charset regex"));
static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").expect("valid separator regex"));

/// Derives the storage key for an address display string.
///
/// Diacritics are folded to ASCII, anything outside word characters,
/// whitespace and hyphens is dropped, and separator runs collapse to a
/// single underscore: `"1 Rue de la Paix, 75002 Paris"` becomes
/// `"1_rue_de_la_paix_75002_paris"`.
pub fn slugify(value: &str) -> String {
    let folded: String = value.nfkd().filter(char::is_ascii).collect();
    let cleaned = DISALLOWED_RE.replace_all(&folded, "");
    let trimmed = cleaned.trim().to_lowercase();
    SEPARATOR_RE.replace_all(&trimmed, "_").into_owned()
}
