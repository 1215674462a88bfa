//! Slugs and name ordering.
//!
//! ## Slugs
//!
//! Category slugs are the trimmed category name, unchanged. Names may contain
//! spaces or non-ASCII text; they are percent-encoded where they end up in
//! URLs (see [`crate::links`]) rather than rewritten here. [`category_to_slug`]
//! is the single place a real slugification would go.
//!
//! Article slugs come from the `slug` front matter field, falling back to the
//! article id (its path under the articles directory).
//!
//! ## Ordering
//!
//! Category lists are sorted with [`compare_names`], a fixed collation tuned
//! for Japanese content and compared level by level:
//!
//! 1. Base letters. Case, accents, full-width forms and the katakana and
//!    hiragana distinction are ignored (`éclair` < `zebra`, `Ｔｅｃｈ` ~ `tech`,
//!    `カメラ` ~ `かめら`).
//! 2. Accents. An unaccented letter sorts before its accented forms.
//! 3. Case. Lowercase sorts before uppercase (`tech` < `Tech`).
//!
//! Names still tied after that are ordered by code point, so the order is
//! total and two names compare `Equal` only when identical.

use std::cmp::Ordering;

/// Slug for a category name.
pub fn category_to_slug(name: &str) -> String {
    name.trim().to_string()
}

/// Route slug for an article: the explicit `slug` if non-blank, else its id.
pub fn article_slug<'a>(id: &'a str, slug: Option<&'a str>) -> &'a str {
    slug.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(id)
}

/// Locale-aware comparison of two display names.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_key(a)
        .cmp(base_key(b))
        .then_with(|| accent_key(a).cmp(accent_key(b)))
        .then_with(|| case_key(a).cmp(case_key(b)))
        .then_with(|| a.cmp(b))
}

/// Folded, lowercased characters with accents removed.
fn base_key(name: &str) -> impl Iterator<Item = char> + '_ {
    accent_key(name)
        .filter(|c| !is_combining_mark(*c))
        .map(strip_accent)
}

/// Folded, lowercased characters with accents kept.
fn accent_key(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars()
        .map(fold_width)
        .map(fold_kana)
        .flat_map(char::to_lowercase)
}

/// One flag per character, `false` (lowercase) before `true` (uppercase).
fn case_key(name: &str) -> impl Iterator<Item = bool> + '_ {
    name.chars().map(char::is_uppercase)
}

/// Combining diacritical marks (U+0300..U+036F).
fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

/// Base letter of a lowercase Latin-1 or Latin Extended-A letter.
fn strip_accent(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' | 'ſ' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => c,
    }
}

/// Map full-width ASCII variants (U+FF01..U+FF5E) and the ideographic space
/// to their ASCII counterparts.
fn fold_width(c: char) -> char {
    match c {
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        '\u{3000}' => ' ',
        _ => c,
    }
}

/// Map katakana (U+30A1..U+30F6) to hiragana.
fn fold_kana(c: char) -> char {
    match c {
        '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
        _ => c,
    }
}
