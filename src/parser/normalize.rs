//! Cell text cleanup and numeric normalization.
//!
//! Cleaning runs once per cell during span resolution; coercion runs when
//! a data row is placed into a section.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;

use crate::model::{is_placeholder, CellValue};

static RE_INLINE_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:span|sup|sub|hr|em|strong|i|b)\b[^>\n]*>")
        .expect("valid inline markup regex")
});

static RE_LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*<br\b[^>\n]*>\s*").expect("valid line break regex")
});

// "3 × 10-5", "3x10_-5", "3 * 10^−5"
static RE_TIMES_POWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)\s?[*×✕xX·⋅]\s?10_?\^?[–−-](\d+)")
        .expect("valid power-of-ten regex")
});

// "3e-5", "3 E − 5"
static RE_EXPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)\s?[eE]\s?[–−-]\s?(\d+)").expect("valid exponent regex")
});

const SUPERSCRIPTS: &[char] = &[
    '⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹', '⁻', '⁺',
];

const MINUS_VARIANTS: &[char] = &['−', '–'];

/// Clean raw cell content for storage in the grid.
///
/// Collapses thin and no-break spaces, turns line breaks into a space,
/// removes leftover inline tags,
/// strips one layer of wrapping parentheses and canonicalizes scientific
/// notation.
pub fn clean_cell_text(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| match c {
            '\u{2009}' | '\u{202F}' | '\u{00A0}' => ' ',
            other => other,
        })
        .collect();
    let unbroken = RE_LINE_BREAK.replace_all(&spaced, " ");
    let unmarked = RE_INLINE_MARKUP.replace_all(&unbroken, "");
    let unwrapped = strip_wrapping_parens(unmarked.trim()).trim();
    canonicalize_scientific(unwrapped)
}

/// Remove one layer of parentheses enclosing the whole text.
///
/// `"(1.2)"` becomes `"1.2"`; `"(1) vs (2)"` is left alone because its
/// first parenthesis closes before the end.
pub fn strip_wrapping_parens(text: &str) -> &str {
    let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) else {
        return text;
    };
    let mut depth = 0i32;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return text;
                }
            }
            _ => {}
        }
    }
    if depth == 0 {
        inner
    } else {
        text
    }
}

/// Rewrite scientific notation to the `<mantissa>e-<exponent>` form.
///
/// Applies when the text starts with a power-of-ten product
/// (`3 × 10⁻⁵`, `3x10-5`) or an exponent marker (`3E−5`); the rest of the
/// text is kept as written. Already canonical text is returned unchanged.
pub fn canonicalize_scientific(text: &str) -> String {
    let folded = fold_superscripts(text);
    if let Some(caps) = RE_TIMES_POWER.captures(&folded) {
        // folding maps one char to one char, so char counts line up
        let matched = folded[..match_end(&caps)].chars().count();
        let tail = text
            .char_indices()
            .nth(matched)
            .map_or("", |(i, _)| &text[i..]);
        return rebuild_exponent(&caps, tail);
    }
    if let Some(caps) = RE_EXPONENT.captures(text) {
        return rebuild_exponent(&caps, &text[match_end(&caps)..]);
    }
    text.to_string()
}

/// Replace superscript digits and signs with their plain forms, leaving
/// every other character untouched.
fn fold_superscripts(text: &str) -> Cow<'_, str> {
    if !text.contains(SUPERSCRIPTS) {
        return Cow::Borrowed(text);
    }
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        if SUPERSCRIPTS.contains(&c) {
            folded.extend(std::iter::once(c).nfkc());
        } else {
            folded.push(c);
        }
    }
    Cow::Owned(folded)
}

fn match_end(caps: &Captures<'_>) -> usize {
    caps.get(0).map_or(0, |m| m.end())
}

fn rebuild_exponent(caps: &Captures<'_>, tail: &str) -> String {
    format!("{}e-{}{}", &caps[1], &caps[2], tail)
}

/// Parse a cell as a finite number.
///
/// Thousands separators are dropped and unicode minus / en dash read as
/// `-`.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned = text.replace(MINUS_VARIANTS, "-").replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce a cleaned cell to a number where possible.
pub fn coerce_cell(text: &str) -> CellValue {
    match parse_number(text) {
        Some(n) => CellValue::Number(n),
        None => CellValue::Text(text.to_string()),
    }
}

/// Content kind of a single cell, used for column voting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Empty, `-` or `none`
    Placeholder,
    /// Parses as a number
    Number,
    /// Digits mixed with other characters
    Mixed,
    /// No digits at all
    Text,
}

/// Classify a cleaned cell.
pub fn cell_kind(text: &str) -> CellKind {
    if is_placeholder(text) {
        CellKind::Placeholder
    } else if parse_number(text).is_some() {
        CellKind::Number
    } else if !has_digit(text) {
        CellKind::Text
    } else {
        CellKind::Mixed
    }
}

/// Check if a cell contains no digits.
pub fn is_textual(text: &str) -> bool {
    !has_digit(text)
}

fn has_digit(text: &str) -> bool {
    text.chars().any(char::is_numeric)
}
