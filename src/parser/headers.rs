//! Splitting of compound header labels such as `"Mean/SD"` or
//! `"n: %"`.
//!
//! Independent of the reconstruction pipeline; callers use it to break a
//! column label into its parts.

/// Characters separating the parts of a compound header.
pub const HEADER_SEPARATORS: &[char] = &[':', '|', '/', ',', ';'];

/// Split a header into its parts.
///
/// Parts are trimmed; empty parts are dropped.
pub fn split_header(header: &str) -> Vec<String> {
    header
        .split(HEADER_SEPARATORS)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// Shape of a compound header: the separators in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFormat {
    separators: Vec<char>,
}

impl HeaderFormat {
    /// Separators in order of appearance.
    pub fn separators(&self) -> &[char] {
        &self.separators
    }

    /// Number of parts a value of this shape splits into.
    pub fn part_count(&self) -> usize {
        self.separators.len() + 1
    }

    /// Check if a cell value has the same shape, e.g. `"12/3.4"` for a
    /// `"Mean/SD"` header.
    pub fn matches(&self, value: &str) -> bool {
        let found: Vec<char> = value.chars().filter(|c| HEADER_SEPARATORS.contains(c)).collect();
        found == self.separators
            && value
                .split(HEADER_SEPARATORS)
                .all(|part| !part.trim().is_empty())
    }

    /// Split a value of this shape into its parts.
    ///
    /// Returns `None` when the value does not match.
    pub fn split(&self, value: &str) -> Option<Vec<String>> {
        self.matches(value).then(|| split_header(value))
    }
}

/// Detect whether a header has a splittable shape.
///
/// Returns `None` for empty headers and headers without separators.
pub fn header_format(header: &str) -> Option<HeaderFormat> {
    let separators: Vec<char> = header
        .chars()
        .filter(|c| HEADER_SEPARATORS.contains(c))
        .collect();
    (!separators.is_empty()).then_some(HeaderFormat { separators })
}
