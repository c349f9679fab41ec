//! Logical table types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell value after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// A cell that parsed as a finite number
    Number(f64),
    /// Any other cell, as cleaned text
    Text(String),
}

impl CellValue {
    /// Get the number, if the cell is numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    /// Get the text, if the cell is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Number(_) => None,
            CellValue::Text(s) => Some(s),
        }
    }

    /// Check if the cell is numeric.
    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    /// Length in characters of the value as it appears in JSON output.
    pub fn char_len(&self) -> usize {
        self.to_string().chars().count()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // serde_json writes floats through ryu; keep the same text here
            // so offsets agree with the emitted record.
            CellValue::Number(n) => match serde_json::Number::from_f64(*n) {
                Some(num) => write!(f, "{}", num),
                None => write!(f, "{}", n),
            },
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// Title, caption and footer found around a raw table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    /// Table title (e.g. "Table 1")
    pub title: String,

    /// Caption paragraphs
    pub caption: Vec<String>,

    /// Footer paragraphs (notes, abbreviations)
    pub footer: Vec<String>,
}

impl TableMeta {
    /// Create metadata with a title only.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the caption from a single string.
    ///
    /// An empty string leaves the caption empty.
    pub fn caption_text(mut self, caption: impl Into<String>) -> Self {
        self.caption = non_empty(caption.into());
        self
    }

    /// Set the caption paragraphs.
    pub fn caption_parts<S: Into<String>>(mut self, parts: impl IntoIterator<Item = S>) -> Self {
        self.caption = parts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the footer paragraphs.
    pub fn footer_parts<S: Into<String>>(mut self, parts: impl IntoIterator<Item = S>) -> Self {
        self.footer = parts.into_iter().map(Into::into).collect();
        self
    }
}

fn non_empty(text: String) -> Vec<String> {
    if text.trim().is_empty() {
        Vec::new()
    } else {
        vec![text]
    }
}

/// A named group of rows under one superrow label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Superrow label ("" when the table has no superrows)
    pub name: String,

    /// Data rows
    pub rows: Vec<Vec<CellValue>>,
}

impl Section {
    /// Create an empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Number of rows in the section.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// One logical table recovered from a raw table element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalTable {
    /// Sequence number, with a `.k` suffix when one raw table was split
    pub identifier: String,

    /// Table title
    pub title: String,

    /// Caption paragraphs
    pub caption: Vec<String>,

    /// One merged header label per column
    pub columns: Vec<String>,

    /// Row groups in document order
    pub sections: Vec<Section>,

    /// Footer paragraphs
    pub footer: Vec<String>,
}

impl LogicalTable {
    /// Create a table without rows.
    pub fn new(identifier: impl Into<String>, meta: &TableMeta, columns: Vec<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: meta.title.clone(),
            caption: meta.caption.clone(),
            columns,
            sections: Vec::new(),
            footer: meta.footer.clone(),
        }
    }

    /// Total number of data rows across sections.
    pub fn row_count(&self) -> usize {
        self.sections.iter().map(Section::row_count).sum()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Caption paragraphs joined for display.
    pub fn caption_text(&self) -> String {
        self.caption.join(". ")
    }

    /// Footer paragraphs joined for display.
    pub fn footer_text(&self) -> String {
        self.footer.join(". ")
    }

    /// Section names in order.
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }
}
