//! Extraction options and selector configuration.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{DEFAULT_KEY, DEFAULT_SOURCE};

/// Matches an element by tag name and attribute filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSelector {
    /// Tag name (case-insensitive)
    pub name: String,

    /// Attribute filters; all must match
    #[serde(default)]
    pub attrs: BTreeMap<String, AttrMatch>,
}

impl ElementSelector {
    /// Create a selector matching a tag name.
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Add an attribute filter.
    pub fn with_attr(mut self, name: impl Into<String>, matcher: impl Into<AttrMatch>) -> Self {
        self.attrs.insert(name.into(), matcher.into());
        self
    }

    /// Check an element given its tag name and attribute lookup.
    pub fn matches<'a>(&self, name: &str, attr: impl Fn(&str) -> Option<&'a str>) -> bool {
        if !self.name.eq_ignore_ascii_case(name) {
            return false;
        }
        self.attrs
            .iter()
            .all(|(key, matcher)| matcher.matches(key, attr(key)))
    }
}

/// Filter on a single attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrMatch {
    /// `true`: attribute present; `false`: attribute absent
    Present(bool),
    /// Attribute equals the value
    Exact(String),
    /// Attribute equals any of the values
    AnyOf(Vec<String>),
}

impl AttrMatch {
    /// Check an attribute value.
    ///
    /// `class` is compared token by token, so `"caption"` matches
    /// `class="caption wide"`.
    pub fn matches(&self, name: &str, value: Option<&str>) -> bool {
        match (self, value) {
            (AttrMatch::Present(expected), v) => *expected == v.is_some(),
            (_, None) => false,
            (AttrMatch::Exact(expected), Some(v)) => value_matches(name, v, expected),
            (AttrMatch::AnyOf(options), Some(v)) => {
                options.iter().any(|expected| value_matches(name, v, expected))
            }
        }
    }
}

fn value_matches(name: &str, value: &str, expected: &str) -> bool {
    if name.eq_ignore_ascii_case("class") {
        value.split_whitespace().any(|token| token == expected) || value.trim() == expected
    } else {
        value == expected
    }
}

impl From<&str> for AttrMatch {
    fn from(value: &str) -> Self {
        AttrMatch::Exact(value.to_string())
    }
}

impl From<bool> for AttrMatch {
    fn from(value: bool) -> Self {
        AttrMatch::Present(value)
    }
}

impl From<Vec<&str>> for AttrMatch {
    fn from(values: Vec<&str>) -> Self {
        AttrMatch::AnyOf(values.into_iter().map(String::from).collect())
    }
}

/// Selectors locating tables and their surroundings in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Table container
    pub table: ElementSelector,

    /// Table row
    pub table_row: ElementSelector,

    /// Header cell; a row holding one is a header row
    pub table_header_element: ElementSelector,

    /// Table title, searched before the table
    pub table_title: ElementSelector,

    /// Table caption, searched before the table
    pub table_caption: ElementSelector,

    /// Table footer, searched among the siblings after the table's parent
    pub table_footer: ElementSelector,

    /// Row class marking a header row
    pub header_row_class: String,

    /// Table class marking a group wrapper rather than a data table
    pub group_class: String,

    /// Cell class marking a decorative separator row
    pub separator_cell_class: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table: ElementSelector::tag("table"),
            table_row: ElementSelector::tag("tr"),
            table_header_element: ElementSelector::tag("th"),
            table_title: ElementSelector::tag("h3"),
            table_caption: ElementSelector::tag("div").with_attr("class", "caption"),
            table_footer: ElementSelector::tag("div").with_attr("class", "tblwrap-foot"),
            header_row_class: "thead".to_string(),
            group_class: "table-group".to_string(),
            separator_cell_class: "thead-hr".to_string(),
        }
    }
}

impl TableConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).inspect_err(|e| {
            log::warn!("Cannot load table config {}: {}", path.display(), e);
        })
    }

    /// Set the title selector.
    pub fn with_title(mut self, selector: ElementSelector) -> Self {
        self.table_title = selector;
        self
    }

    /// Set the caption selector.
    pub fn with_caption(mut self, selector: ElementSelector) -> Self {
        self.table_caption = selector;
        self
    }

    /// Set the footer selector.
    pub fn with_footer(mut self, selector: ElementSelector) -> Self {
        self.table_footer = selector;
        self
    }
}

/// Options for extracting tables from documents.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Selector configuration
    pub config: TableConfig,

    /// File name written into each table document
    pub file_name: Option<String>,

    /// Record date (today when not set)
    pub date: Option<NaiveDate>,

    /// Record `source` field
    pub source: String,

    /// Record `key` field
    pub key: String,

    /// Whether to process batches of files in parallel
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selector configuration.
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the file name written into table documents.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Fix the record date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the record `source` field.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the record `key` field.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Record date formatted as `YYYYMMDD`.
    pub fn date_stamp(&self) -> String {
        let date = self
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        date.format("%Y%m%d").to_string()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            config: TableConfig::default(),
            file_name: None,
            date: None,
            source: DEFAULT_SOURCE.to_string(),
            key: DEFAULT_KEY.to_string(),
            parallel: true,
        }
    }
}
