//! # untable
//!
//! Table structure recovery for scientific HTML.
//!
//! This library finds the tables of an article, resolves merged cells,
//! detects header rows, section rows and column types, and writes each
//! logical table as an offset-annotated BioC-style JSON record for
//! text-mining pipelines.
//!
//! ## Quick Start
//!
//! ```no_run
//! use untable::{parse_file, to_json, ExtractOptions, JsonFormat};
//!
//! fn main() -> untable::Result<()> {
//!     let record = parse_file("PMC123.html", &ExtractOptions::default())?;
//!     if record.has_tables() {
//!         println!("{}", to_json(&record, JsonFormat::Pretty)?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Merged cells**: row and column spans expanded into a dense grid
//! - **Structure detection**: headers, sub-headers and section rows
//! - **Value normalization**: scientific notation and numeric coercion
//! - **Table splitting**: one HTML table can yield several logical tables
//! - **Configurable selectors**: publisher markup described in JSON
//! - **Parallel processing**: uses Rayon for batches of files

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_input_kind, table_index_from_file_name, InputKind};
pub use error::{Error, Result};
pub use model::{
    CellValue, ClassifiedGrid, ColumnType, Grid, LogicalTable, Passage, PassageKind, RowRole,
    Section, TableDocument, TableMeta, TableRecord,
};
pub use parser::{
    extract_tables, process_table, ElementSelector, ExtractOptions, ExtractedTables, RawTable,
    TableConfig, TableExtractor, TableNode,
};
pub use render::{to_json, JsonFormat};

use std::path::Path;

use rayon::prelude::*;

/// Extract the tables of an HTML source into a record.
///
/// # Example
///
/// ```
/// use untable::{parse_html, ExtractOptions};
///
/// let html = "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>x</td></tr></table>";
/// let record = parse_html(html, &ExtractOptions::default());
/// assert_eq!(record.table_count(), 1);
/// ```
pub fn parse_html(html: &str, options: &ExtractOptions) -> TableRecord {
    let tables = TableExtractor::new(options.config.clone()).extract(html);
    render::to_record(&tables.tables, options, None)
}

/// Extract the tables of an HTML file into a record.
///
/// The file name is written into each document unless the options set
/// one. Linked table pages (`*_table_<N>.html`) take their document id
/// from the file name.
///
/// # Example
///
/// ```no_run
/// use untable::{parse_file, ExtractOptions};
///
/// let record = parse_file("PMC123_table_2.html", &ExtractOptions::default()).unwrap();
/// println!("Tables: {}", record.table_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<TableRecord> {
    let path = path.as_ref();
    match detect_input_kind(path)? {
        InputKind::Directory | InputKind::TableImage => {
            return Err(Error::UnsupportedInput(path.display().to_string()));
        }
        InputKind::MainText | InputKind::LinkedTable | InputKind::Unknown => {}
    }

    let html = std::fs::read_to_string(path)?;
    let file_name = options
        .file_name
        .clone()
        .unwrap_or_else(|| path.display().to_string());
    let table_index = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(table_index_from_file_name);

    let tables = TableExtractor::new(options.config.clone()).extract(&html);
    log::debug!("{}: {} logical tables", file_name, tables.len());

    let options = options.clone().with_file_name(file_name);
    Ok(render::to_record(&tables.tables, &options, table_index.as_deref()))
}

/// Extract the tables of several files into one record.
///
/// Each document carries the path of the file it came from. Files are
/// processed in parallel unless the options are sequential; documents keep
/// the order of `paths`.
pub fn parse_files<P: AsRef<Path> + Sync>(paths: &[P], options: &ExtractOptions) -> Result<TableRecord> {
    let parse_one = |path: &P| {
        let mut file_options = options.clone();
        file_options.file_name = None;
        parse_file(path, &file_options)
    };

    let records: Vec<TableRecord> = if options.parallel {
        paths.par_iter().map(parse_one).collect::<Result<_>>()?
    } else {
        paths.iter().map(parse_one).collect::<Result<_>>()?
    };

    let mut merged = TableRecord::new(&options.source, options.date_stamp(), &options.key);
    for record in records {
        merged.merge(record);
    }
    Ok(merged)
}

/// Builder for extracting tables.
///
/// # Example
///
/// ```no_run
/// use untable::{JsonFormat, Untable};
///
/// let json = Untable::new()
///     .with_source("my pipeline")
///     .sequential()
///     .parse("PMC123.html")?
///     .to_json(JsonFormat::Compact)?;
/// # Ok::<(), untable::Error>(())
/// ```
pub struct Untable {
    options: ExtractOptions,
}

impl Untable {
    /// Create a new Untable builder.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
        }
    }

    /// Set the selector configuration.
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.options = self.options.with_config(config);
        self
    }

    /// Load the selector configuration from a JSON file.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.options = self.options.with_config(TableConfig::from_file(path)?);
        Ok(self)
    }

    /// Set the record date.
    pub fn with_date(mut self, date: chrono::NaiveDate) -> Self {
        self.options = self.options.with_date(date);
        self
    }

    /// Set the record `source` field.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.options = self.options.with_source(source);
        self
    }

    /// Set the record `key` field.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.options = self.options.with_key(key);
        self
    }

    /// Set the file name written into documents.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.options = self.options.with_file_name(name);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Extract the tables of a file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<UntableResult> {
        let record = parse_file(path, &self.options)?;
        Ok(UntableResult { record })
    }

    /// Extract the tables of several files into one record.
    pub fn parse_files<P: AsRef<Path> + Sync>(self, paths: &[P]) -> Result<UntableResult> {
        let record = parse_files(paths, &self.options)?;
        Ok(UntableResult { record })
    }

    /// Extract the tables of an HTML source.
    pub fn parse_html(self, html: &str) -> UntableResult {
        UntableResult {
            record: parse_html(html, &self.options),
        }
    }
}

impl Default for Untable {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of extracting tables.
pub struct UntableResult {
    /// The table record
    pub record: TableRecord,
}

impl UntableResult {
    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.record, format)
    }

    /// Check if any table was found.
    pub fn has_tables(&self) -> bool {
        self.record.has_tables()
    }

    /// Number of table documents.
    pub fn table_count(&self) -> usize {
        self.record.table_count()
    }

    /// Get the record.
    pub fn record(&self) -> &TableRecord {
        &self.record
    }
}
