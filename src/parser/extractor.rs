//! Per-document table extraction.

use crate::model::{LogicalTable, TableMeta};

use super::assemble::assemble;
use super::classify::{classify, detect_header_rows};
use super::html::{HtmlDocument, TableKind};
use super::node::TableNode;
use super::options::TableConfig;
use super::span::resolve_spans;

/// Run the reconstruction pipeline on one raw table.
///
/// `number` is the table's 1-based position among the data tables of its
/// document.
pub fn process_table(node: &impl TableNode, meta: &TableMeta, number: usize) -> Vec<LogicalTable> {
    let header_rows = detect_header_rows(node);
    let grid = resolve_spans(node);
    let classified = classify(grid, &header_rows);
    assemble(&classified, meta, number)
}

/// A table with a title and caption but no rows.
pub fn caption_only_table(meta: &TableMeta, number: usize) -> LogicalTable {
    LogicalTable::new(number.to_string(), meta, Vec::new())
}

/// Logical tables recovered from one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedTables {
    /// Tables in document order
    pub tables: Vec<LogicalTable>,
}

impl ExtractedTables {
    /// Check if any table was recovered.
    pub fn has_tables(&self) -> bool {
        !self.tables.is_empty()
    }

    /// Number of logical tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if no table was recovered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterate over the tables.
    pub fn iter(&self) -> impl Iterator<Item = &LogicalTable> {
        self.tables.iter()
    }
}

impl IntoIterator for ExtractedTables {
    type Item = LogicalTable;
    type IntoIter = std::vec::IntoIter<LogicalTable>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}

/// Extracts the tables of HTML documents.
#[derive(Debug, Clone, Default)]
pub struct TableExtractor {
    config: TableConfig,
}

impl TableExtractor {
    /// Create an extractor with the given selectors.
    pub fn new(config: TableConfig) -> Self {
        Self { config }
    }

    /// The selector configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Extract the tables of an HTML source.
    pub fn extract(&self, html: &str) -> ExtractedTables {
        let document = HtmlDocument::parse(html);
        self.extract_document(&document)
    }

    /// Extract the tables of a parsed document.
    ///
    /// Data tables are numbered in document order. When the document has
    /// none, each placeholder table yields a caption-only table instead.
    pub fn extract_document(&self, document: &HtmlDocument) -> ExtractedTables {
        let located = document.tables(&self.config);
        let (data, placeholders): (Vec<_>, Vec<_>) = located
            .into_iter()
            .partition(|table| table.kind == TableKind::Data);

        if data.is_empty() {
            if !placeholders.is_empty() {
                log::debug!(
                    "no data tables; keeping {} caption-only tables",
                    placeholders.len()
                );
            }
            let tables = placeholders
                .iter()
                .enumerate()
                .map(|(i, located)| caption_only_table(&located.meta, i + 1))
                .collect();
            return ExtractedTables { tables };
        }

        let mut tables = Vec::new();
        for (i, located) in data.iter().enumerate() {
            let logical = process_table(&located.table, &located.meta, i + 1);
            if logical.is_empty() {
                log::warn!("Table {} has no data rows", i + 1);
            }
            tables.extend(logical);
        }
        ExtractedTables { tables }
    }
}

/// Extract the tables of an HTML source with the given selectors.
pub fn extract_tables(html: &str, config: &TableConfig) -> ExtractedTables {
    TableExtractor::new(config.clone()).extract(html)
}
