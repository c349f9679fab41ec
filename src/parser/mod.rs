//! Table reconstruction: HTML tables to logical tables.

mod assemble;
mod classify;
mod extractor;
mod headers;
mod html;
mod node;
mod normalize;
mod options;
mod span;

pub use assemble::{assemble, merge_header_block, HEADER_DELIMITER};
pub use classify::{classify, column_types, detect_header_rows, header_blocks, is_superrow, superrow_label};
pub use extractor::{caption_only_table, extract_tables, process_table, ExtractedTables, TableExtractor};
pub use headers::{header_format, split_header, HeaderFormat, HEADER_SEPARATORS};
pub use html::{HtmlDocument, HtmlTable, LocatedTable, TableKind};
pub use node::{parse_span, RawCell, RawRow, RawTable, TableNode};
pub use normalize::{
    canonicalize_scientific, cell_kind, clean_cell_text, coerce_cell, is_textual, parse_number,
    strip_wrapping_parens, CellKind,
};
pub use options::{AttrMatch, ElementSelector, ExtractOptions, TableConfig};
pub use span::resolve_spans;
