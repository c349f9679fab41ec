//! Data model for table reconstruction.
//!
//! Three layers: the dense [`Grid`] produced from raw markup with its row
//! and column classification, the [`LogicalTable`] produced by assembly,
//! and the [`TableRecord`] written for downstream consumers.

mod grid;
mod record;
mod table;

pub use grid::{is_empty_cell, is_placeholder, ClassifiedGrid, ColumnType, Grid, RowRole};
pub use record::{
    Passage, PassageBody, PassageInfons, PassageKind, ResultCell, ResultSection, SectionType,
    TableDocument, TableRecord, DEFAULT_KEY, DEFAULT_SOURCE,
};
pub use table::{CellValue, LogicalTable, Section, TableMeta};
