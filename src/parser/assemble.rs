//! Grouping of classified rows into logical tables and sections.

use crate::model::{ClassifiedGrid, Grid, LogicalTable, RowRole, Section, TableMeta};

use super::classify::superrow_label;
use super::normalize::coerce_cell;

/// Joins the rows of a multi-row header inside one column label.
pub const HEADER_DELIMITER: &str = "<!>";

/// Split a classified grid into logical tables.
///
/// `number` is the 1-based position of the raw table in its document. A
/// new logical table starts whenever the header above a data row changes;
/// when more than one results, identifiers become `number.k`.
pub fn assemble(classified: &ClassifiedGrid, meta: &TableMeta, number: usize) -> Vec<LogicalTable> {
    let grid = &classified.grid;
    let identifier = number.to_string();
    let mut state = AssemblyState::default();

    for (index, row) in grid.rows().iter().enumerate() {
        if grid.is_blank_row(index) {
            continue;
        }
        match classified.role(index) {
            RowRole::Header | RowRole::Subheader => {
                let block = classified
                    .header_block_of(index)
                    .map(<[usize]>::to_vec)
                    .unwrap_or_else(|| vec![index]);
                state.current_header = merge_header_block(grid, &block);
            }
            RowRole::Superrow => state.current_label = superrow_label(row),
            RowRole::Value => state.push_row(row, meta, &identifier),
        }
    }

    let mut tables = state.tables;
    if tables.len() > 1 {
        for (k, table) in tables.iter_mut().enumerate() {
            table.identifier = format!("{}.{}", identifier, k + 1);
        }
    }

    log::debug!(
        "assemble: table {} -> {} logical tables",
        identifier,
        tables.len()
    );
    tables
}

/// Fold state while walking the grid.
#[derive(Debug, Default)]
struct AssemblyState {
    tables: Vec<LogicalTable>,
    current_header: Vec<String>,
    // None until the first data row opens a table
    previous_header: Option<Vec<String>>,
    current_label: String,
    // None right after a table opens
    previous_label: Option<String>,
}

impl AssemblyState {
    fn push_row(&mut self, row: &[String], meta: &TableMeta, identifier: &str) {
        if self.previous_header.as_ref() != Some(&self.current_header) {
            self.tables.push(LogicalTable::new(
                identifier,
                meta,
                self.current_header.clone(),
            ));
            self.previous_header = Some(self.current_header.clone());
            self.previous_label = None;
        }

        let Some(table) = self.tables.last_mut() else {
            return;
        };
        if self.previous_label.as_deref() != Some(self.current_label.as_str()) {
            table.sections.push(Section::new(self.current_label.clone()));
            self.previous_label = Some(self.current_label.clone());
        }
        if let Some(section) = table.sections.last_mut() {
            section.rows.push(row.iter().map(|cell| coerce_cell(cell)).collect());
        }
    }
}

/// Merge the rows of a header block into one label per column.
///
/// Row texts are joined with [`HEADER_DELIMITER`]; trailing delimiters
/// left by empty lower cells are removed.
pub fn merge_header_block(grid: &Grid, block: &[usize]) -> Vec<String> {
    (0..grid.width())
        .map(|column| {
            let joined = block
                .iter()
                .filter_map(|&row| grid.cell(row, column))
                .collect::<Vec<_>>()
                .join(HEADER_DELIMITER);
            trim_trailing_delimiters(&joined).to_string()
        })
        .collect()
}

fn trim_trailing_delimiters(label: &str) -> &str {
    let mut label = label;
    while let Some(stripped) = label.strip_suffix(HEADER_DELIMITER) {
        label = stripped;
    }
    label
}
