//! Merged-cell resolution.
//!
//! Expands row and column spans into a dense [`Grid`]. The grid width is
//! fixed by the first row; spans running past the last row or column are
//! clipped.

use std::collections::HashMap;

use crate::model::Grid;

use super::node::TableNode;
use super::normalize::clean_cell_text;

/// Resolve a table's spans into a dense grid of cleaned cell text.
///
/// The grid has one row per source row. Never fails: malformed or
/// oversized spans are placed as far as the grid allows.
pub fn resolve_spans(node: &impl TableNode) -> Grid {
    let height = node.row_count();
    let width: usize = if height == 0 {
        0
    } else {
        node.cells(0).iter().map(|c| c.colspan()).sum()
    };
    let mut grid = Grid::new(height, width);

    // column -> rows still covered by a cell from an earlier row
    let mut pending: HashMap<usize, usize> = HashMap::new();

    for row in 0..height {
        let mut column = 0usize;
        for cell in node.cells(row) {
            while pending.get(&column).copied().unwrap_or(0) > 0 {
                column += 1;
            }

            let rowspan = cell.rowspan();
            let colspan = cell.colspan();
            let value = clean_cell_text(cell.text());

            pending.insert(column, rowspan);
            let last_row = (row + rowspan).min(height);
            let last_column = (column + colspan).min(width);
            for r in row..last_row {
                for c in column..last_column {
                    grid.set(r, c, &value);
                    pending.insert(c, rowspan);
                }
            }

            column += colspan;
        }

        pending = pending
            .into_iter()
            .filter(|(_, span)| *span > 1)
            .map(|(c, span)| (c, span - 1))
            .collect();
    }

    log::debug!("resolve_spans: {} rows x {} columns", height, width);
    grid
}
