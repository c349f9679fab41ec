//! Row role and column type classification.
//!
//! Classification runs in a fixed order: headers (from markup), superrows,
//! implicit superrow promotion when no superrow exists, column types over
//! the remaining data rows, then sub-headers.

use std::collections::HashSet;

use crate::model::{is_empty_cell, is_placeholder, ClassifiedGrid, ColumnType, Grid, RowRole};

use super::node::TableNode;
use super::normalize::{cell_kind, is_textual, CellKind};

/// Indices of rows the markup marks as headers.
///
/// Falls back to row 0 when no row qualifies, so a non-empty table always
/// has a header.
pub fn detect_header_rows(node: &impl TableNode) -> Vec<usize> {
    let rows = node.row_count();
    let headers: Vec<usize> = (0..rows).filter(|&i| node.is_header_row(i)).collect();
    if headers.is_empty() && rows > 0 {
        vec![0]
    } else {
        headers
    }
}

/// Check if a row announces a section: exactly one distinct non-empty
/// value across its cells.
pub fn is_superrow(row: &[String]) -> bool {
    let distinct: HashSet<&str> = row
        .iter()
        .map(|c| c.trim())
        .filter(|c| !is_empty_cell(c))
        .collect();
    distinct.len() == 1
}

/// The label of a superrow: its first non-empty value.
pub fn superrow_label(row: &[String]) -> String {
    row.iter()
        .map(|c| c.trim())
        .find(|c| !is_empty_cell(c))
        .unwrap_or_default()
        .to_string()
}

/// Classify the rows and columns of a grid.
///
/// `header_rows` usually comes from [`detect_header_rows`]; indices outside
/// the grid are ignored.
pub fn classify(grid: Grid, header_rows: &[usize]) -> ClassifiedGrid {
    let mut grid = grid;
    let height = grid.height();

    let mut roles = vec![RowRole::Value; height];
    let mut has_header = false;
    for &i in header_rows {
        if let Some(role) = roles.get_mut(i) {
            *role = RowRole::Header;
            has_header = true;
        }
    }
    if !has_header && height > 0 {
        roles[0] = RowRole::Header;
    }

    let mut found_superrow = false;
    for (i, role) in roles.iter_mut().enumerate() {
        if *role == RowRole::Value && grid.row(i).is_some_and(is_superrow) {
            *role = RowRole::Superrow;
            found_superrow = true;
        }
    }

    if !found_superrow && promote_first_column(&mut grid, &mut roles) {
        log::debug!(
            "classify: promoted first column into {} superrows",
            roles.iter().filter(|r| **r == RowRole::Superrow).count()
        );
    }

    let column_types = column_types(&grid, &roles);
    mark_subheaders(&grid, &mut roles, &column_types);
    let header_blocks = header_blocks(&roles);

    log::debug!(
        "classify: {} rows, {} header blocks, column types {:?}",
        grid.height(),
        header_blocks.len(),
        column_types
    );

    ClassifiedGrid {
        grid,
        roles,
        column_types,
        header_blocks,
    }
}

/// Turn a first column that names sections into explicit superrows.
///
/// Applies when the distinct non-empty first-column values of non-header
/// rows number at most half of those rows. A superrow is inserted before
/// the first occurrence of each value and the first column is dropped.
fn promote_first_column(grid: &mut Grid, roles: &mut Vec<RowRole>) -> bool {
    if grid.width() < 2 {
        return false;
    }

    let first_column: Vec<&str> = grid
        .rows()
        .iter()
        .zip(roles.iter())
        .filter(|(_, role)| **role != RowRole::Header)
        .map(|(row, _)| row[0].trim())
        .collect();
    let distinct: HashSet<&str> = first_column
        .iter()
        .copied()
        .filter(|v| !is_empty_cell(v))
        .collect();
    if distinct.is_empty() || distinct.len() * 2 > first_column.len() {
        return false;
    }

    let width = grid.width();
    let mut seen: HashSet<String> = HashSet::new();
    let mut rows = Vec::with_capacity(grid.height() + distinct.len());
    let mut new_roles = Vec::with_capacity(rows.capacity());
    for (row, role) in grid.rows().iter().zip(roles.iter()) {
        let label = row[0].trim();
        if *role != RowRole::Header && !is_empty_cell(label) && seen.insert(label.to_string()) {
            rows.push(vec![label.to_string(); width]);
            new_roles.push(RowRole::Superrow);
        }
        rows.push(row.clone());
        new_roles.push(*role);
    }

    let mut promoted = Grid::from_rows(rows);
    promoted.drop_first_column();
    *grid = promoted;
    *roles = new_roles;
    true
}

/// Majority content type of each column over data rows.
///
/// Ties prefer numeric, then text, then mixed.
pub fn column_types(grid: &Grid, roles: &[RowRole]) -> Vec<ColumnType> {
    (0..grid.width())
        .map(|c| {
            let (mut numeric, mut text, mut mixed) = (0usize, 0usize, 0usize);
            for (row, role) in grid.rows().iter().zip(roles) {
                if *role != RowRole::Value {
                    continue;
                }
                match cell_kind(&row[c]) {
                    CellKind::Number => numeric += 1,
                    CellKind::Text => text += 1,
                    CellKind::Mixed => mixed += 1,
                    CellKind::Placeholder => {}
                }
            }
            vote(numeric, text, mixed)
        })
        .collect()
}

fn vote(numeric: usize, text: usize, mixed: usize) -> ColumnType {
    let top = numeric.max(text).max(mixed);
    if numeric == top {
        ColumnType::Numeric
    } else if text == top {
        ColumnType::Text
    } else {
        ColumnType::Mixed
    }
}

/// Reclassify data rows whose cells are mostly labels sitting in
/// non-text columns.
fn mark_subheaders(grid: &Grid, roles: &mut [RowRole], column_types: &[ColumnType]) {
    for (row, role) in grid.rows().iter().zip(roles.iter_mut()) {
        if *role != RowRole::Value || row.is_empty() {
            continue;
        }
        let unmatched = row
            .iter()
            .zip(column_types)
            .filter(|(cell, ty)| {
                **ty != ColumnType::Text && !is_placeholder(cell) && is_textual(cell)
            })
            .count();
        if unmatched * 2 >= row.len() {
            *role = RowRole::Subheader;
        }
    }
}

/// Split header and sub-header rows into runs of consecutive indices.
pub fn header_blocks(roles: &[RowRole]) -> Vec<Vec<usize>> {
    let mut blocks: Vec<Vec<usize>> = Vec::new();
    for (i, role) in roles.iter().enumerate() {
        if !role.is_header_like() {
            continue;
        }
        match blocks.last_mut() {
            Some(block) if block.last() == Some(&(i - 1)) => block.push(i),
            _ => blocks.push(vec![i]),
        }
    }
    blocks
}
