//! Dense cell grid and row/column classification types.

use serde::{Deserialize, Serialize};

/// A rectangular grid of cleaned cell text.
///
/// Every row has exactly `width` cells. Positions not covered by any
/// source cell hold an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<String>>,
    width: usize,
}

impl Grid {
    /// Create a grid of empty cells.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            rows: vec![vec![String::new(); width]; height],
            width,
        }
    }

    /// Create a grid from rows of text.
    ///
    /// The width is taken from the first row; shorter rows are padded with
    /// empty cells and longer rows are truncated.
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { rows, width }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Check if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }

    /// Get a row by index.
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Get a cell by position.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }

    /// Write a cell if the position lies inside the grid.
    ///
    /// Returns `false` when the position is out of bounds and nothing was
    /// written.
    pub fn set(&mut self, row: usize, column: usize, value: &str) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            Some(cell) => {
                value.clone_into(cell);
                true
            }
            None => false,
        }
    }

    /// Check if a row has no content at all.
    pub fn is_blank_row(&self, index: usize) -> bool {
        self.rows
            .get(index)
            .map(|r| r.iter().all(|c| is_empty_cell(c)))
            .unwrap_or(true)
    }

    /// Remove the first column from every row.
    pub fn drop_first_column(&mut self) {
        if self.width == 0 {
            return;
        }
        for row in &mut self.rows {
            row.remove(0);
        }
        self.width -= 1;
    }
}

/// Check if a cell carries no value.
///
/// Empty text, whitespace and a literal `None` count as empty.
pub fn is_empty_cell(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || trimmed == "None"
}

/// Check if a cell is a placeholder for a missing value.
///
/// Placeholders are ignored by column voting: empty cells, a lone dash,
/// and `none` in any case.
pub fn is_placeholder(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || trimmed == "-" || trimmed.eq_ignore_ascii_case("none")
}

/// Structural role of a grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowRole {
    /// Column header row
    Header,
    /// Section label spanning the row
    Superrow,
    /// Descriptive row merged into the header block above or below it
    Subheader,
    /// Data row
    Value,
}

impl RowRole {
    /// Check if the row contributes to a header block.
    pub fn is_header_like(self) -> bool {
        matches!(self, RowRole::Header | RowRole::Subheader)
    }
}

/// Dominant content type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Mostly numbers
    Numeric,
    /// Mostly words without digits
    Text,
    /// Mostly cells mixing digits and other characters
    Mixed,
}

/// A grid together with its row roles and column types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedGrid {
    /// The grid, after any implicit superrow promotion
    pub grid: Grid,

    /// One role per grid row
    pub roles: Vec<RowRole>,

    /// One type per grid column
    pub column_types: Vec<ColumnType>,

    /// Maximal runs of consecutive header and sub-header row indices
    pub header_blocks: Vec<Vec<usize>>,
}

impl ClassifiedGrid {
    /// Role of a row (rows beyond the role list count as values).
    pub fn role(&self, row: usize) -> RowRole {
        self.roles.get(row).copied().unwrap_or(RowRole::Value)
    }

    /// Indices of rows with the given role.
    pub fn rows_with_role(&self, role: RowRole) -> Vec<usize> {
        self.roles
            .iter()
            .enumerate()
            .filter(|(_, r)| **r == role)
            .map(|(i, _)| i)
            .collect()
    }

    /// The header block containing a row, if any.
    pub fn header_block_of(&self, row: usize) -> Option<&[usize]> {
        self.header_blocks
            .iter()
            .find(|block| block.contains(&row))
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_from_rows_pads_to_first_row() {
        let grid = Grid::from_rows(vec![vec!["A", "B", "C"], vec!["1"], vec!["1", "2", "3", "4"]]);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert!(grid.rows().iter().all(|r| r.len() == 3));
        assert_eq!(grid.cell(1, 2), Some(""));
        assert_eq!(grid.cell(2, 3), None);
    }

    #[test]
    fn test_set_out_of_bounds_is_ignored() {
        let mut grid = Grid::new(2, 2);
        assert!(grid.set(1, 1, "x"));
        assert!(!grid.set(2, 0, "y"));
        assert!(!grid.set(0, 5, "z"));
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.cell(1, 1), Some("x"));
    }

    #[test]
    fn test_blank_row() {
        let grid = Grid::from_rows(vec![vec!["a", "b"], vec!["", " None "], vec!["", "x"]]);
        assert!(!grid.is_blank_row(0));
        assert!(grid.is_blank_row(1));
        assert!(!grid.is_blank_row(2));
    }

    #[test]
    fn test_drop_first_column() {
        let mut grid = Grid::from_rows(vec![vec!["a", "b"], vec!["c", "d"]]);
        grid.drop_first_column();
        assert_eq!(grid.width(), 1);
        assert_eq!(grid.rows(), &[vec!["b"], vec!["d"]]);
    }

    #[test]
    fn test_placeholders() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("-"));
        assert!(is_placeholder("NONE"));
        assert!(!is_placeholder("0"));
        assert!(is_empty_cell("None"));
        assert!(!is_empty_cell("-"));
    }
}
