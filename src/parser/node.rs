//! Source table abstraction.
//!
//! The reconstruction pipeline reads tables only through [`TableNode`], so
//! it does not depend on any concrete markup tree. [`HtmlTable`] adapts a
//! parsed HTML document; [`RawTable`] is an owned, in-memory table.
//!
//! [`HtmlTable`]: super::HtmlTable

/// A cell as seen by the span resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    content: String,
    rowspan: usize,
    colspan: usize,
}

impl RawCell {
    /// Create a cell spanning one row and one column.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            rowspan: 1,
            colspan: 1,
        }
    }

    /// Set the row span (values below 1 count as 1).
    pub fn with_rowspan(mut self, span: usize) -> Self {
        self.rowspan = span.max(1);
        self
    }

    /// Set the column span (values below 1 count as 1).
    pub fn with_colspan(mut self, span: usize) -> Self {
        self.colspan = span.max(1);
        self
    }

    /// Raw cell content, before cleaning.
    pub fn text(&self) -> &str {
        &self.content
    }

    /// Number of rows covered.
    pub fn rowspan(&self) -> usize {
        self.rowspan
    }

    /// Number of columns covered.
    pub fn colspan(&self) -> usize {
        self.colspan
    }
}

/// Parse a span attribute.
///
/// Leading digits are used ("2;" gives 2); anything unparsable, and zero,
/// gives 1.
pub fn parse_span(value: Option<&str>) -> usize {
    value
        .map(str::trim)
        .map(|v| {
            let digits: String = v.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<usize>().unwrap_or(1)
        })
        .filter(|span| *span > 0)
        .unwrap_or(1)
}

/// Read access to a table's rows and cells.
pub trait TableNode {
    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Cells of a row, in document order.
    fn cells(&self, row: usize) -> Vec<RawCell>;

    /// Whether the markup marks the row as a header row.
    fn is_header_row(&self, row: usize) -> bool;
}

/// A row of an in-memory table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Cells in document order
    pub cells: Vec<RawCell>,

    /// Whether the row is marked as a header
    pub is_header: bool,
}

impl RawRow {
    /// Create a data row.
    pub fn new(cells: Vec<RawCell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<RawCell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// Create a data row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(RawCell::new).collect())
    }

    /// Create a header row from text values.
    pub fn header_from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::header(values.into_iter().map(RawCell::new).collect())
    }
}

/// An owned table, independent of any markup tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Rows in document order
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row and return self.
    pub fn row(mut self, row: RawRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Copy any table node into an owned table.
    pub fn from_node(node: &impl TableNode) -> Self {
        let rows = (0..node.row_count())
            .map(|i| RawRow {
                cells: node.cells(i),
                is_header: node.is_header_row(i),
            })
            .collect();
        Self { rows }
    }
}

impl TableNode for RawTable {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cells(&self, row: usize) -> Vec<RawCell> {
        self.rows
            .get(row)
            .map(|r| r.cells.clone())
            .unwrap_or_default()
    }

    fn is_header_row(&self, row: usize) -> bool {
        self.rows.get(row).map(|r| r.is_header).unwrap_or(false)
    }
}
