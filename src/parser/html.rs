//! HTML adapter built on `scraper`.
//!
//! Locates table elements and the title, caption and footer around them
//! using the selectors of a [`TableConfig`], and exposes each table through
//! [`TableNode`].

use scraper::{ElementRef, Html, Node};

use crate::model::TableMeta;

use super::node::{parse_span, RawCell, TableNode};
use super::options::{ElementSelector, TableConfig};

/// A parsed HTML document.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parse an HTML document. Parsing is lenient and never fails.
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Locate every table element with its surrounding metadata, in
    /// document order.
    pub fn tables(&self, config: &TableConfig) -> Vec<LocatedTable<'_>> {
        let order: Vec<ElementRef<'_>> = self
            .html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .collect();

        let located: Vec<LocatedTable<'_>> = order
            .iter()
            .enumerate()
            .filter(|(_, element)| selector_matches(&config.table, **element))
            .map(|(position, element)| locate(&order, position, *element, config))
            .collect();

        log::debug!(
            "found {} table elements ({} with data)",
            located.len(),
            located.iter().filter(|t| t.kind == TableKind::Data).count()
        );
        located
    }
}

/// Whether a located table carries data rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// A table with body rows
    Data,
    /// A group wrapper or a table without rows; only its title and caption
    /// are used
    Placeholder,
}

/// A table element found in a document.
pub struct LocatedTable<'a> {
    /// The table itself
    pub table: HtmlTable<'a>,

    /// Title, caption and footer found around it
    pub meta: TableMeta,

    /// Data table or placeholder
    pub kind: TableKind,
}

fn locate<'a>(
    order: &[ElementRef<'a>],
    position: usize,
    element: ElementRef<'a>,
    config: &TableConfig,
) -> LocatedTable<'a> {
    let table = HtmlTable::from_element(element, config);
    let grouped = element
        .value()
        .classes()
        .any(|class| class == config.group_class);
    let kind = if grouped || table.row_count() == 0 {
        TableKind::Placeholder
    } else {
        TableKind::Data
    };

    let meta = match kind {
        TableKind::Data => {
            let title = find_previous(order, position, &config.table_title)
                .map(element_text)
                .unwrap_or_default();
            let caption = find_previous(order, position, &config.table_caption)
                .map(child_texts)
                .unwrap_or_default();
            TableMeta::with_title(title)
                .caption_parts(caption)
                .footer_parts(footer_texts(element, &config.table_footer))
        }
        TableKind::Placeholder => {
            let title = find_next(order, position, &config.table_title)
                .map(element_text)
                .unwrap_or_default();
            let caption = next_sibling_element(element)
                .and_then(|sibling| find_descendant(sibling, &config.table_caption))
                .map(element_text)
                .unwrap_or_default();
            TableMeta::with_title(title).caption_text(caption)
        }
    };

    LocatedTable { table, meta, kind }
}

/// A table element read through [`TableNode`].
///
/// Rows of nested tables and separator rows are left out.
pub struct HtmlTable<'a> {
    element: ElementRef<'a>,
    rows: Vec<ElementRef<'a>>,
    header_element: ElementSelector,
    header_row_class: String,
}

impl<'a> HtmlTable<'a> {
    /// Wrap a table element.
    pub fn from_element(element: ElementRef<'a>, config: &TableConfig) -> Self {
        let rows = element
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|row| selector_matches(&config.table_row, *row))
            .filter(|row| is_own_row(*row, element))
            .filter(|row| !is_separator_row(*row, &config.separator_cell_class))
            .collect();

        Self {
            element,
            rows,
            header_element: config.table_header_element.clone(),
            header_row_class: config.header_row_class.clone(),
        }
    }

    /// The underlying element.
    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }
}

impl TableNode for HtmlTable<'_> {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cells(&self, row: usize) -> Vec<RawCell> {
        let Some(row) = self.rows.get(row) else {
            return Vec::new();
        };
        direct_cells(*row)
            .map(|cell| {
                let value = cell.value();
                RawCell::new(element_text(cell))
                    .with_rowspan(parse_span(value.attr("rowspan")))
                    .with_colspan(parse_span(value.attr("colspan")))
            })
            .collect()
    }

    fn is_header_row(&self, row: usize) -> bool {
        let Some(row) = self.rows.get(row) else {
            return false;
        };
        let has_header_cell = row
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .any(|el| selector_matches(&self.header_element, el));
        has_header_cell
            || row
                .value()
                .classes()
                .any(|class| class == self.header_row_class)
    }
}

fn selector_matches(selector: &ElementSelector, element: ElementRef<'_>) -> bool {
    let value = element.value();
    selector.matches(value.name(), |key| value.attr(key))
}

/// `td` and `th` children of a row, not cells of nested tables.
fn direct_cells<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
}

// A row belongs to the table unless another <table> sits between them.
fn is_own_row(row: ElementRef<'_>, table: ElementRef<'_>) -> bool {
    for ancestor in row.ancestors() {
        if ancestor.id() == table.id() {
            return true;
        }
        if ElementRef::wrap(ancestor).is_some_and(|el| el.value().name() == "table") {
            return false;
        }
    }
    false
}

fn is_separator_row(row: ElementRef<'_>, class: &str) -> bool {
    !class.is_empty()
        && direct_cells(row).any(|cell| cell.value().classes().any(|c| c == class))
}

fn find_previous<'a>(
    order: &[ElementRef<'a>],
    position: usize,
    selector: &ElementSelector,
) -> Option<ElementRef<'a>> {
    order[..position]
        .iter()
        .rev()
        .find(|el| selector_matches(selector, **el))
        .copied()
}

fn find_next<'a>(
    order: &[ElementRef<'a>],
    position: usize,
    selector: &ElementSelector,
) -> Option<ElementRef<'a>> {
    order
        .get(position + 1..)?
        .iter()
        .find(|el| selector_matches(selector, **el))
        .copied()
}

fn find_descendant<'a>(element: ElementRef<'a>, selector: &ElementSelector) -> Option<ElementRef<'a>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| selector_matches(selector, *el))
}

fn next_sibling_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Texts of the siblings after the table's parent that match the footer
/// selector.
fn footer_texts(table: ElementRef<'_>, selector: &ElementSelector) -> Vec<String> {
    let Some(parent) = table.parent() else {
        return Vec::new();
    };
    parent
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|el| selector_matches(selector, *el))
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Text of each child of a caption element, one part per child.
fn child_texts(element: ElementRef<'_>) -> Vec<String> {
    element
        .children()
        .filter_map(|child| {
            if let Some(text) = child.value().as_text() {
                Some(collapse_whitespace(text))
            } else {
                ElementRef::wrap(child).map(element_text)
            }
        })
        .filter(|text| !text.is_empty())
        .collect()
}

// <br> separates the words around it
fn element_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(el) if el.name().eq_ignore_ascii_case("br") => text.push(' '),
            _ => {}
        }
    }
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"
        <html><body>
          <div class="table-wrap">
            <h3>Table 1</h3>
            <div class="caption"><p>Baseline characteristics</p><p>of the cohort</p></div>
            <div class="tblwrap">
              <table>
                <thead><tr><th>Group</th><th colspan="2">Outcome</th></tr></thead>
                <tbody>
                  <tr><td>A</td><td>1.5</td><td>0.2</td></tr>
                  <tr><td class="thead-hr"></td><td></td><td></td></tr>
                  <tr><td>B</td><td>2.5</td><td>
                    <table><tr><td>nested</td></tr></table>
                  </td></tr>
                </tbody>
              </table>
            </div>
            <div class="tblwrap-foot">Values are means.</div>
            <div class="tblwrap-foot">SD, standard deviation.</div>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_locates_table_with_metadata() {
        let document = HtmlDocument::parse(ARTICLE);
        let config = TableConfig::default();
        let tables = document.tables(&config);

        let data: Vec<_> = tables.iter().filter(|t| t.kind == TableKind::Data).collect();
        assert_eq!(data.len(), 2);

        let outer = data[0];
        assert_eq!(outer.meta.title, "Table 1");
        assert_eq!(
            outer.meta.caption,
            vec!["Baseline characteristics", "of the cohort"]
        );
        assert_eq!(
            outer.meta.footer,
            vec!["Values are means.", "SD, standard deviation."]
        );
    }

    #[test]
    fn test_rows_skip_nested_and_separator_rows() {
        let document = HtmlDocument::parse(ARTICLE);
        let config = TableConfig::default();
        let tables = document.tables(&config);
        let outer = &tables[0].table;

        assert_eq!(outer.row_count(), 3);
        assert!(outer.is_header_row(0));
        assert!(!outer.is_header_row(1));

        let header = outer.cells(0);
        assert_eq!(header.len(), 2);
        assert_eq!(header[1].text(), "Outcome");
        assert_eq!(header[1].colspan(), 2);

        let last = outer.cells(2);
        assert_eq!(last.len(), 3);
        assert_eq!(last[2].text(), "nested");
    }

    #[test]
    fn test_header_row_class_marker() {
        let html = r#"<table>
            <tr class="thead"><td>Name</td><td>Value</td></tr>
            <tr><td>x</td><td>1</td></tr>
        </table>"#;
        let document = HtmlDocument::parse(html);
        let config = TableConfig::default();
        let tables = document.tables(&config);
        assert!(tables[0].table.is_header_row(0));
        assert!(!tables[0].table.is_header_row(1));
    }

    #[test]
    fn test_cell_text_and_spans() {
        let html = r#"<table>
            <tr><th rowspan="2">P value</th><th>x</th></tr>
            <tr><td colspan="bogus">3 &times; 10<sup>&minus;5</sup></td></tr>
        </table>"#;
        let document = HtmlDocument::parse(html);
        let config = TableConfig::default();
        let tables = document.tables(&config);
        let cells = tables[0].table.cells(1);

        assert_eq!(cells[0].text(), "3 × 10−5");
        assert_eq!(cells[0].colspan(), 1);
        assert_eq!(tables[0].table.cells(0)[0].rowspan(), 2);
    }

    #[test]
    fn test_line_break_separates_words() {
        let html = "<table><tr><th>Mean<br>SD</th><th>n<br/>(%)</th><th>Age <br> <i>years</i></th></tr>\
            <tr><td>1</td><td>2</td><td>3</td></tr></table>";
        let document = HtmlDocument::parse(html);
        let config = TableConfig::default();
        let tables = document.tables(&config);
        let texts: Vec<String> = tables[0]
            .table
            .cells(0)
            .iter()
            .map(|c| c.text().to_string())
            .collect();

        assert_eq!(texts, vec!["Mean SD", "n (%)", "Age years"]);
    }

    #[test]
    fn test_group_table_is_placeholder() {
        let html = r#"<body>
            <table class="table-group"><tr><td>wrapper</td></tr></table>
            <div><div class="caption">Linked table caption</div></div>
            <h3>Table 2</h3>
        </body>"#;
        let document = HtmlDocument::parse(html);
        let config = TableConfig::default();
        let tables = document.tables(&config);

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].kind, TableKind::Placeholder);
        assert_eq!(tables[0].meta.title, "Table 2");
        assert_eq!(tables[0].meta.caption, vec!["Linked table caption"]);
        assert!(tables[0].meta.footer.is_empty());
    }

    #[test]
    fn test_table_without_rows_is_placeholder() {
        let document = HtmlDocument::parse("<h3>Table 5</h3><table></table>");
        let config = TableConfig::default();
        let tables = document.tables(&config);
        assert_eq!(tables[0].kind, TableKind::Placeholder);
        assert_eq!(tables[0].table.row_count(), 0);
    }

    #[test]
    fn test_custom_selectors() {
        let html = r#"<body>
            <span class="label">Tab. 3</span>
            <table><tr><th>a</th></tr><tr><td>1</td></tr></table>
        </body>"#;
        let config = TableConfig::default()
            .with_title(ElementSelector::tag("span").with_attr("class", "label"));
        let document = HtmlDocument::parse(html);
        let tables = document.tables(&config);
        assert_eq!(tables[0].meta.title, "Tab. 3");
        assert!(tables[0].meta.caption.is_empty());
    }
}
