//! Logical tables to the offset-annotated table record.

use crate::model::{
    LogicalTable, Passage, PassageKind, ResultCell, ResultSection, TableDocument, TableRecord,
};
use crate::parser::ExtractOptions;

/// Build a record holding one document per logical table.
///
/// `table_index`, when set, replaces the table identifier in each
/// document `id` (cell ids keep the identifier).
pub fn to_record(
    tables: &[LogicalTable],
    options: &ExtractOptions,
    table_index: Option<&str>,
) -> TableRecord {
    let mut record = TableRecord::new(&options.source, options.date_stamp(), &options.key);
    let file_name = options.file_name.as_deref().unwrap_or_default();
    record.documents = tables
        .iter()
        .map(|table| to_document(table, file_name, table_index))
        .collect();
    record
}

/// Build the document of one logical table.
///
/// Passages are laid out on a running character offset: the title starts
/// at 0, the caption follows the title, the table body follows the caption
/// and the footer follows the last cell.
pub fn to_document(table: &LogicalTable, file_name: &str, table_index: Option<&str>) -> TableDocument {
    let id = format!("T{}", table_index.unwrap_or(table.identifier.as_str()));
    let mut document = TableDocument::new(file_name, id);

    let mut offset = 0;
    document
        .passages
        .push(Passage::text(PassageKind::Title, offset, table.title.clone()));
    offset += char_count(&table.title);

    if !table.caption.is_empty() {
        document
            .passages
            .push(Passage::text(PassageKind::Caption, offset, table.caption_text()));
        offset += table.caption.iter().map(|part| char_count(part)).sum::<usize>();
    }

    let table_offset = offset;
    let mut row_id = 0;
    let mut results = Vec::with_capacity(table.sections.len());
    for section in &table.sections {
        let mut rows = Vec::with_capacity(section.rows.len());
        for row in &section.rows {
            let cells: Vec<ResultCell> = row
                .iter()
                .enumerate()
                .map(|(col_id, value)| {
                    offset += value.char_len();
                    ResultCell {
                        id: format!("T{}.{}.{}", table.identifier, row_id, col_id),
                        text: value.clone(),
                    }
                })
                .collect();
            rows.push(cells);
            row_id += 1;
        }
        results.push(ResultSection {
            section_title_1: section.name.clone(),
            results_rows: rows,
        });
    }
    document
        .passages
        .push(Passage::table(table_offset, table.columns.clone(), results));

    if !table.footer.is_empty() {
        document
            .passages
            .push(Passage::text(PassageKind::Footer, offset, table.footer_text()));
    }

    document
}

fn char_count(text: &str) -> usize {
    text.chars().count()
}
