//! Reconstruction properties checked on in-memory tables.

use untable::parser::{classify, column_types, detect_header_rows, resolve_spans, RawCell, RawRow};
use untable::{process_table, CellValue, ColumnType, Grid, RawTable, RowRole, TableMeta};

fn meta() -> TableMeta {
    TableMeta::with_title("Table 1")
}

#[test]
fn test_grid_width_is_fixed_by_first_row() {
    let table = RawTable::new()
        .row(RawRow::new(vec![
            RawCell::new("A").with_rowspan(3),
            RawCell::new("B").with_colspan(2),
        ]))
        .row(RawRow::new(vec![
            RawCell::new("b1"),
            RawCell::new("b2").with_rowspan(9),
            RawCell::new("extra"),
        ]))
        .row(RawRow::new(vec![RawCell::new("wide").with_colspan(40)]))
        .row(RawRow::from_strings(["1"]));
    let grid = resolve_spans(&table);

    assert_eq!(grid.width(), 3);
    assert_eq!(grid.height(), 4);
    assert!(grid.rows().iter().all(|row| row.len() == 3));
    assert_eq!(grid.row(1), Some(&["A".to_string(), "b1".into(), "b2".into()][..]));
    assert_eq!(grid.cell(2, 0), Some("A"));
    assert_eq!(grid.cell(2, 1), Some("wide"));
    assert_eq!(grid.cell(3, 2), Some("b2"));
}

#[test]
fn test_repeated_value_row_is_superrow() {
    let table = RawTable::new()
        .row(RawRow::header_from_strings(["Name", "Score", "Rank"]))
        .row(RawRow::new(vec![RawCell::new("Cohort A").with_colspan(3)]))
        .row(RawRow::from_strings(["x", "1", "2"]))
        .row(RawRow::from_strings(["Cohort B", "", "Cohort B"]))
        .row(RawRow::from_strings(["y", "3", "4"]));
    let classified = classify(resolve_spans(&table), &detect_header_rows(&table));

    assert_eq!(
        classified.roles,
        vec![
            RowRole::Header,
            RowRole::Superrow,
            RowRole::Value,
            RowRole::Superrow,
            RowRole::Value,
        ]
    );
}

#[test]
fn test_first_row_is_header_without_markup() {
    let table = RawTable::new()
        .row(RawRow::from_strings(["Gene", "Effect"]))
        .row(RawRow::from_strings(["BRCA1", "0.3"]))
        .row(RawRow::from_strings(["TP53", "0.7"]));
    assert_eq!(detect_header_rows(&table), vec![0]);

    let tables = process_table(&table, &meta(), 1);
    assert_eq!(tables[0].columns, vec!["Gene", "Effect"]);
    assert_eq!(tables[0].row_count(), 2);
}

#[test]
fn test_column_types_ignore_row_order() {
    let rows = [
        ["1.5", "abc", "n=5"],
        ["2", "def", "12 (3)"],
        ["-", "7", "14 (2)"],
        ["3", "ghi", "x"],
    ];
    let forward = Grid::from_rows(rows.iter().map(|r| r.to_vec()));
    let backward = Grid::from_rows(rows.iter().rev().map(|r| r.to_vec()));
    let roles = vec![RowRole::Value; rows.len()];

    let expected = vec![ColumnType::Numeric, ColumnType::Text, ColumnType::Mixed];
    assert_eq!(column_types(&forward, &roles), expected);
    assert_eq!(column_types(&backward, &roles), expected);
}

#[test]
fn test_single_block_table_has_one_section() {
    let table = RawTable::new()
        .row(RawRow::header_from_strings(["A", "B"]))
        .row(RawRow::from_strings(["1", "x"]))
        .row(RawRow::from_strings(["2", "y"]));
    let tables = process_table(&table, &meta(), 1);

    assert_eq!(tables.len(), 1);
    let table = &tables[0];
    assert_eq!(table.identifier, "1");
    assert_eq!(table.title, "Table 1");
    assert_eq!(table.columns, vec!["A", "B"]);
    assert_eq!(table.sections.len(), 1);
    assert_eq!(table.sections[0].name, "");
    assert_eq!(
        table.sections[0].rows,
        vec![
            vec![CellValue::Number(1.0), CellValue::from("x")],
            vec![CellValue::Number(2.0), CellValue::from("y")],
        ]
    );
}

#[test]
fn test_alternating_headers_give_sub_identifiers() {
    let table = RawTable::new()
        .row(RawRow::header_from_strings(["A", "B"]))
        .row(RawRow::from_strings(["1", "x"]))
        .row(RawRow::header_from_strings(["C", "D"]))
        .row(RawRow::from_strings(["2", "y"]));
    let tables = process_table(&table, &meta(), 1);

    let ids: Vec<&str> = tables.iter().map(|t| t.identifier.as_str()).collect();
    assert_eq!(ids, vec!["1.1", "1.2"]);
    assert_eq!(tables[0].columns, vec!["A", "B"]);
    assert_eq!(tables[1].columns, vec!["C", "D"]);
    assert!(tables.iter().all(|t| t.title == "Table 1"));
}

#[test]
fn test_first_column_becomes_sections() {
    let table = RawTable::new()
        .row(RawRow::header_from_strings(["Site", "Age", "BMI"]))
        .row(RawRow::from_strings(["S1", "30", "22.1"]))
        .row(RawRow::from_strings(["S1", "41", "24.0"]))
        .row(RawRow::from_strings(["S2", "35", "27.3"]))
        .row(RawRow::from_strings(["S2", "52", "25.5"]));
    let tables = process_table(&table, &meta(), 2);

    assert_eq!(tables.len(), 1);
    let table = &tables[0];
    assert_eq!(table.identifier, "2");
    assert_eq!(table.columns, vec!["Age", "BMI"]);
    assert_eq!(table.section_names(), vec!["S1", "S2"]);
    assert_eq!(table.sections[0].rows[1], vec![CellValue::Number(41.0), CellValue::Number(24.0)]);
    assert_eq!(table.sections[1].rows.len(), 2);
}

#[test]
fn test_subheader_rows_join_the_header() {
    let table = RawTable::new()
        .row(RawRow::header_from_strings(["Trait", "Beta", "SE"]))
        .row(RawRow::from_strings(["Height", "0.12", "0.01"]))
        .row(RawRow::from_strings(["Weight", "0.30", "0.02"]))
        .row(RawRow::from_strings(["", "Adjusted", "Robust"]))
        .row(RawRow::from_strings(["BMI", "0.10", "0.01"]));
    let tables = process_table(&table, &meta(), 1);

    let ids: Vec<&str> = tables.iter().map(|t| t.identifier.as_str()).collect();
    assert_eq!(ids, vec!["1.1", "1.2"]);
    assert_eq!(tables[1].columns, vec!["", "Adjusted", "Robust"]);
    assert_eq!(tables[1].row_count(), 1);
}

#[test]
fn test_caption_and_footer_are_carried() {
    let meta = TableMeta::with_title("Table 3")
        .caption_parts(["Outcomes", "by arm"])
        .footer_parts(["CI, confidence interval"]);
    let table = RawTable::new()
        .row(RawRow::header_from_strings(["Arm", "Events"]))
        .row(RawRow::from_strings(["Placebo", "12"]))
        .row(RawRow::from_strings(["Drug", "7"]));
    let tables = process_table(&table, &meta, 3);

    assert_eq!(tables[0].caption_text(), "Outcomes. by arm");
    assert_eq!(tables[0].footer_text(), "CI, confidence interval");
}
