//! End-to-end tests: HTML in, table record out.

use chrono::NaiveDate;
use untable::model::{PassageBody, ResultSection};
use untable::{
    parse_file, parse_html, to_json, CellValue, ExtractOptions, JsonFormat, PassageKind,
    TableConfig, TableDocument, Untable,
};

const ARTICLE: &str = r#"<html><body>
<h3>Table 1</h3>
<div class="caption"><p>Patient characteristics</p></div>
<div><table>
<tr><th>Group</th><th>Age</th><th>BMI</th></tr>
<tr><td colspan="3">Men</td></tr>
<tr><td>Cases</td><td>41</td><td>25.1</td></tr>
<tr><td>Controls</td><td>39</td><td>24.0</td></tr>
<tr><td colspan="3">Women</td></tr>
<tr><td>Cases</td><td>44</td><td>23.5</td></tr>
</table></div>
<div class="tblwrap-foot">BMI, body mass index.</div>
</body></html>"#;

fn options() -> ExtractOptions {
    ExtractOptions::new()
        .with_file_name("PMC1.html")
        .with_date(NaiveDate::from_ymd_opt(2023, 5, 4).unwrap())
}

fn results(document: &TableDocument) -> (&Vec<String>, &Vec<ResultSection>) {
    match document.passage(PassageKind::Table).map(|p| &p.body) {
        Some(PassageBody::Table {
            columns,
            results_section,
        }) => (columns, results_section),
        _ => panic!("document {} has no table passage", document.id),
    }
}

#[test]
fn test_article_table_record() {
    let record = parse_html(ARTICLE, &options());

    assert_eq!(record.date, "20230504");
    assert_eq!(record.documents.len(), 1);
    let document = &record.documents[0];
    assert_eq!(document.id, "T1");
    assert_eq!(document.file, "PMC1.html");

    let title = document.passage(PassageKind::Title).unwrap();
    assert_eq!(title.text_content(), Some("Table 1"));
    let caption = document.passage(PassageKind::Caption).unwrap();
    assert_eq!(caption.text_content(), Some("Patient characteristics"));
    let footer = document.passage(PassageKind::Footer).unwrap();
    assert_eq!(footer.text_content(), Some("BMI, body mass index."));

    let (columns, sections) = results(document);
    assert_eq!(columns, &vec!["Group", "Age", "BMI"]);
    let names: Vec<&str> = sections.iter().map(|s| s.section_title_1.as_str()).collect();
    assert_eq!(names, vec!["Men", "Women"]);
    assert_eq!(sections[0].results_rows.len(), 2);
    assert_eq!(sections[1].results_rows.len(), 1);

    let first = &sections[0].results_rows[0];
    assert_eq!(first[0].text, CellValue::from("Cases"));
    assert_eq!(first[1].text, CellValue::Number(41.0));
    assert_eq!(first[2].text, CellValue::Number(25.1));
}

#[test]
fn test_passage_offsets_follow_text() {
    let record = parse_html(ARTICLE, &options());
    let offsets: Vec<usize> = record.documents[0]
        .passages
        .iter()
        .map(|p| p.offset)
        .collect();

    // "Table 1" = 7, "Patient characteristics" = 23,
    // cells: "Cases" "41.0" "25.1" "Controls" "39.0" "24.0" "Cases" "44.0" "23.5" = 42
    assert_eq!(offsets, vec![0, 7, 30, 72]);
}

#[test]
fn test_cell_ids_run_across_sections() {
    let record = parse_html(ARTICLE, &options());
    let (_, sections) = results(&record.documents[0]);

    assert_eq!(sections[0].results_rows[0][0].id, "T1.0.0");
    assert_eq!(sections[0].results_rows[1][2].id, "T1.1.2");
    assert_eq!(sections[1].results_rows[0][1].id, "T1.2.1");
}

#[test]
fn test_changing_header_splits_table() {
    let html = "<table>\
        <tr><th>A</th><th>B</th></tr><tr><td>1</td><td>x</td></tr>\
        <tr><th>C</th><th>D</th></tr><tr><td>2</td><td>y</td></tr>\
        </table>";
    let record = parse_html(html, &ExtractOptions::default());

    let ids: Vec<&str> = record.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["T1.1", "T1.2"]);

    let (columns, sections) = results(&record.documents[1]);
    assert_eq!(columns, &vec!["C", "D"]);
    assert_eq!(sections[0].results_rows[0][0].id, "T1.2.0.0");
    assert_eq!(sections[0].results_rows[0][0].text, CellValue::Number(2.0));
}

#[test]
fn test_merged_header_and_spans() {
    let html = r#"<table>
        <tr><th rowspan="2">Marker</th><th colspan="2">Cases</th></tr>
        <tr><th>n</th><th>p</th></tr>
        <tr><td>IL-6</td><td>12</td><td>3 &times; 10<sup>&minus;5</sup></td></tr>
        <tr><td>TNF</td><td>(8)</td><td>0.04</td></tr>
        </table>"#;
    let record = parse_html(html, &ExtractOptions::default());
    let (columns, sections) = results(&record.documents[0]);

    assert_eq!(columns, &vec!["Marker<!>Marker", "Cases<!>n", "Cases<!>p"]);
    let rows = &sections[0].results_rows;
    assert_eq!(rows[0][2].text, CellValue::Number(3e-5));
    assert_eq!(rows[1][1].text, CellValue::Number(8.0));
}

#[test]
fn test_caption_only_linked_page() {
    let html = r#"<body>
        <table class="table-group"><tr><td>see below</td></tr></table>
        <div><div class="caption">Sample sizes per site</div></div>
        <h3>Table 2</h3>
    </body>"#;
    let record = parse_html(html, &ExtractOptions::default());

    assert!(record.has_tables());
    let document = &record.documents[0];
    let kinds: Vec<_> = document.passages.iter().filter_map(|p| p.kind()).collect();
    assert_eq!(
        kinds,
        vec![PassageKind::Title, PassageKind::Caption, PassageKind::Table]
    );
    let (columns, sections) = results(document);
    assert!(columns.is_empty());
    assert!(sections.is_empty());
    assert_eq!(document.passages[2].offset, 28);
}

#[test]
fn test_linked_table_file_sets_document_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("PMC1_table_3.html");
    std::fs::write(&path, ARTICLE).unwrap();

    let record = parse_file(&path, &ExtractOptions::default()).unwrap();
    let document = &record.documents[0];
    assert_eq!(document.id, "T3");

    let (_, sections) = results(document);
    assert_eq!(sections[0].results_rows[0][0].id, "T1.0.0");
}

#[test]
fn test_custom_selectors() {
    let html = r#"<body>
        <h2 class="tbl-title">Table 5</h2>
        <table><tr><th>K</th><th>V</th></tr><tr><td>a</td><td>1</td></tr></table>
    </body>"#;
    let config = TableConfig::from_json(r#"{"table_title": {"name": "h2", "attrs": {"class": "tbl-title"}}}"#)
        .unwrap();
    let result = Untable::new().with_config(config).parse_html(html);

    let title = result.record().documents[0].passage(PassageKind::Title).unwrap();
    assert_eq!(title.text_content(), Some("Table 5"));
}

#[test]
fn test_json_layout() {
    let record = parse_html(ARTICLE, &options());
    let json = to_json(&record, JsonFormat::Compact).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["source"], "Auto-CORPus table processing");
    assert_eq!(value["key"], "auto-corpus-table.key");
    let passage = &value["documents"][0]["passages"][2];
    assert_eq!(passage["infons"]["section_type"][0]["type"], "table");
    assert_eq!(passage["infons"]["section_type"][0]["IAO_id"], "IAO:0000306");
    assert_eq!(passage["columns"][1], "Age");
    assert_eq!(
        passage["results_section"][1]["section_title_1"],
        "Women"
    );
    assert_eq!(
        passage["results_section"][0]["results_rows"][0][1]["text"],
        41.0
    );
    assert!(value["documents"][0]["annotations"].as_array().unwrap().is_empty());
}

#[test]
fn test_document_without_tables() {
    let record = parse_html("<html><body><p>No tables.</p></body></html>", &options());
    assert!(!record.has_tables());
    assert_eq!(record.table_count(), 0);
}
