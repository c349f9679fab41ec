//! Offset-annotated table record (BioC-style JSON layout).
//!
//! Field names follow the BioC table layout consumed by downstream
//! annotation tools; `sentences`, `annotations` and `relations` are kept as
//! empty arrays for those tools to fill.

use super::CellValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default `source` field of a record.
pub const DEFAULT_SOURCE: &str = "Auto-CORPus table processing";

/// Default `key` field of a record.
pub const DEFAULT_KEY: &str = "auto-corpus-table.key";

/// A collection of table documents extracted from one or more files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Producer of the record
    pub source: String,

    /// Creation date (`YYYYMMDD`)
    pub date: String,

    /// Key file describing the layout
    pub key: String,

    /// Free-form record information
    pub infons: Map<String, Value>,

    /// One document per logical table
    pub documents: Vec<TableDocument>,
}

impl TableRecord {
    /// Create an empty record.
    pub fn new(source: impl Into<String>, date: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            date: date.into(),
            key: key.into(),
            infons: Map::new(),
            documents: Vec::new(),
        }
    }

    /// Check if the record holds any table.
    pub fn has_tables(&self) -> bool {
        !self.documents.is_empty()
    }

    /// Number of table documents.
    pub fn table_count(&self) -> usize {
        self.documents.len()
    }

    /// Append the documents of another record.
    pub fn merge(&mut self, other: TableRecord) {
        self.documents.extend(other.documents);
    }
}

/// One table as a BioC document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDocument {
    /// Source file name
    pub file: String,

    /// Document identifier (`T` + table identifier)
    pub id: String,

    /// Free-form document information
    pub infons: Map<String, Value>,

    /// Title, caption, table body and footer passages
    pub passages: Vec<Passage>,

    /// Reserved for downstream annotation
    pub annotations: Vec<Value>,

    /// Reserved for downstream annotation
    pub relations: Vec<Value>,
}

impl TableDocument {
    /// Create a document without passages.
    pub fn new(file: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            id: id.into(),
            infons: Map::new(),
            passages: Vec::new(),
            annotations: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Find the first passage of a kind.
    pub fn passage(&self, kind: PassageKind) -> Option<&Passage> {
        self.passages.iter().find(|p| p.kind() == Some(kind))
    }
}

/// A passage of a table document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// Starting character offset in the running text
    pub offset: usize,

    /// Section type information
    pub infons: PassageInfons,

    /// Text or table content
    #[serde(flatten)]
    pub body: PassageBody,

    /// Reserved for downstream annotation
    pub sentences: Vec<Value>,

    /// Reserved for downstream annotation
    pub annotations: Vec<Value>,

    /// Reserved for downstream annotation
    pub relations: Vec<Value>,
}

impl Passage {
    /// Create a text passage.
    pub fn text(kind: PassageKind, offset: usize, text: impl Into<String>) -> Self {
        Self::with_body(kind, offset, PassageBody::Text { text: text.into() })
    }

    /// Create a table body passage.
    pub fn table(offset: usize, columns: Vec<String>, results_section: Vec<ResultSection>) -> Self {
        Self::with_body(
            PassageKind::Table,
            offset,
            PassageBody::Table {
                columns,
                results_section,
            },
        )
    }

    fn with_body(kind: PassageKind, offset: usize, body: PassageBody) -> Self {
        Self {
            offset,
            infons: PassageInfons {
                section_type: vec![kind.section_type()],
            },
            body,
            sentences: Vec::new(),
            annotations: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Kind of the passage, from its first section type.
    pub fn kind(&self) -> Option<PassageKind> {
        self.infons
            .section_type
            .first()
            .and_then(|st| PassageKind::from_type_name(&st.kind))
    }

    /// Text of a text passage.
    pub fn text_content(&self) -> Option<&str> {
        match &self.body {
            PassageBody::Text { text } => Some(text),
            PassageBody::Table { .. } => None,
        }
    }
}

/// Passage information block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageInfons {
    /// Section types of the passage
    pub section_type: Vec<SectionType>,
}

/// A section type with its ontology term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionType {
    /// Passage type name
    #[serde(rename = "type")]
    pub kind: String,

    /// Information Artifact Ontology term name
    #[serde(rename = "IAO_name")]
    pub iao_name: String,

    /// Information Artifact Ontology term id
    #[serde(rename = "IAO_id")]
    pub iao_id: String,
}

/// Content of a passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PassageBody {
    /// Table rows grouped by section
    Table {
        /// Merged column labels
        columns: Vec<String>,
        /// Sections of result rows
        results_section: Vec<ResultSection>,
    },
    /// Plain text
    Text {
        /// Passage text
        text: String,
    },
}

/// Rows of one table section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSection {
    /// Superrow label
    pub section_title_1: String,

    /// Rows of identified cells
    pub results_rows: Vec<Vec<ResultCell>>,
}

/// A cell with its synthetic identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultCell {
    /// `T{table}.{row}.{column}`
    pub id: String,

    /// Cell value
    pub text: CellValue,
}

/// Kinds of passages in a table document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassageKind {
    /// Table title
    Title,
    /// Table caption
    Caption,
    /// Table body
    Table,
    /// Table footer
    Footer,
}

impl PassageKind {
    /// Section type name as written in the record.
    pub fn type_name(self) -> &'static str {
        match self {
            PassageKind::Title => "table_title",
            PassageKind::Caption => "table_caption",
            PassageKind::Table => "table",
            PassageKind::Footer => "table_footer",
        }
    }

    /// Parse a section type name.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "table_title" => Some(PassageKind::Title),
            "table_caption" => Some(PassageKind::Caption),
            "table" => Some(PassageKind::Table),
            "table_footer" => Some(PassageKind::Footer),
            _ => None,
        }
    }

    /// Section type with its ontology term.
    pub fn section_type(self) -> SectionType {
        let (iao_name, iao_id) = match self {
            PassageKind::Title => ("document title", "IAO:0000305"),
            PassageKind::Caption | PassageKind::Footer => ("caption", "IAO:0000304"),
            PassageKind::Table => ("table", "IAO:0000306"),
        };
        SectionType {
            kind: self.type_name().to_string(),
            iao_name: iao_name.to_string(),
            iao_id: iao_id.to_string(),
        }
    }
}
