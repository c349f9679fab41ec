//! Input file identification.
//!
//! Articles come as a main HTML file, optional linked table pages named
//! `<article>_table_<N>.html` and optional table images named
//! `<article>_table_<N>.<ext>`.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static RE_TABLE_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_table_(\d+)\.[A-Za-z0-9]+$").expect("valid table file name regex")
});

/// Kind of an input path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// A directory to search
    Directory,
    /// An article's main HTML file
    MainText,
    /// A table page linked from an article (`*_table_<N>.html`)
    LinkedTable,
    /// An image of a table
    TableImage,
    /// Anything else
    Unknown,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InputKind::Directory => "directory",
            InputKind::MainText => "main text",
            InputKind::LinkedTable => "linked table",
            InputKind::TableImage => "table image",
            InputKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Image formats recognized by their magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    WebP,
}

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff";
const GIF87_MAGIC: &[u8] = b"GIF87a";
const GIF89_MAGIC: &[u8] = b"GIF89a";
const BMP_MAGIC: &[u8] = b"BM";
const TIFF_LE_MAGIC: &[u8] = b"II*\x00";
const TIFF_BE_MAGIC: &[u8] = b"MM\x00*";
const HEADER_LEN: usize = 16;

/// Parse the table number from a file name such as `paper_table_3.html`.
///
/// # Example
/// ```
/// use untable::detect::table_index_from_file_name;
///
/// assert_eq!(table_index_from_file_name("PMC123_table_3.html").as_deref(), Some("3"));
/// assert_eq!(table_index_from_file_name("PMC123.html"), None);
/// ```
pub fn table_index_from_file_name(name: &str) -> Option<String> {
    let file_name = Path::new(name).file_name()?.to_str()?;
    RE_TABLE_FILE
        .captures(file_name)
        .map(|caps| caps[1].to_string())
}

/// Name shared by an article and its linked tables and images.
///
/// `paper_table_2.html`, `paper_table_2.png` and `paper.html` all give
/// `paper`.
pub fn document_stem(file_name: &str) -> &str {
    if let Some(m) = RE_TABLE_FILE.find(file_name) {
        return &file_name[..m.start()];
    }
    file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(file_name)
}

/// Detect the kind of an input path.
///
/// HTML files are told apart by name; other files are sniffed for image
/// magic bytes.
pub fn detect_input_kind<P: AsRef<Path>>(path: P) -> Result<InputKind> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(InputKind::Directory);
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if is_html_name(name) {
        return Ok(if table_index_from_file_name(name).is_some() {
            InputKind::LinkedTable
        } else {
            InputKind::MainText
        });
    }

    let mut header = Vec::with_capacity(HEADER_LEN);
    File::open(path)?
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)?;
    if is_image_bytes(&header) {
        Ok(InputKind::TableImage)
    } else {
        Ok(InputKind::Unknown)
    }
}

fn is_html_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".html") || lower.ends_with(".htm")
}

/// Detect an image format from the first bytes of a file.
pub fn detect_image_from_bytes(data: &[u8]) -> Result<ImageFormat> {
    let format = if data.starts_with(PNG_MAGIC) {
        ImageFormat::Png
    } else if data.starts_with(JPEG_MAGIC) {
        ImageFormat::Jpeg
    } else if data.starts_with(GIF87_MAGIC) || data.starts_with(GIF89_MAGIC) {
        ImageFormat::Gif
    } else if data.starts_with(TIFF_LE_MAGIC) || data.starts_with(TIFF_BE_MAGIC) {
        ImageFormat::Tiff
    } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        ImageFormat::WebP
    } else if data.starts_with(BMP_MAGIC) {
        ImageFormat::Bmp
    } else {
        return Err(Error::UnsupportedInput("not a recognized image".to_string()));
    };
    Ok(format)
}

/// Check if bytes start with a known image signature.
pub fn is_image_bytes(data: &[u8]) -> bool {
    detect_image_from_bytes(data).is_ok()
}
