//! Input discovery and grouping for batch runs

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use untable::detect::document_stem;
use untable::{detect_input_kind, InputKind};

/// Files belonging to one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    /// Base name shared by the article's files
    pub key: String,
    /// Directory holding the files
    pub out_dir: PathBuf,
    /// Main HTML file
    pub main_text: Option<PathBuf>,
    /// Linked table pages
    pub linked_tables: Vec<PathBuf>,
    /// Table images
    pub table_images: Vec<PathBuf>,
}

impl FileGroup {
    fn new(key: &str, out_dir: &Path) -> Self {
        Self {
            key: key.to_string(),
            out_dir: out_dir.to_path_buf(),
            main_text: None,
            linked_tables: Vec::new(),
            table_images: Vec::new(),
        }
    }

    /// HTML files to extract tables from, main text first
    pub fn html_sources(&self) -> Vec<PathBuf> {
        self.main_text
            .iter()
            .chain(self.linked_tables.iter())
            .cloned()
            .collect()
    }

    /// Name of the JSON file written for this group
    pub fn output_file_name(&self) -> String {
        format!("{}_tables.json", self.key)
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

/// Expand an input path into the files it names.
///
/// Directories are searched recursively. Glob patterns are expanded; other
/// paths are returned as they are.
pub fn discover(input: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let pattern = if input.is_dir() {
        input.join("**").join("*").to_string_lossy().into_owned()
    } else {
        let text = input.to_string_lossy();
        if !is_glob_pattern(&text) {
            return Ok(vec![input.to_path_buf()]);
        }
        text.into_owned()
    };

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("Cannot read {}: {}", e.path().display(), e),
        }
    }
    files.sort();
    Ok(files)
}

/// Group files by directory and base name.
///
/// Files that are neither HTML nor a table image are skipped.
pub fn group_files(paths: &[PathBuf]) -> Vec<FileGroup> {
    let mut groups: BTreeMap<PathBuf, FileGroup> = BTreeMap::new();

    for path in paths {
        let kind = match detect_input_kind(path) {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        if matches!(kind, InputKind::Directory | InputKind::Unknown) {
            log::info!("Skipping {} ({})", path.display(), kind);
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let key = document_stem(name);
        let group = groups
            .entry(dir.join(key))
            .or_insert_with(|| FileGroup::new(key, dir));

        match kind {
            InputKind::MainText => group.main_text = Some(path.clone()),
            InputKind::LinkedTable => group.linked_tables.push(path.clone()),
            InputKind::TableImage => group.table_images.push(path.clone()),
            InputKind::Directory | InputKind::Unknown => {}
        }
    }

    groups.into_values().collect()
}

fn normal_components(path: &Path) -> Vec<&std::ffi::OsStr> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

/// Check that `name` is one of the directories of `input`.
pub fn check_start_dir(input: &Path, name: &str) -> Result<(), String> {
    if normal_components(input).iter().any(|part| *part == name) {
        Ok(())
    } else {
        Err(format!("'{}' is not a directory of {}", name, input.display()))
    }
}

/// Directory a group's output is written to.
///
/// The group's directory is recreated under `target`. With `start_at`, only
/// the part of it from the first component named `start_at` onward is kept.
pub fn output_dir(target: &Path, source_dir: &Path, start_at: Option<&str>) -> Result<PathBuf, String> {
    let components = normal_components(source_dir);

    let kept = match start_at {
        Some(name) => {
            let start = components
                .iter()
                .position(|part| *part == name)
                .ok_or_else(|| {
                    format!("'{}' is not a directory of {}", name, source_dir.display())
                })?;
            &components[start..]
        }
        None => &components[..],
    };

    Ok(kept.iter().fold(target.to_path_buf(), |dir, part| dir.join(part)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("a.html"), "<p></p>").unwrap();
        fs::write(dir.path().join("nested").join("b.html"), "<p></p>").unwrap();

        let files = discover(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.is_file()));
    }

    #[test]
    fn test_discover_plain_file() {
        let files = discover(Path::new("paper.html")).unwrap();
        assert_eq!(files, vec![PathBuf::from("paper.html")]);
    }

    #[test]
    fn test_group_files_by_article() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("PMC1.html");
        let linked = dir.path().join("PMC1_table_2.html");
        let image = dir.path().join("PMC1_table_3.png");
        let other = dir.path().join("PMC2.html");
        let notes = dir.path().join("notes.txt");
        fs::write(&main, "<p></p>").unwrap();
        fs::write(&linked, "<p></p>").unwrap();
        fs::write(&image, b"\x89PNG\r\n\x1a\n").unwrap();
        fs::write(&other, "<p></p>").unwrap();
        fs::write(&notes, "x").unwrap();

        let groups = group_files(&[main.clone(), linked.clone(), image.clone(), other, notes]);
        assert_eq!(groups.len(), 2);

        let first = &groups[0];
        assert_eq!(first.key, "PMC1");
        assert_eq!(first.out_dir, dir.path());
        assert_eq!(first.html_sources(), vec![main, linked]);
        assert_eq!(first.table_images, vec![image]);
        assert_eq!(first.output_file_name(), "PMC1_tables.json");
        assert_eq!(groups[1].key, "PMC2");
    }

    #[test]
    fn test_output_dir_mirrors_source() {
        let dir = output_dir(Path::new("out"), Path::new("/data/corpus/2023/batch"), None).unwrap();
        assert_eq!(dir, Path::new("out/data/corpus/2023/batch"));
    }

    #[test]
    fn test_output_dir_starts_at_named_dir() {
        let dir = output_dir(
            Path::new("out"),
            Path::new("/data/corpus/2023/batch"),
            Some("corpus"),
        )
        .unwrap();
        assert_eq!(dir, Path::new("out/corpus/2023/batch"));
    }

    #[test]
    fn test_check_start_dir() {
        assert!(check_start_dir(Path::new("/data/corpus/2023"), "corpus").is_ok());
        assert!(check_start_dir(Path::new("corpus/**/*.html"), "corpus").is_ok());
        assert!(check_start_dir(Path::new("/data/corpus"), "corp").is_err());
        assert!(check_start_dir(Path::new("/data/corpus"), "missing").is_err());
    }

    #[test]
    fn test_output_dir_unknown_start() {
        let result = output_dir(Path::new("out"), Path::new("data/corpus"), Some("missing"));
        assert!(result.is_err());
    }
}
