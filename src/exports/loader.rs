//! Discovery and parsing of spider CSV exports
//!
//! Files are matched to tabs by a case-insensitive substring test on the
//! expected file name, so a prefixed export like
//! `example_com_response_codes.csv` resolves to the `Response Codes` tab.
//! Files that fail to parse as UTF-8 are retried as Latin-1; files that still
//! fail are skipped with an error log rather than aborting the load.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use super::{ExportError, ExportResult, ExportSet, ExportTab, ExportTable};

/// Loads every recognized export file from a crawl's export directory.
///
/// An individual file that is missing or unparseable just leaves its tab out
/// of the set; each check downstream copes with absent tables. Only a failed
/// directory listing is an error.
///
/// # Arguments
///
/// * `dir` - The directory the spider wrote its exports into
///
/// # Returns
///
/// * `Ok(ExportSet)` - The tables that could be loaded, possibly none
/// * `Err(ExportError)` - The directory itself could not be read
pub fn load_exports(dir: &Path) -> ExportResult<ExportSet> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        paths.push(entry?.path());
    }
    // Sorted so that repeated runs resolve duplicate matches the same way
    paths.sort();

    let mut found: HashMap<ExportTab, PathBuf> = HashMap::new();
    for path in paths {
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if !file_name.ends_with(".csv") {
            continue;
        }
        // Each file maps to at most one tab; the last file to match a tab wins
        if let Some(tab) = ExportTab::ALL.iter().copied().find(|tab| tab.matches_file(file_name)) {
            found.insert(tab, path);
        }
    }

    let mut set = ExportSet::new();
    for tab in ExportTab::ALL {
        match found.get(&tab) {
            Some(path) => {
                info!("Loading {} from {}", tab.file_stem(), path.display());
                match load_table(tab, path) {
                    Ok(table) => {
                        debug!("Loaded {}: {} rows", tab.file_stem(), table.row_count());
                        set.insert(tab, table);
                    }
                    Err(e) => error!("Error loading {}: {}", path.display(), e),
                }
            }
            None => warn!("Expected file not found: {}", tab.file_name()),
        }
    }

    if set.is_empty() {
        warn!("No usable export files in {}", dir.display());
    }
    Ok(set)
}

fn load_table(tab: ExportTab, path: &Path) -> ExportResult<ExportTable> {
    let bytes = std::fs::read(path)?;
    match parse_csv(tab, &bytes) {
        Ok(table) => Ok(table),
        Err(e) if is_utf8_error(&e) => {
            debug!("UTF-8 decode of {} failed, retrying as Latin-1", path.display());
            let decoded = encoding_rs::mem::decode_latin1(&bytes);
            parse_csv(tab, decoded.as_bytes())
        }
        Err(e) => Err(e),
    }
}

fn parse_csv(tab: ExportTab, bytes: &[u8]) -> ExportResult<ExportTable> {
    let mut reader = csv::ReaderBuilder::new().from_reader(bytes);
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(ExportTable::new(tab.file_stem(), columns, rows))
}

fn is_utf8_error(error: &ExportError) -> bool {
    match error {
        ExportError::Csv(e) => matches!(e.kind(), csv::ErrorKind::Utf8 { .. }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_load_exports_discovers_prefixed_files() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "example_com_response_codes.csv",
            b"Address,Status Code\nhttps://example.com/,200\n",
        );
        write_file(&dir, "Page_Titles.csv", b"Address,Title 1\nhttps://example.com/,Home\n");
        write_file(&dir, "notes.txt", b"not an export");

        let set = load_exports(dir.path()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.get(ExportTab::ResponseCodes).is_some());
        assert!(set.get(ExportTab::PageTitles).is_some());
        assert!(set.get(ExportTab::InternalAll).is_none());
    }

    #[test]
    fn test_load_exports_ignores_uppercase_extension() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "RESPONSE_CODES.CSV", b"Address,Status Code\n");
        write_file(&dir, "page_titles.csv", b"Address,Title 1\n");

        let set = load_exports(dir.path()).unwrap();
        assert!(set.get(ExportTab::ResponseCodes).is_none());
        assert!(set.get(ExportTab::PageTitles).is_some());
    }

    #[test]
    fn test_load_exports_latin1_fallback() {
        let dir = TempDir::new().unwrap();
        // "café" encoded as Latin-1: 0xE9 is not valid UTF-8
        write_file(
            &dir,
            "page_titles.csv",
            b"Address,Title 1\nhttps://example.com/,caf\xe9\n",
        );

        let set = load_exports(dir.path()).unwrap();
        let table = set.get(ExportTab::PageTitles).unwrap();
        assert_eq!(table.cell(0, "Title 1"), Some("caf\u{e9}"));
    }

    #[test]
    fn test_load_exports_skips_malformed_file() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "page_titles.csv", b"Address\none,two,three\n");
        write_file(
            &dir,
            "response_codes.csv",
            b"Address,Status Code\nhttps://example.com/,404\n",
        );

        let set = load_exports(dir.path()).unwrap();
        assert!(set.get(ExportTab::PageTitles).is_none());
        assert!(set.get(ExportTab::ResponseCodes).is_some());
    }

    #[test]
    fn test_load_exports_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(load_exports(&missing).is_err());
    }

    #[test]
    fn test_load_exports_empty_directory_is_ok() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "notes.txt", b"not an export");

        let set = load_exports(dir.path()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_load_exports_unrecognized_csv_still_loads() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "custom_extraction.csv", b"Address,Value\n");

        let set = load_exports(dir.path()).unwrap();
        assert!(set.is_empty());
    }
}
