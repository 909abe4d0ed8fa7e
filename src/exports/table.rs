//! Column-addressable view over one parsed export file

use std::collections::HashMap;

/// One loaded export table.
///
/// Cells are kept as the raw strings found in the CSV; numeric interpretation
/// happens at the point of use. An empty cell means the spider exported no
/// value there, which the checks treat as missing.
#[derive(Debug, Clone)]
pub struct ExportTable {
    name: String,
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(position, column)| (column.clone(), position))
            .collect();
        Self {
            name: name.into(),
            columns,
            index,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cell at `row` in `column`, or `None` when the column does
    /// not exist or the row is out of range. An empty string is a present but
    /// empty cell.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let position = *self.index.get(column)?;
        self.rows.get(row)?.get(position).map(String::as_str)
    }

    /// Iterates over every value of one column, or `None` when the column
    /// does not exist
    pub fn column_values<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a str>> {
        let position = *self.index.get(column)?;
        Some(
            self.rows
                .iter()
                .map(move |row| row.get(position).map(String::as_str).unwrap_or("")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ExportTable {
        ExportTable::new(
            "response_codes",
            vec!["Address".to_string(), "Status Code".to_string()],
            vec![
                vec!["https://example.com/".to_string(), "200".to_string()],
                vec!["https://example.com/gone".to_string(), "404".to_string()],
                vec!["https://example.com/blank".to_string(), String::new()],
            ],
        )
    }

    #[test]
    fn test_cell_lookup() {
        let table = sample_table();
        assert_eq!(table.cell(1, "Status Code"), Some("404"));
        assert_eq!(table.cell(1, "Address"), Some("https://example.com/gone"));
    }

    #[test]
    fn test_cell_missing_column_or_row() {
        let table = sample_table();
        assert_eq!(table.cell(0, "Title 1"), None);
        assert_eq!(table.cell(99, "Address"), None);
    }

    #[test]
    fn test_empty_cell_is_present() {
        let table = sample_table();
        assert_eq!(table.cell(2, "Status Code"), Some(""));
    }

    #[test]
    fn test_column_values() {
        let table = sample_table();
        let codes: Vec<&str> = table.column_values("Status Code").unwrap().collect();
        assert_eq!(codes, vec!["200", "404", ""]);
        assert!(table.column_values("Missing").is_none());
    }
}
