//! Export loading for spider CSV output
//!
//! This module handles:
//! - Naming the spider export tabs the audit consumes
//! - Discovering exported CSV files in a crawl directory
//! - Parsing them into column-addressable tables with a Latin-1 fallback

mod loader;
mod table;
mod tabs;

pub use loader::load_exports;
pub use table::ExportTable;
pub use tabs::ExportTab;

use std::collections::HashMap;
use thiserror::Error;

/// Export loading errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for export operations
pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// The set of export tables loaded for one audit run.
///
/// Tabs whose files were absent or unparseable are simply not present; the
/// checks treat a missing table as "nothing to report".
#[derive(Debug, Default)]
pub struct ExportSet {
    tables: HashMap<ExportTab, ExportTable>,
}

impl ExportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a loaded table, replacing any previous table for the tab
    pub fn insert(&mut self, tab: ExportTab, table: ExportTable) {
        self.tables.insert(tab, table);
    }

    /// Returns the table for a tab, if it was loaded
    pub fn get(&self, tab: ExportTab) -> Option<&ExportTable> {
        self.tables.get(&tab)
    }

    /// Number of tables loaded
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Tabs that were loaded, in catalog order
    pub fn tabs(&self) -> Vec<ExportTab> {
        let mut tabs: Vec<ExportTab> = self.tables.keys().copied().collect();
        tabs.sort();
        tabs
    }
}
