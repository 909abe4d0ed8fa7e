//! Audit module for analyzing crawl exports
//!
//! This module handles the analysis half of the pipeline, including:
//! - The fixed catalog of issue kinds with impact and effort scores
//! - Checks that scan export tables for technical SEO problems
//! - Severity bucketing and priority ordering of findings
//! - Summary statistics for the generated reports

mod analyzer;
mod catalog;
mod checks;
mod issue;

pub use analyzer::{run_audit, DEFAULT_TOP_ISSUES};
pub use catalog::{IssueKind, Rule, Severity};
pub use checks::CHECKS;
pub use issue::{AuditReport, AuditSummary, Issue, IssueBuckets};
