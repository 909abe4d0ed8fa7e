//! Runs the full check sequence and assembles the report

use chrono::Local;

use crate::exports::ExportSet;

use super::checks::CHECKS;
use super::issue::{AuditReport, AuditSummary, Issue, IssueBuckets};

/// How many highest-impact issues the summary calls out
pub const DEFAULT_TOP_ISSUES: usize = 3;

/// Applies every check to the loaded exports and buckets the findings.
///
/// Within each bucket, issues are ordered by priority score, highest first;
/// ties keep detection order. The summary is computed from the sorted
/// buckets, so equal-impact issues surface in bucket order.
pub fn run_audit(exports: &ExportSet, top_issues: usize) -> AuditReport {
    let mut buckets = IssueBuckets::default();
    for check in CHECKS {
        if let Some(issue) = check(exports) {
            buckets.push(issue);
        }
    }
    buckets.sort_by_priority();

    let summary = summarize(&buckets, top_issues);
    AuditReport {
        summary,
        issues: buckets,
    }
}

fn summarize(buckets: &IssueBuckets, top_issues: usize) -> AuditSummary {
    let mut highest_impact: Vec<Issue> = buckets.iter().cloned().collect();
    highest_impact.sort_by(|a, b| b.impact.cmp(&a.impact));
    highest_impact.truncate(top_issues);

    AuditSummary {
        total_issues: buckets.total(),
        critical_count: buckets.critical.len(),
        high_count: buckets.high.len(),
        medium_count: buckets.medium.len(),
        low_count: buckets.low.len(),
        date: Local::now().format("%Y-%m-%d").to_string(),
        highest_impact_issues: highest_impact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::catalog::IssueKind;
    use crate::exports::{ExportTab, ExportTable};

    fn table(columns: &[&str], rows: &[&[&str]]) -> ExportTable {
        ExportTable::new(
            "test",
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    /// Exports that trigger one issue of every severity class
    fn busy_exports() -> ExportSet {
        let mut set = ExportSet::new();
        set.insert(
            ExportTab::ResponseCodes,
            table(
                &["Address", "Status Code"],
                &[
                    &["https://example.com/gone", "404"],
                    &["https://example.com/boom", "500"],
                ],
            ),
        );
        set.insert(
            ExportTab::RedirectChains,
            table(
                &["Address", "Redirect Chain"],
                &[&["https://example.com/hop", "3"]],
            ),
        );
        set.insert(
            ExportTab::PageTitles,
            table(
                &["Address", "Title 1"],
                &[
                    &["https://example.com/", "Home"],
                    &["https://example.com/index", "Home"],
                ],
            ),
        );
        set.insert(
            ExportTab::MetaDescription,
            table(
                &["Address", "Meta Description 1"],
                &[&["https://example.com/bare", ""]],
            ),
        );
        set.insert(
            ExportTab::H1,
            table(
                &["Address", "H1-1", "H1-2"],
                &[
                    &["https://example.com/plain", "", ""],
                    &["https://example.com/twice", "One", "Two"],
                ],
            ),
        );
        set.insert(
            ExportTab::PageSpeed,
            table(
                &["Address", "Page Load Time (Seconds)"],
                &[&["https://example.com/slow", "4.2"]],
            ),
        );
        set.insert(
            ExportTab::Images,
            table(
                &["Address", "Alt Text"],
                &[&["https://example.com/logo.png", ""]],
            ),
        );
        set
    }

    #[test]
    fn test_empty_exports_produce_empty_report() {
        let report = run_audit(&ExportSet::new(), DEFAULT_TOP_ISSUES);
        assert_eq!(report.summary.total_issues, 0);
        assert!(report.issues.is_empty());
        assert!(report.summary.highest_impact_issues.is_empty());
    }

    #[test]
    fn test_issues_land_in_their_buckets() {
        let report = run_audit(&busy_exports(), DEFAULT_TOP_ISSUES);

        let kinds_of = |issues: &[Issue]| -> Vec<IssueKind> {
            issues.iter().map(|issue| issue.kind).collect()
        };
        assert_eq!(
            kinds_of(&report.issues.critical),
            vec![
                IssueKind::DuplicateTitles,
                IssueKind::RedirectChains,
                IssueKind::BrokenLinks,
                IssueKind::ServerErrors,
            ]
        );
        assert_eq!(
            kinds_of(&report.issues.high),
            vec![
                IssueKind::MissingMetaDescriptions,
                IssueKind::MissingH1,
                IssueKind::SlowPages,
            ]
        );
        assert_eq!(
            kinds_of(&report.issues.medium),
            vec![IssueKind::MissingAltText]
        );
        assert_eq!(kinds_of(&report.issues.low), vec![IssueKind::MultipleH1]);

        assert_eq!(report.summary.total_issues, 9);
        assert_eq!(report.summary.critical_count, 4);
        assert_eq!(report.summary.high_count, 3);
        assert_eq!(report.summary.medium_count, 1);
        assert_eq!(report.summary.low_count, 1);
    }

    #[test]
    fn test_highest_impact_follows_bucket_order_on_ties() {
        let report = run_audit(&busy_exports(), DEFAULT_TOP_ISSUES);

        // Broken links and server errors share impact 10; broken links
        // comes first inside the critical bucket
        let top: Vec<IssueKind> = report
            .summary
            .highest_impact_issues
            .iter()
            .map(|issue| issue.kind)
            .collect();
        assert_eq!(
            top,
            vec![
                IssueKind::BrokenLinks,
                IssueKind::ServerErrors,
                IssueKind::RedirectChains,
            ]
        );
    }

    #[test]
    fn test_top_issues_never_exceeds_findings() {
        let report = run_audit(&busy_exports(), 50);
        assert_eq!(report.summary.highest_impact_issues.len(), 9);
    }

    #[test]
    fn test_summary_date_format() {
        let report = run_audit(&ExportSet::new(), DEFAULT_TOP_ISSUES);
        let date = &report.summary.date;
        assert_eq!(date.len(), 10);
        assert_eq!(date.as_bytes()[4], b'-');
        assert_eq!(date.as_bytes()[7], b'-');
    }
}
