//! Issue records, severity buckets, and the aggregate audit report

use serde::{Deserialize, Serialize};

use super::catalog::{IssueKind, Severity};

/// One detected SEO problem, aggregated across every matching page.
///
/// A record only exists when at least one row matched; a check with zero
/// matches produces no record at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub title: String,
    pub description: String,
    pub count: usize,
    pub examples: Vec<String>,
    pub impact: u8,
    pub effort: u8,
    pub priority_score: f64,
    pub recommendation: String,
}

impl Issue {
    /// Builds a record for `kind` with scores taken from the catalog
    pub fn new(
        kind: IssueKind,
        title: impl Into<String>,
        description: impl Into<String>,
        count: usize,
        examples: Vec<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        debug_assert!(count > 0, "zero-match issues must not be constructed");
        let rule = kind.rule();
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            count,
            examples,
            impact: rule.impact,
            effort: rule.effort,
            priority_score: rule.priority_score(),
            recommendation: recommendation.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.rule().severity
    }
}

/// Issues grouped by severity, in detection order until sorted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueBuckets {
    pub critical: Vec<Issue>,
    pub high: Vec<Issue>,
    pub medium: Vec<Issue>,
    pub low: Vec<Issue>,
}

impl IssueBuckets {
    /// Routes an issue into the bucket its catalog entry names
    pub fn push(&mut self, issue: Issue) {
        self.bucket_mut(issue.severity()).push(issue);
    }

    pub fn bucket(&self, severity: Severity) -> &[Issue] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
        }
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut Vec<Issue> {
        match severity {
            Severity::Critical => &mut self.critical,
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
        }
    }

    pub fn total(&self) -> usize {
        Severity::ALL
            .iter()
            .map(|severity| self.bucket(*severity).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterates bucket-major: critical, then high, medium, low
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.critical
            .iter()
            .chain(self.high.iter())
            .chain(self.medium.iter())
            .chain(self.low.iter())
    }

    /// Sorts each bucket by priority score descending.
    ///
    /// The sort is stable: issues with equal scores keep detection order.
    pub fn sort_by_priority(&mut self) {
        for severity in Severity::ALL {
            self.bucket_mut(severity).sort_by(|a, b| {
                b.priority_score
                    .partial_cmp(&a.priority_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
    }
}

/// Derived summary of one audit run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_issues: usize,
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    pub date: String,
    pub highest_impact_issues: Vec<Issue>,
}

impl AuditSummary {
    pub fn count_for(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical_count,
            Severity::High => self.high_count,
            Severity::Medium => self.medium_count,
            Severity::Low => self.low_count,
        }
    }
}

/// The full audit output: the summary first, then the bucketed issues
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub summary: AuditSummary,
    pub issues: IssueBuckets,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(kind: IssueKind) -> Issue {
        Issue::new(
            kind,
            "Test",
            "Test issue",
            1,
            vec!["https://example.com/".to_string()],
            "Fix it",
        )
    }

    #[test]
    fn test_push_routes_by_severity() {
        let mut buckets = IssueBuckets::default();
        buckets.push(issue(IssueKind::BrokenLinks));
        buckets.push(issue(IssueKind::MissingH1));
        buckets.push(issue(IssueKind::TitleTooLong));
        buckets.push(issue(IssueKind::MultipleH1));

        assert_eq!(buckets.critical.len(), 1);
        assert_eq!(buckets.high.len(), 1);
        assert_eq!(buckets.medium.len(), 1);
        assert_eq!(buckets.low.len(), 1);
        assert_eq!(buckets.total(), 4);
    }

    #[test]
    fn test_iter_is_bucket_major() {
        let mut buckets = IssueBuckets::default();
        buckets.push(issue(IssueKind::MultipleH1));
        buckets.push(issue(IssueKind::BrokenLinks));
        buckets.push(issue(IssueKind::MissingH1));

        let kinds: Vec<IssueKind> = buckets.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![IssueKind::BrokenLinks, IssueKind::MissingH1, IssueKind::MultipleH1]
        );
    }

    #[test]
    fn test_sort_by_priority_descending() {
        let mut buckets = IssueBuckets::default();
        // server_errors 10/6, broken_links 10/5, duplicate_titles 8/3, redirect_chains 9/4
        buckets.push(issue(IssueKind::ServerErrors));
        buckets.push(issue(IssueKind::BrokenLinks));
        buckets.push(issue(IssueKind::DuplicateTitles));
        buckets.push(issue(IssueKind::RedirectChains));
        buckets.sort_by_priority();

        let kinds: Vec<IssueKind> = buckets.critical.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::DuplicateTitles,
                IssueKind::RedirectChains,
                IssueKind::BrokenLinks,
                IssueKind::ServerErrors,
            ]
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_scores() {
        let mut buckets = IssueBuckets::default();
        // Both 7/2: the tie must keep detection order
        buckets.push(issue(IssueKind::MissingMetaDescriptions));
        buckets.push(issue(IssueKind::MissingH1));
        buckets.sort_by_priority();

        let kinds: Vec<IssueKind> = buckets.high.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![IssueKind::MissingMetaDescriptions, IssueKind::MissingH1]
        );
    }

    #[test]
    fn test_issue_scores_come_from_catalog() {
        let record = issue(IssueKind::DuplicateTitles);
        assert_eq!(record.impact, 8);
        assert_eq!(record.effort, 3);
        assert_eq!(record.priority_score, 8.0 / 3.0);
        assert_eq!(record.severity(), Severity::Critical);
    }

    #[test]
    fn test_issue_serializes_with_type_tag() {
        let record = issue(IssueKind::BrokenLinks);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "broken_links");
        assert_eq!(value["count"], 1);
        assert_eq!(value["priority_score"], 2.0);
    }
}
