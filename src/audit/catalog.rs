//! The fixed rule catalog mapping issue kinds to scores and severity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity bucket for detected issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// All buckets in report order
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Section heading used by the HTML report
    pub fn section_title(self) -> &'static str {
        match self {
            Severity::Critical => "Critical Issues",
            Severity::High => "High Priority Issues",
            Severity::Medium => "Medium Priority Issues",
            Severity::Low => "Low Priority Issues",
        }
    }

    /// Sheet name used by the spreadsheet report
    pub fn sheet_name(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifier of one entry in the rule catalog.
///
/// The catalog carries more kinds than the detector currently checks for;
/// the extra entries keep their scores reserved for future checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    BrokenLinks,
    ServerErrors,
    RedirectChains,
    DuplicateTitles,
    MissingMetaDescriptions,
    MissingH1,
    DuplicateContent,
    SlowPages,
    TitleTooLong,
    DescriptionTooLong,
    LowWordCount,
    MissingAltText,
    MultipleH1,
    MissingMetaKeywords,
    ExcessiveOutlinks,
    LowTextHtmlRatio,
}

/// One catalog entry: how much an issue hurts, how hard it is to fix,
/// and which bucket it lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub impact: u8,
    pub effort: u8,
    pub severity: Severity,
}

impl Rule {
    const fn new(impact: u8, effort: u8, severity: Severity) -> Self {
        Self {
            impact,
            effort,
            severity,
        }
    }

    /// Impact divided by effort; effort is never zero in the catalog
    pub fn priority_score(self) -> f64 {
        f64::from(self.impact) / f64::from(self.effort)
    }
}

impl IssueKind {
    pub const ALL: [IssueKind; 16] = [
        IssueKind::BrokenLinks,
        IssueKind::ServerErrors,
        IssueKind::RedirectChains,
        IssueKind::DuplicateTitles,
        IssueKind::MissingMetaDescriptions,
        IssueKind::MissingH1,
        IssueKind::DuplicateContent,
        IssueKind::SlowPages,
        IssueKind::TitleTooLong,
        IssueKind::DescriptionTooLong,
        IssueKind::LowWordCount,
        IssueKind::MissingAltText,
        IssueKind::MultipleH1,
        IssueKind::MissingMetaKeywords,
        IssueKind::ExcessiveOutlinks,
        IssueKind::LowTextHtmlRatio,
    ];

    /// The catalog entry for this kind; the mapping never changes at runtime
    pub const fn rule(self) -> Rule {
        match self {
            IssueKind::BrokenLinks => Rule::new(10, 5, Severity::Critical),
            IssueKind::ServerErrors => Rule::new(10, 6, Severity::Critical),
            IssueKind::RedirectChains => Rule::new(9, 4, Severity::Critical),
            IssueKind::DuplicateTitles => Rule::new(8, 3, Severity::Critical),
            IssueKind::MissingMetaDescriptions => Rule::new(7, 2, Severity::High),
            IssueKind::MissingH1 => Rule::new(7, 2, Severity::High),
            IssueKind::DuplicateContent => Rule::new(8, 6, Severity::High),
            IssueKind::SlowPages => Rule::new(7, 7, Severity::High),
            IssueKind::TitleTooLong => Rule::new(5, 2, Severity::Medium),
            IssueKind::DescriptionTooLong => Rule::new(5, 2, Severity::Medium),
            IssueKind::LowWordCount => Rule::new(6, 5, Severity::Medium),
            IssueKind::MissingAltText => Rule::new(5, 4, Severity::Medium),
            IssueKind::MultipleH1 => Rule::new(3, 2, Severity::Low),
            IssueKind::MissingMetaKeywords => Rule::new(2, 1, Severity::Low),
            IssueKind::ExcessiveOutlinks => Rule::new(3, 4, Severity::Low),
            IssueKind::LowTextHtmlRatio => Rule::new(3, 5, Severity::Low),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::BrokenLinks => "broken_links",
            IssueKind::ServerErrors => "server_errors",
            IssueKind::RedirectChains => "redirect_chains",
            IssueKind::DuplicateTitles => "duplicate_titles",
            IssueKind::MissingMetaDescriptions => "missing_meta_descriptions",
            IssueKind::MissingH1 => "missing_h1",
            IssueKind::DuplicateContent => "duplicate_content",
            IssueKind::SlowPages => "slow_pages",
            IssueKind::TitleTooLong => "title_too_long",
            IssueKind::DescriptionTooLong => "description_too_long",
            IssueKind::LowWordCount => "low_word_count",
            IssueKind::MissingAltText => "missing_alt_text",
            IssueKind::MultipleH1 => "multiple_h1",
            IssueKind::MissingMetaKeywords => "missing_meta_keywords",
            IssueKind::ExcessiveOutlinks => "excessive_outlinks",
            IssueKind::LowTextHtmlRatio => "low_text_html_ratio",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_partition() {
        let per_bucket = |severity: Severity| {
            IssueKind::ALL
                .iter()
                .filter(|kind| kind.rule().severity == severity)
                .count()
        };
        assert_eq!(per_bucket(Severity::Critical), 4);
        assert_eq!(per_bucket(Severity::High), 4);
        assert_eq!(per_bucket(Severity::Medium), 4);
        assert_eq!(per_bucket(Severity::Low), 4);
    }

    #[test]
    fn test_scores_in_range() {
        for kind in IssueKind::ALL {
            let rule = kind.rule();
            assert!((1..=10).contains(&rule.impact), "{kind} impact out of range");
            assert!((1..=10).contains(&rule.effort), "{kind} effort out of range");
        }
    }

    #[test]
    fn test_priority_score_is_impact_over_effort() {
        assert_eq!(IssueKind::BrokenLinks.rule().priority_score(), 2.0);
        assert_eq!(IssueKind::DuplicateTitles.rule().priority_score(), 8.0 / 3.0);
        assert_eq!(IssueKind::SlowPages.rule().priority_score(), 1.0);
    }

    #[test]
    fn test_serde_wire_names() {
        let kind = serde_json::to_string(&IssueKind::MissingH1).unwrap();
        assert_eq!(kind, "\"missing_h1\"");
        let severity = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(severity, "\"critical\"");

        let parsed: IssueKind = serde_json::from_str("\"low_text_html_ratio\"").unwrap();
        assert_eq!(parsed, IssueKind::LowTextHtmlRatio);
    }

    #[test]
    fn test_as_str_matches_serde() {
        for kind in IssueKind::ALL {
            let wire = serde_json::to_string(&kind).unwrap();
            assert_eq!(wire.trim_matches('"'), kind.as_str());
        }
    }
}
