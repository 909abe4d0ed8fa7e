//! HTML report generation
//!
//! Renders the audit report as a single self-contained page. Every text
//! value is routed through [`Escaped`] before it reaches the markup, so
//! crawl-derived strings cannot inject tags.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::audit::{AuditReport, Issue, Severity};

use super::ReportResult;

const STYLE: &str = "\
body { font-family: Arial, sans-serif; line-height: 1.6; margin: 0; padding: 20px; color: #333; }
.container { max-width: 1200px; margin: 0 auto; }
h1 { color: #2c3e50; border-bottom: 2px solid #eee; padding-bottom: 10px; }
h2 { color: #3498db; margin-top: 30px; }
h3 { color: #2c3e50; }
.summary { background-color: #f8f9fa; padding: 15px; border-radius: 5px; margin: 20px 0; }
.summary-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 10px; }
.summary-item { text-align: center; padding: 15px; border-radius: 5px; }
.critical { background-color: #f8d7da; color: #721c24; }
.high { background-color: #fff3cd; color: #856404; }
.medium { background-color: #d1ecf1; color: #0c5460; }
.low { background-color: #d4edda; color: #155724; }
.issue { margin-bottom: 30px; padding: 15px; border-radius: 5px; border-left: 5px solid #ddd; }
.issue.critical { border-left-color: #dc3545; }
.issue.high { border-left-color: #ffc107; }
.issue.medium { border-left-color: #17a2b8; }
.issue.low { border-left-color: #28a745; }
.score-bar { display: flex; margin: 10px 0; }
.score-impact, .score-effort { height: 20px; color: white; text-align: center; line-height: 20px; }
.score-impact { background-color: #007bff; }
.score-effort { background-color: #28a745; }
.examples { background-color: #f8f9fa; padding: 10px; border-radius: 5px; font-family: monospace; overflow-x: auto; }
.examples code { white-space: nowrap; }
footer { margin-top: 30px; text-align: center; color: #6c757d; font-size: 0.9em; }";

/// Writes the rendered HTML report to `output_dir`
pub fn write_html_report(
    report: &AuditReport,
    output_dir: &Path,
    timestamp: &str,
) -> ReportResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("seo_audit_report_{timestamp}.html"));

    let mut file = File::create(&path)?;
    file.write_all(render_html_report(report).as_bytes())?;

    info!("HTML report generated: {}", path.display());
    Ok(path)
}

/// Renders the full report page
pub fn render_html_report(report: &AuditReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("    <title>SEO Audit Report</title>\n");
    html.push_str("    <style>\n");
    html.push_str(STYLE);
    html.push_str("\n    </style>\n</head>\n<body>\n<div class=\"container\">\n");

    html.push_str("    <h1>Technical SEO Audit Report</h1>\n");
    html.push_str(&format!(
        "    <p>Generated on: {}</p>\n",
        escape(&report.summary.date)
    ));

    html.push_str("    <div class=\"summary\">\n        <h2>Summary</h2>\n");
    html.push_str("        <div class=\"summary-grid\">\n");
    for severity in Severity::ALL {
        let label = match severity {
            Severity::Critical => "Critical Issues",
            Severity::High => "High Priority",
            Severity::Medium => "Medium Priority",
            Severity::Low => "Low Priority",
        };
        html.push_str(&format!(
            "            <div class=\"summary-item {}\">\n                <h3>{}</h3>\n                <p>{}</p>\n            </div>\n",
            severity,
            label,
            report.summary.count_for(severity)
        ));
    }
    html.push_str("        </div>\n    </div>\n");

    for severity in Severity::ALL {
        let issues = report.issues.bucket(severity);
        if issues.is_empty() {
            continue;
        }
        html.push_str(&format!("    <h2>{}</h2>\n", severity.section_title()));
        for issue in issues {
            html.push_str(&render_issue(issue, severity));
        }
    }

    html.push_str("    <footer>\n        <p>This report was automatically generated by SEO Audit Automation Tool</p>\n    </footer>\n");
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn render_issue(issue: &Issue, severity: Severity) -> String {
    let mut html = String::new();

    html.push_str(&format!("    <div class=\"issue {severity}\">\n"));
    html.push_str(&format!(
        "        <h3>{} ({} instances)</h3>\n",
        escape(&issue.title),
        issue.count
    ));
    html.push_str(&format!("        <p>{}</p>\n", escape(&issue.description)));

    html.push_str(&format!(
        "        <div class=\"score-bar\">\n            <div class=\"score-impact\" style=\"width: {}%;\">Impact: {}/10</div>\n        </div>\n",
        u32::from(issue.impact) * 10,
        issue.impact
    ));
    html.push_str(&format!(
        "        <div class=\"score-bar\">\n            <div class=\"score-effort\" style=\"width: {}%;\">Effort: {}/10</div>\n        </div>\n",
        u32::from(issue.effort) * 10,
        issue.effort
    ));

    html.push_str("        <h4>Recommendation:</h4>\n");
    html.push_str(&format!(
        "        <p>{}</p>\n",
        escape(&issue.recommendation)
    ));

    html.push_str("        <h4>Examples:</h4>\n");
    html.push_str(&format!(
        "        <div class=\"examples\">\n            <code>{}</code>\n        </div>\n",
        join_escaped(&issue.examples, "<br>")
    ));

    html.push_str("    </div>\n");
    html
}

/// Text made safe for element content and attribute values. The renderer
/// only interpolates this type, never raw report strings.
pub(crate) struct Escaped(String);

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn escape(text: &str) -> Escaped {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Escaped(escaped)
}

/// Escapes each item, then joins with a literal markup separator
fn join_escaped(items: &[String], separator: &str) -> Escaped {
    let joined = items
        .iter()
        .map(|item| escape(item).0)
        .collect::<Vec<_>>()
        .join(separator);
    Escaped(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditSummary, IssueBuckets, IssueKind};

    fn report_with(issues: Vec<Issue>) -> AuditReport {
        let mut buckets = IssueBuckets::default();
        for issue in issues {
            buckets.push(issue);
        }
        let summary = AuditSummary {
            total_issues: buckets.total(),
            critical_count: buckets.critical.len(),
            high_count: buckets.high.len(),
            medium_count: buckets.medium.len(),
            low_count: buckets.low.len(),
            date: "2024-01-01".to_string(),
            highest_impact_issues: Vec::new(),
        };
        AuditReport {
            summary,
            issues: buckets,
        }
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(
            escape("<script>\"a\" & 'b'</script>").0,
            "&lt;script&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/script&gt;"
        );
        assert_eq!(escape("plain text").0, "plain text");
    }

    #[test]
    fn test_page_shell() {
        let html = render_html_report(&report_with(Vec::new()));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Technical SEO Audit Report</h1>"));
        assert!(html.contains("Generated on: 2024-01-01"));
        assert!(html.contains("<h3>Critical Issues</h3>"));
        assert!(html.contains("<h3>High Priority</h3>"));
        assert!(html.contains(
            "This report was automatically generated by SEO Audit Automation Tool"
        ));
    }

    #[test]
    fn test_empty_buckets_render_no_sections() {
        let issue = Issue::new(
            IssueKind::BrokenLinks,
            "Broken Links (4xx)",
            "Pages returning client error status codes",
            2,
            vec!["https://example.com/a".to_string()],
            "Fix or redirect broken links to maintain user experience and link equity",
        );
        let html = render_html_report(&report_with(vec![issue]));

        assert!(html.contains("<h2>Critical Issues</h2>"));
        assert!(!html.contains("<h2>High Priority Issues</h2>"));
        assert!(!html.contains("<h2>Medium Priority Issues</h2>"));
        assert!(!html.contains("<h2>Low Priority Issues</h2>"));
    }

    #[test]
    fn test_issue_card_content() {
        let issue = Issue::new(
            IssueKind::BrokenLinks,
            "Broken Links (4xx)",
            "Pages returning client error status codes",
            2,
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ],
            "Fix or redirect broken links to maintain user experience and link equity",
        );
        let html = render_issue(&issue, Severity::Critical);

        assert!(html.contains("<div class=\"issue critical\">"));
        assert!(html.contains("<h3>Broken Links (4xx) (2 instances)</h3>"));
        assert!(html.contains("style=\"width: 100%;\">Impact: 10/10"));
        assert!(html.contains("style=\"width: 50%;\">Effort: 5/10"));
        assert!(html.contains("https://example.com/a<br>https://example.com/b"));
    }

    #[test]
    fn test_crawled_urls_are_escaped() {
        let issue = Issue::new(
            IssueKind::MissingH1,
            "Missing H1 Tags",
            "Pages without H1 headings",
            1,
            vec!["https://example.com/?q=<img>&x=\"1\"".to_string()],
            "Add H1 tags to all pages to improve content hierarchy and relevance signals",
        );
        let html = render_issue(&issue, Severity::High);

        assert!(html.contains("https://example.com/?q=&lt;img&gt;&amp;x=&quot;1&quot;"));
        assert!(!html.contains("<img>"));
    }
}
