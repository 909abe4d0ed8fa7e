//! Excel workbook generation
//!
//! Produces a workbook with a Summary sheet and one sheet per non-empty
//! severity bucket, one row per (issue, example URL) pair.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};
use tracing::info;

use crate::audit::{AuditReport, Issue, Severity};

use super::ReportResult;

const SUMMARY_HEADERS: [&str; 2] = ["Metric", "Value"];
const ISSUE_HEADERS: [&str; 6] = [
    "Issue Type",
    "URL",
    "Impact (1-10)",
    "Effort (1-10)",
    "Priority Score",
    "Recommendation",
];

/// Writes the Excel report for the audit
///
/// # Arguments
///
/// * `report` - The finished audit report
/// * `domain` - Audited domain, baked into the filename
/// * `output_dir` - Directory for the file; created if missing
/// * `timestamp` - Run timestamp baked into the filename
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written workbook
/// * `Err(ReportError)` - Failed to build or save
pub fn write_spreadsheet(
    report: &AuditReport,
    domain: &str,
    output_dir: &Path,
    timestamp: &str,
) -> ReportResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("seo_audit_{domain}_{timestamp}.xlsx"));

    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4F81BD))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    write_summary_sheet(&mut workbook, &header_format, report, domain)?;

    for severity in Severity::ALL {
        let rows = bucket_rows(report.issues.bucket(severity));
        if rows.is_empty() {
            continue;
        }
        write_issue_sheet(&mut workbook, &header_format, severity, &rows)?;
    }

    workbook.save(&path)?;

    info!("Excel report generated: {}", path.display());
    Ok(path)
}

fn write_summary_sheet(
    workbook: &mut Workbook,
    header_format: &Format,
    report: &AuditReport,
    domain: &str,
) -> ReportResult<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary")?;

    for (col, header) in SUMMARY_HEADERS.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *header, header_format)?;
    }

    let summary = &report.summary;
    sheet.write(1, 0, "Domain")?;
    sheet.write(1, 1, domain)?;
    sheet.write(2, 0, "Audit Date")?;
    sheet.write(2, 1, summary.date.as_str())?;

    let counts = [
        ("Total Issues", summary.total_issues),
        ("Critical Issues", summary.critical_count),
        ("High Priority Issues", summary.high_count),
        ("Medium Priority Issues", summary.medium_count),
        ("Low Priority Issues", summary.low_count),
    ];
    for (offset, (metric, value)) in counts.iter().enumerate() {
        let row = 3 + offset as u32;
        sheet.write(row, 0, *metric)?;
        sheet.write(row, 1, *value as u32)?;
    }

    Ok(())
}

fn write_issue_sheet(
    workbook: &mut Workbook,
    header_format: &Format,
    severity: Severity,
    rows: &[(&Issue, &str)],
) -> ReportResult<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(severity.sheet_name())?;

    for (col, header) in ISSUE_HEADERS.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *header, header_format)?;
    }

    for (offset, (issue, example)) in rows.iter().enumerate() {
        let row = offset as u32 + 1;
        sheet.write(row, 0, issue.title.as_str())?;
        sheet.write(row, 1, *example)?;
        sheet.write(row, 2, u32::from(issue.impact))?;
        sheet.write(row, 3, u32::from(issue.effort))?;
        sheet.write(row, 4, issue.priority_score)?;
        sheet.write(row, 5, issue.recommendation.as_str())?;
    }

    Ok(())
}

/// Flattens a bucket into one row per example URL
fn bucket_rows(issues: &[Issue]) -> Vec<(&Issue, &str)> {
    issues
        .iter()
        .flat_map(|issue| {
            issue
                .examples
                .iter()
                .map(move |example| (issue, example.as_str()))
        })
        .collect()
}
