//! JSON report generation

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::audit::AuditReport;

use super::ReportResult;

/// Writes the audit report as pretty-printed JSON
///
/// # Arguments
///
/// * `report` - The finished audit report
/// * `output_dir` - Directory for the file; created if missing
/// * `timestamp` - Run timestamp baked into the filename
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written report
/// * `Err(ReportError)` - Failed to serialize or write
pub fn write_json_report(
    report: &AuditReport,
    output_dir: &Path,
    timestamp: &str,
) -> ReportResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("seo_audit_report_{timestamp}.json"));

    // Four-space indent
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    report.serialize(&mut serializer)?;

    let mut file = File::create(&path)?;
    file.write_all(&buffer)?;

    info!("Report generated: {}", path.display());
    Ok(path)
}
