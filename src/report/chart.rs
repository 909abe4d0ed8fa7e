//! Chart generation
//!
//! Draws a two-panel PNG: issue counts per severity on top, impact versus
//! effort for the highest-impact issues below.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use crate::audit::{AuditReport, AuditSummary, Issue};

use super::{ReportError, ReportResult};

const CRITICAL_COLOR: RGBColor = RGBColor(0xd9, 0x53, 0x4f);
const HIGH_COLOR: RGBColor = RGBColor(0xf0, 0xad, 0x4e);
const MEDIUM_COLOR: RGBColor = RGBColor(0x5b, 0xc0, 0xde);
const LOW_COLOR: RGBColor = RGBColor(0x5c, 0xb8, 0x5c);
const IMPACT_COLOR: RGBColor = RGBColor(0x33, 0x7a, 0xb7);
const EFFORT_COLOR: RGBColor = RGBColor(0x5c, 0xb8, 0x5c);

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 1000;

/// Renders the charts PNG for the report
///
/// # Arguments
///
/// * `report` - The finished audit report
/// * `output_dir` - Directory for the file; created if missing
/// * `timestamp` - Run timestamp baked into the filename
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written image
/// * `Err(ReportError)` - Failed to draw or write
pub fn render_charts(
    report: &AuditReport,
    output_dir: &Path,
    timestamp: &str,
) -> ReportResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("seo_audit_charts_{timestamp}.png"));

    draw_charts(report, &path).map_err(|e| ReportError::Chart(e.to_string()))?;

    info!("Charts generated: {}", path.display());
    Ok(path)
}

fn draw_charts(report: &AuditReport, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let (top, bottom) = root.split_vertically(HEIGHT / 2);

    draw_severity_counts(&top, &report.summary)?;
    if !report.summary.highest_impact_issues.is_empty() {
        draw_top_issues(&bottom, &report.summary.highest_impact_issues)?;
    }

    root.present()?;
    Ok(())
}

/// Bar labels, counts, and fill colors for the severity panel
fn severity_counts(summary: &AuditSummary) -> [(&'static str, usize, RGBColor); 4] {
    [
        ("Critical", summary.critical_count, CRITICAL_COLOR),
        ("High", summary.high_count, HIGH_COLOR),
        ("Medium", summary.medium_count, MEDIUM_COLOR),
        ("Low", summary.low_count, LOW_COLOR),
    ]
}

fn draw_severity_counts(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    summary: &AuditSummary,
) -> Result<(), Box<dyn std::error::Error>> {
    let bars = severity_counts(summary);
    let tallest = bars.iter().map(|(_, count, _)| *count).max().unwrap_or(0);
    let y_max = tallest.max(1) as u32 + 1;

    let mut chart = ChartBuilder::on(area)
        .caption("SEO Issues by Priority Category", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0..3usize).into_segmented(), 0u32..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .y_desc("Number of Issues")
        .axis_desc_style(("sans-serif", 16))
        .x_labels(4)
        .x_label_formatter(&|position| match position {
            SegmentValue::Exact(index) | SegmentValue::CenterOf(index) => bars
                .get(*index)
                .map(|(label, _, _)| label.to_string())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    for (index, (_, count, color)) in bars.iter().enumerate() {
        chart.draw_series(
            Histogram::vertical(&chart)
                .style(color.filled())
                .margin(40)
                .data(std::iter::once((index, *count as u32))),
        )?;
    }

    // Count labels above the bars
    let label_style =
        TextStyle::from(("sans-serif", 18).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(bars.iter().enumerate().map(|(index, (_, count, _))| {
        Text::new(
            count.to_string(),
            (SegmentValue::CenterOf(index), *count as u32),
            label_style.clone(),
        )
    }))?;

    Ok(())
}

fn draw_top_issues(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    issues: &[Issue],
) -> Result<(), Box<dyn std::error::Error>> {
    let count = issues.len();

    let mut chart = ChartBuilder::on(area)
        .caption("Top Issues by Impact", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..count as f64, 0u32..11u32)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .y_desc("Score")
        .axis_desc_style(("sans-serif", 16))
        .x_labels(0)
        .x_label_formatter(&|_| String::new())
        .draw()?;

    // Paired bars of width 0.35 occupy the middle of each unit slot
    chart
        .draw_series(issues.iter().enumerate().map(|(i, issue)| {
            let x = i as f64;
            Rectangle::new(
                [(x + 0.15, 0), (x + 0.5, u32::from(issue.impact))],
                IMPACT_COLOR.filled(),
            )
        }))?
        .label("Impact (1-10)")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], IMPACT_COLOR.filled()));
    chart
        .draw_series(issues.iter().enumerate().map(|(i, issue)| {
            let x = i as f64;
            Rectangle::new(
                [(x + 0.5, 0), (x + 0.85, u32::from(issue.effort))],
                EFFORT_COLOR.filled(),
            )
        }))?
        .label("Effort (1-10)")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], EFFORT_COLOR.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    // Issue titles under each slot; the numeric axis labels are suppressed
    let title_style =
        TextStyle::from(("sans-serif", 12).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    for (i, issue) in issues.iter().enumerate() {
        chart.plotting_area().draw(&Text::new(
            issue.title.clone(),
            (i as f64 + 0.5, 0u32),
            title_style.clone(),
        ))?;
    }

    Ok(())
}
