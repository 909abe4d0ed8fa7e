//! The fixed sequence of SEO checks applied to loaded exports
//!
//! Every check is a pure function of the export set: it reads one table,
//! filters rows by a condition, and produces at most one issue record. A
//! missing table or column produces nothing; partial export sets are
//! expected and never an error.

use std::collections::HashMap;

use crate::exports::{ExportSet, ExportTab, ExportTable};

use super::catalog::IssueKind;
use super::issue::Issue;

const ADDRESS: &str = "Address";
const STATUS_CODE: &str = "Status Code";
const REDIRECT_CHAIN: &str = "Redirect Chain";
const TITLE: &str = "Title 1";
const META_DESCRIPTION: &str = "Meta Description 1";
const H1_PRIMARY: &str = "H1-1";
const H1_SECONDARY: &str = "H1-2";
const ALT_TEXT: &str = "Alt Text";
const PAGE_LOAD_TIME: &str = "Page Load Time (Seconds)";

/// Longest acceptable page title, in characters
const MAX_TITLE_LENGTH: usize = 60;
/// Longest acceptable meta description, in characters
const MAX_DESCRIPTION_LENGTH: usize = 160;
/// Load time above which a page counts as slow, in seconds
const SLOW_PAGE_THRESHOLD: f64 = 3.0;
/// At most this many example URLs are kept per issue
const MAX_EXAMPLES: usize = 5;

/// Every check in detection order; the analyzer runs them all
pub const CHECKS: [fn(&ExportSet) -> Option<Issue>; 11] = [
    check_broken_links,
    check_server_errors,
    check_redirect_chains,
    check_duplicate_titles,
    check_missing_meta_descriptions,
    check_missing_h1,
    check_slow_pages,
    check_title_too_long,
    check_description_too_long,
    check_missing_alt_text,
    check_multiple_h1,
];

/// Pages returning 4xx client error status codes
pub fn check_broken_links(exports: &ExportSet) -> Option<Issue> {
    let table = exports.get(ExportTab::ResponseCodes)?;
    let rows = matching_rows(table, STATUS_CODE, |cell| {
        parse_number(cell).is_some_and(|code| (400.0..=499.0).contains(&code))
    });
    if rows.is_empty() {
        return None;
    }
    Some(Issue::new(
        IssueKind::BrokenLinks,
        "Broken Links (4xx)",
        "Pages returning client error status codes",
        rows.len(),
        example_addresses(table, &rows),
        "Fix or redirect broken links to maintain user experience and link equity",
    ))
}

/// Pages returning 5xx server error status codes
pub fn check_server_errors(exports: &ExportSet) -> Option<Issue> {
    let table = exports.get(ExportTab::ResponseCodes)?;
    let rows = matching_rows(table, STATUS_CODE, |cell| {
        parse_number(cell).is_some_and(|code| (500.0..=599.0).contains(&code))
    });
    if rows.is_empty() {
        return None;
    }
    Some(Issue::new(
        IssueKind::ServerErrors,
        "Server Errors (5xx)",
        "Pages returning server error status codes",
        rows.len(),
        example_addresses(table, &rows),
        "Investigate server issues and fix the root cause to ensure page availability",
    ))
}

/// URLs that hop through more than one redirect
pub fn check_redirect_chains(exports: &ExportSet) -> Option<Issue> {
    let table = exports.get(ExportTab::RedirectChains)?;
    let rows = matching_rows(table, REDIRECT_CHAIN, |cell| {
        parse_number(cell).is_some_and(|length| length > 1.0)
    });
    if rows.is_empty() {
        return None;
    }
    Some(Issue::new(
        IssueKind::RedirectChains,
        "Redirect Chains",
        "URLs with multiple redirects in sequence",
        rows.len(),
        example_addresses(table, &rows),
        "Reduce redirect chains to a single redirect to improve page speed and reduce crawl budget waste",
    ))
}

/// Title values shared by more than one page.
///
/// The count is the number of distinct duplicated titles, not the number of
/// affected pages. Examples sample up to 2 URLs for each of the 5 most
/// frequent duplicated titles and are then truncated to 5 overall, so later
/// duplicated titles can go unrepresented.
pub fn check_duplicate_titles(exports: &ExportSet) -> Option<Issue> {
    let table = exports.get(ExportTab::PageTitles)?;
    let titles = table.column_values(TITLE)?;

    // Occurrence count and first-seen row per title; empty titles dropped
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (row, title) in titles.enumerate() {
        if title.is_empty() {
            continue;
        }
        counts.entry(title).or_insert((0, row)).0 += 1;
    }

    let mut duplicated: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .filter(|(_, (count, _))| *count > 1)
        .map(|(title, (count, first_row))| (title, count, first_row))
        .collect();
    if duplicated.is_empty() {
        return None;
    }
    // Most frequent first; ties resolved by first appearance
    duplicated.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let mut examples = Vec::new();
    for &(title, _, _) in duplicated.iter().take(MAX_EXAMPLES) {
        let mut sampled = 0;
        for row in 0..table.row_count() {
            if table.cell(row, TITLE) == Some(title) {
                examples.push(address_of(table, row));
                sampled += 1;
                if sampled == 2 {
                    break;
                }
            }
        }
    }
    examples.truncate(MAX_EXAMPLES);

    Some(Issue::new(
        IssueKind::DuplicateTitles,
        "Duplicate Page Titles",
        "Multiple pages using the same title",
        duplicated.len(),
        examples,
        "Create unique page titles to improve SEO and user experience",
    ))
}

/// Pages whose meta description is absent
pub fn check_missing_meta_descriptions(exports: &ExportSet) -> Option<Issue> {
    let table = exports.get(ExportTab::MetaDescription)?;
    let rows = matching_rows(table, META_DESCRIPTION, str::is_empty);
    if rows.is_empty() {
        return None;
    }
    Some(Issue::new(
        IssueKind::MissingMetaDescriptions,
        "Missing Meta Descriptions",
        "Pages without meta descriptions",
        rows.len(),
        example_addresses(table, &rows),
        "Add compelling meta descriptions to improve click-through rates from search results",
    ))
}

/// Pages without a primary H1 heading
pub fn check_missing_h1(exports: &ExportSet) -> Option<Issue> {
    let table = exports.get(ExportTab::H1)?;
    let rows = matching_rows(table, H1_PRIMARY, str::is_empty);
    if rows.is_empty() {
        return None;
    }
    Some(Issue::new(
        IssueKind::MissingH1,
        "Missing H1 Tags",
        "Pages without H1 headings",
        rows.len(),
        example_addresses(table, &rows),
        "Add H1 tags to all pages to improve content hierarchy and relevance signals",
    ))
}

/// Pages slower than the load-time threshold
pub fn check_slow_pages(exports: &ExportSet) -> Option<Issue> {
    let table = exports.get(ExportTab::PageSpeed)?;
    let rows = matching_rows(table, PAGE_LOAD_TIME, |cell| {
        parse_number(cell).is_some_and(|seconds| seconds > SLOW_PAGE_THRESHOLD)
    });
    if rows.is_empty() {
        return None;
    }
    Some(Issue::new(
        IssueKind::SlowPages,
        "Slow-Loading Pages",
        format!(
            "Pages with load time greater than {:.1} seconds",
            SLOW_PAGE_THRESHOLD
        ),
        rows.len(),
        example_addresses(table, &rows),
        "Optimize page speed by reducing file sizes, implementing caching, and minimizing render-blocking resources",
    ))
}

/// Titles long enough to be truncated in search results
pub fn check_title_too_long(exports: &ExportSet) -> Option<Issue> {
    let table = exports.get(ExportTab::PageTitles)?;
    let rows = matching_rows(table, TITLE, |cell| {
        !cell.is_empty() && cell.chars().count() > MAX_TITLE_LENGTH
    });
    if rows.is_empty() {
        return None;
    }
    Some(Issue::new(
        IssueKind::TitleTooLong,
        "Page Titles Too Long",
        format!("Page titles longer than {} characters", MAX_TITLE_LENGTH),
        rows.len(),
        example_addresses(table, &rows),
        format!(
            "Shorten page titles to under {} characters to avoid truncation in search results",
            MAX_TITLE_LENGTH
        ),
    ))
}

/// Meta descriptions long enough to be truncated in search results
pub fn check_description_too_long(exports: &ExportSet) -> Option<Issue> {
    let table = exports.get(ExportTab::MetaDescription)?;
    let rows = matching_rows(table, META_DESCRIPTION, |cell| {
        !cell.is_empty() && cell.chars().count() > MAX_DESCRIPTION_LENGTH
    });
    if rows.is_empty() {
        return None;
    }
    Some(Issue::new(
        IssueKind::DescriptionTooLong,
        "Meta Descriptions Too Long",
        format!(
            "Meta descriptions longer than {} characters",
            MAX_DESCRIPTION_LENGTH
        ),
        rows.len(),
        example_addresses(table, &rows),
        format!(
            "Shorten meta descriptions to under {} characters to avoid truncation in search results",
            MAX_DESCRIPTION_LENGTH
        ),
    ))
}

/// Images without alternative text
pub fn check_missing_alt_text(exports: &ExportSet) -> Option<Issue> {
    let table = exports.get(ExportTab::Images)?;
    let rows = matching_rows(table, ALT_TEXT, str::is_empty);
    if rows.is_empty() {
        return None;
    }
    Some(Issue::new(
        IssueKind::MissingAltText,
        "Images Missing Alt Text",
        "Images without alternative text",
        rows.len(),
        example_addresses(table, &rows),
        "Add descriptive alt text to all images to improve accessibility and image search visibility",
    ))
}

/// Pages carrying a second H1 heading
pub fn check_multiple_h1(exports: &ExportSet) -> Option<Issue> {
    let table = exports.get(ExportTab::H1)?;
    // The secondary column only exists when the spider saw multiple H1s
    if !table.has_column(H1_SECONDARY) {
        return None;
    }
    let rows = matching_rows(table, H1_SECONDARY, |cell| !cell.is_empty());
    if rows.is_empty() {
        return None;
    }
    Some(Issue::new(
        IssueKind::MultipleH1,
        "Multiple H1 Tags",
        "Pages with more than one H1 heading",
        rows.len(),
        example_addresses(table, &rows),
        "Use a single H1 tag per page to maintain clear content hierarchy",
    ))
}

/// Row indices where `column` satisfies the predicate; empty when the
/// column does not exist
fn matching_rows<F>(table: &ExportTable, column: &str, predicate: F) -> Vec<usize>
where
    F: Fn(&str) -> bool,
{
    (0..table.row_count())
        .filter(|&row| table.cell(row, column).is_some_and(&predicate))
        .collect()
}

/// The first few matching addresses, in file order
fn example_addresses(table: &ExportTable, rows: &[usize]) -> Vec<String> {
    rows.iter()
        .take(MAX_EXAMPLES)
        .map(|&row| address_of(table, row))
        .collect()
}

fn address_of(table: &ExportTable, row: usize) -> String {
    table.cell(row, ADDRESS).unwrap_or("").to_string()
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse().ok()
}
