//! Names of the spider export tabs consumed by the audit

use std::fmt;

/// One export tab of the SEO spider.
///
/// Each tab corresponds to one CSV file in a crawl's export directory. The
/// spider's own tab names (`Internal:All`, `Response Codes`, ...) are what the
/// control API and the command line expect; the file stems are what the
/// exported files are named after on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExportTab {
    InternalAll,
    InternalHtml,
    ResponseCodes,
    PageTitles,
    MetaDescription,
    H1,
    Images,
    RedirectChains,
    AllInlinks,
    PageSpeed,
}

impl ExportTab {
    /// Every tab the audit knows about, in discovery order
    pub const ALL: [ExportTab; 10] = [
        ExportTab::InternalAll,
        ExportTab::InternalHtml,
        ExportTab::ResponseCodes,
        ExportTab::PageTitles,
        ExportTab::MetaDescription,
        ExportTab::H1,
        ExportTab::Images,
        ExportTab::RedirectChains,
        ExportTab::AllInlinks,
        ExportTab::PageSpeed,
    ];

    /// The tab name used by the spider's export flags and control API
    pub fn api_name(self) -> &'static str {
        match self {
            ExportTab::InternalAll => "Internal:All",
            ExportTab::InternalHtml => "Internal:HTML",
            ExportTab::ResponseCodes => "Response Codes",
            ExportTab::PageTitles => "Page Titles",
            ExportTab::MetaDescription => "Meta Description",
            ExportTab::H1 => "H1",
            ExportTab::Images => "Images",
            ExportTab::RedirectChains => "Redirect Chains",
            ExportTab::AllInlinks => "All Inlinks",
            ExportTab::PageSpeed => "Page Speed",
        }
    }

    /// The file stem the spider writes this tab under
    pub fn file_stem(self) -> &'static str {
        match self {
            ExportTab::InternalAll => "internal_all",
            ExportTab::InternalHtml => "internal_html",
            ExportTab::ResponseCodes => "response_codes",
            ExportTab::PageTitles => "page_titles",
            ExportTab::MetaDescription => "meta_description",
            ExportTab::H1 => "h1",
            ExportTab::Images => "images",
            ExportTab::RedirectChains => "redirect_chains",
            ExportTab::AllInlinks => "all_inlinks",
            ExportTab::PageSpeed => "page_speed",
        }
    }

    /// The expected CSV file name for this tab
    pub fn file_name(self) -> String {
        format!("{}.csv", self.file_stem())
    }

    /// Looks up a tab by its spider-facing name
    pub fn from_api_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tab| tab.api_name() == name)
    }

    /// Whether an exported file name belongs to this tab.
    ///
    /// Matching is a case-insensitive substring test, so prefixed exports
    /// like `example_com_page_titles.csv` still resolve.
    pub fn matches_file(self, file_name: &str) -> bool {
        file_name.to_lowercase().contains(&self.file_name())
    }
}

impl fmt::Display for ExportTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_name())
    }
}
