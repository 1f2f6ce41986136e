use std::time::Duration;

/// `Notion-Version` for the database-query convention.
pub const LEGACY_NOTION_VERSION: &str = "2022-06-28";
/// `Notion-Version` for the data-source convention.
pub const CURRENT_NOTION_VERSION: &str = "2025-09-03";

/// Upstream addressing and per-call budgets for one proxy instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSettings {
    pub api_base_url: String,
    pub legacy_version: String,
    pub current_version: String,
    pub probe_timeout: Duration,
    pub page_timeout: Duration,
    pub block_timeout: Duration,
    pub enrichment_page_size: u32,
    pub highlights_page_size: u32,
    /// Upper bound on query calls per collection.
    pub max_pages: usize,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.notion.com/v1".to_string(),
            legacy_version: LEGACY_NOTION_VERSION.to_string(),
            current_version: CURRENT_NOTION_VERSION.to_string(),
            probe_timeout: Duration::from_secs(4),
            page_timeout: Duration::from_secs(8),
            block_timeout: Duration::from_secs(3),
            enrichment_page_size: 20,
            highlights_page_size: 100,
            max_pages: 1000,
        }
    }
}

impl UpstreamSettings {
    pub(crate) fn base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
