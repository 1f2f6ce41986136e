use serde::Deserialize;

use crate::matching::TitleFragment;

pub const DEFAULT_BLOCKS_LIMIT: usize = 12;
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Largest page size the upstream accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Inbound request body as sent by the front end.
///
/// Optional fields accept both absence and `null`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    pub token: String,
    pub db_id: String,
    #[serde(default)]
    pub fetch_blocks: Option<bool>,
    #[serde(default)]
    pub fetch_highlights: Option<bool>,
    #[serde(default)]
    pub highlights_page_name: Option<String>,
    #[serde(default)]
    pub blocks_limit: Option<usize>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl ProxyRequest {
    /// Applies defaults and clamps the page size to what the upstream accepts.
    pub fn into_options(self) -> QueryOptions {
        QueryOptions {
            token: self.token,
            db_id: self.db_id,
            fetch_blocks: self.fetch_blocks.unwrap_or(false),
            fetch_highlights: self.fetch_highlights.unwrap_or(false),
            highlights_fragment: self
                .highlights_page_name
                .as_deref()
                .map(TitleFragment::new)
                .unwrap_or_default(),
            blocks_limit: self.blocks_limit.unwrap_or(DEFAULT_BLOCKS_LIMIT),
            page_size: self
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }
}

/// Fully resolved options for one proxied query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub token: String,
    pub db_id: String,
    pub fetch_blocks: bool,
    pub fetch_highlights: bool,
    pub highlights_fragment: TitleFragment,
    pub blocks_limit: usize,
    pub page_size: u32,
}

impl QueryOptions {
    pub fn new(token: impl Into<String>, db_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            db_id: db_id.into(),
            fetch_blocks: false,
            fetch_highlights: false,
            highlights_fragment: TitleFragment::default(),
            blocks_limit: DEFAULT_BLOCKS_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
