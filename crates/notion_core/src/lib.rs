//! Notion core: pure, IO-free view of the upstream page/block schema and the
//! shaping rules applied to it before it reaches the front end.
mod block;
mod item;
mod label;
mod matching;
mod request;
mod response;
mod select;

pub use block::{
    highlight_entries, image_refs, parse_blocks, Block, HighlightEntry, HostedFile, ImageBlock,
    ImageRef,
};
pub use item::{plain_text, Item, Property, RichText};
pub use label::{derive_label, label_from_url, FALLBACK_LABEL};
pub use matching::{find_by_title, TitleFragment, DEFAULT_HIGHLIGHTS_PAGE_NAME};
pub use request::{
    ProxyRequest, QueryOptions, DEFAULT_BLOCKS_LIMIT, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use response::{EnrichedItem, HighlightsOutcome, PageSet};
pub use select::{needs_enrichment, select_for_enrichment};
