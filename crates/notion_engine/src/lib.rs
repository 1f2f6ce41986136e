//! Notion engine: upstream IO for the proxy. Negotiates the calling
//! convention, collects every page of a query and runs the optional
//! enrichment passes.
mod endpoint;
mod engine;
mod enrich;
mod fetch;
mod highlights;
mod negotiate;
mod paginate;
mod settings;
mod types;

pub use endpoint::{Convention, NegotiatedEndpoint};
pub use engine::NotionProxy;
pub use enrich::enrich_images;
pub use fetch::{FetchSettings, ReqwestTransport, Transport, UpstreamRequest};
pub use highlights::extract_highlights;
pub use negotiate::negotiate;
pub use paginate::collect_pages;
pub use settings::{UpstreamSettings, CURRENT_NOTION_VERSION, LEGACY_NOTION_VERSION};
pub use types::{CallError, FailureKind, UpstreamResponse};
