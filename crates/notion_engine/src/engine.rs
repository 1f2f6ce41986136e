use std::sync::Arc;

use futures_util::future::join;
use notion_core::{EnrichedItem, HighlightsOutcome, ImageRef, Item, PageSet, QueryOptions};
use proxy_logging::{proxy_info, redact_token};

use crate::{
    collect_pages, enrich_images, extract_highlights, negotiate, CallError, FetchSettings,
    ReqwestTransport, Transport, UpstreamSettings,
};

/// Runs proxied queries against the upstream.
///
/// Cheap to clone; one instance serves every request of a process.
#[derive(Clone)]
pub struct NotionProxy {
    transport: Arc<dyn Transport>,
    settings: UpstreamSettings,
}

impl NotionProxy {
    pub fn new(transport: Arc<dyn Transport>, settings: UpstreamSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn with_reqwest(fetch: FetchSettings, settings: UpstreamSettings) -> Result<Self, CallError> {
        let transport = ReqwestTransport::new(fetch)?;
        Ok(Self::new(Arc::new(transport), settings))
    }

    pub fn settings(&self) -> &UpstreamSettings {
        &self.settings
    }

    /// Negotiates, collects every page, then runs the requested enrichment
    /// passes concurrently. Only a collection failure is returned as an error.
    pub async fn query(&self, options: &QueryOptions) -> Result<PageSet, CallError> {
        let transport = self.transport.as_ref();
        let settings = &self.settings;
        proxy_info!(
            "query db={} token={} blocks={} highlights={}",
            options.db_id,
            redact_token(&options.token),
            options.fetch_blocks,
            options.fetch_highlights
        );

        let endpoint = negotiate(transport, settings, &options.token, &options.db_id).await;
        let items = collect_pages(transport, &endpoint, options.page_size, settings).await?;
        proxy_info!(
            "db={} collected {} items via {:?}",
            options.db_id,
            items.len(),
            endpoint.convention()
        );

        let enrichment = async {
            if options.fetch_blocks {
                Some(enrich_images(transport, &endpoint, &items, options.blocks_limit, settings).await)
            } else {
                None
            }
        };
        let highlights = async {
            if options.fetch_highlights {
                extract_highlights(
                    transport,
                    &endpoint,
                    &items,
                    &options.highlights_fragment,
                    settings,
                )
                .await
            } else {
                HighlightsOutcome::NotRequested
            }
        };
        let (enrichment, highlights) = join(enrichment, highlights).await;

        Ok(PageSet {
            results: assemble(items, enrichment),
            highlights,
        })
    }
}

fn assemble(items: Vec<Item>, enrichment: Option<Vec<Option<Vec<ImageRef>>>>) -> Vec<EnrichedItem> {
    match enrichment {
        None => items.into_iter().map(EnrichedItem::plain).collect(),
        Some(enrichment) => items
            .into_iter()
            .zip(enrichment)
            .map(|(item, image_blocks)| EnrichedItem { item, image_blocks })
            .collect(),
    }
}
