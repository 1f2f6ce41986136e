use notion_core::{
    find_by_title, highlight_entries, parse_blocks, HighlightEntry, HighlightsOutcome, Item,
    TitleFragment,
};
use proxy_logging::{proxy_info, proxy_warn};

use crate::{CallError, FailureKind, NegotiatedEndpoint, Transport, UpstreamSettings};

/// Finds the highlights page among `items` and extracts its labeled images.
///
/// No matching title gives [`HighlightsOutcome::NotFound`]; a match whose
/// content cannot be fetched gives an empty [`HighlightsOutcome::Found`].
pub async fn extract_highlights(
    transport: &dyn Transport,
    endpoint: &NegotiatedEndpoint,
    items: &[Item],
    fragment: &TitleFragment,
    settings: &UpstreamSettings,
) -> HighlightsOutcome {
    let Some(page) = find_by_title(items, fragment) else {
        proxy_info!("no highlights page matching '{}'", fragment.as_str());
        return HighlightsOutcome::NotFound;
    };

    match fetch_entries(transport, endpoint, page, settings).await {
        Ok(entries) => {
            proxy_info!(
                "highlights page '{}' has {} images",
                page.title(),
                entries.len()
            );
            HighlightsOutcome::Found(entries)
        }
        Err(err) => {
            proxy_warn!("highlights fetch failed ({}): {err}", err.kind);
            HighlightsOutcome::Found(Vec::new())
        }
    }
}

async fn fetch_entries(
    transport: &dyn Transport,
    endpoint: &NegotiatedEndpoint,
    page: &Item,
    settings: &UpstreamSettings,
) -> Result<Vec<HighlightEntry>, CallError> {
    let id = page.id().ok_or_else(|| {
        CallError::new(FailureKind::MalformedResponse, "highlights page has no id")
    })?;
    let request = endpoint.block_children(id, settings.highlights_page_size, None);
    let response = transport.call(request).await?;
    Ok(highlight_entries(&parse_blocks(&response.body)))
}
