use futures_util::future::join_all;
use notion_core::{image_refs, parse_blocks, select_for_enrichment, ImageRef, Item};
use proxy_logging::{proxy_debug, proxy_warn};

use crate::{CallError, FailureKind, NegotiatedEndpoint, Transport, UpstreamSettings};

/// Looks up embedded images for up to `limit` items that have none yet.
///
/// The returned vector is parallel to `items`: `None` for items that were not
/// selected, `Some(images)` for items that were. A failed lookup yields
/// `Some(vec![])` for that item only.
pub async fn enrich_images(
    transport: &dyn Transport,
    endpoint: &NegotiatedEndpoint,
    items: &[Item],
    limit: usize,
    settings: &UpstreamSettings,
) -> Vec<Option<Vec<ImageRef>>> {
    let selected = select_for_enrichment(items, limit);
    proxy_debug!(
        "enriching {} of {} items (limit {limit})",
        selected.len(),
        items.len()
    );

    let lookups = selected.into_iter().map(|idx| async move {
        let outcome = lookup_images(transport, endpoint, &items[idx], settings).await;
        (idx, outcome)
    });

    join_all(lookups)
        .await
        .into_iter()
        .fold(vec![None; items.len()], |mut enrichment, (idx, outcome)| {
            let images = outcome.unwrap_or_else(|err| {
                proxy_warn!(
                    "image lookup for {} failed ({}): {err}",
                    items[idx].id().unwrap_or("<no id>"),
                    err.kind
                );
                Vec::new()
            });
            enrichment[idx] = Some(images);
            enrichment
        })
}

async fn lookup_images(
    transport: &dyn Transport,
    endpoint: &NegotiatedEndpoint,
    item: &Item,
    settings: &UpstreamSettings,
) -> Result<Vec<ImageRef>, CallError> {
    let id = item
        .id()
        .ok_or_else(|| CallError::new(FailureKind::MalformedResponse, "item has no id"))?;
    let request =
        endpoint.block_children(id, settings.enrichment_page_size, Some(settings.block_timeout));
    let response = transport.call(request).await?;
    Ok(image_refs(&parse_blocks(&response.body)))
}
