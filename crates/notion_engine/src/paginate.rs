use notion_core::Item;
use proxy_logging::{proxy_debug, proxy_warn};
use serde_json::{json, Map, Value};

use crate::{CallError, FailureKind, NegotiatedEndpoint, Transport, UpstreamSettings};

/// One page of a query response, read defensively.
struct QueryPage {
    results: Vec<Value>,
    has_more: bool,
    next_cursor: Option<String>,
}

impl QueryPage {
    fn from_body(body: Value) -> Self {
        let mut fields = match body {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        let results = match fields.remove("results") {
            Some(Value::Array(results)) => results,
            _ => Vec::new(),
        };
        Self {
            results,
            has_more: fields
                .get("has_more")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            next_cursor: fields
                .get("next_cursor")
                .and_then(Value::as_str)
                .filter(|cursor| !cursor.is_empty())
                .map(ToOwned::to_owned),
        }
    }
}

/// Runs the collection query to exhaustion and returns every item in order.
///
/// Pages are fetched strictly one after another. A failed page fails the whole
/// collection; nothing collected so far is returned.
pub async fn collect_pages(
    transport: &dyn Transport,
    endpoint: &NegotiatedEndpoint,
    page_size: u32,
    settings: &UpstreamSettings,
) -> Result<Vec<Item>, CallError> {
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    for page_number in 1..=settings.max_pages {
        let mut body = json!({ "page_size": page_size });
        if let Some(cursor) = &cursor {
            body["start_cursor"] = json!(cursor);
        }

        let response = transport
            .call(endpoint.query(body, settings.page_timeout))
            .await?;
        let page = QueryPage::from_body(response.body);
        proxy_debug!(
            "page {page_number}: {} items, has_more={}",
            page.results.len(),
            page.has_more
        );
        items.extend(page.results.into_iter().map(Item::new));

        match (page.has_more, page.next_cursor) {
            (false, _) => return Ok(items),
            (true, None) => {
                proxy_warn!("page {page_number} reports more results but no cursor; stopping");
                return Ok(items);
            }
            (true, Some(next)) => {
                if cursor.as_deref() == Some(next.as_str()) {
                    return Err(CallError::new(
                        FailureKind::MalformedResponse,
                        format!("pagination cursor repeated on page {page_number}"),
                    ));
                }
                cursor = Some(next);
            }
        }
    }

    Err(CallError::new(
        FailureKind::MalformedResponse,
        format!(
            "pagination did not terminate after {} pages",
            settings.max_pages
        ),
    ))
}
