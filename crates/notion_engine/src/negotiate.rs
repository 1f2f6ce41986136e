use proxy_logging::{proxy_debug, proxy_info};
use reqwest::Method;
use serde_json::Value;

use crate::endpoint::auth_headers;
use crate::{CallError, NegotiatedEndpoint, Transport, UpstreamRequest, UpstreamSettings};

/// Picks the calling convention for one request.
///
/// The data-source convention is probed first; any probe failure, or a
/// database that lists no data sources, falls back to the legacy database
/// query. Negotiation itself never fails.
pub async fn negotiate(
    transport: &dyn Transport,
    settings: &UpstreamSettings,
    token: &str,
    db_id: &str,
) -> NegotiatedEndpoint {
    match probe_data_source(transport, settings, token, db_id).await {
        Ok(Some(data_source_id)) => {
            proxy_info!("db {db_id}: using data source {data_source_id}");
            NegotiatedEndpoint::data_source(settings, token, &data_source_id)
        }
        Ok(None) => {
            proxy_debug!("db {db_id}: no data sources listed, using legacy query");
            NegotiatedEndpoint::legacy(settings, token, db_id)
        }
        Err(err) => {
            proxy_debug!("db {db_id}: data source probe failed ({}: {err}), using legacy query", err.kind);
            NegotiatedEndpoint::legacy(settings, token, db_id)
        }
    }
}

async fn probe_data_source(
    transport: &dyn Transport,
    settings: &UpstreamSettings,
    token: &str,
    db_id: &str,
) -> Result<Option<String>, CallError> {
    let request = UpstreamRequest {
        method: Method::GET,
        url: format!("{}/databases/{}", settings.base(), urlencoding::encode(db_id)),
        headers: auth_headers(token, &settings.current_version),
        body: None,
        timeout: Some(settings.probe_timeout),
    };
    let response = transport.call(request).await?;
    Ok(first_data_source_id(&response.body))
}

fn first_data_source_id(database: &Value) -> Option<String> {
    database
        .get("data_sources")?
        .as_array()?
        .first()?
        .get("id")?
        .as_str()
        .filter(|id| !id.is_empty())
        .map(ToOwned::to_owned)
}
