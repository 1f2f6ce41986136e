//! HTTP surface: one endpoint, `POST` runs a proxied query.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use notion_core::{PageSet, ProxyRequest};
use notion_engine::{CallError, NotionProxy};
use proxy_logging::{proxy_error, proxy_warn};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
struct AppState {
    proxy: NotionProxy,
}

/// Build the router serving `route`.
///
/// Every response carries `Access-Control-Allow-Origin: *`; `OPTIONS` is
/// answered by the CORS layer with an empty 200.
pub fn build_router(proxy: NotionProxy, route: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(route, post(handle_query))
        .layer(cors)
        .with_state(AppState { proxy })
}

/// Anything that turns a request into a 500.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error(transparent)]
    Upstream(#[from] CallError),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match &self {
            ProxyError::InvalidBody(message) => proxy_warn!("rejected request: {message}"),
            ProxyError::Upstream(err) => proxy_error!("query failed ({}): {err}", err.kind),
        }
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": self.to_string() })),
        )
            .into_response()
    }
}

async fn handle_query(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PageSet>, ProxyError> {
    let request: ProxyRequest =
        serde_json::from_slice(&body).map_err(|err| ProxyError::InvalidBody(err.to_string()))?;
    let options = request.into_options();
    let set = state.proxy.query(&options).await?;
    Ok(Json(set))
}
