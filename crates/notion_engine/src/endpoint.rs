use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::{UpstreamRequest, UpstreamSettings};

/// Which upstream calling convention a request committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    /// `POST /databases/{id}/query`.
    Legacy,
    /// `PATCH /data_sources/{id}/query`, reached through the database.
    DataSource,
}

/// The calling convention chosen for one proxied request.
///
/// Built once by negotiation and shared by every later call of the request;
/// it is never changed after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiatedEndpoint {
    convention: Convention,
    api_base: String,
    query_url: String,
    query_method: Method,
    headers: Vec<(String, String)>,
}

impl NegotiatedEndpoint {
    pub fn legacy(settings: &UpstreamSettings, token: &str, db_id: &str) -> Self {
        Self {
            convention: Convention::Legacy,
            api_base: settings.base().to_string(),
            query_url: format!(
                "{}/databases/{}/query",
                settings.base(),
                urlencoding::encode(db_id)
            ),
            query_method: Method::POST,
            headers: auth_headers(token, &settings.legacy_version),
        }
    }

    pub fn data_source(settings: &UpstreamSettings, token: &str, data_source_id: &str) -> Self {
        Self {
            convention: Convention::DataSource,
            api_base: settings.base().to_string(),
            query_url: format!(
                "{}/data_sources/{}/query",
                settings.base(),
                urlencoding::encode(data_source_id)
            ),
            query_method: Method::PATCH,
            headers: auth_headers(token, &settings.current_version),
        }
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    pub fn query_url(&self) -> &str {
        &self.query_url
    }

    pub fn query_method(&self) -> &Method {
        &self.query_method
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// One page of the collection query.
    pub fn query(&self, body: Value, timeout: Duration) -> UpstreamRequest {
        UpstreamRequest {
            method: self.query_method.clone(),
            url: self.query_url.clone(),
            headers: self.headers.clone(),
            body: Some(body),
            timeout: Some(timeout),
        }
    }

    /// First page of a block's children.
    pub fn block_children(
        &self,
        block_id: &str,
        page_size: u32,
        timeout: Option<Duration>,
    ) -> UpstreamRequest {
        UpstreamRequest {
            method: Method::GET,
            url: format!(
                "{}/blocks/{}/children?page_size={page_size}",
                self.api_base,
                urlencoding::encode(block_id)
            ),
            headers: self.headers.clone(),
            body: None,
            timeout,
        }
    }
}

pub(crate) fn auth_headers(token: &str, version: &str) -> Vec<(String, String)> {
    vec![
        ("Authorization".to_string(), format!("Bearer {token}")),
        ("Notion-Version".to_string(), version.to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
    ]
}
