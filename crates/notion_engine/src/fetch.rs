use std::time::Duration;

use proxy_logging::{proxy_debug, proxy_trace};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::{CallError, FailureKind, UpstreamResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Budget for calls that do not carry their own timeout.
    pub request_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// One outbound call, fully described.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Hard limit for the whole exchange; `None` means the transport default.
    pub timeout: Option<Duration>,
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, request: UpstreamRequest) -> Result<UpstreamResponse, CallError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestTransport {
    pub fn new(settings: FetchSettings) -> Result<Self, CallError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| CallError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn call(&self, request: UpstreamRequest) -> Result<UpstreamResponse, CallError> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|err| CallError::new(FailureKind::InvalidRequest, err.to_string()))?;
        let limit = request.timeout.unwrap_or(self.settings.request_timeout);

        let mut builder = self.client.request(request.method.clone(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let exchange = async {
            let response = builder.send().await.map_err(map_reqwest_error)?;
            let status = response.status();
            let bytes = response.bytes().await.map_err(map_reqwest_error)?;
            Ok::<_, CallError>((status, bytes))
        };

        // Dropping the exchange on expiry cancels the in-flight request.
        let (status, bytes) = match tokio::time::timeout(limit, exchange).await {
            Ok(outcome) => outcome?,
            Err(_) => {
                proxy_debug!("{} {} timed out after {:?}", request.method, request.url, limit);
                return Err(CallError::new(
                    FailureKind::Timeout,
                    format!("upstream did not respond within {} ms", limit.as_millis()),
                ));
            }
        };

        proxy_trace!(
            "{} {} -> {} ({} bytes)",
            request.method,
            request.url,
            status,
            bytes.len()
        );
        interpret(status, &bytes)
    }
}

/// Maps a completed exchange to a response or an upstream error.
fn interpret(status: StatusCode, bytes: &[u8]) -> Result<UpstreamResponse, CallError> {
    let body = serde_json::from_slice::<Value>(bytes).ok();

    if !status.is_success() {
        let message = body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        return Err(CallError::new(
            FailureKind::HttpStatus(status.as_u16()),
            message,
        ));
    }

    let body = body.ok_or_else(|| {
        CallError::new(
            FailureKind::MalformedResponse,
            format!("HTTP {} response body is not JSON", status.as_u16()),
        )
    })?;
    Ok(UpstreamResponse {
        status: status.as_u16(),
        body,
    })
}

fn map_reqwest_error(err: reqwest::Error) -> CallError {
    if err.is_timeout() {
        return CallError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return CallError::new(FailureKind::InvalidRequest, err.to_string());
    }
    CallError::new(FailureKind::Network, err.to_string())
}
