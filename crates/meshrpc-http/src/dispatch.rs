//! HTTP transport backed by `reqwest`.

use async_trait::async_trait;
use std::time::Duration;

use meshrpc_core::transport::{DispatchError, OutboundRequest, Transport};

/// Configuration for [`HttpDispatch`].
#[derive(Debug, Clone)]
pub struct HttpDispatchConfig {
    pub request_timeout: Duration,
}

impl Default for HttpDispatchConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The production [`Transport`]: one shared `reqwest::Client`, one HTTP
/// round-trip per dispatch. The response body is returned regardless of
/// status code; envelope classification is the executor's concern.
pub struct HttpDispatch {
    http: reqwest::Client,
}

impl HttpDispatch {
    pub fn new(config: HttpDispatchConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("failed to build reqwest client");
        Self { http }
    }
}

impl Default for HttpDispatch {
    fn default() -> Self {
        Self::new(HttpDispatchConfig::default())
    }
}

#[async_trait]
impl Transport for HttpDispatch {
    async fn dispatch(&self, req: OutboundRequest) -> Result<String, DispatchError> {
        let method = reqwest::Method::from_bytes(req.method.to_uppercase().as_bytes())
            .map_err(|e| DispatchError(e.to_string()))?;

        let mut builder = self.http.request(method, &req.url);
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(auth) = &req.basic_auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }

        let resp = builder
            .json(&req.body)
            .send()
            .await
            .map_err(|e| DispatchError(e.to_string()))?;

        resp.text().await.map_err(|e| DispatchError(e.to_string()))
    }
}
