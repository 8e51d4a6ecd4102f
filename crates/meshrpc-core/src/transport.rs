//! The `Transport` trait — the dispatch boundary for one HTTP call.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::BasicAuth;

/// A fully assembled outbound request: verb, absolute URL, headers, optional
/// basic-auth credentials and a JSON-serializable body.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    /// HTTP verb; matched case-insensitively by the transport.
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub basic_auth: Option<BasicAuth>,
    pub body: Value,
}

/// The transport could not produce a response body (connection refused,
/// timeout, DNS failure, invalid verb).
#[derive(Debug, Error)]
#[error("dispatch failed: {0}")]
pub struct DispatchError(pub String);

/// One request in, one status-agnostic raw body out.
///
/// Implementations must be `Send + Sync`; a client shares its transport
/// across concurrent calls as `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn dispatch(&self, req: OutboundRequest) -> Result<String, DispatchError>;
}
