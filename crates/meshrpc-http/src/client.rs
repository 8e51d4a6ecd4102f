//! The request executor: one typed RPC call from options to outcome.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use meshrpc_core::envelope;
use meshrpc_core::error::{split_chain, RpcError};
use meshrpc_core::trace::{self, CallContext};
use meshrpc_core::transport::{OutboundRequest, Transport};
use meshrpc_core::{ClientConfig, ClientIdentity};

use crate::dispatch::{HttpDispatch, HttpDispatchConfig};

/// Mapping key under which the client id is injected into signed payloads.
pub const APP_ID_KEY: &str = "appId";

/// Per-call options.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub context: Option<CallContext>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a call context for tracing propagation.
    pub fn with_context(mut self, context: CallContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// An RPC client bound to one peer service.
///
/// Holds only immutable configuration after construction; concurrent calls
/// on one client share nothing mutable.
pub struct Client {
    identity: ClientIdentity,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Build a client over the default HTTP transport.
    ///
    /// # Panics
    /// Panics when the config's `name` or `label` is empty (see
    /// [`ClientConfig::resolve`]).
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpDispatch::new(HttpDispatchConfig::default())))
    }

    /// Build a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            identity: config.resolve(),
            transport,
        }
    }

    /// The local service name appended to every error chain.
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// The human-readable label carried in local error messages.
    pub fn label(&self) -> &str {
        &self.identity.label
    }

    pub fn url(&self) -> &str {
        &self.identity.url
    }

    /// `POST` convenience over [`Client::request`].
    pub async fn post<P, T>(&self, path: &str, payload: &P, opts: RequestOptions) -> Result<T, RpcError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request("POST", path, payload, opts).await
    }

    /// `GET` convenience over [`Client::request`].
    pub async fn get<P, T>(&self, path: &str, payload: &P, opts: RequestOptions) -> Result<T, RpcError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request("GET", path, payload, opts).await
    }

    /// Execute one RPC call.
    ///
    /// Decode `T = serde_json::Value` to get the envelope's raw data value;
    /// any other `T` is structurally converted and a mismatch is a
    /// [`Convert`](meshrpc_core::ErrorKind::Convert) error carrying the full
    /// hop chain.
    pub async fn request<P, T>(
        &self,
        method: &str,
        path: &str,
        payload: &P,
        opts: RequestOptions,
    ) -> Result<T, RpcError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (headers, span_cx) = trace::client_span(opts.context.as_ref(), method, path);
        let outcome = self.execute(method, path, payload, headers).await;
        if let Some(span_cx) = &span_cx {
            trace::finish_client_span(span_cx, outcome.as_ref().err());
        }
        outcome
    }

    async fn execute<P, T>(
        &self,
        method: &str,
        path: &str,
        payload: &P,
        headers: std::collections::HashMap<String, String>,
    ) -> Result<T, RpcError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let id = &self.identity;
        let body = self.build_body(payload)?;
        let url = format!("{}{}", id.url, path);

        tracing::debug!(method, url = %url, peer = %id.name, "dispatching rpc call");
        let raw = match self
            .transport
            .dispatch(OutboundRequest {
                method: method.to_owned(),
                url: url.clone(),
                headers,
                basic_auth: id.basic_auth.clone(),
                body,
            })
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, url = %url, peer = %id.name, "transport dispatch failed");
                return Err(RpcError::request(&id.label).with_chain(vec![id.name.clone()]));
            }
        };

        let env = envelope::parse(&raw, &id.fields);
        // A body with no code field is indistinguishable from a peer that
        // never answered.
        let Some(code) = env.code else {
            tracing::warn!(url = %url, peer = %id.name, "response body carries no envelope code");
            return Err(RpcError::request(&id.label).with_chain(vec![id.name.clone()]));
        };

        let mut chain = split_chain(&env.chain);
        chain.push(id.name.clone());

        if code != id.succeed_code {
            if code == id.internal_error_code {
                return Err(RpcError::internal(&id.label).with_chain(chain));
            }
            return Err(RpcError::remote(code_text(&code), env.message, env.system).with_chain(chain));
        }

        serde_json::from_value(env.data).map_err(|e| {
            tracing::warn!(error = %e, peer = %id.name, "envelope data did not fit result shape");
            RpcError::convert().with_chain(chain)
        })
    }

    /// Serialize the payload, and when a signer is configured, flatten it to
    /// a mapping, inject the client id and sign in place.
    fn build_body<P: Serialize + ?Sized>(&self, payload: &P) -> Result<Value, RpcError> {
        let id = &self.identity;
        let value = serde_json::to_value(payload).map_err(|_| RpcError::params(&id.label))?;

        let Some(signer) = &id.signer else {
            return Ok(value);
        };

        let Value::Object(mut mapping) = value else {
            return Err(RpcError::params(&id.label));
        };
        if let Some(client_id) = &id.client_id {
            mapping.insert(APP_ID_KEY.to_owned(), Value::String(client_id.clone()));
        }
        if let Err(e) = signer.sign(&mut mapping) {
            tracing::warn!(error = %e, peer = %id.name, "request signing failed");
            return Err(RpcError::params(&id.label));
        }
        Ok(Value::Object(mapping))
    }
}

/// Text form of an envelope code: strings verbatim, everything else in its
/// JSON rendering.
fn code_text(code: &Value) -> String {
    match code {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn code_text_strings_are_unquoted() {
        assert_eq!(code_text(&json!("E42")), "E42");
        assert_eq!(code_text(&json!(500)), "500");
        assert_eq!(code_text(&json!(true)), "true");
    }
}
