//! Distributed-tracing adapter for outbound calls.
//!
//! Tracing is strictly optional: a call without a [`CallContext`] gets empty
//! propagation headers and no span, and nothing downstream has to null-check
//! a tracer. With a context, a client span named `{path}:C` is started under
//! the caller's span and the global text-map propagator injects its headers.

use std::collections::HashMap;

use opentelemetry::global;
use opentelemetry::trace::{SpanKind, Status, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};

use crate::error::RpcError;

/// Header propagating the caller's request identifier between services.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const TRACER_NAME: &str = "meshrpc";

/// The inbound call context an RPC client call may carry.
///
/// The request id is a typed field rather than an untyped context value, so
/// an absent or foreign value degrades to the empty string instead of
/// panicking at a downcast.
#[derive(Clone, Debug)]
pub struct CallContext {
    request_id: Option<String>,
    parent: Context,
}

impl Default for CallContext {
    fn default() -> Self {
        Self {
            request_id: None,
            parent: Context::new(),
        }
    }
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the thread's current OpenTelemetry context as the parent.
    pub fn current() -> Self {
        Self {
            request_id: None,
            parent: Context::current(),
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_parent(mut self, parent: Context) -> Self {
        self.parent = parent;
        self
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

/// Derive outbound headers and an optional client span for one call.
///
/// Without a context this returns empty headers and no span. With one, the
/// `x-request-id` header is always set (empty string when the caller has no
/// id), and the returned context holds the active span for
/// [`finish_client_span`].
pub fn client_span(
    cx: Option<&CallContext>,
    method: &str,
    path: &str,
) -> (HashMap<String, String>, Option<Context>) {
    let mut headers = HashMap::new();
    let Some(cx) = cx else {
        return (headers, None);
    };

    let request_id = cx.request_id().unwrap_or_default().to_owned();
    headers.insert(REQUEST_ID_HEADER.to_owned(), request_id.clone());

    let tracer = global::tracer(TRACER_NAME);
    let span = tracer
        .span_builder(format!("{path}:C"))
        .with_kind(SpanKind::Client)
        .with_attributes([
            KeyValue::new(REQUEST_ID_HEADER, request_id),
            KeyValue::new("http.method", method.to_owned()),
            KeyValue::new("http.url", path.to_owned()),
        ])
        .start_with_context(&tracer, &cx.parent);
    let span_cx = cx.parent.with_span(span);

    // Injection through the global propagator never fails; an unconfigured
    // propagator simply injects nothing.
    global::get_text_map_propagator(|propagator| {
        propagator.inject_context(&span_cx, &mut headers);
    });

    (headers, Some(span_cx))
}

/// End the span started by [`client_span`], recording the outcome first.
///
/// Business (non-system) errors are expected outcomes and land as a span
/// event; system errors go through the standard error-tagging facility.
pub fn finish_client_span(span_cx: &Context, error: Option<&RpcError>) {
    let span = span_cx.span();
    if let Some(err) = error {
        if err.is_system() {
            span.record_error(err);
            span.set_status(Status::error(err.to_string()));
        } else {
            span.add_event("error", vec![KeyValue::new("error", err.to_string())]);
        }
    }
    span.end();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_context_means_no_headers_and_no_span() {
        let (headers, span_cx) = client_span(None, "POST", "/v1/orders");
        assert!(headers.is_empty());
        assert!(span_cx.is_none());
    }

    #[test]
    fn request_id_header_always_present_with_context() {
        let cx = CallContext::new().with_request_id("req-123");
        let (headers, span_cx) = client_span(Some(&cx), "POST", "/v1/orders");
        assert_eq!(headers.get(REQUEST_ID_HEADER).map(String::as_str), Some("req-123"));
        assert!(span_cx.is_some());
    }

    #[test]
    fn missing_request_id_defaults_to_empty() {
        let cx = CallContext::new();
        let (headers, span_cx) = client_span(Some(&cx), "GET", "/health");
        assert_eq!(headers.get(REQUEST_ID_HEADER).map(String::as_str), Some(""));

        // Finishing a no-op span with either outcome must not panic.
        let span_cx = span_cx.unwrap();
        finish_client_span(&span_cx, Some(&RpcError::convert()));
        finish_client_span(&span_cx, None);
    }
}
