//! Chained, structured errors for cross-service RPC calls.
//!
//! Every failure surfaced by a MeshRPC client is an [`RpcError`]: a code, a
//! message, a system flag and the ordered chain of service names the error
//! passed through (oldest first). The [`ErrorKind`] tag says whether the
//! error was synthesized locally or decoded from the peer's envelope.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delimiter between hop names in the wire form of an error chain.
pub const CHAIN_DELIMITER: &str = "<-";

/// Where an [`RpcError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request payload could not be turned into a (signed) flat mapping.
    Params,
    /// Transport failure, or a response body with no decodable code field.
    Request,
    /// The peer answered with its configured internal-error code.
    Internal,
    /// The decoded data value did not fit the requested result shape.
    Convert,
    /// Any other non-success code reported by the peer, passed through verbatim.
    Remote,
}

/// A structured, chainable RPC error.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct RpcError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    /// `true` for infrastructural errors, `false` for business-level ones.
    pub system: bool,
    /// Service names the error passed through, oldest first.
    pub chain: Vec<String>,
}

impl RpcError {
    /// Payload not convertible to a flat key-value mapping, or signing failed.
    pub fn params(label: &str) -> Self {
        Self::local(ErrorKind::Params, "1700", format!("params error:{label}"))
    }

    /// Transport failure or malformed (non-envelope) response.
    pub fn request(label: &str) -> Self {
        Self::local(ErrorKind::Request, "1702", format!("connect failed:{label}"))
    }

    /// The peer signaled its internal-error code.
    pub fn internal(label: &str) -> Self {
        Self::local(ErrorKind::Internal, "1703", format!("internal error:{label}"))
    }

    /// Decoded data did not match the caller's result shape.
    pub fn convert() -> Self {
        Self::local(ErrorKind::Convert, "1704", "convert error:".to_owned())
    }

    /// A non-success code reported by the peer, carried verbatim.
    pub fn remote(code: impl Into<String>, message: impl Into<String>, system: bool) -> Self {
        Self {
            kind: ErrorKind::Remote,
            code: code.into(),
            message: message.into(),
            system,
            chain: Vec::new(),
        }
    }

    fn local(kind: ErrorKind, code: &str, message: String) -> Self {
        Self {
            kind,
            code: code.to_owned(),
            message,
            system: true,
            chain: Vec::new(),
        }
    }

    /// Replace the hop chain.
    pub fn with_chain(mut self, chain: Vec<String>) -> Self {
        self.chain = chain;
        self
    }

    /// Returns `true` if this error is infrastructural rather than business-logic.
    pub fn is_system(&self) -> bool {
        self.system
    }

    /// The chain in wire form, hops joined by [`CHAIN_DELIMITER`].
    pub fn chain_string(&self) -> String {
        self.chain.join(CHAIN_DELIMITER)
    }
}

/// Split an incoming chain string into hop names. An empty string is an
/// empty chain, not a single empty hop.
pub fn split_chain(chain: &str) -> Vec<String> {
    if chain.is_empty() {
        return Vec::new();
    }
    chain.split(CHAIN_DELIMITER).map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_templates() {
        let e = RpcError::params("billing");
        assert_eq!(e.kind, ErrorKind::Params);
        assert_eq!(e.code, "1700");
        assert_eq!(e.message, "params error:billing");
        assert!(e.is_system());

        let e = RpcError::request("billing");
        assert_eq!(e.code, "1702");
        assert_eq!(e.message, "connect failed:billing");

        let e = RpcError::internal("billing");
        assert_eq!(e.code, "1703");

        let e = RpcError::convert();
        assert_eq!(e.code, "1704");
        assert_eq!(e.message, "convert error:");
    }

    #[test]
    fn remote_passthrough() {
        let e = RpcError::remote("42", "insufficient balance", false);
        assert_eq!(e.kind, ErrorKind::Remote);
        assert_eq!(e.code, "42");
        assert!(!e.is_system());
    }

    #[test]
    fn chain_round_trip() {
        let mut chain = split_chain("A<-B");
        chain.push("C".to_owned());
        let e = RpcError::remote("42", "boom", false).with_chain(chain);
        assert_eq!(e.chain, vec!["A", "B", "C"]);
        assert_eq!(e.chain_string(), "A<-B<-C");
    }

    #[test]
    fn empty_chain_splits_to_nothing() {
        assert!(split_chain("").is_empty());
        assert_eq!(split_chain("solo"), vec!["solo"]);
    }

    #[test]
    fn display_includes_code_and_message() {
        let e = RpcError::internal("orders");
        assert_eq!(e.to_string(), "[1703] internal error:orders");
    }
}
