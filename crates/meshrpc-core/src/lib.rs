//! meshrpc-core — foundation types and traits for MeshRPC.
//!
//! # Overview
//!
//! MeshRPC is an internal HTTP RPC client for service-to-service calls that
//! share a response envelope convention. The core crate defines:
//!
//! - [`envelope`] — the code/message/data/system/chain envelope and its
//!   tolerant, path-based field extraction
//! - [`RpcError`] — the structured, chainable error every call surfaces
//! - [`ClientConfig`] / [`ClientIdentity`] — per-client configuration
//! - [`Signer`] — pluggable request-signing capability
//! - [`Transport`] — the single-dispatch HTTP boundary
//! - [`trace`] — optional span creation and propagation-header derivation

pub mod config;
pub mod envelope;
pub mod error;
pub mod signer;
pub mod trace;
pub mod transport;

pub use config::{BasicAuth, ClientConfig, ClientIdentity};
pub use envelope::{Envelope, EnvelopeFields};
pub use error::{split_chain, ErrorKind, RpcError, CHAIN_DELIMITER};
pub use signer::{SignError, Signer};
pub use trace::{CallContext, REQUEST_ID_HEADER};
pub use transport::{DispatchError, OutboundRequest, Transport};
