//! meshrpc-http — reqwest transport and the MeshRPC request executor.
//!
//! # Quick start
//! ```rust,no_run
//! use meshrpc_http::{Client, RequestOptions};
//! use meshrpc_core::ClientConfig;
//! use serde_json::{json, Value};
//!
//! # async fn run() -> Result<(), meshrpc_core::RpcError> {
//! let client = Client::new(
//!     ClientConfig::new("orders", "order service", "http://orders.internal")
//!         .with_basic_auth("app-id", "app-secret"),
//! );
//! let data: Value = client
//!     .post("/v1/orders", &json!({"sku": "A-1"}), RequestOptions::new())
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod dispatch;

pub use client::{Client, RequestOptions, APP_ID_KEY};
pub use dispatch::{HttpDispatch, HttpDispatchConfig};
