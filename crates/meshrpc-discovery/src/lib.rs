//! meshrpc-discovery — pre-configured clients for in-cluster peers.
//!
//! Knows how a peer's base URL is derived in each deployment mode: a fixed
//! loopback port during local development, or a service-discovery hostname
//! (`name.namespace.suffix` on port 80) when the cluster publishes a DNS
//! suffix. The request executor stays agnostic to which mode produced the
//! URL.
//!
//! # Quick start
//! ```rust,no_run
//! use meshrpc_discovery::{client_for, ClusterConfig};
//!
//! let cluster = ClusterConfig {
//!     dns_suffix: Some("svc.cluster.local".to_owned()),
//!     namespace: "prod".to_owned(),
//!     application_id: "checkout".to_owned(),
//!     application_secret: "secret".to_owned(),
//! };
//! let billing = client_for("billing", "billing service", "8081", &cluster);
//! ```

use serde::Deserialize;

use meshrpc_core::ClientConfig;
use meshrpc_http::Client;

/// Cluster-level settings, typically loaded from the host application's
/// configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterConfig {
    /// DNS suffix of the cluster's service domain. Absent (or empty) means
    /// peers run on loopback ports.
    #[serde(default)]
    pub dns_suffix: Option<String>,
    #[serde(default)]
    pub namespace: String,
    /// Credentials presented to peers as basic auth.
    pub application_id: String,
    pub application_secret: String,
}

/// Base URL for a named peer: loopback with the given port, or the
/// service-discovery hostname on port 80 when a DNS suffix is configured.
pub fn service_url(name: &str, port: &str, cluster: &ClusterConfig) -> String {
    match cluster.dns_suffix.as_deref() {
        Some(suffix) if !suffix.is_empty() => {
            format!("http://{name}.{}.{suffix}:80", cluster.namespace)
        }
        _ => format!("http://127.0.0.1:{port}"),
    }
}

/// Build a [`Client`] for the named peer with the cluster's basic-auth
/// credentials attached.
///
/// # Panics
/// Panics when `name` or `label` is empty, like [`Client::new`].
pub fn client_for(name: &str, label: &str, port: &str, cluster: &ClusterConfig) -> Client {
    Client::new(
        ClientConfig::new(name, label, service_url(name, port, cluster))
            .with_basic_auth(&cluster.application_id, &cluster.application_secret),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(dns_suffix: Option<&str>) -> ClusterConfig {
        ClusterConfig {
            dns_suffix: dns_suffix.map(str::to_owned),
            namespace: "prod".to_owned(),
            application_id: "app-id".to_owned(),
            application_secret: "app-secret".to_owned(),
        }
    }

    #[test]
    fn loopback_url_without_dns_suffix() {
        let url = service_url("billing", "8081", &cluster(None));
        assert_eq!(url, "http://127.0.0.1:8081");
    }

    #[test]
    fn empty_dns_suffix_means_loopback() {
        let url = service_url("billing", "8081", &cluster(Some("")));
        assert_eq!(url, "http://127.0.0.1:8081");
    }

    #[test]
    fn discovery_url_ignores_the_local_port() {
        let url = service_url("billing", "8081", &cluster(Some("svc.cluster.local")));
        assert_eq!(url, "http://billing.prod.svc.cluster.local:80");
    }

    #[test]
    fn client_carries_the_derived_url() {
        let client = client_for("billing", "billing service", "8081", &cluster(None));
        assert_eq!(client.url(), "http://127.0.0.1:8081");
        assert_eq!(client.name(), "billing");
    }

    #[test]
    fn cluster_config_deserializes_with_optional_fields() {
        let cluster: ClusterConfig = serde_json::from_str(
            r#"{"application_id": "app", "application_secret": "s3cret"}"#,
        )
        .unwrap();
        assert!(cluster.dns_suffix.is_none());
        assert_eq!(cluster.namespace, "");
    }
}
