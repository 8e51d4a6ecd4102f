//! Client configuration and the resolved per-client identity.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::EnvelopeFields;
use crate::signer::Signer;

/// Basic-auth credentials attached to every outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// Builder-style configuration for one client.
///
/// `name`, `label` and `url` are required; everything else defaults.
/// An unset succeed/internal code falls back to `"00"` / `"500"`, but an
/// explicitly set value is preserved as-is, including an empty string.
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub name: String,
    pub label: String,
    pub url: String,
    pub basic_auth: Option<BasicAuth>,
    pub signer: Option<Arc<dyn Signer>>,
    pub client_id: Option<String>,
    pub fields: EnvelopeFields,
    pub succeed_code: Option<Value>,
    pub internal_error_code: Option<Value>,
}

impl ClientConfig {
    pub fn new(name: impl Into<String>, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_fields(mut self, fields: EnvelopeFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_succeed_code(mut self, code: Value) -> Self {
        self.succeed_code = Some(code);
        self
    }

    pub fn with_internal_error_code(mut self, code: Value) -> Self {
        self.internal_error_code = Some(code);
        self
    }

    /// Resolve into an immutable identity.
    ///
    /// # Panics
    /// Panics when `name` or `label` is empty — misconfigured construction
    /// is a programmer error, not a runtime outcome.
    pub fn resolve(self) -> ClientIdentity {
        assert!(!self.name.is_empty(), "ClientConfig.name must be set");
        assert!(!self.label.is_empty(), "ClientConfig.label must be set");
        ClientIdentity {
            name: self.name,
            label: self.label,
            url: self.url,
            basic_auth: self.basic_auth,
            signer: self.signer,
            client_id: self.client_id.filter(|id| !id.is_empty()),
            fields: self.fields.or_defaults(),
            succeed_code: self.succeed_code.unwrap_or_else(|| Value::String("00".to_owned())),
            internal_error_code: self
                .internal_error_code
                .unwrap_or_else(|| Value::String("500".to_owned())),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("url", &self.url)
            .field("basic_auth", &self.basic_auth.is_some())
            .field("signer", &self.signer.is_some())
            .field("client_id", &self.client_id)
            .field("fields", &self.fields)
            .field("succeed_code", &self.succeed_code)
            .field("internal_error_code", &self.internal_error_code)
            .finish()
    }
}

/// Immutable, fully defaulted configuration owned by one client instance.
/// Nothing here mutates after construction, so a client is safe to share
/// across concurrent calls.
#[derive(Clone)]
pub struct ClientIdentity {
    pub name: String,
    pub label: String,
    pub url: String,
    pub basic_auth: Option<BasicAuth>,
    pub signer: Option<Arc<dyn Signer>>,
    pub client_id: Option<String>,
    pub fields: EnvelopeFields,
    pub succeed_code: Value,
    pub internal_error_code: Value,
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("url", &self.url)
            .field("basic_auth", &self.basic_auth.is_some())
            .field("signer", &self.signer.is_some())
            .field("client_id", &self.client_id)
            .field("fields", &self.fields)
            .field("succeed_code", &self.succeed_code)
            .field("internal_error_code", &self.internal_error_code)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_applied_on_resolve() {
        let id = ClientConfig::new("orders", "order service", "http://orders:80").resolve();
        assert_eq!(id.fields, EnvelopeFields::default());
        assert_eq!(id.succeed_code, json!("00"));
        assert_eq!(id.internal_error_code, json!("500"));
        assert!(id.basic_auth.is_none());
        assert!(id.signer.is_none());
        assert!(id.client_id.is_none());
    }

    #[test]
    fn explicit_empty_code_is_preserved() {
        let id = ClientConfig::new("orders", "order service", "http://orders")
            .with_succeed_code(json!(""))
            .resolve();
        assert_eq!(id.succeed_code, json!(""));
    }

    #[test]
    fn numeric_codes_are_kept_numeric() {
        let id = ClientConfig::new("orders", "order service", "http://orders")
            .with_succeed_code(json!(0))
            .with_internal_error_code(json!(500))
            .resolve();
        assert_eq!(id.succeed_code, json!(0));
        assert_eq!(id.internal_error_code, json!(500));
    }

    #[test]
    #[should_panic(expected = "ClientConfig.name must be set")]
    fn empty_name_panics() {
        ClientConfig::new("", "label", "http://x").resolve();
    }

    #[test]
    #[should_panic(expected = "ClientConfig.label must be set")]
    fn empty_label_panics() {
        ClientConfig::new("name", "", "http://x").resolve();
    }
}
