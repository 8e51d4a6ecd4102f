//! Pluggable request signing.

use serde_json::{Map, Value};
use thiserror::Error;

/// Signing failed; the payload must not be sent unsigned.
#[derive(Debug, Error)]
#[error("signing failed: {0}")]
pub struct SignError(pub String);

/// A capability that augments a flat request mapping with authentication
/// material (signature, nonce, derived fields) in place.
///
/// Implementations must be `Send + Sync`: one signer instance serves every
/// concurrent call on its client.
pub trait Signer: Send + Sync {
    fn sign(&self, payload: &mut Map<String, Value>) -> Result<(), SignError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticSigner;

    impl Signer for StaticSigner {
        fn sign(&self, payload: &mut Map<String, Value>) -> Result<(), SignError> {
            payload.insert("sign".to_owned(), json!("deadbeef"));
            Ok(())
        }
    }

    #[test]
    fn sign_mutates_in_place() {
        let mut payload = Map::new();
        payload.insert("amount".to_owned(), json!(100));
        StaticSigner.sign(&mut payload).unwrap();
        assert_eq!(payload.get("sign"), Some(&json!("deadbeef")));
        assert_eq!(payload.get("amount"), Some(&json!(100)));
    }
}
