//! Shared key credential for signing storage requests

use base64::{engine::general_purpose::STANDARD, Engine};
use ring::hmac;
use std::fmt;

use crate::error::{BlobError, Result};

/// Storage account credential for the SharedKey authorization scheme
#[derive(Clone)]
pub struct SharedKeyCredential {
    account: String,
    key: hmac::Key,
}

impl SharedKeyCredential {
    /// Build a credential from the account name and its base64-encoded key.
    /// A key that is not valid base64 fails construction.
    pub fn new(account: &str, key: &str) -> Result<Self> {
        let decoded = STANDARD.decode(key).map_err(BlobError::Credential)?;
        Ok(Self {
            account: account.to_string(),
            key: hmac::Key::new(hmac::HMAC_SHA256, &decoded),
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// HMAC-SHA256 signature of a canonical request string, base64-encoded.
    pub fn sign(&self, string_to_sign: &str) -> String {
        let tag = hmac::sign(&self.key, string_to_sign.as_bytes());
        STANDARD.encode(tag.as_ref())
    }
}

impl fmt::Debug for SharedKeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material stays out of logs
        f.debug_struct("SharedKeyCredential")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_matches_rfc4231_vector() {
        // RFC 4231 test case 2: key "Jefe", data "what do ya want for nothing?"
        let credential = SharedKeyCredential::new("testaccount", "SmVmZQ==").unwrap();
        assert_eq!(
            credential.sign("what do ya want for nothing?"),
            "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM="
        );
    }

    #[test]
    fn test_sign_is_deterministic() {
        let credential = SharedKeyCredential::new("testaccount", "SmVmZQ==").unwrap();
        assert_eq!(credential.sign("payload"), credential.sign("payload"));
        assert_ne!(credential.sign("payload"), credential.sign("other"));
    }

    #[test]
    fn test_malformed_key_fails() {
        let result = SharedKeyCredential::new("testaccount", "not-base64!");
        assert!(matches!(result, Err(BlobError::Credential(_))));
    }

    #[test]
    fn test_account_accessor() {
        let credential = SharedKeyCredential::new("testaccount", "SmVmZQ==").unwrap();
        assert_eq!(credential.account(), "testaccount");
    }

    #[test]
    fn test_debug_omits_key_material() {
        let credential = SharedKeyCredential::new("testaccount", "SmVmZQ==").unwrap();
        let debug_str = format!("{:?}", credential);
        assert!(debug_str.contains("testaccount"));
        assert!(!debug_str.contains("SmVmZQ"));
        assert!(!debug_str.contains("Jefe"));
    }
}
