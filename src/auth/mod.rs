//! Authentication for the Ragcy client.
//!
//! The service only understands a static bearer token, supplied through
//! [`ApiKeyAuth`]. Other providers can be plugged in via [`AuthProvider`].

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::errors::RagcyError;

/// Header carrying the credentials.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Authentication provider trait.
///
/// Implementations add credentials to the headers of every request. They
/// run after custom headers are applied, so they always win.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Get the authentication scheme name.
    fn scheme(&self) -> &str;

    /// Validate the credentials.
    fn validate(&self) -> Result<(), RagcyError>;
}

/// Bearer token authentication with the Ragcy API key.
pub struct ApiKeyAuth {
    api_key: SecretString,
}

impl ApiKeyAuth {
    /// Creates a new API key authentication provider.
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }

    /// Creates from a string API key.
    pub fn from_string(api_key: impl Into<String>) -> Self {
        Self::new(SecretString::new(api_key.into()))
    }

    /// Last four characters of the key, for diagnostics.
    pub fn key_hint(&self) -> String {
        key_hint(&self.api_key)
    }
}

/// `...abcd` for keys longer than four characters, `****` otherwise.
pub(crate) fn key_hint(secret: &SecretString) -> String {
    let key = secret.expose_secret();
    match key.char_indices().rev().nth(3) {
        Some((start, _)) if start > 0 => format!("...{}", &key[start..]),
        _ => "****".to_string(),
    }
}

impl AuthProvider for ApiKeyAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            AUTHORIZATION_HEADER.to_string(),
            format!("{} {}", self.scheme(), self.api_key.expose_secret()),
        );
    }

    fn scheme(&self) -> &str {
        "Bearer"
    }

    fn validate(&self) -> Result<(), RagcyError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(RagcyError::Configuration {
                message: "API key cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("key_hint", &self.key_hint())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sets_bearer_header() {
        let auth = ApiKeyAuth::from_string("rk_test_key_12345");
        let mut headers = HashMap::new();
        headers.insert(AUTHORIZATION_HEADER.to_string(), "Basic old".to_string());

        auth.apply_auth(&mut headers);

        assert_eq!(
            headers.get(AUTHORIZATION_HEADER).map(String::as_str),
            Some("Bearer rk_test_key_12345")
        );
    }

    #[test]
    fn test_validate_rejects_blank_key() {
        assert!(ApiKeyAuth::from_string("rk_test_key").validate().is_ok());
        assert!(ApiKeyAuth::from_string("   ").validate().is_err());
    }

    #[test]
    fn test_key_hint() {
        assert_eq!(ApiKeyAuth::from_string("rk_test_key_12345").key_hint(), "...2345");
        assert_eq!(ApiKeyAuth::from_string("abcd").key_hint(), "****");
        assert_eq!(ApiKeyAuth::from_string("").key_hint(), "****");
    }

    #[test]
    fn test_debug_hides_key() {
        let debug_str = format!("{:?}", ApiKeyAuth::from_string("rk_secret_key"));
        assert!(!debug_str.contains("rk_secret_key"));
        assert!(debug_str.contains("..._key"));
    }
}
