//! OIDC token types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

/// Tokens issued by the identity provider, with metadata.
#[derive(Debug, Clone)]
pub struct Tokens {
    /// Access token presented to the userinfo endpoint.
    pub access_token: SecretString,
    /// Refresh token, when the provider issues one.
    pub refresh_token: Option<SecretString>,
    /// When the access token expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Token type (usually "Bearer").
    pub token_type: String,
    /// Granted scopes.
    pub scopes: Vec<String>,
}

impl Tokens {
    /// Check whether the access token is expired.
    ///
    /// A token within 30 seconds of its expiry instant is treated as expired
    /// to absorb clock skew against the provider.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires| {
                let buffer = chrono::Duration::seconds(30);
                expires <= (Utc::now() + buffer)
            })
            .unwrap_or(false)
    }
}
