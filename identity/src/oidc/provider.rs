//! OIDC provider trait and types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Error;
use crate::token::Tokens;

/// Authorization request produced for a login redirect.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Authorization URL to redirect the visitor to.
    pub url: String,
    /// CSRF state parameter echoed back on the callback.
    pub state: String,
}

/// User claims returned by the identity provider.
///
/// Treated as an opaque, read-only projection. Nothing here is mutated or
/// persisted locally; every authenticated navigation re-fetches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier.
    pub sub: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Login/username claim.
    #[serde(default)]
    pub preferred_username: Option<String>,
    /// Group memberships, when the provider issues them.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Any additional claims the provider includes.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Trait for the OIDC identity provider endpoints.
///
/// Implementations handle the protocol mechanics the adapter delegates:
/// - Authorization URL generation with a PKCE challenge
/// - Authorization code exchange at the token endpoint
/// - Token revocation
/// - User claims retrieval from the userinfo endpoint
#[async_trait]
pub trait Provider: Send + Sync {
    /// Build the authorization URL for a login redirect.
    ///
    /// # Arguments
    ///
    /// * `state` - CSRF state parameter for validation on the callback
    /// * `pkce_challenge` - S256 PKCE code challenge
    fn authorization_url(&self, state: &str, pkce_challenge: &str) -> AuthorizationRequest;

    /// Exchange an authorization code for tokens.
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code carried by the callback
    /// * `pkce_verifier` - PKCE verifier bound to the originating redirect
    async fn exchange_code(&self, code: &str, pkce_verifier: &str) -> Result<Tokens, Error>;

    /// Revoke a token (access or refresh).
    async fn revoke_token(&self, token: &str) -> Result<(), Error>;

    /// Fetch user claims using an access token.
    async fn get_user_info(&self, access_token: &str) -> Result<Claims, Error>;
}
