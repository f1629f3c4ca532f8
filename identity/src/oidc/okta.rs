//! Okta OIDC provider implementation.
//!
//! HTTP client for the Okta authorization server endpoints: authorization
//! redirect URL construction, code exchange, revocation, and userinfo. This
//! is a public client; the code exchange is bound by PKCE rather than a
//! client secret.

use async_trait::async_trait;
use chrono::Utc;
use log::*;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{oauth_error, Error, OAuthErrorKind};
use crate::oidc::provider::{AuthorizationRequest, Claims, Provider};
use crate::token::Tokens;

/// Token response from the Okta token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
}

/// Request to exchange an authorization code for tokens.
#[derive(Debug, Serialize)]
struct TokenExchangeRequest {
    grant_type: String,
    code: String,
    redirect_uri: String,
    client_id: String,
    code_verifier: String,
}

/// Request to revoke a token.
#[derive(Debug, Serialize)]
struct RevocationRequest {
    token: String,
    token_type_hint: String,
    client_id: String,
}

impl From<TokenResponse> for Tokens {
    fn from(response: TokenResponse) -> Self {
        Tokens {
            access_token: SecretString::from(response.access_token),
            refresh_token: response.refresh_token.map(SecretString::from),
            expires_at: Some(Utc::now() + chrono::Duration::seconds(response.expires_in)),
            token_type: response.token_type,
            scopes: response
                .scope
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Endpoint URLs for an Okta authorization server.
#[derive(Debug, Clone)]
pub struct OktaEndpoints {
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub revoke_url: String,
}

impl OktaEndpoints {
    /// Derive the standard endpoint layout from an issuer URL.
    pub fn from_issuer(issuer: &str) -> Self {
        let issuer = issuer.trim_end_matches('/');
        Self {
            auth_url: format!("{issuer}/v1/authorize"),
            token_url: format!("{issuer}/v1/token"),
            userinfo_url: format!("{issuer}/v1/userinfo"),
            revoke_url: format!("{issuer}/v1/revoke"),
        }
    }
}

/// Okta OIDC client for the redirect-based authorization flow.
pub struct OktaProvider {
    client: reqwest::Client,
    client_id: String,
    redirect_uri: String,
    scopes: Vec<String>,
    endpoints: OktaEndpoints,
}

impl OktaProvider {
    /// Create a new Okta provider from an issuer URL.
    pub fn new(
        issuer: &str,
        client_id: &str,
        redirect_uri: &str,
        scopes: Vec<String>,
    ) -> Result<Self, Error> {
        Self::with_endpoints(client_id, redirect_uri, scopes, OktaEndpoints::from_issuer(issuer))
    }

    /// Create a new Okta provider with explicit endpoint URLs.
    /// Tests point these at a mock server.
    pub fn with_endpoints(
        client_id: &str,
        redirect_uri: &str,
        scopes: Vec<String>,
        endpoints: OktaEndpoints,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            client_id: client_id.to_string(),
            redirect_uri: redirect_uri.to_string(),
            scopes,
            endpoints,
        })
    }
}

#[async_trait]
impl Provider for OktaProvider {
    fn authorization_url(&self, state: &str, pkce_challenge: &str) -> AuthorizationRequest {
        let scopes = self.scopes.join(" ");

        let url = format!(
            "{}?\
            client_id={}&\
            redirect_uri={}&\
            response_type=code&\
            scope={}&\
            code_challenge={}&\
            code_challenge_method=S256&\
            state={}",
            self.endpoints.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(pkce_challenge),
            urlencoding::encode(state)
        );

        AuthorizationRequest {
            url,
            state: state.to_string(),
        }
    }

    async fn exchange_code(&self, code: &str, pkce_verifier: &str) -> Result<Tokens, Error> {
        let request = TokenExchangeRequest {
            grant_type: "authorization_code".to_string(),
            code: code.to_string(),
            redirect_uri: self.redirect_uri.clone(),
            client_id: self.client_id.clone(),
            code_verifier: pkce_verifier.to_string(),
        };

        debug!("Exchanging authorization code at the token endpoint");

        let response = self
            .client
            .post(&self.endpoints.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach the token endpoint: {:?}", e);
                oauth_error(OAuthErrorKind::Network, &e.to_string())
            })?;

        if response.status().is_success() {
            let token_response: TokenResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse token endpoint response: {:?}", e);
                oauth_error(OAuthErrorKind::InvalidResponse, &e.to_string())
            })?;
            info!("Authorization code exchanged for tokens");
            Ok(token_response.into())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Token endpoint rejected the code exchange: {}", error_text);
            Err(oauth_error(
                OAuthErrorKind::TokenExchangeFailed,
                &error_text,
            ))
        }
    }

    async fn revoke_token(&self, token: &str) -> Result<(), Error> {
        let request = RevocationRequest {
            token: token.to_string(),
            token_type_hint: "access_token".to_string(),
            client_id: self.client_id.clone(),
        };

        let response = self
            .client
            .post(&self.endpoints.revoke_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| oauth_error(OAuthErrorKind::Network, &e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(oauth_error(OAuthErrorKind::RevocationFailed, &error_text))
        }
    }

    async fn get_user_info(&self, access_token: &str) -> Result<Claims, Error> {
        let response = self
            .client
            .get(&self.endpoints.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach the userinfo endpoint: {:?}", e);
                oauth_error(OAuthErrorKind::Network, &e.to_string())
            })?;

        if response.status().is_success() {
            response.json::<Claims>().await.map_err(|e| {
                warn!("Failed to parse userinfo response: {:?}", e);
                oauth_error(OAuthErrorKind::InvalidResponse, &e.to_string())
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Userinfo endpoint rejected the request: {}", error_text);
            Err(oauth_error(OAuthErrorKind::UserInfoFailed, &error_text))
        }
    }
}
