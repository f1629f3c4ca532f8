//! The identity client adapter.
//!
//! Single point of configuration and the only code that talks to the
//! identity provider. The session layer drives authentication exclusively
//! through the [`IdentityClient`] trait, which keeps the state machine
//! testable against a fake with no network or redirect behavior.

use std::time::Duration;

use async_trait::async_trait;
use log::*;
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::error::{oauth_error, Error, OAuthErrorKind};
use crate::oidc::pkce::PkceVerifier;
use crate::oidc::provider::{Claims, Provider};
use crate::oidc::transaction::TransactionStore;
use crate::token::{TokenStore, Tokens};

/// Query parameters carried by an inbound authorization callback.
///
/// Every field is optional so the web layer can always deserialize the
/// callback location; validation happens in [`IdentityClient::handle_auth_callback`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// The operations the rest of the application may perform against the
/// identity provider.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Initiate a redirect-based authorization flow.
    ///
    /// Clears any locally cached credential state first so a stale
    /// transaction cannot collide with the new redirect. Returns the
    /// authorization URL to redirect the visitor to. Initiation failures
    /// propagate to the caller and are never retried here.
    async fn login(&self) -> Result<String, Error>;

    /// Sign out.
    ///
    /// Local credential clearing is authoritative; the remote sign-out is
    /// advisory, bounded by a timeout, and its failure is swallowed. The
    /// asymmetry is deliberate, so the signature carries no error.
    async fn logout(&self);

    /// Whether a valid (present, unexpired) credential is currently stored.
    ///
    /// Never fails: any internal error reads as unauthenticated.
    async fn is_authenticated(&self) -> bool;

    /// Fetch the user claims projection.
    ///
    /// Returns `None` unless currently authenticated, and `None` on any
    /// provider error (fail-closed, logged).
    async fn get_user_info(&self) -> Option<Claims>;

    /// Process an inbound authorization callback.
    ///
    /// Must be invoked exactly once per redirect: the transaction bound to
    /// the callback's state token is consumed on first use. Fails on
    /// malformed or rejected callback payloads; the caller must treat that
    /// as fatal for the navigation, with no silent retry.
    async fn handle_auth_callback(&self, params: &CallbackParams) -> Result<(), Error>;
}

/// OIDC implementation of the adapter over a [`Provider`] and a [`TokenStore`].
pub struct OidcClient<P: Provider, S: TokenStore> {
    provider: P,
    tokens: S,
    transactions: TransactionStore,
    revoke_timeout: Duration,
}

impl<P: Provider, S: TokenStore> OidcClient<P, S> {
    /// Create a new client.
    ///
    /// `revoke_timeout` bounds the remote sign-out attempt during logout.
    pub fn new(provider: P, tokens: S, revoke_timeout: Duration) -> Self {
        Self {
            provider,
            tokens,
            transactions: TransactionStore::new(),
            revoke_timeout,
        }
    }

    /// Best-effort remote revocation of a credential, bounded by the
    /// configured timeout. Failures are logged and swallowed.
    async fn revoke_remote(&self, tokens: &Tokens) {
        let revoke = self.provider.revoke_token(tokens.access_token.expose_secret());

        match tokio::time::timeout(self.revoke_timeout, revoke).await {
            Ok(Ok(())) => debug!("Remote token revocation succeeded"),
            Ok(Err(e)) => warn!("Remote token revocation failed: {e}"),
            Err(_) => warn!(
                "Remote token revocation timed out after {:?}",
                self.revoke_timeout
            ),
        }
    }
}

#[async_trait]
impl<P: Provider, S: TokenStore> IdentityClient for OidcClient<P, S> {
    async fn login(&self) -> Result<String, Error> {
        // Drop any stale credential and pending transactions before opening
        // a new one.
        self.tokens.clear().await?;
        self.transactions.clear();

        let verifier = PkceVerifier::generate();
        let challenge = verifier.challenge();
        let state = self.transactions.begin(verifier.as_str().to_string());

        let request = self.provider.authorization_url(&state, challenge.as_str());
        info!("Initiating authorization redirect");
        Ok(request.url)
    }

    async fn logout(&self) {
        // Snapshot the credential for the advisory remote revocation, then
        // clear locally. Local clearing is the authoritative part.
        let snapshot = match self.tokens.get().await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Failed to read credential during logout: {e}");
                None
            }
        };

        if let Err(e) = self.tokens.clear().await {
            warn!("Failed to clear credential storage during logout: {e}");
        }
        self.transactions.clear();

        if let Some(tokens) = snapshot {
            self.revoke_remote(&tokens).await;
        }

        info!("Signed out; local credential state cleared");
    }

    async fn is_authenticated(&self) -> bool {
        match self.tokens.get().await {
            Ok(Some(tokens)) => !tokens.is_expired(),
            Ok(None) => false,
            Err(e) => {
                warn!("Credential check failed, treating as unauthenticated: {e}");
                false
            }
        }
    }

    async fn get_user_info(&self) -> Option<Claims> {
        let tokens = match self.tokens.get().await {
            Ok(Some(tokens)) if !tokens.is_expired() => tokens,
            Ok(_) => return None,
            Err(e) => {
                warn!("Credential read failed during claims fetch: {e}");
                return None;
            }
        };

        match self
            .provider
            .get_user_info(tokens.access_token.expose_secret())
            .await
        {
            Ok(claims) => Some(claims),
            Err(e) => {
                warn!("Claims fetch failed, treating as absent: {e}");
                None
            }
        }
    }

    async fn handle_auth_callback(&self, params: &CallbackParams) -> Result<(), Error> {
        if let Some(provider_error) = &params.error {
            let description = params.error_description.as_deref().unwrap_or("");
            return Err(oauth_error(
                OAuthErrorKind::CallbackRejected,
                &format!("Provider rejected the authorization: {provider_error} {description}"),
            ));
        }

        let code = params.code.as_deref().ok_or_else(|| {
            oauth_error(
                OAuthErrorKind::CallbackRejected,
                "Callback is missing the authorization code",
            )
        })?;
        let state = params.state.as_deref().ok_or_else(|| {
            oauth_error(
                OAuthErrorKind::CallbackRejected,
                "Callback is missing the state parameter",
            )
        })?;

        // Consuming the transaction makes a replayed callback fail here.
        let transaction = self.transactions.consume(state).ok_or_else(|| {
            oauth_error(
                OAuthErrorKind::InvalidState,
                "Callback state is unknown, expired, or already used",
            )
        })?;

        let tokens = self
            .provider
            .exchange_code(code, &transaction.pkce_verifier)
            .await?;
        self.tokens.store(tokens).await?;

        info!("Authorization callback processed; credential stored");
        Ok(())
    }
}
