//! # identity
//!
//! Single source of truth for all identity-provider interaction in the portal:
//! - OIDC authorization-code flow with PKCE (public client, no client secret)
//! - Single-use authorization transactions binding CSRF state to PKCE verifiers
//! - Local credential storage behind the [`token::TokenStore`] trait
//! - The [`client::IdentityClient`] adapter consumed by the session layer
//!
//! ## Architecture
//!
//! This crate is the only code that talks to the identity provider. The
//! `session` crate drives it through the narrow `IdentityClient` seam, which
//! keeps the session state machine testable with a fake implementation and no
//! network behavior.

pub mod client;
pub mod error;
pub mod oidc;
pub mod token;

// Re-export commonly used types
pub use client::{CallbackParams, IdentityClient};
pub use error::{Error, ErrorKind};
