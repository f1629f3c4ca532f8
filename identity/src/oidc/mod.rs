//! OIDC flow mechanics: PKCE, authorization transactions, and the provider seam.

pub mod okta;
pub mod pkce;
pub mod provider;
pub mod transaction;

pub use pkce::{PkceChallenge, PkceVerifier};
pub use provider::{AuthorizationRequest, Claims, Provider};
pub use transaction::TransactionStore;
