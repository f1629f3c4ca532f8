//! Token storage trait for persisting provider credentials.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::Tokens;
use crate::error::Error;

/// Trait for storing and retrieving the current credential.
///
/// The store is the only place tokens live; the session layer never sees
/// them, only the derived authenticated signal. `clear` must be idempotent:
/// the adapter's logout contract depends on clearing an already-empty store
/// succeeding.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Store the credential, replacing any previous one.
    async fn store(&self, tokens: Tokens) -> Result<(), Error>;

    /// Retrieve the current credential, if any.
    async fn get(&self) -> Result<Option<Tokens>, Error>;

    /// Remove the credential. A no-op when nothing is stored.
    async fn clear(&self) -> Result<(), Error>;
}

/// In-memory token store shared across every consumer in the process.
///
/// The process-wide analog of the origin-scoped storage the provider SDK
/// would use in a browser: one credential, visible to all readers.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<Mutex<Option<Tokens>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn store(&self, tokens: Tokens) -> Result<(), Error> {
        let mut slot = self.tokens.lock().await;
        *slot = Some(tokens);
        Ok(())
    }

    async fn get(&self) -> Result<Option<Tokens>, Error> {
        let slot = self.tokens.lock().await;
        Ok(slot.clone())
    }

    async fn clear(&self) -> Result<(), Error> {
        let mut slot = self.tokens.lock().await;
        *slot = None;
        Ok(())
    }
}
