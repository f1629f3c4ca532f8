//! Single-use authorization transactions for in-flight login redirects.
//!
//! Each call to `login()` opens a transaction binding a CSRF state token to
//! the PKCE verifier generated for that redirect. The inbound callback
//! consumes the transaction exactly once; a replayed or unknown state is
//! rejected. This is the session-scoped half of the adapter's local storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Data bound to one in-flight authorization redirect.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// PKCE verifier to present during the code exchange.
    pub pkce_verifier: String,
    /// When this transaction expires.
    pub expires_at: DateTime<Utc>,
}

/// Store of pending authorization transactions keyed by CSRF state token.
#[derive(Clone)]
pub struct TransactionStore {
    transactions: Arc<Mutex<HashMap<String, Transaction>>>,
    ttl: Duration,
}

impl TransactionStore {
    /// Create a new store with the default TTL of 10 minutes.
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(10))
    }

    /// Create a new store with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            transactions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Open a transaction for a new redirect and return its state token.
    pub fn begin(&self, pkce_verifier: String) -> String {
        let state = Self::generate_token();
        let transaction = Transaction {
            pkce_verifier,
            expires_at: Utc::now() + self.ttl,
        };

        let mut transactions = self.transactions.lock().unwrap();
        transactions.insert(state.clone(), transaction);

        state
    }

    /// Validate and consume a transaction.
    ///
    /// Removes the transaction so a second callback carrying the same state
    /// fails. Returns `None` for unknown, expired, or already-consumed states.
    pub fn consume(&self, state: &str) -> Option<Transaction> {
        let mut transactions = self.transactions.lock().unwrap();

        let transaction = transactions.remove(state)?;
        if Utc::now() > transaction.expires_at {
            return None;
        }
        Some(transaction)
    }

    /// Drop every pending transaction.
    ///
    /// Called before a fresh login so a stale redirect cannot collide with
    /// the new one, and on logout.
    pub fn clear(&self) {
        self.transactions.lock().unwrap().clear();
    }

    /// Generate a cryptographically random state token.
    fn generate_token() -> String {
        let random_bytes: [u8; 32] = rand::thread_rng().gen();
        hex::encode(random_bytes)
    }
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_returns_state_token() {
        let store = TransactionStore::new();
        let state = store.begin("verifier".to_string());
        assert_eq!(state.len(), 64); // 32 bytes hex encoded
    }

    #[test]
    fn test_consume_returns_bound_verifier() {
        let store = TransactionStore::new();
        let state = store.begin("verifier".to_string());

        let transaction = store.consume(&state);
        assert_eq!(transaction.unwrap().pkce_verifier, "verifier");
    }

    #[test]
    fn test_consume_unknown_state() {
        let store = TransactionStore::new();
        assert!(store.consume("unknown_state").is_none());
    }

    #[test]
    fn test_transaction_consumed_only_once() {
        let store = TransactionStore::new();
        let state = store.begin("verifier".to_string());

        assert!(store.consume(&state).is_some());
        assert!(store.consume(&state).is_none());
    }

    #[test]
    fn test_expired_transaction_rejected() {
        let store = TransactionStore::with_ttl(Duration::seconds(-1));
        let state = store.begin("verifier".to_string());

        assert!(store.consume(&state).is_none());
    }

    #[test]
    fn test_clear_drops_pending_transactions() {
        let store = TransactionStore::new();
        let state = store.begin("verifier".to_string());

        store.clear();
        assert!(store.consume(&state).is_none());
    }
}
