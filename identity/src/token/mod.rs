//! Token types and local credential storage.

mod store;
mod tokens;

pub use store::{MemoryTokenStore, TokenStore};
pub use tokens::Tokens;
