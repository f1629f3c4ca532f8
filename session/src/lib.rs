//! Session state for the portal.
//!
//! One [`store::SessionStore`] per process owns the `{is_authenticated,
//! is_loading, user}` snapshot and is its single writer. Navigation events
//! re-derive the state from the identity adapter on every pass; consumers
//! (the web layer's pages and guards) only read snapshots and follow the
//! directives the store hands back.

pub mod error;
pub mod route;
pub mod store;
pub mod user;

pub use error::{Error, SessionErrorKind};
pub use route::Route;
pub use store::{Directive, Notice, Session, SessionStore};
pub use user::User;
