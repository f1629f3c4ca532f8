//! HTTP surface of the portal: router, controllers, guards, and views.

use log::info;
use service::config::Config;
use session::SessionStore;
use std::sync::Arc;

pub mod controller;
pub mod router;
pub mod view;

/// Shared application state handed to the router.
/// Needs to implement Clone to be able to be passed into Router as State.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<SessionStore>) -> Self {
        Self { config, store }
    }
}

/// Bind the configured listener and serve the router until shutdown.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;

    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    info!("Server starting... listening on {host}:{port}");

    axum::serve(listener, router::define_routes(app_state)).await
}
