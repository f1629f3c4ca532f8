use identity::client::OidcClient;
use identity::oidc::okta::OktaProvider;
use identity::token::MemoryTokenStore;
use log::error;
use service::{config::Config, logging::Logger};
use session::store::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use web::AppState;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    let provider = match OktaProvider::new(
        config.issuer_url(),
        config.client_id(),
        config.redirect_uri(),
        config.scopes.clone(),
    ) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to build identity provider client: {e}");
            std::process::exit(1);
        }
    };

    let client = OidcClient::new(
        provider,
        MemoryTokenStore::new(),
        Duration::from_secs(config.logout_timeout_secs),
    );
    let store = Arc::new(SessionStore::new(Arc::new(client)));
    let app_state = AppState::new(config, store);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server failed to start: {e}");
        std::process::exit(1);
    }
}
