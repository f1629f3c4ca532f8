use crate::controller::{auth_controller, health_check_controller, page_controller};
use crate::AppState;

use axum::{routing::get, routing::post, Router};
use tower_http::services::ServeDir;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(page_routes(app_state.clone()))
        .merge(auth_routes(app_state))
        .merge(health_routes())
        .nest_service("/assets", static_routes())
        .fallback(page_controller::not_found)
}

fn page_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(page_controller::home))
        .route("/video", get(page_controller::video))
        .route("/profile", get(page_controller::profile))
        .with_state(app_state)
}

fn auth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/login", get(auth_controller::login))
        .route("/auth/logout", post(auth_controller::logout))
        .route("/login/callback", get(auth_controller::callback))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn static_routes() -> ServeDir {
    ServeDir::new("assets")
}
