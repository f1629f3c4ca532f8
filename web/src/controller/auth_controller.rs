//! Controller for the authentication flow.
//!
//! These endpoints work via browser redirects: the login button sends the
//! visitor to the identity provider, and the provider sends them back to
//! the callback path with the authorization result in the query string.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};

use identity::CallbackParams;
use session::{Directive, Route};

use crate::AppState;

/// GET /auth/login
///
/// Initiates the redirect-based authorization flow. On initiation failure
/// the visitor lands back on the home page, where the store's surfaced
/// notice explains what happened.
pub async fn login(State(app_state): State<AppState>) -> Response {
    match app_state.store.login().await {
        Ok(url) => Redirect::temporary(&url).into_response(),
        Err(_) => Redirect::to(Route::Home.path()).into_response(),
    }
}

/// GET /login/callback
///
/// The callback route renders nothing itself; it exists purely to drive the
/// store's callback transition and bounce the visitor onward.
pub async fn callback(
    State(app_state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    match app_state.store.navigate(Route::Callback, Some(&params)).await {
        Directive::Redirect(route) => Redirect::to(route.path()),
        Directive::Allow => Redirect::to(Route::Home.path()),
    }
}

/// POST /auth/logout
///
/// Always lands on the public landing route; local sign-out cannot fail.
pub async fn logout(State(app_state): State<AppState>) -> Redirect {
    let route = app_state.store.logout().await;
    Redirect::to(route.path())
}
