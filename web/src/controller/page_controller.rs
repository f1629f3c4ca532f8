//! Controllers for the portal pages.
//!
//! Each request is a navigation event: the session store re-derives auth
//! state and hands back a directive. Protected pages follow the directive
//! rather than doing their own auth checks.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use session::{Directive, Route};

use crate::view;
use crate::AppState;

/// GET /
pub async fn home(State(app_state): State<AppState>) -> Html<String> {
    app_state.store.navigate(Route::Home, None).await;
    let notice = app_state.store.take_notice();
    let session = app_state.store.snapshot();
    Html(view::home(&session, notice))
}

/// GET /video (protected)
pub async fn video(State(app_state): State<AppState>) -> Response {
    match app_state.store.navigate(Route::Video, None).await {
        Directive::Allow => Html(view::video()).into_response(),
        Directive::Redirect(route) => Redirect::to(route.path()).into_response(),
    }
}

/// GET /profile (protected)
pub async fn profile(State(app_state): State<AppState>) -> Response {
    match app_state.store.navigate(Route::Profile, None).await {
        Directive::Allow => {
            let session = app_state.store.snapshot();
            match session.user {
                Some(user) => Html(view::profile(&user)).into_response(),
                None => Redirect::to(Route::Home.path()).into_response(),
            }
        }
        Directive::Redirect(route) => Redirect::to(route.path()).into_response(),
    }
}

/// Fallback for unknown paths.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(view::not_found())).into_response()
}
