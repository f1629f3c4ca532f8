//! The session state store.
//!
//! A single finite-state sequence driven by navigation events and the
//! identity adapter: `Initializing -> {Authenticated, Unauthenticated}`,
//! with a transient `ProcessingCallback` sub-state on the callback route.
//! Every navigation re-derives the state from the adapter rather than
//! trusting what was cached, so externally expired tokens surface on the
//! next page change.

use std::sync::{Arc, Mutex};

use identity::{CallbackParams, IdentityClient};
use log::*;

use crate::error::{session_error, Error, SessionErrorKind};
use crate::route::{Route, POST_LOGIN};
use crate::user::User;

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Initializing,
    ProcessingCallback,
    Authenticated,
    Unauthenticated,
}

/// Read-only snapshot of the session handed to consumers.
///
/// While `is_loading` is true a check or claims fetch is outstanding and the
/// UI must not assume `user` is populated.
#[derive(Debug, Clone)]
pub struct Session {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub user: Option<User>,
}

/// What the guard for the current navigation should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Render the requested page.
    Allow,
    /// Send the visitor elsewhere.
    Redirect(Route),
}

/// User-visible notices surfaced by session transitions. Consumed on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    AuthenticationRequired,
    LoginFailed,
    SignInIncomplete,
    LoggedOut,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::AuthenticationRequired => "Please log in to access this page.",
            Notice::LoginFailed => "There was a problem logging in.",
            Notice::SignInIncomplete => "Sign-in could not be completed. Please try again.",
            Notice::LoggedOut => "You have been successfully logged out.",
        }
    }
}

struct Inner {
    /// Monotonic navigation counter. Each check is keyed to the navigation
    /// that issued it; a result whose epoch is no longer current is stale
    /// and must be discarded. Lives under the same lock as the rest of the
    /// state so the staleness check and the write it guards are atomic with
    /// respect to a newer navigation beginning.
    epoch: u64,
    phase: Phase,
    is_loading: bool,
    user: Option<User>,
    notice: Option<Notice>,
}

/// Single writer of the session state; everything else reads snapshots.
pub struct SessionStore {
    client: Arc<dyn IdentityClient>,
    inner: Mutex<Inner>,
}

impl SessionStore {
    pub fn new(client: Arc<dyn IdentityClient>) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner {
                epoch: 0,
                phase: Phase::Initializing,
                is_loading: true,
                user: None,
                notice: None,
            }),
        }
    }

    /// Re-derive session state for a navigation and decide what the guard
    /// should do. `params` carries the authorization result when the route
    /// is the callback route.
    pub async fn navigate(&self, route: Route, params: Option<&CallbackParams>) -> Directive {
        let epoch = self.begin_navigation();

        // Callback processing is serialized ahead of the general check and
        // exits the pass early: its credential writes must not race a
        // concurrent auth-state read for the same navigation.
        if route == Route::Callback {
            return self.process_callback(epoch, params).await;
        }

        let authenticated = self.client.is_authenticated().await;
        let user = if authenticated {
            self.client.get_user_info().await.map(User::from)
        } else {
            None
        };

        match user {
            Some(user) => {
                self.commit(epoch, Phase::Authenticated, Some(user));
                Directive::Allow
            }
            None => {
                if authenticated {
                    warn!("Claims fetch failed; treating navigation as unauthenticated");
                }
                let committed = self.commit(epoch, Phase::Unauthenticated, None);
                if route.is_protected() {
                    if committed {
                        self.set_notice(Notice::AuthenticationRequired);
                    }
                    Directive::Redirect(Route::Home)
                } else {
                    Directive::Allow
                }
            }
        }
    }

    async fn process_callback(&self, epoch: u64, params: Option<&CallbackParams>) -> Directive {
        self.set_phase_if_current(epoch, Phase::ProcessingCallback);

        let empty = CallbackParams::default();
        let params = params.unwrap_or(&empty);

        match self.client.handle_auth_callback(params).await {
            Ok(()) => {
                // Exit early without re-running the general check: the
                // credential is stored and the post-login page re-derives
                // the full state, claims included. Loading stays on until
                // that fetch lands.
                self.set_phase_if_current(epoch, Phase::Authenticated);
                Directive::Redirect(POST_LOGIN)
            }
            Err(e) => {
                warn!("Authorization callback failed: {e}");
                let committed = self.commit(epoch, Phase::Unauthenticated, None);
                if committed {
                    self.set_notice(Notice::SignInIncomplete);
                }
                Directive::Redirect(Route::Home)
            }
        }
    }

    /// Initiate the login redirect. Does not change the authenticated state;
    /// the redirect leaves the page. Loading is on for the duration of the
    /// initiation call only.
    pub async fn login(&self) -> Result<String, Error> {
        self.set_loading(true);
        let result = self.client.login().await;
        self.set_loading(false);

        match result {
            Ok(url) => Ok(url),
            Err(e) => {
                error!("Login initiation failed: {e}");
                self.set_notice(Notice::LoginFailed);
                Err(session_error(SessionErrorKind::LoginInitiation, e))
            }
        }
    }

    /// Sign out. The state is driven to Unauthenticated up front, regardless
    /// of how the adapter's remote sign-out fares; returns the route to send
    /// the visitor to.
    pub async fn logout(&self) -> Route {
        // Invalidate any in-flight check so a stale result cannot resurrect
        // the session.
        {
            let mut inner = self.inner.lock().unwrap();
            inner.epoch += 1;
            inner.phase = Phase::Unauthenticated;
            inner.user = None;
            inner.is_loading = true;
        }

        self.client.logout().await;

        {
            let mut inner = self.inner.lock().unwrap();
            inner.is_loading = false;
            inner.notice = Some(Notice::LoggedOut);
        }
        Route::Home
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> Session {
        let inner = self.inner.lock().unwrap();
        Session {
            is_authenticated: matches!(inner.phase, Phase::Authenticated),
            is_loading: inner.is_loading,
            user: inner.user.clone(),
        }
    }

    /// Take the pending notice, if any. Notices are shown once.
    pub fn take_notice(&self) -> Option<Notice> {
        self.inner.lock().unwrap().notice.take()
    }

    fn begin_navigation(&self) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        inner.epoch += 1;
        inner.phase = Phase::Initializing;
        inner.is_loading = true;
        inner.epoch
    }

    /// Commit a terminal state for a navigation. Returns false (and leaves
    /// the state untouched) when a newer navigation has superseded it.
    fn commit(&self, epoch: u64, phase: Phase, user: Option<User>) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.epoch != epoch {
            debug!("Discarding stale auth check result");
            return false;
        }
        inner.phase = phase;
        inner.user = user;
        inner.is_loading = false;
        true
    }

    fn set_phase_if_current(&self, epoch: u64, phase: Phase) {
        let mut inner = self.inner.lock().unwrap();
        if inner.epoch != epoch {
            return;
        }
        inner.phase = phase;
        inner.user = None;
    }

    fn set_loading(&self, loading: bool) {
        self.inner.lock().unwrap().is_loading = loading;
    }

    fn set_notice(&self, notice: Notice) {
        self.inner.lock().unwrap().notice = Some(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use identity::error::{oauth_error, Error as IdentityError, OAuthErrorKind};
    use identity::oidc::Claims;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    fn jane_claims() -> Claims {
        Claims {
            sub: "00u1".to_string(),
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            preferred_username: Some("jdoe".to_string()),
            groups: vec![],
            extra: Default::default(),
        }
    }

    /// Stateful fake adapter: login opens a pending state token, the
    /// callback validates against it, and logout always clears.
    #[derive(Default)]
    struct FakeIdentity {
        authed: AtomicBool,
        pending_state: Mutex<Option<String>>,
        login_fails: bool,
    }

    #[async_trait]
    impl IdentityClient for FakeIdentity {
        async fn login(&self) -> Result<String, IdentityError> {
            if self.login_fails {
                return Err(oauth_error(OAuthErrorKind::InitiationFailed, "down"));
            }
            self.authed.store(false, Ordering::SeqCst);
            *self.pending_state.lock().unwrap() = Some("xyz".to_string());
            Ok("https://idp.example/authorize?state=xyz".to_string())
        }

        async fn logout(&self) {
            self.authed.store(false, Ordering::SeqCst);
        }

        async fn is_authenticated(&self) -> bool {
            self.authed.load(Ordering::SeqCst)
        }

        async fn get_user_info(&self) -> Option<Claims> {
            if self.authed.load(Ordering::SeqCst) {
                Some(jane_claims())
            } else {
                None
            }
        }

        async fn handle_auth_callback(&self, params: &CallbackParams) -> Result<(), IdentityError> {
            let expected = self.pending_state.lock().unwrap().take();
            match (&params.code, &params.state, expected) {
                (Some(_), Some(state), Some(expected)) if *state == expected => {
                    self.authed.store(true, Ordering::SeqCst);
                    Ok(())
                }
                _ => Err(oauth_error(OAuthErrorKind::InvalidState, "mismatch")),
            }
        }
    }

    fn store_with(client: FakeIdentity) -> SessionStore {
        SessionStore::new(Arc::new(client))
    }

    fn callback_params(code: &str, state: &str) -> CallbackParams {
        CallbackParams {
            code: Some(code.to_string()),
            state: Some(state.to_string()),
            error: None,
            error_description: None,
        }
    }

    #[tokio::test]
    async fn test_unauthenticated_protected_navigation_redirects_home() {
        let store = store_with(FakeIdentity::default());

        let directive = store.navigate(Route::Video, None).await;

        assert_eq!(directive, Directive::Redirect(Route::Home));
        let session = store.snapshot();
        assert!(!session.is_authenticated);
        assert!(!session.is_loading);
        assert!(session.user.is_none());
        assert_eq!(store.take_notice(), Some(Notice::AuthenticationRequired));
    }

    #[tokio::test]
    async fn test_unauthenticated_public_navigation_is_allowed() {
        let store = store_with(FakeIdentity::default());

        let directive = store.navigate(Route::Home, None).await;

        assert_eq!(directive, Directive::Allow);
        assert!(store.take_notice().is_none());
    }

    #[tokio::test]
    async fn test_authenticated_navigation_populates_user() {
        let client = FakeIdentity::default();
        client.authed.store(true, Ordering::SeqCst);
        let store = store_with(client);

        let directive = store.navigate(Route::Profile, None).await;

        assert_eq!(directive, Directive::Allow);
        let session = store.snapshot();
        assert!(session.is_authenticated);
        assert!(!session.is_loading);
        assert_eq!(session.user.unwrap().initials(), "JD");
    }

    #[tokio::test]
    async fn test_login_then_callback_lands_on_video() {
        let store = store_with(FakeIdentity::default());

        // Unauthenticated visitor on the landing page.
        assert_eq!(store.navigate(Route::Home, None).await, Directive::Allow);
        assert!(!store.snapshot().is_authenticated);

        // Login click issues the redirect.
        let url = store.login().await.unwrap();
        assert!(url.contains("state=xyz"));

        // Simulated return from the provider.
        let params = callback_params("abc", "xyz");
        let directive = store.navigate(Route::Callback, Some(&params)).await;
        assert_eq!(directive, Directive::Redirect(Route::Video));

        // No Unauthenticated flash: the store is already authenticated.
        assert!(store.snapshot().is_authenticated);

        // The post-login navigation completes the claims fetch.
        assert_eq!(store.navigate(Route::Video, None).await, Directive::Allow);
        let session = store.snapshot();
        assert!(session.is_authenticated);
        assert_eq!(session.user.unwrap().name.as_deref(), Some("Jane Doe"));
    }

    #[tokio::test]
    async fn test_callback_failure_routes_home_with_notice() {
        let store = store_with(FakeIdentity::default());
        store.login().await.unwrap();

        let params = callback_params("abc", "forged");
        let directive = store.navigate(Route::Callback, Some(&params)).await;

        assert_eq!(directive, Directive::Redirect(Route::Home));
        assert!(!store.snapshot().is_authenticated);
        assert_eq!(store.take_notice(), Some(Notice::SignInIncomplete));
    }

    #[tokio::test]
    async fn test_callback_without_payload_fails() {
        let store = store_with(FakeIdentity::default());

        let directive = store.navigate(Route::Callback, None).await;

        assert_eq!(directive, Directive::Redirect(Route::Home));
        assert!(!store.snapshot().is_authenticated);
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_notice() {
        let store = store_with(FakeIdentity {
            login_fails: true,
            ..Default::default()
        });

        let err = store.login().await.unwrap_err();
        assert_eq!(err.error_kind, SessionErrorKind::LoginInitiation);
        assert_eq!(store.take_notice(), Some(Notice::LoginFailed));
        assert!(!store.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_logout_twice_is_idempotent() {
        let client = FakeIdentity::default();
        client.authed.store(true, Ordering::SeqCst);
        let store = store_with(client);
        store.navigate(Route::Video, None).await;
        assert!(store.snapshot().is_authenticated);

        assert_eq!(store.logout().await, Route::Home);
        assert_eq!(store.logout().await, Route::Home);

        let session = store.snapshot();
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
        assert_eq!(store.take_notice(), Some(Notice::LoggedOut));
    }

    #[tokio::test]
    async fn test_superseded_commit_leaves_newer_navigation_loading() {
        let store = store_with(FakeIdentity::default());

        // Navigation B starts, then C supersedes it before B's check lands.
        let stale_epoch = store.begin_navigation();
        store.begin_navigation();

        let committed = store.commit(
            stale_epoch,
            Phase::Authenticated,
            Some(User::from(jane_claims())),
        );

        // B's terminal state must not land while C's check is outstanding.
        assert!(!committed);
        let session = store.snapshot();
        assert!(!session.is_authenticated);
        assert!(session.is_loading);
        assert!(session.user.is_none());
    }

    /// Adapter whose first auth check blocks until released, so a second
    /// navigation can supersede it.
    struct GatedIdentity {
        release: Arc<Notify>,
        gate_next: AtomicBool,
    }

    #[async_trait]
    impl IdentityClient for GatedIdentity {
        async fn login(&self) -> Result<String, IdentityError> {
            Ok("https://idp.example/authorize".to_string())
        }

        async fn logout(&self) {}

        async fn is_authenticated(&self) -> bool {
            if self.gate_next.swap(false, Ordering::SeqCst) {
                self.release.notified().await;
                false
            } else {
                true
            }
        }

        async fn get_user_info(&self) -> Option<Claims> {
            Some(jane_claims())
        }

        async fn handle_auth_callback(&self, _params: &CallbackParams) -> Result<(), IdentityError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stale_check_does_not_overwrite_newer_navigation() {
        let release = Arc::new(Notify::new());
        let store = Arc::new(SessionStore::new(Arc::new(GatedIdentity {
            release: release.clone(),
            gate_next: AtomicBool::new(true),
        })));

        // Navigation A hangs inside its auth check.
        let store_a = store.clone();
        let nav_a = tokio::spawn(async move { store_a.navigate(Route::Video, None).await });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(store.snapshot().is_loading);

        // Navigation B supersedes it and resolves authenticated.
        let directive_b = store.navigate(Route::Profile, None).await;
        assert_eq!(directive_b, Directive::Allow);
        assert!(store.snapshot().is_authenticated);

        // A's stale unauthenticated result resolves and must be discarded.
        release.notify_one();
        nav_a.await.unwrap();

        let session = store.snapshot();
        assert!(session.is_authenticated);
        assert!(!session.is_loading);
        assert!(session.user.is_some());
        // The stale protected-route redirect must not raise a notice either.
        assert!(store.take_notice().is_none());
    }
}
