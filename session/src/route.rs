//! Application routes the session state machine reacts to.

/// The fixed set of routes the state machine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Public landing page.
    Home,
    /// Protected video page; also the fixed post-login destination.
    Video,
    /// Protected profile page.
    Profile,
    /// Authorization callback path. Renders nothing itself; it exists to
    /// trigger the callback transition.
    Callback,
}

/// Fixed destination after a successful login callback.
pub const POST_LOGIN: Route = Route::Video;

impl Route {
    /// The URL path for this route.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Video => "/video",
            Route::Profile => "/profile",
            Route::Callback => "/login/callback",
        }
    }

    /// Whether unauthenticated visitors must be redirected away.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Video | Route::Profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_routes() {
        assert!(Route::Video.is_protected());
        assert!(Route::Profile.is_protected());
        assert!(!Route::Home.is_protected());
        assert!(!Route::Callback.is_protected());
    }

    #[test]
    fn test_post_login_destination_is_video() {
        assert_eq!(POST_LOGIN, Route::Video);
        assert_eq!(POST_LOGIN.path(), "/video");
    }
}
