//! Read-only projection of the identity provider's user claims.

use identity::oidc::Claims;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// The authenticated user as the UI sees them.
///
/// Built from the provider's claims on every authenticated navigation and
/// never mutated or persisted locally.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub sub: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub groups: Vec<String>,
    pub extra: HashMap<String, Value>,
}

impl User {
    /// Initials for the avatar fallback.
    ///
    /// First letter of each word of the display name; otherwise the first
    /// two characters of the username; otherwise "U".
    pub fn initials(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name
                .split_whitespace()
                .filter_map(|word| word.chars().next())
                .collect::<String>()
                .to_uppercase();
        }

        match self.username.as_deref().filter(|u| !u.is_empty()) {
            Some(username) => username.chars().take(2).collect::<String>().to_uppercase(),
            None => "U".to_string(),
        }
    }
}

impl From<Claims> for User {
    fn from(claims: Claims) -> Self {
        Self {
            sub: claims.sub,
            name: claims.name,
            email: claims.email,
            username: claims.preferred_username,
            groups: claims.groups,
            extra: claims.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>, username: Option<&str>) -> User {
        User {
            sub: "00u1".to_string(),
            name: name.map(str::to_string),
            email: None,
            username: username.map(str::to_string),
            groups: vec![],
            extra: HashMap::new(),
        }
    }

    #[test]
    fn test_initials_from_full_name() {
        assert_eq!(user(Some("Jane Doe"), None).initials(), "JD");
    }

    #[test]
    fn test_initials_from_three_part_name() {
        assert_eq!(user(Some("Ada Byron Lovelace"), None).initials(), "ABL");
    }

    #[test]
    fn test_initials_fall_back_to_username() {
        assert_eq!(user(None, Some("jdoe")).initials(), "JD");
    }

    #[test]
    fn test_initials_last_resort() {
        assert_eq!(user(None, None).initials(), "U");
        assert_eq!(user(Some("   "), None).initials(), "U");
    }
}
