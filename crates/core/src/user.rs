//! User records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{Email, RecipeId, UserId};

/// How a user signed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Email,
    Google,
    Apple,
}

impl Provider {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Google => "google",
            Self::Apple => "apple",
        }
    }

    /// Third-party providers have already verified the address.
    #[must_use]
    pub const fn verifies_email(self) -> bool {
        !matches!(self, Self::Email)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user. Never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub favorites: BTreeSet<RecipeId>,
    #[serde(default)]
    pub provider: Provider,
    #[serde(default)]
    pub is_verified: bool,
}

impl User {
    /// A fresh user with no favorites.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: Email, provider: Provider) -> Self {
        Self {
            id,
            name: name.into(),
            email,
            favorites: BTreeSet::new(),
            provider,
            is_verified: provider.verifies_email(),
        }
    }

    #[must_use]
    pub fn is_favorite(&self, recipe_id: &RecipeId) -> bool {
        self.favorites.contains(recipe_id)
    }

    /// Flip membership of `recipe_id` in the favorites set.
    pub fn toggle_favorite(&mut self, recipe_id: RecipeId) {
        if !self.favorites.remove(&recipe_id) {
            self.favorites.insert(recipe_id);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(provider: Provider) -> User {
        User::new(
            UserId::new("u1"),
            "Ana",
            Email::parse("ana@example.com").unwrap(),
            provider,
        )
    }

    #[test]
    fn test_email_signups_start_unverified() {
        assert!(!user(Provider::Email).is_verified);
        assert!(user(Provider::Google).is_verified);
        assert!(user(Provider::Apple).is_verified);
    }

    #[test]
    fn test_toggle_favorite_twice_restores() {
        let mut u = user(Provider::Email);
        u.toggle_favorite(RecipeId::new("1"));
        assert!(u.is_favorite(&RecipeId::new("1")));
        u.toggle_favorite(RecipeId::new("1"));
        assert!(u.favorites.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut u = user(Provider::Google);
        u.toggle_favorite(RecipeId::new("2"));
        let json = serde_json::to_value(&u).unwrap();
        assert_eq!(json["provider"], "google");
        assert_eq!(json["isVerified"], true);
        assert_eq!(json["favorites"], serde_json::json!(["2"]));
    }

    #[test]
    fn test_missing_provider_defaults_to_email() {
        let u: User = serde_json::from_str(
            r#"{"id":"x","name":"Bia","email":"bia@example.com","favorites":["1","1"]}"#,
        )
        .unwrap();
        assert_eq!(u.provider, Provider::Email);
        assert_eq!(u.favorites.len(), 1);
        assert!(!u.is_verified);
    }
}
