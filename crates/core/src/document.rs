//! The single persisted document and the operations both backends apply.
//!
//! Every backend stores exactly one [`Document`] and follows the same
//! discipline: read the whole document, mutate it through the methods here,
//! write the whole document back. Keeping the mutations in one place means
//! the browser-style local backend and the file-backed server cannot drift.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recipe::{Recipe, RecipeDraft, ValidationError};
use crate::seed;
use crate::shopping::ShoppingItem;
use crate::types::{Email, RecipeId, UserId};
use crate::user::{Provider, User};

/// Errors from document operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("user not found: {0}")]
    UserNotFound(String),
}

/// `{ users, recipes, shoppingLists }`.
///
/// The legacy key `shoppingList` is accepted on read. Unknown keys are
/// ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    recipes: Vec<Recipe>,
    #[serde(default, alias = "shoppingList")]
    shopping_lists: BTreeMap<UserId, Vec<ShoppingItem>>,
}

/// How a document came to be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Parsed from stored data.
    Existing,
    /// Nothing was stored; the starter catalog was used.
    Seeded,
    /// Stored data did not parse and was replaced by the starter catalog.
    Reseeded { reason: String },
}

/// Result of [`Document::load_or_seed`].
#[derive(Debug, Clone)]
pub struct Loaded {
    pub document: Document,
    pub status: LoadStatus,
}

impl Loaded {
    /// Whether the document must be written back before use.
    #[must_use]
    pub fn needs_write(&self) -> bool {
        !matches!(self.status, LoadStatus::Existing)
    }
}

impl Document {
    /// A fresh document holding the starter catalog.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            recipes: seed::starter_recipes(),
            ..Self::default()
        }
    }

    /// Parse stored JSON.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if `raw` is not a document.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Parse stored data, falling back to the starter catalog.
    ///
    /// Malformed data never escapes as an error: it is reported through
    /// [`LoadStatus::Reseeded`] so the caller can log it.
    #[must_use]
    pub fn load_or_seed(raw: Option<&str>) -> Loaded {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Loaded {
                document: Self::seeded(),
                status: LoadStatus::Seeded,
            };
        };

        match Self::parse(raw) {
            Ok(document) => Loaded {
                document,
                status: LoadStatus::Existing,
            },
            Err(e) => Loaded {
                document: Self::seeded(),
                status: LoadStatus::Reseeded {
                    reason: e.to_string(),
                },
            },
        }
    }

    /// Serialize for storage.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    // =========================================================================
    // Recipes
    // =========================================================================

    /// All recipes, newest user submissions first.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    #[must_use]
    pub fn recipe(&self, id: &RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| &r.id == id)
    }

    /// Publish a draft under a fresh id and prepend it.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Validation`] if the draft is incomplete.
    pub fn create_recipe(
        &mut self,
        draft: RecipeDraft,
        author_id: Option<UserId>,
        now: DateTime<Utc>,
    ) -> Result<Recipe, DocumentError> {
        draft.validate()?;
        let id = RecipeId::generate(|candidate| self.recipe(candidate).is_some());
        let recipe = Recipe::publish(draft, id, author_id, now)?;
        self.recipes.insert(0, recipe.clone());
        Ok(recipe)
    }

    // =========================================================================
    // Users
    // =========================================================================

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Exact, case-sensitive lookup.
    #[must_use]
    pub fn user_by_email(&self, email: &Email) -> Option<&User> {
        self.users.iter().find(|u| &u.email == email)
    }

    /// A user whose address differs from `email` only by case, if any.
    ///
    /// Lookups stay exact; this only feeds diagnostics.
    #[must_use]
    pub fn user_with_case_variant(&self, email: &Email) -> Option<&User> {
        self.users
            .iter()
            .find(|u| &u.email != email && u.email.eq_ignore_case(email))
    }

    #[must_use]
    pub fn user_by_id(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    /// Return the user registered under `email`, creating one if absent.
    ///
    /// Idempotent per email value: the second call returns the first
    /// record unchanged, whatever `name` and `provider` it is given.
    pub fn create_or_get_user(&mut self, name: &str, email: Email, provider: Provider) -> User {
        if let Some(existing) = self.user_by_email(&email) {
            return existing.clone();
        }
        let id = UserId::generate(|candidate| self.user_by_id(candidate).is_some());
        let user = User::new(id, name.trim(), email, provider);
        self.users.push(user.clone());
        user
    }

    /// Mark a user's address as verified.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UserNotFound`] if no user has this email.
    pub fn verify_user(&mut self, email: &Email) -> Result<User, DocumentError> {
        let user = self
            .users
            .iter_mut()
            .find(|u| &u.email == email)
            .ok_or_else(|| DocumentError::UserNotFound(email.to_string()))?;
        user.is_verified = true;
        Ok(user.clone())
    }

    /// Flip a recipe in a user's favorites and return the resulting set.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UserNotFound`] for an unknown user id.
    pub fn toggle_favorite(
        &mut self,
        user_id: &UserId,
        recipe_id: RecipeId,
    ) -> Result<BTreeSet<RecipeId>, DocumentError> {
        let user = self
            .users
            .iter_mut()
            .find(|u| &u.id == user_id)
            .ok_or_else(|| DocumentError::UserNotFound(user_id.to_string()))?;
        user.toggle_favorite(recipe_id);
        Ok(user.favorites.clone())
    }

    // =========================================================================
    // Shopping lists
    // =========================================================================

    /// Append items to a user's list. Items are always stored unchecked.
    pub fn append_shopping_items(&mut self, user_id: UserId, items: Vec<ShoppingItem>) {
        self.shopping_lists
            .entry(user_id)
            .or_default()
            .extend(items.into_iter().map(|item| ShoppingItem {
                checked: false,
                ..item
            }));
    }

    /// A user's list, empty if they never added anything.
    #[must_use]
    pub fn shopping_list(&self, user_id: &UserId) -> Vec<ShoppingItem> {
        self.shopping_lists
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}
