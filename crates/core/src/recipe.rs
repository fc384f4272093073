//! Recipes, their ingredients and steps, and the draft builder used to
//! author new ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{RecipeId, UserId};

/// Rating given to every freshly published recipe.
pub const DEFAULT_RATING: f64 = 5.0;

/// A recipe as stored and served.
///
/// Recipes are append-only: once created they are never patched field by
/// field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
    /// Preparation time in minutes.
    #[serde(default)]
    pub prep_time: u32,
    /// Cooking time in minutes.
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Recipe {
    /// Total time in minutes.
    #[must_use]
    pub const fn total_time(&self) -> u32 {
        self.prep_time.saturating_add(self.cook_time)
    }

    /// Build a published recipe from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns the draft's [`ValidationError`] if it is incomplete.
    pub fn publish(
        draft: RecipeDraft,
        id: RecipeId,
        author_id: Option<UserId>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        draft.validate()?;
        let tags = draft.effective_tags();
        Ok(Self {
            id,
            title: draft.title.trim().to_owned(),
            description: draft.description,
            rating: DEFAULT_RATING,
            reviews: 0,
            prep_time: draft.prep_time,
            cook_time: draft.cook_time,
            calories: draft.calories,
            difficulty: draft.difficulty,
            category: draft.category,
            image: draft.image.trim().to_owned(),
            ingredients: draft.ingredients,
            steps: draft.steps,
            tags,
            author_id,
            created_at: Some(created_at),
        })
    }
}

/// One ingredient line. `amount` is relative to two servings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

impl Ingredient {
    #[must_use]
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: unit.into(),
        }
    }
}

/// One preparation step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Step {
    pub title: String,
    pub text: String,
}

impl Step {
    #[must_use]
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Reasons a draft cannot be published.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("ingredient {index} has no name")]
    UnnamedIngredient { index: usize },

    #[error("ingredient {index} has an invalid amount")]
    InvalidAmount { index: usize },
}

/// The authoring form for a new recipe.
///
/// `title` and `image` are required; everything else falls back to the
/// defaults of the publishing form. Deserializes from the same camelCase
/// shape as [`Recipe`], minus the server-assigned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeDraft {
    pub title: String,
    pub image: String,
    pub description: String,
    pub category: String,
    pub difficulty: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub calories: u32,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub tags: Vec<String>,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            image: String::new(),
            description: String::new(),
            category: "Almoço/Jantar".to_owned(),
            difficulty: "Fácil".to_owned(),
            prep_time: 20,
            cook_time: 30,
            calories: 450,
            ingredients: Vec::new(),
            steps: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl RecipeDraft {
    /// Start a draft with its two required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: image.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = difficulty.into();
        self
    }

    #[must_use]
    pub const fn times(mut self, prep_minutes: u32, cook_minutes: u32) -> Self {
        self.prep_time = prep_minutes;
        self.cook_time = cook_minutes;
        self
    }

    #[must_use]
    pub const fn calories(mut self, calories: u32) -> Self {
        self.calories = calories;
        self
    }

    #[must_use]
    pub fn ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Check required fields and ingredient sanity.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.image.trim().is_empty() {
            return Err(ValidationError::MissingField("image"));
        }
        for (index, ingredient) in self.ingredients.iter().enumerate() {
            if ingredient.name.trim().is_empty() {
                return Err(ValidationError::UnnamedIngredient { index });
            }
            if !ingredient.amount.is_finite() || ingredient.amount < 0.0 {
                return Err(ValidationError::InvalidAmount { index });
            }
        }
        Ok(())
    }

    /// Tags to publish with: explicit tags deduplicated in order, or
    /// `[category, difficulty]` when none were given.
    fn effective_tags(&self) -> Vec<String> {
        let source = if self.tags.is_empty() {
            vec![self.category.clone(), self.difficulty.clone()]
        } else {
            self.tags.clone()
        };

        let mut tags: Vec<String> = Vec::with_capacity(source.len());
        for tag in source {
            let tag = tag.trim().to_owned();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }
}
