//! Filter engine deriving the displayed recipe subset.

use serde::{Deserialize, Serialize};

use crate::recipe::Recipe;

/// Keyword selecting the rating sort instead of a category.
pub const POPULAR: &str = "popular";

/// The active home-page filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum CategoryFilter {
    /// Every recipe, original order.
    #[default]
    All,
    /// Every recipe, highest rated first.
    Popular,
    /// Recipes whose category matches exactly.
    Category(String),
}

impl CategoryFilter {
    /// Interpret an optional filter value. Empty means no filter.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Self::All,
            Some(POPULAR) => Self::Popular,
            Some(category) => Self::Category(category.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Popular => Some(POPULAR),
            Self::Category(category) => Some(category),
        }
    }

    /// Derive the visible list. The input is never modified.
    #[must_use]
    pub fn apply(&self, recipes: &[Recipe]) -> Vec<Recipe> {
        match self {
            Self::All => recipes.to_vec(),
            Self::Popular => {
                let mut sorted = recipes.to_vec();
                // Stable: equal ratings keep their relative order.
                sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));
                sorted
            }
            Self::Category(category) => recipes
                .iter()
                .filter(|r| &r.category == category)
                .cloned()
                .collect(),
        }
    }
}

impl From<Option<String>> for CategoryFilter {
    fn from(value: Option<String>) -> Self {
        Self::parse(value.as_deref())
    }
}

impl From<CategoryFilter> for Option<String> {
    fn from(filter: CategoryFilter) -> Self {
        filter.as_str().map(str::to_owned)
    }
}
