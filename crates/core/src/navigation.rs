//! URL fragment grammar and view reconciliation.
//!
//! The fragment is the only externalized navigation state. [`reconcile`]
//! turns a fragment into the view to show, plus an optional rewrite of the
//! fragment when it cannot be honored. It is pure so every client applies
//! exactly the same rules.

use std::fmt;

use crate::recipe::Recipe;
use crate::types::RecipeId;

const RECIPE_PREFIX: &str = "recipe/";
const PROFILE: &str = "profile";
const PLAYLISTS: &str = "playlists";

/// A parsed fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Recipe(RecipeId),
    Profile,
    Playlists,
    /// Anything outside the grammar, kept verbatim.
    Unrecognized(String),
}

impl Route {
    /// Parse a fragment. A single leading `#` is tolerated.
    #[must_use]
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        match fragment {
            "" => Self::Home,
            PROFILE => Self::Profile,
            PLAYLISTS => Self::Playlists,
            other => match other.strip_prefix(RECIPE_PREFIX) {
                Some(id) if !id.is_empty() => Self::Recipe(RecipeId::new(id)),
                _ => Self::Unrecognized(other.to_owned()),
            },
        }
    }

    /// The fragment text for this route, without a leading `#`.
    #[must_use]
    pub fn to_fragment(&self) -> String {
        match self {
            Self::Home => String::new(),
            Self::Recipe(id) => format!("{RECIPE_PREFIX}{id}"),
            Self::Profile => PROFILE.to_owned(),
            Self::Playlists => PLAYLISTS.to_owned(),
            Self::Unrecognized(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fragment())
    }
}

/// What is on screen. A recipe view always carries its selection, so an
/// invalid (view, selection) pair cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Recipe(RecipeId),
    Profile,
    Playlists,
}

impl View {
    #[must_use]
    pub const fn selected_recipe(&self) -> Option<&RecipeId> {
        match self {
            Self::Recipe(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn route(&self) -> Route {
        match self {
            Self::Home => Route::Home,
            Self::Recipe(id) => Route::Recipe(id.clone()),
            Self::Profile => Route::Profile,
            Self::Playlists => Route::Playlists,
        }
    }

    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Recipe(_) => "recipe",
            Self::Profile => PROFILE,
            Self::Playlists => PLAYLISTS,
        }
    }
}

/// The recipe snapshot a fragment is resolved against.
#[derive(Debug, Clone, Copy)]
pub enum Catalog<'a> {
    Loading,
    Loaded(&'a [Recipe]),
}

impl Catalog<'_> {
    fn contains(&self, id: &RecipeId) -> Option<bool> {
        match self {
            Self::Loading => None,
            Self::Loaded(recipes) => Some(recipes.iter().any(|r| &r.id == id)),
        }
    }
}

/// How a fragment was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The fragment was honored as written.
    Settled,
    /// A recipe link arrived before the catalog; retry after loading.
    Deferred,
    /// The recipe id does not exist.
    DeadLink,
    /// The view needs a signed-in user.
    AuthRequired,
    /// The fragment is outside the grammar.
    Unrecognized,
}

/// Result of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub view: View,
    /// Replacement fragment to write (with history replace), if any.
    pub rewrite: Option<String>,
    pub outcome: NavOutcome,
}

impl Reconciled {
    const fn settled(view: View) -> Self {
        Self {
            view,
            rewrite: None,
            outcome: NavOutcome::Settled,
        }
    }

    const fn home_cleared(outcome: NavOutcome) -> Self {
        Self {
            view: View::Home,
            rewrite: Some(String::new()),
            outcome,
        }
    }
}

/// Resolve a fragment against the catalog and session.
#[must_use]
pub fn reconcile(fragment: &str, catalog: Catalog<'_>, signed_in: bool) -> Reconciled {
    match Route::parse(fragment) {
        Route::Home => Reconciled::settled(View::Home),
        Route::Recipe(id) => match catalog.contains(&id) {
            Some(true) => Reconciled::settled(View::Recipe(id)),
            Some(false) => Reconciled::home_cleared(NavOutcome::DeadLink),
            None => Reconciled {
                view: View::Home,
                rewrite: None,
                outcome: NavOutcome::Deferred,
            },
        },
        Route::Profile if signed_in => Reconciled::settled(View::Profile),
        Route::Playlists if signed_in => Reconciled::settled(View::Playlists),
        Route::Profile | Route::Playlists => Reconciled::home_cleared(NavOutcome::AuthRequired),
        Route::Unrecognized(_) => Reconciled::home_cleared(NavOutcome::Unrecognized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::starter_recipes;

    #[test]
    fn test_parse_grammar() {
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("#"), Route::Home);
        assert_eq!(Route::parse("#recipe/1"), Route::Recipe(RecipeId::new("1")));
        assert_eq!(Route::parse("recipe/abc"), Route::Recipe(RecipeId::new("abc")));
        assert_eq!(Route::parse("profile"), Route::Profile);
        assert_eq!(Route::parse("#playlists"), Route::Playlists);
        assert_eq!(
            Route::parse("recipe/"),
            Route::Unrecognized("recipe/".to_owned())
        );
        assert_eq!(Route::parse("cart"), Route::Unrecognized("cart".to_owned()));
    }

    #[test]
    fn test_to_fragment_roundtrip() {
        for fragment in ["", "recipe/1", "profile", "playlists"] {
            assert_eq!(Route::parse(fragment).to_fragment(), fragment);
        }
    }

    #[test]
    fn test_recipe_fragment_resolves() {
        let recipes = starter_recipes();
        let r = reconcile("#recipe/2", Catalog::Loaded(&recipes), false);
        assert_eq!(r.view, View::Recipe(RecipeId::new("2")));
        assert_eq!(r.view.selected_recipe(), Some(&RecipeId::new("2")));
        assert_eq!(r.rewrite, None);
        assert_eq!(r.outcome, NavOutcome::Settled);
    }

    #[test]
    fn test_dead_link_goes_home_and_clears() {
        let recipes = starter_recipes();
        let r = reconcile("recipe/999", Catalog::Loaded(&recipes), true);
        assert_eq!(r.view, View::Home);
        assert_eq!(r.view.selected_recipe(), None);
        assert_eq!(r.rewrite.as_deref(), Some(""));
        assert_eq!(r.outcome, NavOutcome::DeadLink);
    }

    #[test]
    fn test_recipe_link_deferred_while_loading() {
        let r = reconcile("recipe/1", Catalog::Loading, false);
        assert_eq!(r.view, View::Home);
        assert_eq!(r.rewrite, None);
        assert_eq!(r.outcome, NavOutcome::Deferred);
    }

    #[test]
    fn test_session_views_require_sign_in() {
        let recipes = starter_recipes();
        let catalog = Catalog::Loaded(&recipes);
        assert_eq!(reconcile("profile", catalog, true).view, View::Profile);
        assert_eq!(reconcile("playlists", catalog, true).view, View::Playlists);

        let r = reconcile("profile", catalog, false);
        assert_eq!(r.view, View::Home);
        assert_eq!(r.rewrite.as_deref(), Some(""));
        assert_eq!(r.outcome, NavOutcome::AuthRequired);
    }

    #[test]
    fn test_unrecognized_clears() {
        let r = reconcile("#/weird/path", Catalog::Loading, true);
        assert_eq!(r.view, View::Home);
        assert_eq!(r.rewrite.as_deref(), Some(""));
        assert_eq!(r.outcome, NavOutcome::Unrecognized);
    }
}
