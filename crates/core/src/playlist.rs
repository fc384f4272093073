//! Favorites grouped by category.

use serde::Serialize;

use crate::recipe::Recipe;
use crate::user::User;

/// One category's worth of a user's favorite recipes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Playlist {
    pub category: String,
    pub recipes: Vec<Recipe>,
}

/// Group `user`'s favorites by category.
///
/// Categories appear in the order their first favorite appears in
/// `recipes`; favorites that no longer resolve to a recipe are skipped.
#[must_use]
pub fn playlists_for(user: &User, recipes: &[Recipe]) -> Vec<Playlist> {
    let mut playlists: Vec<Playlist> = Vec::new();
    for recipe in recipes.iter().filter(|r| user.is_favorite(&r.id)) {
        match playlists.iter_mut().find(|p| p.category == recipe.category) {
            Some(playlist) => playlist.recipes.push(recipe.clone()),
            None => playlists.push(Playlist {
                category: recipe.category.clone(),
                recipes: vec![recipe.clone()],
            }),
        }
    }
    playlists
}
