//! JSON bodies exchanged between the HTTP server and remote clients.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::recipe::RecipeDraft;
use crate::shopping::ShoppingItem;
use crate::types::{Email, RecipeId, UserId};
use crate::user::Provider;

/// `POST /api/recipes`: the draft fields plus the optional author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipeRequest {
    #[serde(flatten)]
    pub draft: RecipeDraft,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<UserId>,
}

/// `POST /api/users`. A missing provider means email signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserRequest {
    #[serde(default)]
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub provider: Provider,
}

/// `POST /api/users/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub email: Email,
}

/// Response of `POST /api/favorites/{user_id}/{recipe_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesResponse {
    pub favorites: BTreeSet<RecipeId>,
}

/// `POST /api/shopping-lists/{user_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItemsRequest {
    pub items: Vec<ShoppingItem>,
}

/// `POST /api/chef/advice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChefAdviceRequest {
    pub recipe_title: String,
    pub question: String,
}

/// Response of `POST /api/chef/advice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChefAdviceResponse {
    pub answer: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_recipe_request_is_flat() {
        let body: NewRecipeRequest =
            serde_json::from_str(r#"{"title":"Bolo","image":"img","authorId":"u1"}"#).unwrap();
        assert_eq!(body.draft.title, "Bolo");
        assert_eq!(body.draft.prep_time, 20);
        assert_eq!(body.author_id, Some(UserId::new("u1")));

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["authorId"], "u1");
        assert_eq!(json["title"], "Bolo");
    }

    #[test]
    fn test_new_user_request_defaults_provider() {
        let body: NewUserRequest =
            serde_json::from_str(r#"{"name":"Ana","email":"ana@example.com"}"#).unwrap();
        assert_eq!(body.provider, Provider::Email);
        assert!(serde_json::from_str::<NewUserRequest>(r#"{"email":"nope"}"#).is_err());
    }

    #[test]
    fn test_chef_request_camel_case() {
        let body: ChefAdviceRequest =
            serde_json::from_str(r#"{"recipeTitle":"Bolo","question":"Forno?"}"#).unwrap();
        assert_eq!(body.recipe_title, "Bolo");
    }
}
