//! End-to-end flows through the client `App`, in server mode unless noted.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chef_em_casa_app::{
    App, ClientError, FragmentHost, KeyValueStore, MemoryLocation, MemoryStorage, NavIntent,
};
use chef_em_casa_core::{NavOutcome, Provider, RecipeDraft, RecipeId, Servings, View};
use chef_em_casa_integration_tests::TestServer;

fn ids(recipes: &[chef_em_casa_core::Recipe]) -> Vec<&str> {
    recipes.iter().map(|r| r.id.as_str()).collect()
}

/// An app against `server` starting at `fragment`.
fn remote_app(server: &TestServer, fragment: &str) -> (App, MemoryLocation, Arc<MemoryStorage>) {
    let location = MemoryLocation::new(fragment);
    let storage = Arc::new(MemoryStorage::new());
    let as_store: Arc<dyn KeyValueStore> = storage.clone();
    let app = App::remote(&server.base_url, as_store, Box::new(location.clone())).unwrap();
    (app, location, storage)
}

#[tokio::test]
async fn test_filter_round_trip() {
    let server = TestServer::start().await;
    let (mut app, location, _) = remote_app(&server, "");
    app.init().await.unwrap();

    assert_eq!(ids(&app.visible_recipes()), ["1", "2"]);

    app.apply_filter(Some("popular"));
    assert_eq!(ids(&app.visible_recipes()), ["1", "2"]);

    app.apply_filter(Some("Lanche"));
    let visible = app.visible_recipes();
    assert_eq!(ids(&visible), ["2"]);
    assert_eq!(app.view(), &View::Home);

    app.apply_filter(None);
    assert_eq!(ids(&app.visible_recipes()), ["1", "2"]);
    assert_eq!(ids(app.recipes()), ["1", "2"]);
    assert_eq!(location.current(), "");
}

#[tokio::test]
async fn test_deep_link_resolves_after_catalog_loads() {
    let server = TestServer::start().await;
    let (mut app, location, _) = remote_app(&server, "#recipe/2");

    let settled = app.init().await.unwrap();
    assert_eq!(settled.outcome, NavOutcome::Settled);
    assert_eq!(app.view(), &View::Recipe(RecipeId::new("2")));
    assert_eq!(app.active_recipe().unwrap().title, "Bowl de Açaí Energético");
    assert_eq!(location.current(), "recipe/2");
}

#[tokio::test]
async fn test_dead_link_goes_home_and_clears_fragment() {
    let server = TestServer::start().await;
    let (mut app, location, _) = remote_app(&server, "#recipe/404");

    let settled = app.init().await.unwrap();
    assert_eq!(settled.outcome, NavOutcome::DeadLink);
    assert_eq!(app.view(), &View::Home);
    assert!(app.active_recipe().is_none());
    assert_eq!(location.current(), "");
}

#[tokio::test]
async fn test_login_is_case_sensitive() {
    let server = TestServer::start().await;
    let (mut app, _, _) = remote_app(&server, "");
    app.init().await.unwrap();

    app.sign_up("Ana", "ana@example.com", Provider::Email)
        .await
        .unwrap();
    app.logout().unwrap();
    assert!(app.current_user().is_none());

    let err = app.login("Ana@example.com").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(app.current_user().is_none());

    let user = app.login("ana@example.com").await.unwrap();
    assert_eq!(user.name, "Ana");
}

#[tokio::test]
async fn test_verify_refreshes_session() {
    let server = TestServer::start().await;
    let (mut app, _, _) = remote_app(&server, "");
    app.init().await.unwrap();

    let user = app
        .sign_up("Ana", "ana@example.com", Provider::Email)
        .await
        .unwrap();
    assert!(!user.is_verified);

    app.verify("ana@example.com").await.unwrap();
    assert!(app.current_user().unwrap().is_verified);
}

#[tokio::test]
async fn test_favorites_feed_playlists() {
    let server = TestServer::start().await;
    let (mut app, location, _) = remote_app(&server, "");
    app.init().await.unwrap();

    let err = app.playlists().unwrap_err();
    assert!(matches!(err, ClientError::NotSignedIn));
    let r = app.navigate(NavIntent::Playlists);
    assert_eq!(r.outcome, NavOutcome::AuthRequired);
    assert_eq!(location.current(), "");

    app.sign_up("Ana", "ana@example.com", Provider::Email)
        .await
        .unwrap();
    app.toggle_favorite(&RecipeId::new("2")).await.unwrap();
    app.toggle_favorite(&RecipeId::new("1")).await.unwrap();

    let r = app.navigate(NavIntent::Playlists);
    assert_eq!(r.view, View::Playlists);
    assert_eq!(location.current(), "playlists");

    let playlists = app.playlists().unwrap();
    let categories: Vec<&str> = playlists.iter().map(|p| p.category.as_str()).collect();
    assert_eq!(categories, ["Café da Manhã", "Lanche"]);

    let user = app.toggle_favorite(&RecipeId::new("1")).await.unwrap();
    assert!(!user.is_favorite(&RecipeId::new("1")));
    assert_eq!(app.playlists().unwrap().len(), 1);
}

#[tokio::test]
async fn test_shopping_list_scales_and_stores_unchecked() {
    let server = TestServer::start().await;
    let (mut app, _, _) = remote_app(&server, "#recipe/1");
    app.init().await.unwrap();
    app.sign_up("Ana", "ana@example.com", Provider::Email)
        .await
        .unwrap();

    let added = app.add_to_shopping_list(Servings::new(4)).await.unwrap();
    let first = added.first().unwrap();
    assert_eq!(first.name, "Farinha de trigo");
    assert_eq!(first.amount, "3 xícaras");
    assert!(added.iter().any(|i| i.amount == "2.50 xícaras"));

    let mut list = app.shopping_list().await.unwrap();
    assert_eq!(list.items().len(), added.len());
    assert_eq!(list.remaining(), added.len());

    assert!(list.toggle(0));
    assert_eq!(list.remaining(), added.len() - 1);
    let fresh = app.shopping_list().await.unwrap();
    assert_eq!(fresh.remaining(), added.len());
}

#[tokio::test]
async fn test_shopping_needs_open_recipe() {
    let server = TestServer::start().await;
    let (mut app, _, _) = remote_app(&server, "");
    app.init().await.unwrap();
    app.sign_up("Ana", "ana@example.com", Provider::Email)
        .await
        .unwrap();

    let err = app.add_to_shopping_list(Servings::default()).await.unwrap_err();
    assert!(matches!(err, ClientError::NoRecipeOpen));
}

#[tokio::test]
async fn test_published_recipe_opens_and_is_visible_to_others() {
    let server = TestServer::start().await;
    let (mut author, location, _) = remote_app(&server, "");
    author.init().await.unwrap();
    author
        .sign_up("Ana", "ana@example.com", Provider::Email)
        .await
        .unwrap();

    let recipe = author
        .create_recipe(RecipeDraft::new("Pão de Queijo", "https://img/pao.jpg").category("Lanche"))
        .await
        .unwrap();
    assert_eq!(author.view(), &View::Recipe(recipe.id.clone()));
    assert_eq!(location.current(), format!("recipe/{}", recipe.id));
    assert_eq!(author.recipes().first().map(|r| &r.id), Some(&recipe.id));

    let (mut reader, _, _) = remote_app(&server, &format!("#recipe/{}", recipe.id));
    reader.init().await.unwrap();
    let shown = reader.active_recipe().unwrap();
    assert_eq!(shown.author_id.as_ref(), Some(&author.current_user().unwrap().id));

    reader.apply_filter(Some("popular"));
    assert_eq!(reader.visible_recipes().first().map(|r| &r.id), Some(&recipe.id));
}

#[tokio::test]
async fn test_chef_reply_dropped_after_navigating_away() {
    let server = TestServer::start().await;
    let (mut app, _, _) = remote_app(&server, "#recipe/1");
    app.init().await.unwrap();

    let answer = app.ask_chef("Posso substituir o leite?").await.unwrap();
    assert!(answer.unwrap().starts_with("Sobre \"Panquecas Americanas Fofinhas\""));

    let pending = app.chef_question("Como congelar?").unwrap();
    let chef = app.chef();
    app.select_recipe(RecipeId::new("2"));
    let reply = pending.ask(chef.as_ref()).await;
    assert_eq!(app.accept_chef_reply(reply).unwrap(), None);
}

#[tokio::test]
async fn test_local_mode_session_survives_restart() {
    let storage = Arc::new(MemoryStorage::new());
    let as_store: Arc<dyn KeyValueStore> = storage.clone();

    let mut first = App::local(Arc::clone(&as_store), Box::new(MemoryLocation::new("")));
    first.init().await.unwrap();
    first
        .sign_up("Ana", "ana@example.com", Provider::Email)
        .await
        .unwrap();
    first.toggle_favorite(&RecipeId::new("2")).await.unwrap();
    first
        .create_recipe(RecipeDraft::new("Tapioca", "https://img/tapioca.jpg"))
        .await
        .unwrap();

    let location = MemoryLocation::new("#profile");
    let mut second = App::local(as_store, Box::new(location.clone()));
    let settled = second.init().await.unwrap();
    assert_eq!(settled.view, View::Profile);
    assert_eq!(second.recipes().len(), 3);

    let user = second.current_user().unwrap();
    assert_eq!(user.email.as_str(), "ana@example.com");
    assert!(user.is_favorite(&RecipeId::new("2")));

    second.logout().unwrap();
    assert_eq!(second.view(), &View::Home);
    assert_eq!(location.current(), "");

    let location = MemoryLocation::new("#profile");
    let mut third = App::local(storage, Box::new(location.clone()));
    let settled = third.init().await.unwrap();
    assert_eq!(settled.view, View::Home);
    assert_eq!(location.current(), "");
    assert!(third.current_user().is_none());
}
