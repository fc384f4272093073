//! The application controller composing stores, session and navigation.

use std::sync::Arc;

use chef_em_casa_core::playlist::playlists_for;
use chef_em_casa_core::{
    CategoryFilter, Email, Playlist, Provider, Reconciled, Recipe, RecipeDraft, RecipeId,
    Servings, ShoppingItem, User, View,
};
use tracing::{debug, info, warn};

use crate::backend::{Backend, LocalBackend, RemoteBackend};
use crate::chef::{ChefAdvisor, ChefError, RemoteChef, ScriptedChef};
use crate::error::ClientError;
use crate::navigation::{FragmentHost, NavIntent, NavigationController, Ticket};
use crate::session::SessionManager;
use crate::storage::KeyValueStore;
use crate::stores::{RecipeStore, UserStore};

/// Client-side application state.
///
/// Every state change goes through one of the methods here; after each of
/// them the view state and the fragment agree.
pub struct App {
    backend: Arc<dyn Backend>,
    recipes: RecipeStore,
    users: UserStore,
    session: SessionManager,
    nav: NavigationController,
    chef: Arc<dyn ChefAdvisor>,
}

impl App {
    #[must_use]
    pub fn new(
        backend: Arc<dyn Backend>,
        storage: Arc<dyn KeyValueStore>,
        host: Box<dyn FragmentHost>,
        chef: Arc<dyn ChefAdvisor>,
    ) -> Self {
        Self {
            recipes: RecipeStore::new(Arc::clone(&backend)),
            users: UserStore::new(Arc::clone(&backend)),
            backend,
            session: SessionManager::new(storage),
            nav: NavigationController::new(host),
            chef,
        }
    }

    /// Fully static mode: data and session both live in `storage`.
    #[must_use]
    pub fn local(storage: Arc<dyn KeyValueStore>, host: Box<dyn FragmentHost>) -> Self {
        let backend = LocalBackend::new(Arc::clone(&storage));
        Self::new(Arc::new(backend), storage, host, Arc::new(ScriptedChef))
    }

    /// Server mode: data and chef advice come from the server at `base_url`;
    /// the session is still mirrored to `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn remote(
        base_url: &str,
        storage: Arc<dyn KeyValueStore>,
        host: Box<dyn FragmentHost>,
    ) -> Result<Self, ClientError> {
        let backend = RemoteBackend::new(base_url)?;
        Ok(Self::new(
            Arc::new(backend),
            storage,
            host,
            Arc::new(RemoteChef::new(base_url)),
        ))
    }

    // =========================================================================
    // Lifecycle & navigation
    // =========================================================================

    /// Restore the session, load recipes and resolve the initial fragment.
    ///
    /// A recipe link present at startup is deferred until the catalog has
    /// loaded, then resolved.
    ///
    /// # Errors
    ///
    /// Returns the backend error if recipes cannot be loaded. The app stays
    /// on the home view with a deferred link left in the fragment; call
    /// [`reload`](Self::reload) to try again.
    pub async fn init(&mut self) -> Result<Reconciled, ClientError> {
        self.session.restore();
        self.sync();
        let settled = self.reload().await?;
        info!(
            view = settled.view.tag(),
            signed_in = self.session.is_signed_in(),
            "App initialized"
        );
        Ok(settled)
    }

    /// Fetch the catalog again and re-resolve the fragment.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the previous snapshot and view are kept.
    pub async fn reload(&mut self) -> Result<Reconciled, ClientError> {
        if let Err(e) = self.recipes.load().await {
            warn!(error = %e, "Failed to load recipes");
            return Err(e.into());
        }
        Ok(self.sync())
    }

    /// Reconcile with the fragment. Call after every external fragment change.
    pub fn sync(&mut self) -> Reconciled {
        self.nav
            .sync(self.recipes.catalog(), self.session.is_signed_in())
    }

    pub fn navigate(&mut self, intent: NavIntent) -> Reconciled {
        self.nav.request(
            intent,
            self.recipes.catalog(),
            self.session.is_signed_in(),
        )
    }

    pub fn select_recipe(&mut self, id: RecipeId) -> Reconciled {
        self.navigate(NavIntent::OpenRecipe(id))
    }

    /// Set the home filter (`None` clears it) and go home.
    pub fn apply_filter(&mut self, filter: Option<&str>) -> Reconciled {
        self.navigate(NavIntent::Filter(CategoryFilter::parse(filter)))
    }

    #[must_use]
    pub const fn view(&self) -> &View {
        self.nav.view()
    }

    #[must_use]
    pub const fn filter(&self) -> &CategoryFilter {
        self.nav.filter()
    }

    #[must_use]
    pub fn fragment(&self) -> String {
        self.nav.fragment()
    }

    /// Ticket for discarding results that arrive after navigating away.
    #[must_use]
    pub const fn ticket(&self) -> Ticket {
        self.nav.ticket()
    }

    // =========================================================================
    // Recipes
    // =========================================================================

    /// The full catalog, empty until loaded.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        self.recipes.list().unwrap_or_default()
    }

    /// The catalog after the active filter.
    #[must_use]
    pub fn visible_recipes(&self) -> Vec<Recipe> {
        self.nav.filter().apply(self.recipes())
    }

    /// The recipe being viewed, if the view is a recipe.
    #[must_use]
    pub fn active_recipe(&self) -> Option<&Recipe> {
        self.recipes.get(self.nav.selected_recipe()?)
    }

    /// Publish a recipe as the signed-in user and open it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotSignedIn`] without a session, or the
    /// validation/backend error.
    pub async fn create_recipe(&mut self, draft: RecipeDraft) -> Result<Recipe, ClientError> {
        let author = self.require_user()?.id.clone();
        let recipe = self.recipes.create(draft, Some(author)).await?;
        info!(recipe_id = %recipe.id, "Recipe published");
        self.select_recipe(recipe.id.clone());
        Ok(recipe)
    }

    // =========================================================================
    // Users & session
    // =========================================================================

    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.session.current()
    }

    /// Sign in an existing user by email. No credential check.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEmail`] or a not-found backend error.
    pub async fn login(&mut self, email: &str) -> Result<&User, ClientError> {
        let email = Email::parse(email)?;
        let user = self.users.login(&email).await?;
        self.session.establish(user)
    }

    /// Sign up (or sign back in) and establish the session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEmail`] or the backend/storage error.
    pub async fn sign_up(
        &mut self,
        name: &str,
        email: &str,
        provider: Provider,
    ) -> Result<&User, ClientError> {
        let email = Email::parse(email)?;
        let user = self.users.create_or_get(name, &email, provider).await?;
        self.session.establish(user)
    }

    /// Mark an address verified, refreshing the session if it is the
    /// signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEmail`] or a not-found backend error.
    pub async fn verify(&mut self, email: &str) -> Result<User, ClientError> {
        let email = Email::parse(email)?;
        let user = self.users.verify(&email).await?;
        if self.session.current().is_some_and(|u| u.id == user.id) {
            self.session.establish(user.clone())?;
        }
        Ok(user)
    }

    /// Sign out and return home.
    ///
    /// # Errors
    ///
    /// Returns the storage error; the session is unchanged.
    pub fn logout(&mut self) -> Result<Reconciled, ClientError> {
        self.session.clear()?;
        Ok(self.navigate(NavIntent::Home))
    }

    /// Re-fetch the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns storage or transport errors.
    pub async fn refresh_user(&mut self) -> Result<Option<&User>, ClientError> {
        self.session.refresh(&self.users).await
    }

    /// Toggle a recipe in the signed-in user's favorites.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotSignedIn`] without a session.
    pub async fn toggle_favorite(&mut self, recipe_id: &RecipeId) -> Result<&User, ClientError> {
        self.session.toggle_favorite(&self.users, recipe_id).await
    }

    /// The signed-in user's favorites grouped by category.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotSignedIn`] without a session.
    pub fn playlists(&self) -> Result<Vec<Playlist>, ClientError> {
        let user = self.require_user()?;
        Ok(playlists_for(user, self.recipes()))
    }

    fn require_user(&self) -> Result<&User, ClientError> {
        self.session.current().ok_or(ClientError::NotSignedIn)
    }

    // =========================================================================
    // Shopping list
    // =========================================================================

    /// Add the active recipe's ingredients, scaled to `servings`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotSignedIn`] without a session,
    /// [`ClientError::NotLoaded`] before the catalog loads, or
    /// [`ClientError::NoRecipeOpen`] when no recipe is open.
    pub async fn add_to_shopping_list(
        &self,
        servings: Servings,
    ) -> Result<Vec<ShoppingItem>, ClientError> {
        let user_id = self.require_user()?.id.clone();
        let recipe = self.require_active_recipe()?;
        let items: Vec<ShoppingItem> = recipe
            .ingredients
            .iter()
            .map(|ingredient| ShoppingItem::from_ingredient(ingredient, servings))
            .collect();

        self.backend
            .append_shopping_items(&user_id, items.clone())
            .await?;
        debug!(recipe_id = %recipe.id, count = items.len(), "Added to shopping list");
        Ok(items)
    }

    /// The signed-in user's shopping list.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotSignedIn`] without a session.
    pub async fn shopping_list(&self) -> Result<ShoppingListView, ClientError> {
        let user_id = self.require_user()?.id.clone();
        let items = self.backend.shopping_list(&user_id).await?;
        Ok(ShoppingListView::new(items))
    }

    fn require_active_recipe(&self) -> Result<&Recipe, ClientError> {
        let id = self.nav.selected_recipe().ok_or(ClientError::NoRecipeOpen)?;
        if self.recipes.list().is_none() {
            return Err(ClientError::NotLoaded);
        }
        self.recipes
            .get(id)
            .ok_or_else(|| ClientError::RecipeNotFound(id.clone()))
    }

    // =========================================================================
    // Chef
    // =========================================================================

    /// Capture a question about the open recipe together with a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NoRecipeOpen`] when no recipe is open.
    pub fn chef_question(&self, question: &str) -> Result<ChefQuestion, ClientError> {
        let recipe = self.require_active_recipe()?;
        Ok(ChefQuestion {
            ticket: self.nav.ticket(),
            recipe_title: recipe.title.clone(),
            question: question.trim().to_owned(),
        })
    }

    /// The advisor to send questions to.
    #[must_use]
    pub fn chef(&self) -> Arc<dyn ChefAdvisor> {
        Arc::clone(&self.chef)
    }

    /// Apply a reply if the user has not navigated away since asking.
    ///
    /// Returns `Ok(None)` for a stale reply, which is dropped.
    ///
    /// # Errors
    ///
    /// Returns the chef error for a current reply that failed; show
    /// [`ChefError::friendly_message`] to the user.
    pub fn accept_chef_reply(&self, reply: ChefReply) -> Result<Option<String>, ClientError> {
        if !self.nav.is_current(reply.ticket) {
            debug!("Dropping chef reply for a view no longer shown");
            return Ok(None);
        }
        match reply.answer {
            Ok(answer) => Ok(Some(answer)),
            Err(e) => {
                warn!(error = %e, "Chef advice failed");
                Err(e.into())
            }
        }
    }

    /// Ask about the open recipe and wait for the answer.
    ///
    /// # Errors
    ///
    /// See [`chef_question`](Self::chef_question) and
    /// [`accept_chef_reply`](Self::accept_chef_reply).
    pub async fn ask_chef(&self, question: &str) -> Result<Option<String>, ClientError> {
        let pending = self.chef_question(question)?;
        let reply = pending.ask(self.chef.as_ref()).await;
        self.accept_chef_reply(reply)
    }

    /// The backend in use, for operations outside the app's own flows.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }
}

/// A question captured with the ticket it was asked under.
#[derive(Debug, Clone)]
pub struct ChefQuestion {
    ticket: Ticket,
    recipe_title: String,
    question: String,
}

impl ChefQuestion {
    #[must_use]
    pub fn recipe_title(&self) -> &str {
        &self.recipe_title
    }

    /// Send the question. Does not borrow the app, so navigation may
    /// continue while it is in flight.
    pub async fn ask(self, advisor: &dyn ChefAdvisor) -> ChefReply {
        let answer = advisor.advise(&self.recipe_title, &self.question).await;
        ChefReply {
            ticket: self.ticket,
            answer,
        }
    }
}

/// The outcome of a [`ChefQuestion`].
#[derive(Debug)]
pub struct ChefReply {
    ticket: Ticket,
    answer: Result<String, ChefError>,
}

/// A fetched shopping list with local-only check marks.
///
/// Checking an item never writes back to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShoppingListView {
    items: Vec<ShoppingItem>,
}

impl ShoppingListView {
    #[must_use]
    pub const fn new(items: Vec<ShoppingItem>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    /// Flip the check mark at `index`. Returns false if out of range.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.checked = !item.checked;
                true
            }
            None => false,
        }
    }

    /// Items not yet checked off.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.items.iter().filter(|i| !i.checked).count()
    }
}
