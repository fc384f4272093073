//! View/navigation controller kept in step with the URL fragment.
//!
//! Intents never touch the view directly. They write the fragment (history
//! push) and then [`NavigationController::sync`] reconciles, so the fragment
//! is the single source of truth and `sync` is the only writer of view
//! state.

use std::sync::{Arc, Mutex, PoisonError};

use chef_em_casa_core::navigation::reconcile;
use chef_em_casa_core::{Catalog, CategoryFilter, NavOutcome, Reconciled, RecipeId, Route, View};
use tracing::debug;

/// Where the fragment lives: the browser location, or [`MemoryLocation`].
pub trait FragmentHost: Send + Sync {
    /// The fragment without a leading `#`.
    fn current(&self) -> String;

    /// Navigate to `fragment`, adding a history entry.
    fn push(&self, fragment: &str);

    /// Rewrite the current history entry.
    fn replace(&self, fragment: &str);
}

// =============================================================================
// In-memory location
// =============================================================================

#[derive(Debug)]
struct History {
    entries: Vec<String>,
    index: usize,
}

/// A location with back/forward history. Clones share the same history.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    history: Arc<Mutex<History>>,
}

impl MemoryLocation {
    /// Start at `fragment` (a leading `#` is dropped).
    #[must_use]
    pub fn new(fragment: &str) -> Self {
        Self {
            history: Arc::new(Mutex::new(History {
                entries: vec![normalize(fragment)],
                index: 0,
            })),
        }
    }

    fn with<T>(&self, f: impl FnOnce(&mut History) -> T) -> T {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut history)
    }

    /// Step back one entry. Returns false at the start of history.
    pub fn back(&self) -> bool {
        self.with(|h| {
            if h.index == 0 {
                return false;
            }
            h.index -= 1;
            true
        })
    }

    /// Step forward one entry. Returns false at the end of history.
    pub fn forward(&self) -> bool {
        self.with(|h| {
            if h.index + 1 >= h.entries.len() {
                return false;
            }
            h.index += 1;
            true
        })
    }

    /// Simulate the user editing the address bar.
    pub fn set(&self, fragment: &str) {
        self.push(fragment);
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.with(|h| h.entries.clone())
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("")
    }
}

impl FragmentHost for MemoryLocation {
    fn current(&self) -> String {
        self.with(|h| h.entries.get(h.index).cloned().unwrap_or_default())
    }

    fn push(&self, fragment: &str) {
        let fragment = normalize(fragment);
        self.with(|h| {
            // Re-assigning the same hash does not create an entry.
            if h.entries.get(h.index) == Some(&fragment) {
                return;
            }
            h.entries.truncate(h.index + 1);
            h.entries.push(fragment);
            h.index = h.entries.len() - 1;
        });
    }

    fn replace(&self, fragment: &str) {
        let fragment = normalize(fragment);
        self.with(|h| match h.entries.get_mut(h.index) {
            Some(entry) => *entry = fragment,
            None => h.entries.push(fragment),
        });
    }
}

fn normalize(fragment: &str) -> String {
    fragment.strip_prefix('#').unwrap_or(fragment).to_owned()
}

// =============================================================================
// Controller
// =============================================================================

/// A user request to go somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavIntent {
    /// Home with no category filter.
    Home,
    OpenRecipe(RecipeId),
    Profile,
    Playlists,
    /// Set the home filter and go home.
    Filter(CategoryFilter),
}

/// Snapshot of the navigation epoch.
///
/// Results of slow work started under a ticket should only be applied while
/// the ticket is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Current view, selection and filter, synchronized with a fragment host.
pub struct NavigationController {
    host: Box<dyn FragmentHost>,
    view: View,
    filter: CategoryFilter,
    epoch: u64,
}

impl NavigationController {
    #[must_use]
    pub fn new(host: Box<dyn FragmentHost>) -> Self {
        Self {
            host,
            view: View::Home,
            filter: CategoryFilter::All,
            epoch: 0,
        }
    }

    #[must_use]
    pub const fn view(&self) -> &View {
        &self.view
    }

    #[must_use]
    pub const fn selected_recipe(&self) -> Option<&RecipeId> {
        self.view.selected_recipe()
    }

    #[must_use]
    pub const fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    #[must_use]
    pub fn fragment(&self) -> String {
        self.host.current()
    }

    /// Turn an intent into a fragment write, then reconcile.
    pub fn request(
        &mut self,
        intent: NavIntent,
        catalog: Catalog<'_>,
        signed_in: bool,
    ) -> Reconciled {
        debug!(?intent, "Navigation intent");
        let route = match intent {
            NavIntent::Home => {
                self.filter = CategoryFilter::All;
                Route::Home
            }
            NavIntent::Filter(filter) => {
                self.filter = filter;
                Route::Home
            }
            NavIntent::OpenRecipe(id) => Route::Recipe(id),
            NavIntent::Profile => Route::Profile,
            NavIntent::Playlists => Route::Playlists,
        };
        self.host.push(&route.to_fragment());
        self.sync(catalog, signed_in)
    }

    /// Reconcile view state with the current fragment.
    ///
    /// Call after every fragment change and after data loads; a recipe link
    /// that arrived before the catalog is resolved here.
    pub fn sync(&mut self, catalog: Catalog<'_>, signed_in: bool) -> Reconciled {
        let fragment = self.host.current();
        let reconciled = reconcile(&fragment, catalog, signed_in);

        if let Some(rewrite) = &reconciled.rewrite {
            debug!(from = %fragment, outcome = ?reconciled.outcome, "Rewriting fragment");
            self.host.replace(rewrite);
        }

        if reconciled.view != self.view {
            self.epoch += 1;
            debug!(view = reconciled.view.tag(), epoch = self.epoch, "View changed");
            self.view = reconciled.view.clone();
        }
        reconciled
    }

    /// Take a ticket for the current navigation epoch.
    #[must_use]
    pub const fn ticket(&self) -> Ticket {
        Ticket(self.epoch)
    }

    /// Whether nothing has navigated away since `ticket` was taken.
    #[must_use]
    pub const fn is_current(&self, ticket: Ticket) -> bool {
        self.epoch == ticket.0
    }

    /// Whether the last reconciliation left a recipe link pending.
    #[must_use]
    pub fn has_deferred_link(&self, catalog: Catalog<'_>, signed_in: bool) -> bool {
        reconcile(&self.host.current(), catalog, signed_in).outcome == NavOutcome::Deferred
    }
}
