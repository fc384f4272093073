//! ChefEmCasa App - Client-side state layer.
//!
//! Keeps in-memory application state (current view, active recipe, filtered
//! list, signed-in user, favorites) consistent with a URL fragment and a
//! swappable persistence backend.
//!
//! # Architecture
//!
//! ```text
//! Backend (source of truth)
//!    └── RecipeStore / UserStore
//!           └── SessionManager (mirrors the user to local storage)
//!                  └── NavigationController (fragment <-> view)
//! ```
//!
//! [`App`] composes these pieces. Two backends are available:
//! [`LocalBackend`] keeps everything in a [`KeyValueStore`] for fully static
//! deployments, [`RemoteBackend`] talks to the HTTP server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod backend;
pub mod chef;
pub mod error;
pub mod navigation;
pub mod session;
pub mod storage;
pub mod stores;

pub use app::{App, ChefQuestion, ChefReply, ShoppingListView};
pub use backend::{Backend, BackendError, LocalBackend, RemoteBackend};
pub use chef::{ChefAdvisor, ChefError, RemoteChef, ScriptedChef};
pub use error::ClientError;
pub use navigation::{FragmentHost, MemoryLocation, NavIntent, NavigationController, Ticket};
pub use session::SessionManager;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};
pub use stores::{RecipeStore, UserStore};
