//! ChefEmCasa Core - Shared types and pure logic.
//!
//! This crate provides the domain model used across all ChefEmCasa components:
//! - `app` - Client-side state layer (backends, session, navigation)
//! - `server` - HTTP API persisting a single JSON document
//! - `cli` - Command-line tools for seeding and backups
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. Both persistence backends apply the operations on
//! [`Document`] so their behavior cannot drift apart.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids and emails
//! - [`api`] - HTTP request and response bodies
//! - [`recipe`] - Recipes and the [`RecipeDraft`] builder
//! - [`user`] - Users and sign-in providers
//! - [`shopping`] - Shopping items and serving scaling
//! - [`document`] - The persisted document and its operations
//! - [`seed`] - Starter catalog
//! - [`filter`] - Category filter engine
//! - [`navigation`] - URL fragment grammar and view reconciliation
//! - [`playlist`] - Favorites grouped by category
//! - [`chef`] - Offline chef tips

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod chef;
pub mod document;
pub mod filter;
pub mod navigation;
pub mod playlist;
pub mod recipe;
pub mod seed;
pub mod shopping;
pub mod types;
pub mod user;

pub use document::{Document, DocumentError, LoadStatus, Loaded};
pub use filter::CategoryFilter;
pub use navigation::{Catalog, NavOutcome, Reconciled, Route, View};
pub use playlist::Playlist;
pub use recipe::{Ingredient, Recipe, RecipeDraft, Step, ValidationError};
pub use shopping::{Servings, ShoppingItem};
pub use types::*;
pub use user::{Provider, User};
