//! Identifier and value types for ChefEmCasa.

pub mod email;
pub mod id;

pub use email::{Email, EmailError};
pub use id::{RecipeId, UserId};
