//! Business logic services.

pub mod chef;
pub mod identity;

pub use chef::{ChefError, ChefService};
pub use identity::{GoogleClient, GoogleProfile, IdentityError};
