//! Newtype IDs for type-safe entity references.
//!
//! Identifiers are short opaque strings (the seed catalog uses `"1"`, `"2"`;
//! generated ids are 9 base36 characters). Use the `define_id!` macro to
//! create wrappers that prevent mixing recipe and user ids.

use rand::Rng;

/// Length of generated identifiers.
pub const GENERATED_ID_LEN: usize = 9;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()`, `as_str()`, `generate()`
/// - `From<&str>`, `From<String>` and `Display`
///
/// # Example
///
/// ```rust
/// # use chef_em_casa_core::define_id;
/// define_id!(RecipeId);
/// define_id!(UserId);
///
/// let recipe_id = RecipeId::new("1");
/// let user_id = UserId::new("1");
///
/// // These are different types, so this won't compile:
/// // let _: RecipeId = user_id;
/// assert_eq!(recipe_id.as_str(), user_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from any string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a random ID that `taken` reports as unused.
            #[must_use]
            pub fn generate(mut taken: impl FnMut(&Self) -> bool) -> Self {
                loop {
                    let candidate = Self($crate::types::id::random_token());
                    if !taken(&candidate) {
                        return candidate;
                    }
                }
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(RecipeId);
define_id!(UserId);

/// Produce a random lowercase base36 token of [`GENERATED_ID_LEN`] characters.
#[must_use]
pub fn random_token() -> String {
    let mut rng = rand::rng();
    (0..GENERATED_ID_LEN)
        .map(|_| {
            let idx = rng.random_range(0..BASE36.len());
            char::from(BASE36.get(idx).copied().unwrap_or(b'0'))
        })
        .collect()
}
