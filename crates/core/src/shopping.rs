//! Shopping list items and serving scaling.

use serde::{Deserialize, Serialize};

use crate::recipe::Ingredient;

/// A line on a user's shopping list.
///
/// `amount` is the display string computed when the item was added, so
/// later serving changes never rewrite existing items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
    pub amount: String,
    #[serde(default)]
    pub checked: bool,
}

impl ShoppingItem {
    /// Scale an ingredient to `servings` and bake the formatted amount in.
    #[must_use]
    pub fn from_ingredient(ingredient: &Ingredient, servings: Servings) -> Self {
        Self {
            name: ingredient.name.clone(),
            amount: format!(
                "{} {}",
                format_amount(servings.scale(ingredient.amount)),
                ingredient.unit
            ),
            checked: false,
        }
    }
}

/// Number of servings a recipe is being prepared for.
///
/// Always within `MIN..=MAX`; ingredient amounts are stored for
/// [`Servings::BASELINE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Servings(u8);

impl Servings {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const BASELINE: u8 = 2;

    #[must_use]
    pub fn new(count: u8) -> Self {
        Self(count.clamp(Self::MIN, Self::MAX))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Step up or down, staying within bounds.
    #[must_use]
    pub fn adjust(self, delta: i8) -> Self {
        let next = i16::from(self.0) + i16::from(delta);
        let clamped = next.clamp(i16::from(Self::MIN), i16::from(Self::MAX));
        Self(u8::try_from(clamped).unwrap_or(Self::BASELINE))
    }

    /// Scale a baseline amount to this many servings.
    #[must_use]
    pub fn scale(self, amount: f64) -> f64 {
        amount * f64::from(self.0) / f64::from(Self::BASELINE)
    }
}

impl Default for Servings {
    fn default() -> Self {
        Self(Self::BASELINE)
    }
}

/// Two decimals, with a literal `.00` suffix dropped: `2.0` is `"2"` but
/// `1.5` stays `"1.50"`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    let formatted = format!("{amount:.2}");
    match formatted.strip_suffix(".00") {
        Some(whole) => whole.to_owned(),
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_servings_clamped() {
        assert_eq!(Servings::new(0).get(), 1);
        assert_eq!(Servings::new(42).get(), 10);
        assert_eq!(Servings::default().get(), 2);
        assert_eq!(Servings::new(1).adjust(-1).get(), 1);
        assert_eq!(Servings::new(10).adjust(1).get(), 10);
        assert_eq!(Servings::new(4).adjust(-1).get(), 3);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(2.0), "2");
        assert_eq!(format_amount(0.75), "0.75");
        assert_eq!(format_amount(1.5), "1.50");
        assert_eq!(format_amount(0.5 / 3.0), "0.17");
    }

    #[test]
    fn test_item_from_ingredient_scales_from_baseline() {
        let flour = Ingredient::new("Farinha de trigo", 1.5, "xícaras");
        let sugar = Ingredient::new("Açúcar", 2.0, "colheres");

        let one = Servings::new(1);
        assert_eq!(
            ShoppingItem::from_ingredient(&flour, one).amount,
            "0.75 xícaras"
        );
        assert_eq!(ShoppingItem::from_ingredient(&sugar, one).amount, "1 colheres");

        let four = Servings::new(4);
        let item = ShoppingItem::from_ingredient(&flour, four);
        assert_eq!(item.amount, "3 xícaras");
        assert!(!item.checked);
    }
}
