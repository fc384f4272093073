//! Recipe listing through the home filter.

use std::path::Path;

use chef_em_casa_core::CategoryFilter;
use chef_em_casa_server::db::{FileStore, RecipeRepository};
use tracing::info;

/// One summary line per recipe.
fn summary(recipe: &chef_em_casa_core::Recipe) -> String {
    format!(
        "{:<8} {:<32} {:<16} {:.1}  {} min",
        recipe.id,
        recipe.title,
        recipe.category,
        recipe.rating,
        recipe.total_time()
    )
}

/// Log the recipes the home view would show for `filter`.
///
/// # Errors
///
/// Returns an error if the data file cannot be opened.
pub async fn list(data_file: &Path, filter: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open(data_file).await?;
    let recipes = RecipeRepository::new(&store).list().await?;

    let filter = CategoryFilter::parse(filter);
    let shown = filter.apply(&recipes);

    info!(filter = filter.as_str().unwrap_or("all"), shown = shown.len(), total = recipes.len(), "Recipes");
    for recipe in &shown {
        info!("  {}", summary(recipe));
    }
    Ok(())
}
