pub mod config;
pub mod error;
pub mod input;
pub mod matcher;
pub mod model;
pub mod server;
pub mod session;
pub mod spoonacular;
pub mod vocabulary;

pub use config::RelayConfig;
pub use error::{ApiError, RelayError, SessionError};
pub use input::{suggest, IngredientInput, Suggestions};
pub use matcher::{find_similar_ingredients, levenshtein_distance};
pub use model::Recipe;
pub use session::{MemoryStorage, Session, Storage};
pub use spoonacular::{RecipeSource, SpoonacularClient};
pub use vocabulary::Vocabulary;

use log::{debug, warn};

/// Suggestions for `input` against the common ingredient list
pub fn suggest_ingredients(input: &str) -> Suggestions {
    suggest(input, &Vocabulary::common())
}

/// Search recipes for the given ingredients straight from the upstream API
pub async fn search_recipes(
    config: &RelayConfig,
    ingredients: &[String],
) -> Result<Vec<Recipe>, RelayError> {
    let client = SpoonacularClient::new(config)?;
    let body = client.find_by_ingredients(&ingredients.join(",")).await?;
    debug!("{:#?}", body);

    let items = body
        .as_array()
        .ok_or(RelayError::UnexpectedBody("expected a list of recipes"))?;

    let mut recipes = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<Recipe>(item.clone()) {
            Ok(recipe) => recipes.push(recipe),
            Err(e) => warn!("Skipping search result that is not a recipe: {}", e),
        }
    }
    if recipes.len() < items.len() {
        warn!("Dropped {} of {} search results", items.len() - recipes.len(), items.len());
    }
    Ok(recipes)
}

/// Fetch full recipe detail straight from the upstream API
pub async fn fetch_recipe(config: &RelayConfig, id: &str) -> Result<serde_json::Value, RelayError> {
    let client = SpoonacularClient::new(config)?;
    client.recipe_information(id).await
}
