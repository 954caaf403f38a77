use crate::matcher::find_similar_ingredients;
use crate::vocabulary::Vocabulary;

/// Maximum number of direct substring matches offered
pub const MAX_DIRECT_MATCHES: usize = 5;

/// Suggestions for a partially typed ingredient
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    /// Vocabulary entries containing the input
    pub matches: Vec<String>,
    /// Near misses, filled only when there are no direct matches
    pub did_you_mean: Vec<String>,
}

impl Suggestions {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.did_you_mean.is_empty()
    }
}

/// Suggest ingredients for the text typed so far.
///
/// The edit-distance matcher only runs when no entry contains the input.
pub fn suggest(input: &str, vocabulary: &Vocabulary) -> Suggestions {
    let value = input.to_lowercase();
    if value.trim().is_empty() {
        return Suggestions::default();
    }

    let matches = vocabulary.containing(&value, MAX_DIRECT_MATCHES);
    let did_you_mean = if matches.is_empty() {
        find_similar_ingredients(&value, vocabulary.entries())
    } else {
        Vec::new()
    };

    Suggestions {
        matches,
        did_you_mean,
    }
}

/// The ingredients chosen so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientInput {
    ingredients: Vec<String>,
}

impl IngredientInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ingredient unless it is already chosen.
    ///
    /// Returns `true` when the list changed, which is when a new search is due.
    pub fn select(&mut self, ingredient: impl Into<String>) -> bool {
        let ingredient = ingredient.into();
        if self.ingredients.contains(&ingredient) {
            return false;
        }
        self.ingredients.push(ingredient);
        true
    }

    /// Remove the ingredient at `index`
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.ingredients.len()).then(|| self.ingredients.remove(index))
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Comma-separated list as sent to the relay
    pub fn query(&self) -> String {
        self.ingredients.join(",")
    }
}
