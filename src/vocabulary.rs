//! The fixed list of known ingredient names.
//!
//! Both suggestion paths read from a [`Vocabulary`]: direct substring matches
//! and the edit-distance matcher in [`crate::matcher`].

/// Ingredient group, in the order the reference list is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Fruits,
    Vegetables,
    Proteins,
    Dairy,
    Grains,
    Pantry,
    HerbsAndSpices,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Fruits,
        Category::Vegetables,
        Category::Proteins,
        Category::Dairy,
        Category::Grains,
        Category::Pantry,
        Category::HerbsAndSpices,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Fruits => "Fruits",
            Category::Vegetables => "Vegetables",
            Category::Proteins => "Proteins",
            Category::Dairy => "Dairy",
            Category::Grains => "Grains",
            Category::Pantry => "Pantry Items",
            Category::HerbsAndSpices => "Herbs & Spices",
        }
    }

    pub fn ingredients(&self) -> &'static [&'static str] {
        match self {
            Category::Fruits => FRUITS,
            Category::Vegetables => VEGETABLES,
            Category::Proteins => PROTEINS,
            Category::Dairy => DAIRY,
            Category::Grains => GRAINS,
            Category::Pantry => PANTRY,
            Category::HerbsAndSpices => HERBS_AND_SPICES,
        }
    }

    /// Category of a reference ingredient, if it is one
    pub fn of(ingredient: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| category.ingredients().contains(&ingredient))
    }
}

const FRUITS: &[&str] = &[
    "apple", "banana", "orange", "lemon", "lime", "strawberry", "blueberry", "raspberry",
    "blackberry", "grape", "mango", "pineapple", "peach", "pear", "plum", "kiwi",
    "watermelon", "coconut", "avocado",
];

const VEGETABLES: &[&str] = &[
    "carrot", "potato", "onion", "garlic", "tomato", "lettuce", "spinach", "broccoli",
    "cauliflower", "bell pepper", "cucumber", "zucchini", "eggplant", "mushroom",
    "corn", "peas", "celery", "asparagus", "green beans", "sweet potato", "cabbage",
    "kale", "brussels sprouts",
];

const PROTEINS: &[&str] = &[
    "chicken", "beef", "pork", "lamb", "turkey", "fish", "salmon", "tuna", "shrimp",
    "tofu", "eggs", "bacon", "sausage", "ham",
];

const DAIRY: &[&str] = &[
    "milk", "cheese", "butter", "yogurt", "cream", "sour cream", "cream cheese",
    "mozzarella", "cheddar", "parmesan", "cottage cheese",
];

const GRAINS: &[&str] = &[
    "rice", "pasta", "bread", "flour", "oats", "quinoa", "couscous", "barley",
    "cornmeal", "breadcrumbs",
];

const PANTRY: &[&str] = &[
    "sugar", "salt", "pepper", "olive oil", "vegetable oil", "vinegar", "soy sauce",
    "honey", "maple syrup", "mustard", "ketchup", "mayonnaise", "peanut butter",
    "jam", "chocolate", "vanilla extract", "baking powder", "baking soda",
];

const HERBS_AND_SPICES: &[&str] = &[
    "basil", "oregano", "thyme", "rosemary", "sage", "mint", "cilantro", "parsley",
    "cinnamon", "nutmeg", "cumin", "paprika", "chili powder", "ginger", "turmeric",
];

/// Ordered, immutable list of lowercase ingredient names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    entries: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary from any list of names; entries are lowercased
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| entry.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// The reference list of common ingredients, grouped by category
    pub fn common() -> Self {
        Self::new(
            Category::ALL
                .into_iter()
                .flat_map(|category| category.ingredients().iter().copied()),
        )
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.entries.iter().any(|entry| *entry == name)
    }

    /// Entries containing `query` as a substring, in vocabulary order
    pub fn containing(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.contains(&query))
            .take(limit)
            .cloned()
            .collect()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::common()
    }
}
