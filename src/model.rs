use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shown when a recipe has no image or its image fails to load
pub const PLACEHOLDER_IMAGE: &str = "https://images.unsplash.com/photo-1495521821757-a1efb6729352?ixlib=rb-1.2.1&auto=format&fit=crop&w=800&q=80";

/// A recipe record as returned by the upstream API.
///
/// Only the fields needed locally are typed; everything else is kept in
/// `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recipe {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            image: None,
            extra: Map::new(),
        }
    }

    /// Image to display, falling back to the placeholder
    pub fn image_url(&self) -> &str {
        self.image
            .as_deref()
            .filter(|image| !image.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Swap in the placeholder after the image failed to load
    pub fn use_placeholder_image(&mut self) {
        self.image = Some(PLACEHOLDER_IMAGE.to_string());
    }
}
