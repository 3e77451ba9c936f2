use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Texture sources used by a scene, keyed by a short name.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub textures: Vec<TextureSource>,
}

/// A single texture file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureSource {
    /// Key bodies refer to (e.g., "earthDay").
    pub name: String,
    /// Relative path to the image (e.g., "textures/planets/earth/day.jpg").
    pub path: String,
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    pub fn with_texture(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.textures.push(TextureSource {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    /// Path registered under `key`, if any.
    pub fn path_of(&self, key: &str) -> Option<&str> {
        self.textures
            .iter()
            .find(|t| t.name == key)
            .map(|t| t.path.as_str())
    }
}
