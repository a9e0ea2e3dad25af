//! Configuration for a chat

use serde::{Deserialize, Serialize};

/// Chat configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct General {
    /// The model to use
    pub model: String,

    /// The sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Whether a dropped function call still gets an error result
    /// appended, keeping every call paired with a `function` message.
    #[serde(default)]
    pub pair_results: bool,
}

impl General {
    /// Create a new configuration
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

impl Default for General {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".into(),
            temperature: default_temperature(),
            pair_results: false,
        }
    }
}

fn default_temperature() -> f32 {
    0.3
}
