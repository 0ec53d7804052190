//! Loader configuration.

use serde::{Deserialize, Serialize};
use story_model::Side;

/// Defaults applied to entries the author left incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Label for options authored without text.
    pub default_option_text: String,

    /// Stage side for characters authored without one.
    pub default_side: Side,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            default_option_text: "(option)".to_string(),
            default_side: Side::Left,
        }
    }
}
