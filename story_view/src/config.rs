//! Viewer configuration, read from an optional TOML file.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use story_engine::LoaderConfig;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Upper bound on headless playback steps. Trigger chains inside one step are not
    /// counted.
    pub max_steps: usize,

    pub loader: LoaderConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            max_steps: 500,
            loader: LoaderConfig::default(),
        }
    }
}

impl ViewConfig {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
