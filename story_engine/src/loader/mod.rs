//! Story Loader - turns an authored document into a resolved [`Story`].
//!
//! Loading runs in a single pass over the document's nodes in source order:
//! 1. **Parse**: Read the node's own attributes, characters, options, changes and triggers
//! 2. **Inherit**: Fill what the node left unset from the previously resolved node
//! 3. **Append**: The node becomes the "previous" node for the next entry
//!
//! Inheritance rules:
//! - `bg` / `music`: copied when not mentioned; an empty value clears instead
//! - `speaker`: copied when absent or empty
//! - `characters`: copied (by value) when the node declares none
//! - `text`: never copied

mod config;
mod entries;

pub use config::*;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use story_model::{Authored, NodeEntry, NodeId, SceneAsset, Story, StoryDocument, StoryNode};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that make a document unloadable.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The root has no node collection.
    #[error("story document has no node collection")]
    MissingNodes,

    #[error("invalid JSON story document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML story document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to read story file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file extension is not a known document format.
    #[error("unsupported story format for file: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    /// Detect the format of a file from its extension.
    pub fn detect(path: &Path) -> Result<Self, LoadError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
            _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Parses story documents and resolves inheritance between nodes.
#[derive(Debug, Clone, Default)]
pub struct StoryLoader {
    config: LoaderConfig,
}

impl StoryLoader {
    /// Create a loader with the given configuration.
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Create a loader with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(LoaderConfig::default())
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Read and parse a story file; the format comes from the extension.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Story, LoadError> {
        let path = path.as_ref();
        let format = Format::detect(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), ?format, "Loading story file");
        self.parse_str(&content, format)
    }

    pub fn parse_str(&self, content: &str, format: Format) -> Result<Story, LoadError> {
        match format {
            Format::Json => self.parse_json(content),
            Format::Toml => self.parse_toml(content),
        }
    }

    pub fn parse_json(&self, content: &str) -> Result<Story, LoadError> {
        let document: StoryDocument = serde_json::from_str(content)?;
        self.parse(&document)
    }

    pub fn parse_toml(&self, content: &str) -> Result<Story, LoadError> {
        let document: StoryDocument = toml::from_str(content)?;
        self.parse(&document)
    }

    /// Resolve a parsed document tree into a story.
    ///
    /// Fails only when the document has no node collection; an empty collection is a
    /// valid empty story. Malformed entries inside nodes are skipped.
    pub fn parse(&self, document: &StoryDocument) -> Result<Story, LoadError> {
        let entries = document.nodes.as_ref().ok_or(LoadError::MissingNodes)?;

        let mut nodes: Vec<StoryNode> = Vec::with_capacity(entries.len());
        let mut seen = HashSet::new();

        for entry in entries {
            let node = self.resolve_node(entry, nodes.last());
            if !seen.insert(node.id.clone()) {
                warn!(id = %node.id, "Duplicate node id; jumps resolve to the first occurrence");
            }
            nodes.push(node);
        }

        let story = Story::new(nodes);
        warn_unresolved_targets(&story);
        debug!(nodes = story.len(), "Story loaded");
        Ok(story)
    }

    /// Parse one node entry and apply inheritance from `previous`.
    fn resolve_node(&self, entry: &NodeEntry, previous: Option<&StoryNode>) -> StoryNode {
        let id = entry
            .id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(NodeId::new)
            .unwrap_or_else(NodeId::generate);

        let speaker = entry
            .speaker
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .or_else(|| previous.and_then(|p| p.speaker.clone()));

        let mut characters: Vec<_> = entry
            .characters
            .iter()
            .map(|c| entries::parse_character(c, self.config.default_side))
            .collect();
        if characters.is_empty() {
            if let Some(previous) = previous {
                characters = previous.characters.clone();
            }
        }

        StoryNode {
            id,
            background: resolve_asset(entry.background(), previous.map(|p| &p.background)),
            music: resolve_asset(entry.music(), previous.map(|p| &p.music)),
            speaker,
            text: entry
                .text
                .as_deref()
                .map(|t| t.trim().to_string())
                .unwrap_or_default(),
            characters,
            options: entry
                .options
                .iter()
                .map(|o| entries::parse_option(o, &self.config))
                .collect(),
            changes: entry
                .changes
                .iter()
                .filter_map(entries::parse_change)
                .collect(),
            counter_triggers: entry
                .counter_triggers
                .iter()
                .filter_map(entries::parse_trigger)
                .collect(),
        }
    }
}

/// Resolve a background or music attribute against the previous node's resolved value.
fn resolve_asset(authored: Authored<&str>, previous: Option<&SceneAsset>) -> SceneAsset {
    match authored {
        Authored::Value(value) => SceneAsset::authored(Some(value.to_string())),
        Authored::Cleared => SceneAsset::authored(None),
        Authored::Unset => SceneAsset::inherited(previous.and_then(|p| p.value.clone())),
    }
}

fn warn_unresolved_targets(story: &Story) {
    for node in story.nodes() {
        let option_targets = node.options.iter().filter_map(|o| o.target());
        let trigger_targets = node
            .counter_triggers
            .iter()
            .map(|t| t.goto.as_str())
            .filter(|g| !g.is_empty());

        for target in option_targets.chain(trigger_targets) {
            if story.index_of(target).is_none() {
                warn!(node = %node.id, goto = target, "Jump target does not exist and will be ignored");
            }
        }
    }
}
