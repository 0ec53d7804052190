//! Resolved story nodes.

mod character;
mod option;

pub use character::*;
pub use option::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::counters::{CounterChange, CounterTrigger};

/// Unique identifier for story nodes.
///
/// Authored ids are arbitrary strings; nodes without one get a generated UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a node ID from an authored string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a fresh, random node ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A background or music reference after inheritance has been resolved.
///
/// `explicitly_set` records whether this node authored the value itself. A UI uses it to
/// tell "keep what is showing" (inherited) apart from "switch" or "clear" (authored).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneAsset {
    pub value: Option<String>,
    pub explicitly_set: bool,
}

impl SceneAsset {
    /// An asset authored on the node itself. `None` means explicitly cleared.
    pub fn authored(value: Option<String>) -> Self {
        Self {
            value,
            explicitly_set: true,
        }
    }

    /// An asset copied from the previous node.
    pub fn inherited(value: Option<String>) -> Self {
        Self {
            value,
            explicitly_set: false,
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Authored on this node with no value: the presentation layer should clear or stop it.
    pub fn is_cleared(&self) -> bool {
        self.explicitly_set && self.value.is_none()
    }
}

/// A single resolved line of the story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryNode {
    pub id: NodeId,
    pub background: SceneAsset,
    pub music: SceneAsset,
    pub speaker: Option<String>,

    /// Dialogue text, trimmed. Never inherited.
    pub text: String,

    pub characters: Vec<CharacterState>,
    pub options: Vec<StoryOption>,

    /// Applied unconditionally when the node activates.
    pub changes: Vec<CounterChange>,

    /// Evaluated in order after `changes` are applied.
    pub counter_triggers: Vec<CounterTrigger>,
}

impl StoryNode {
    /// Create an empty node with the given id.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            background: SceneAsset::default(),
            music: SceneAsset::default(),
            speaker: None,
            text: String::new(),
            characters: Vec::new(),
            options: Vec::new(),
            changes: Vec::new(),
            counter_triggers: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    pub fn with_option(mut self, option: StoryOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_change(mut self, change: CounterChange) -> Self {
        self.changes.push(change);
        self
    }

    pub fn with_trigger(mut self, trigger: CounterTrigger) -> Self {
        self.counter_triggers.push(trigger);
        self
    }

    /// Whether the node waits for a choice instead of a plain "next".
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// An ordered, immutable sequence of nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    nodes: Vec<StoryNode>,
}

impl Story {
    pub fn new(nodes: Vec<StoryNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[StoryNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StoryNode> {
        self.nodes.get(index)
    }

    /// Index of the first node with the given id.
    ///
    /// Empty ids never resolve.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        if id.is_empty() {
            return None;
        }
        self.nodes.iter().position(|n| n.id.as_str() == id)
    }

    pub fn node(&self, id: &str) -> Option<&StoryNode> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }
}
