//! Player choices attached to a node.

use serde::{Deserialize, Serialize};

use crate::counters::CounterChange;

/// A choice the player can pick on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryOption {
    pub text: String,

    /// Target node id. Unknown targets fall through to the next node.
    pub goto: Option<String>,

    /// Applied before the jump, in order.
    pub changes: Vec<CounterChange>,
}

impl StoryOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            goto: None,
            changes: Vec::new(),
        }
    }

    pub fn with_goto(mut self, target: impl Into<String>) -> Self {
        self.goto = Some(target.into());
        self
    }

    pub fn with_change(mut self, change: CounterChange) -> Self {
        self.changes.push(change);
        self
    }

    /// The goto target, if one was authored and is non-empty.
    pub fn target(&self) -> Option<&str> {
        self.goto.as_deref().filter(|g| !g.is_empty())
    }
}
