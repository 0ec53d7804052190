//! Listener registration for the presentation layer.
//!
//! The engine notifies listeners synchronously, in registration order:
//!
//! - **node changed**: once per activated node, before that node's counter changes apply
//! - **story ended**: once, when traversal advances past the last node
//!
//! Listeners cannot call back into the engine while it is notifying them. A UI that wants
//! to react (for example by advancing) should record the input and call the engine after
//! the current operation returns.

use story_model::StoryNode;

/// Called with the node that just became current.
pub type NodeChangedListener = Box<dyn FnMut(&StoryNode)>;

/// Called when playback runs past the last node.
pub type StoryEndedListener = Box<dyn FnMut()>;

/// Handle returned on registration, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

enum Listener {
    NodeChanged(NodeChangedListener),
    StoryEnded(StoryEndedListener),
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Listener::NodeChanged(_) => write!(f, "NodeChanged(<fn>)"),
            Listener::StoryEnded(_) => write!(f, "StoryEnded(<fn>)"),
        }
    }
}

/// Ordered set of registered listeners.
#[derive(Debug, Default)]
pub struct Listeners {
    entries: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_node_changed(&mut self, listener: NodeChangedListener) -> SubscriptionId {
        self.push(Listener::NodeChanged(listener))
    }

    pub fn on_story_ended(&mut self, listener: StoryEndedListener) -> SubscriptionId {
        self.push(Listener::StoryEnded(listener))
    }

    /// Remove a listener. Returns `false` if the id was not registered.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn node_changed(&mut self, node: &StoryNode) {
        for (_, listener) in &mut self.entries {
            if let Listener::NodeChanged(callback) = listener {
                callback(node);
            }
        }
    }

    pub(crate) fn story_ended(&mut self) {
        for (_, listener) in &mut self.entries {
            if let Listener::StoryEnded(callback) = listener {
                callback();
            }
        }
    }

    fn push(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }
}
