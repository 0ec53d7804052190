//! Story Engine - the playback state machine.
//!
//! States:
//! - **Unstarted**: after `load`, before the first activation
//! - **Active**: a node is current
//! - **Ended**: `next` ran past the last node
//!
//! Activating a node always runs the same sequence:
//! 1. **Notify**: node-changed listeners see the node before its changes apply
//! 2. **Change**: the node's own counter changes are applied
//! 3. **Trigger**: the first trigger that holds and resolves redirects to its target,
//!    which is activated from step 1 again
//!
//! Jump targets that do not exist are ignored and never reported as errors.

use std::path::Path;

use story_model::{CounterChange, CounterTable, Story, StoryNode, StoryOption};
use tracing::{debug, trace};

use crate::events::{Listeners, NodeChangedListener, StoryEndedListener, SubscriptionId};
use crate::loader::{LoadError, StoryLoader};

/// Where playback is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Unstarted,
    /// Index of the current node.
    Active(usize),
    Ended,
}

/// Stateful interpreter over one loaded story.
///
/// Each engine owns its counters; separate sessions never share state.
#[derive(Debug, Default)]
pub struct StoryEngine {
    story: Story,
    state: PlaybackState,
    counters: CounterTable,
    listeners: Listeners,
}

impl StoryEngine {
    /// Create an engine with an empty story.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine and load `story` into it.
    pub fn with_story(story: Story) -> Self {
        let mut engine = Self::new();
        engine.load(story);
        engine
    }

    /// Replace the story, rewind to unstarted and clear all counters.
    ///
    /// Listeners are kept and nothing is emitted.
    pub fn load(&mut self, story: Story) {
        debug!(nodes = story.len(), "Story loaded into engine");
        self.story = story;
        self.state = PlaybackState::Unstarted;
        self.counters.clear();
    }

    /// Load a story file with default loader settings, then [`load`](Self::load) it.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let story = StoryLoader::with_defaults().load_path(path)?;
        self.load(story);
        Ok(())
    }

    /// Activate the first node. Does nothing on an empty story.
    pub fn start(&mut self) {
        if self.story.is_empty() {
            debug!("Start ignored: story is empty");
            return;
        }
        self.activate(0);
    }

    /// Advance to the following node, or start if playback has not begun.
    ///
    /// Running past the last node notifies story-ended once; further calls are ignored.
    pub fn next(&mut self) {
        match self.state {
            PlaybackState::Unstarted => self.start(),
            PlaybackState::Ended => trace!("Next ignored: story already ended"),
            PlaybackState::Active(index) => {
                let next = index + 1;
                if next < self.story.len() {
                    self.activate(next);
                } else {
                    debug!("Story ended");
                    self.state = PlaybackState::Ended;
                    self.listeners.story_ended();
                }
            }
        }
    }

    /// Apply a chosen option: its counter changes first, then its jump.
    ///
    /// An absent or unknown goto falls through to [`next`](Self::next).
    pub fn apply_option(&mut self, option: &StoryOption) {
        apply_changes(&mut self.counters, &option.changes);

        if let Some(target) = option.target() {
            if let Some(index) = self.story.index_of(target) {
                debug!(goto = target, "Option jump");
                self.activate(index);
                return;
            }
            trace!(goto = target, "Option target not found, advancing");
        }

        self.next();
    }

    /// Apply the option at `index` on the current node.
    ///
    /// Returns `false` (and does nothing) when no node is current or the index is out of
    /// range.
    pub fn choose(&mut self, index: usize) -> bool {
        let Some(option) = self.current_node().and_then(|n| n.options.get(index)).cloned() else {
            return false;
        };
        self.apply_option(&option);
        true
    }

    /// Register a node-changed listener.
    pub fn subscribe_node_changed(&mut self, listener: NodeChangedListener) -> SubscriptionId {
        self.listeners.on_node_changed(listener)
    }

    /// Register a story-ended listener.
    pub fn subscribe_story_ended(&mut self, listener: StoryEndedListener) -> SubscriptionId {
        self.listeners.on_story_ended(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Index of the current node, if a node is current.
    pub fn position(&self) -> Option<usize> {
        match self.state {
            PlaybackState::Active(index) => Some(index),
            _ => None,
        }
    }

    pub fn current_node(&self) -> Option<&StoryNode> {
        self.position().and_then(|index| self.story.get(index))
    }

    pub fn counters(&self) -> &CounterTable {
        &self.counters
    }

    /// Current value of a counter, 0 when unset.
    pub fn counter(&self, name: &str) -> i32 {
        self.counters.get(name)
    }

    pub fn is_ended(&self) -> bool {
        self.state == PlaybackState::Ended
    }

    /// Run the activation sequence starting at `index`.
    ///
    /// Each trigger redirect re-runs the whole sequence for the target node. Mutually
    /// redirecting nodes whose triggers keep holding are not cut short.
    fn activate(&mut self, mut index: usize) {
        loop {
            self.state = PlaybackState::Active(index);
            let node = &self.story.nodes()[index];
            debug!(index, id = %node.id, "Node activated");

            self.listeners.node_changed(node);
            apply_changes(&mut self.counters, &node.changes);

            match self.fired_trigger_target(node) {
                Some(target) => {
                    debug!(from = %node.id, to = %self.story.nodes()[target].id, "Counter trigger jump");
                    index = target;
                }
                None => break,
            }
        }
    }

    /// Index of the first trigger target whose condition holds and whose goto resolves.
    fn fired_trigger_target(&self, node: &StoryNode) -> Option<usize> {
        node.counter_triggers.iter().find_map(|trigger| {
            let met = trigger.is_met(&self.counters);
            trace!(%trigger, value = self.counters.get(&trigger.counter), met, "Trigger evaluated");
            if met {
                self.story.index_of(&trigger.goto)
            } else {
                None
            }
        })
    }
}

fn apply_changes(counters: &mut CounterTable, changes: &[CounterChange]) {
    for change in changes {
        let value = counters.apply(change);
        trace!(counter = %change.counter, delta = change.delta, value, "Counter changed");
    }
}
