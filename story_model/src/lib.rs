//! # Story Model
//!
//! Plain data for the branching narrative engine. A [`Story`] is an ordered list of
//! [`StoryNode`]s; every node carries its own characters, options, counter changes and
//! counter triggers. This crate holds no playback logic: the engine crate reads these
//! types and never mutates story content.
//!
//! ## Layers
//!
//! - **document**: the raw, serde-deserializable document tree as authored
//! - **node**: resolved nodes after the loader's inheritance pass
//! - **counters**: counter changes, triggers and the per-session counter table

pub mod counters;
pub mod document;
pub mod node;

pub use counters::*;
pub use document::*;
pub use node::*;
