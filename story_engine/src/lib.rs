//! # Story Engine
//!
//! Loads authored story documents and plays them back. This crate reads the data types
//! from `story_model`, resolves field inheritance between consecutive nodes, and walks
//! the resulting [`Story`](story_model::Story) while tracking counters.
//!
//! ## Core Components
//!
//! - **loader**: Document parsing and the inheritance pass
//! - **engine**: The playback state machine (start, next, apply option, triggers)
//! - **events**: Listener registration for the presentation layer
//! - **graph**: Static branch graph of a story for authoring tools
//!
//! ## Design Philosophy
//!
//! - **Passive**: The engine only reacts to calls; it never drives its own loop
//! - **Forgiving**: Unknown jump targets are ignored, never raised
//! - **Synchronous**: Every operation runs to completion before returning

pub mod engine;
pub mod events;
pub mod graph;
pub mod loader;

pub use engine::*;
pub use events::*;
pub use graph::*;
pub use loader::*;
