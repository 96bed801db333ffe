//! Schema-to-story compiler.
//!
//! Turns a component's props and slots into argument definitions, assembles
//! them into a deterministic story document, and decides whether a story
//! artifact needs to be regenerated at all.

pub mod args;
pub mod assembler;
pub mod policy;

pub use args::{compile, ArgDefinition, Category, Control};
pub use assembler::{assemble, AssembleError, DocumentSettings, StoryDocument};
pub use policy::{is_stale, RegenerationPolicy};
