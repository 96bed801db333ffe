//! Story artifact generation.
//!
//! Wires the compiler to the filesystem: decides where artifacts live,
//! applies the regeneration policy, and writes component story templates
//! and stories JSON files.

pub mod component;
pub mod outcome;
pub mod renderer;
pub mod store;
pub mod template;

pub use component::ComponentStoryGenerator;
pub use outcome::{GenerateError, GenerationOutcome, SerializationError, SkipReason};
pub use renderer::{RenderError, StoriesFile, StoryEntry, StoryRenderer, TwigStoryRenderer};
pub use store::{ArtifactStore, FsStore};
pub use template::{omit_server_url, server_render_url, TemplateOptions, TemplateStoryGenerator};
