//! Component definition model and loader.
//!
//! This crate reads `*.component.yml` files, keeps the declaration order of
//! their props and slots, and exposes them through a registry keyed by
//! component id.

pub mod loader;
pub mod registry;
pub mod schema;

pub use loader::{load_component, parse_component, SchemaError};
pub use registry::ComponentRegistry;
pub use schema::{ComponentSchema, PropertyDefinition, PropertyMap, TypeSpec, TypeTag};
