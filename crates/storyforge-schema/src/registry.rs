//! Component registry for looking up component definitions.
//!
//! Scans extension directories for `*.component.yml` files, loads them and
//! provides lookup by component id.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::loader::{load_component, SchemaError};
use crate::schema::ComponentSchema;

/// A registry of component definitions, ordered by id.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: BTreeMap<String, ComponentSchema>,
}

static COMPONENT_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_-]+\.component\.yml$").expect("Invalid component file regex")
});

impl ComponentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a directory for component definitions and populate the registry.
    ///
    /// Files that fail to load are logged and skipped.
    pub fn scan(&mut self, dir: &Path) -> Result<usize, SchemaError> {
        if !dir.is_dir() {
            return Err(SchemaError::DirectoryNotFound(dir.to_path_buf()));
        }

        let mut count = 0;

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !COMPONENT_FILE_RE.is_match(filename) {
                continue;
            }

            let component_dir = path.parent().unwrap_or(dir);
            let provider = resolve_provider(dir, component_dir);

            match load_component(path, &provider) {
                Ok(schema) => {
                    tracing::debug!("Loaded component {} from {}", schema.id, path.display());
                    self.insert(schema);
                    count += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping component definition: {}", e);
                }
            }
        }

        Ok(count)
    }

    /// Register a component, replacing any earlier one with the same id.
    pub fn insert(&mut self, schema: ComponentSchema) {
        if let Some(previous) = self.components.insert(schema.id.clone(), schema) {
            tracing::debug!(
                "Component {} from {} was replaced",
                previous.id,
                previous.path.display()
            );
        }
    }

    /// Look up a component by id.
    pub fn find(&self, id: &str) -> Option<&ComponentSchema> {
        self.components.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    /// All registered ids in ascending order.
    pub fn ids(&self) -> Vec<&str> {
        self.components.keys().map(String::as_str).collect()
    }

    /// All registered components in ascending id order.
    pub fn components(&self) -> impl Iterator<Item = &ComponentSchema> {
        self.components.values()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Determine which extension provides a component.
///
/// Prefers the nearest ancestor carrying a `<name>.info.yml` marker, then the
/// directory above the nearest `components` directory, then the scan root.
fn resolve_provider(root: &Path, component_dir: &Path) -> String {
    for dir in ancestors_within(component_dir, root) {
        if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
            if dir.join(format!("{}.info.yml", name)).is_file() {
                return name.to_string();
            }
        }
    }

    for dir in ancestors_within(component_dir, root) {
        if dir.file_name().and_then(|n| n.to_str()) == Some("components") {
            if let Some(name) = dir
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
            {
                return name.to_string();
            }
        }
    }

    root.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("components")
        .to_string()
}

fn ancestors_within<'a>(dir: &'a Path, root: &'a Path) -> impl Iterator<Item = &'a Path> + 'a {
    dir.ancestors().take_while(move |d| d.starts_with(root))
}
