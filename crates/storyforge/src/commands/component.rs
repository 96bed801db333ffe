//! Component story template commands.

use anyhow::{Context, Result};
use storyforge_schema::ComponentRegistry;
use storyforge_stories::ComponentStoryGenerator;

use crate::config::ConfigFile;

/// Scan the configured directories for component definitions.
fn load_registry(config: &ConfigFile) -> Result<ComponentRegistry> {
    let mut registry = ComponentRegistry::new();

    for dir in config.component_dirs() {
        let count = registry
            .scan(&dir)
            .with_context(|| format!("Failed to scan {}", dir.display()))?;
        tracing::debug!("Loaded {} components from {}", count, dir.display());
    }

    tracing::info!("Found {} components", registry.len());

    Ok(registry)
}

/// Generate the story template for one component.
pub fn run(config: &ConfigFile, component_id: &str, force: bool) -> Result<()> {
    let registry = load_registry(config)?;
    let schema = registry
        .find(component_id)
        .with_context(|| format!("Component with id '{}' not found.", component_id))?;

    ComponentStoryGenerator::new(config.document_settings())
        .generate(schema, force)
        .with_context(|| format!("Failed to generate stories for {}", component_id))?;

    Ok(())
}

/// Generate story templates for every component.
pub fn run_all(config: &ConfigFile, force: bool) -> Result<()> {
    let registry = load_registry(config)?;
    let results = ComponentStoryGenerator::new(config.document_settings()).generate_all(&registry, force);

    super::report(results)
}
