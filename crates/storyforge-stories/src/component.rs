//! Story templates generated from component definitions.

use std::path::PathBuf;

use rayon::prelude::*;
use storyforge_compiler::{assemble, compile, DocumentSettings, RegenerationPolicy};
use storyforge_schema::{ComponentRegistry, ComponentSchema};

use crate::outcome::{GenerateError, GenerationOutcome, SkipReason};
use crate::store::{ArtifactStore, FsStore};

/// File extension of generated component story templates.
pub const STORIES_SUFFIX: &str = ".stories.twig";

/// Generates `<machine_name>.stories.twig` next to each component.
///
/// Existing templates are left alone unless forced, so hand edits survive.
pub struct ComponentStoryGenerator {
    settings: DocumentSettings,
    store: Box<dyn ArtifactStore>,
}

impl ComponentStoryGenerator {
    /// Create a generator writing to the local filesystem.
    pub fn new(settings: DocumentSettings) -> Self {
        Self {
            settings,
            store: Box::new(FsStore),
        }
    }

    /// Use a different artifact store.
    pub fn with_store(mut self, store: impl ArtifactStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Where the story template for a component is written.
    pub fn destination_path(schema: &ComponentSchema) -> PathBuf {
        schema
            .path
            .join(format!("{}{}", schema.machine_name, STORIES_SUFFIX))
    }

    /// Generate the story template for one component.
    pub fn generate(
        &self,
        schema: &ComponentSchema,
        force: bool,
    ) -> Result<GenerationOutcome, GenerateError> {
        let destination = Self::destination_path(schema);
        let exists = self.store.exists(&destination);

        if !RegenerationPolicy::ExistenceGated.should_generate(exists, false, force) {
            tracing::info!(
                "Skipping component stories generation for {}",
                destination.display()
            );
            return Ok(GenerationOutcome::Skipped {
                destination,
                reason: SkipReason::UpToDate,
            });
        }

        let args = compile(schema);
        let Some(document) = assemble(&schema.id, schema, &args, &self.settings) else {
            tracing::info!(
                "Skipping {}: component {} has no props or slots",
                destination.display(),
                schema.id
            );
            return Ok(GenerationOutcome::Skipped {
                destination,
                reason: SkipReason::NoArguments,
            });
        };

        let text = document
            .render()
            .map_err(|e| GenerateError::Serialization {
                destination: destination.clone(),
                source: e.into(),
            })?;

        tracing::debug!("Story template for {}:\n{}", schema.id, text);

        self.store
            .write(&destination, &text)
            .map_err(|source| GenerateError::Write {
                destination: destination.clone(),
                source,
            })?;

        tracing::info!("Stories generated for {}", destination.display());

        Ok(GenerationOutcome::Generated { destination })
    }

    /// Generate story templates for every registered component.
    ///
    /// Components are processed in parallel; results keep registry order.
    pub fn generate_all(
        &self,
        registry: &ComponentRegistry,
        force: bool,
    ) -> Vec<Result<GenerationOutcome, GenerateError>> {
        let components: Vec<&ComponentSchema> = registry.components().collect();

        components
            .par_iter()
            .map(|schema| self.generate(schema, force))
            .collect()
    }
}
