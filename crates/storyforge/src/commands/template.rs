//! Stories JSON commands.

use std::path::Path;

use anyhow::{Context, Result};
use storyforge_stories::{omit_server_url, server_render_url, TemplateOptions, TemplateStoryGenerator};

use crate::config::ConfigFile;

fn generator(config: &ConfigFile) -> Result<TemplateStoryGenerator> {
    TemplateStoryGenerator::new(config.root(), &config.stories.dir)
        .context("Failed to set up stories directory")
}

/// Resolve the render endpoint, unless it is omitted.
fn server_url(config: &ConfigFile, omit: bool) -> Option<String> {
    if omit {
        return None;
    }
    match config.server.base_url.as_deref() {
        Some(base_url) => Some(server_render_url(base_url)),
        None => {
            tracing::warn!("No [server] base_url configured, omitting server URL");
            None
        }
    }
}

/// Generate the stories JSON file for one template.
pub fn run(config: &ConfigFile, template_path: &Path, force: bool, omit: bool) -> Result<()> {
    let template = config.root().join(template_path);
    let options = TemplateOptions {
        force,
        server_url: server_url(config, omit),
    };

    generator(config)?
        .generate(&template, &options)
        .with_context(|| format!("Failed to generate stories for {}", template.display()))?;

    Ok(())
}

/// Generate stories JSON files for every template.
pub fn run_all(config: &ConfigFile, force: bool, include: bool, omit: bool) -> Result<()> {
    let options = TemplateOptions {
        force,
        server_url: server_url(config, omit_server_url(omit, include)),
    };

    let results = generator(config)?
        .generate_all(&options)
        .context("Failed to discover stories templates")?;

    super::report(results)
}
