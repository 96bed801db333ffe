//! Scaffold the configuration for a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing storyforge...");
    scaffold(Path::new("."), yes)?;
    tracing::info!("Initialization complete!");
    tracing::info!("Run 'storyforge generate-all-component-stories' to generate story templates.");
    Ok(())
}

/// Write the default files below `base`, keeping existing ones unless `overwrite`.
fn scaffold(base: &Path, overwrite: bool) -> Result<()> {
    let config_path = base.join("stories.toml");
    if !config_path.exists() || overwrite {
        fs::write(&config_path, DEFAULT_CONFIG).context("Failed to write stories.toml")?;
        tracing::info!("Created stories.toml");
    } else {
        tracing::warn!("stories.toml already exists. Use --yes to overwrite.");
    }

    let storybook_dir = base.join("storybook").join(".storybook");
    if !storybook_dir.exists() {
        fs::create_dir_all(&storybook_dir).context("Failed to create storybook/.storybook")?;
    }

    let main_path = storybook_dir.join("main.js");
    if !main_path.exists() || overwrite {
        fs::write(&main_path, DEFAULT_STORYBOOK_MAIN)
            .context("Failed to write storybook/.storybook/main.js")?;
        tracing::info!("Created storybook/.storybook/main.js");
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Storyforge Configuration

[project]
# Application root containing themes/, modules/ and profiles/
root = "web"

[components]
# Directories below the root searched for *.component.yml files
dirs = ["themes", "modules", "profiles"]

# Title namespace of generated stories
namespace = "Components/SDC"

[stories]
# Stories JSON output directory, relative to the root
dir = "../storybook/stories"

[server]
# Base URL of the application server (for the render endpoint)
# base_url = "http://localhost"
"#;

const DEFAULT_STORYBOOK_MAIN: &str = r#"/** @type { import('@storybook/server-webpack5').StorybookConfig } */
const config = {
  "stories": [
    "../../storybook/**/*.stories.json"
  ],
  "addons": [
    "@storybook/addon-webpack5-compiler-swc"
  ],
  "framework": {
    "name": "@storybook/server-webpack5",
    "options": {}
  }
};
export default config;
"#;
