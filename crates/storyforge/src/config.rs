//! Configuration file (stories.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use storyforge_compiler::DocumentSettings;
use storyforge_stories::template::{SCAN_DIRECTORIES, STORIES_DIRECTORY};

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub components: ComponentsConfig,
    #[serde(default)]
    pub stories: StoriesConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Application root that extensions live under
    #[serde(default = "default_root")]
    pub root: String,
}

#[derive(Debug, Deserialize)]
pub struct ComponentsConfig {
    /// Directories below the root searched for component definitions
    #[serde(default = "default_component_dirs")]
    pub dirs: Vec<String>,
    /// Title namespace of generated stories
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

#[derive(Debug, Deserialize)]
pub struct StoriesConfig {
    /// Stories JSON directory, relative to the root
    #[serde(default = "default_stories_dir")]
    pub dir: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ServerConfig {
    /// Base URL of the application server, used for the render endpoint
    pub base_url: Option<String>,
}

fn default_root() -> String {
    "web".to_string()
}
fn default_component_dirs() -> Vec<String> {
    SCAN_DIRECTORIES.iter().map(|d| d.to_string()).collect()
}
fn default_namespace() -> String {
    DocumentSettings::default().namespace
}
fn default_stories_dir() -> String {
    STORIES_DIRECTORY.to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            dirs: default_component_dirs(),
            namespace: default_namespace(),
        }
    }
}

impl Default for StoriesConfig {
    fn default() -> Self {
        Self {
            dir: default_stories_dir(),
        }
    }
}

impl ConfigFile {
    pub fn root(&self) -> PathBuf {
        PathBuf::from(&self.project.root)
    }

    /// Component directories that exist below the root.
    pub fn component_dirs(&self) -> Vec<PathBuf> {
        let root = self.root();
        self.components
            .dirs
            .iter()
            .map(|d| root.join(d))
            .filter(|d| d.is_dir())
            .collect()
    }

    pub fn document_settings(&self) -> DocumentSettings {
        DocumentSettings {
            namespace: self.components.namespace.clone(),
            ..Default::default()
        }
    }
}

/// Load configuration from the given path if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = parse_config(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::debug!("No config at {}, using defaults", path.display());
    Ok(ConfigFile::default())
}

fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_sections_use_defaults() {
        let config = parse_config("[server]\nbase_url = \"http://localhost\"\n").unwrap();

        assert_eq!(config.project.root, "web");
        assert_eq!(config.components.dirs, vec!["themes", "modules", "profiles"]);
        assert_eq!(config.components.namespace, "Components/SDC");
        assert_eq!(config.stories.dir, "../storybook/stories");
        assert_eq!(config.server.base_url.as_deref(), Some("http://localhost"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = parse_config(
            "[project]\nroot = \"docroot\"\n[components]\ndirs = [\"themes\"]\nnamespace = \"UI\"\n",
        )
        .unwrap();

        assert_eq!(config.root(), PathBuf::from("docroot"));
        assert_eq!(config.components.dirs, vec!["themes"]);
        assert_eq!(config.document_settings().namespace, "UI");
    }

    #[test]
    fn missing_file_means_defaults() {
        let temp = tempdir().unwrap();
        let config = load_config(&temp.path().join("stories.toml")).unwrap();
        assert_eq!(config.project.root, "web");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("stories.toml");
        fs::write(&path, "[project\nroot = ").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn lists_existing_component_dirs() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("themes")).unwrap();
        let mut config = ConfigFile::default();
        config.project.root = temp.path().display().to_string();

        assert_eq!(config.component_dirs(), vec![temp.path().join("themes")]);
    }
}
