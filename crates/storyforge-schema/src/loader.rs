//! Loading of `*.component.yml` definition files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::schema::{ComponentSchema, PropertyMap};

/// Suffix shared by every component definition file.
pub const COMPONENT_FILE_SUFFIX: &str = ".component.yml";

/// On-disk layout of a component definition.
#[derive(Debug, Default, Deserialize)]
struct ComponentFile {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    props: Option<PropsSchema>,

    #[serde(default)]
    slots: Option<PropertyMap>,
}

#[derive(Debug, Default, Deserialize)]
struct PropsSchema {
    #[serde(default)]
    properties: Option<PropertyMap>,

    #[serde(default)]
    required: Option<Vec<String>>,
}

/// Errors that can occur when loading component definitions.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path}: {message}")]
    InvalidYaml { path: PathBuf, message: String },

    #[error("Not a component definition file: {0}")]
    InvalidFileName(PathBuf),

    #[error("Components directory not found: {0}")]
    DirectoryNotFound(PathBuf),
}

/// Parse a component definition from YAML source.
pub fn parse_component(
    source: &str,
    id: &str,
    machine_name: &str,
    path: &Path,
) -> Result<ComponentSchema, serde_yaml::Error> {
    let file: ComponentFile = if source.trim().is_empty() {
        ComponentFile::default()
    } else {
        serde_yaml::from_str(source)?
    };

    let props = file.props.unwrap_or_default();
    let mut slots = file.slots.unwrap_or_default();
    slots.mark_slots();

    Ok(ComponentSchema {
        id: id.to_string(),
        name: file
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| machine_name.to_string()),
        machine_name: machine_name.to_string(),
        path: path.to_path_buf(),
        description: file.description,
        properties: props.properties.unwrap_or_default(),
        slots,
        required: props.required.unwrap_or_default().into_iter().collect(),
    })
}

/// Load a component definition file for the given provider.
///
/// The component id is `<provider>:<machine_name>`, where the machine name
/// is the file stem before `.component.yml`.
pub fn load_component(file: &Path, provider: &str) -> Result<ComponentSchema, SchemaError> {
    let machine_name =
        machine_name(file).ok_or_else(|| SchemaError::InvalidFileName(file.to_path_buf()))?;

    let source = fs::read_to_string(file).map_err(|source| SchemaError::Read {
        path: file.to_path_buf(),
        source,
    })?;

    let dir = file.parent().unwrap_or(Path::new(""));
    let id = format!("{}:{}", provider, machine_name);

    parse_component(&source, &id, &machine_name, dir).map_err(|e| SchemaError::InvalidYaml {
        path: file.to_path_buf(),
        message: e.to_string(),
    })
}

/// Extract the machine name from a definition file path.
pub fn machine_name(file: &Path) -> Option<String> {
    let file_name = file.file_name()?.to_str()?;
    let split = file_name.len().checked_sub(COMPONENT_FILE_SUFFIX.len())?;
    if split == 0 || !file_name.is_char_boundary(split) {
        return None;
    }
    let (stem, suffix) = file_name.split_at(split);
    suffix
        .eq_ignore_ascii_case(COMPONENT_FILE_SUFFIX)
        .then(|| stem.to_string())
}
