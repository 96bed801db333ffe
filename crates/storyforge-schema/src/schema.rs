//! Component schema data model.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;

/// A single JSON-schema type tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Array,
    Object,
    /// Any tag outside the known set (e.g. `integer`, `null`)
    Other(String),
}

impl TypeTag {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Other(tag) => tag,
        }
    }

    /// Array and object values are embedded as collection literals.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Array | Self::Object)
    }
}

impl From<String> for TypeTag {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for TypeTag {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a property: one tag or a list of tags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Single(TypeTag),
    List(Vec<TypeTag>),
}

impl TypeSpec {
    /// The tag used for control inference: the tag itself, or the first
    /// entry of a list.
    pub fn representative(&self) -> Option<&TypeTag> {
        match self {
            Self::Single(tag) => Some(tag),
            Self::List(tags) => tags.first(),
        }
    }
}

/// Definition of a prop or slot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertyDefinition {
    #[serde(rename = "type", default)]
    pub ty: Option<TypeSpec>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Allowed literal values, in declared order
    #[serde(rename = "enum", default)]
    pub options: Option<Vec<serde_json::Value>>,

    #[serde(default)]
    pub default: Option<serde_json::Value>,

    /// Set by the loader for entries read from `slots`
    #[serde(skip)]
    pub is_slot: bool,
}

impl PropertyDefinition {
    /// Create a definition with a single type tag.
    pub fn typed(tag: impl Into<TypeTag>) -> Self {
        Self {
            ty: Some(TypeSpec::Single(tag.into())),
            ..Default::default()
        }
    }

    /// Create an untyped slot definition.
    pub fn slot() -> Self {
        Self {
            is_slot: true,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_options<I, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_default(mut self, default: impl Into<serde_json::Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn representative_type(&self) -> Option<&TypeTag> {
        self.ty.as_ref().and_then(TypeSpec::representative)
    }

    /// Title, ignoring empty strings.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Description, ignoring empty strings.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// Enum options, ignoring an empty list.
    pub fn enum_options(&self) -> Option<&[serde_json::Value]> {
        self.options.as_deref().filter(|o| !o.is_empty())
    }

    /// Default value, ignoring blank ones.
    pub fn default_value(&self) -> Option<&serde_json::Value> {
        self.default.as_ref().filter(|v| !is_blank(v))
    }
}

/// Whether a literal carries no usable value: null, false, zero, `""`,
/// `"0"` or an empty collection.
fn is_blank(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Name-to-definition mapping that keeps declaration order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap(IndexMap<String, PropertyDefinition>);

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition. An existing name is overwritten in place.
    pub fn insert(&mut self, name: impl Into<String>, definition: PropertyDefinition) {
        self.0.insert(name.into(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDefinition> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyDefinition)> {
        self.0.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn mark_slots(&mut self) {
        for definition in self.0.values_mut() {
            definition.is_slot = true;
        }
    }
}

impl<N: Into<String>> FromIterator<(N, PropertyDefinition)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (N, PropertyDefinition)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, d)| (n.into(), d)).collect())
    }
}

/// A component's configurable inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentSchema {
    /// Stable identifier (`provider:machine_name`)
    pub id: String,

    /// Display name
    pub name: String,

    /// Identifier-safe name, also the file stem
    pub machine_name: String,

    /// Directory holding the component
    pub path: PathBuf,

    pub description: Option<String>,

    /// Props in declaration order
    pub properties: PropertyMap,

    /// Slots in declaration order
    pub slots: PropertyMap,

    /// Names of props that must be supplied
    pub required: BTreeSet<String>,
}

impl ComponentSchema {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        machine_name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            machine_name: machine_name.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, definition: PropertyDefinition) -> Self {
        self.properties.insert(name, definition);
        self
    }

    pub fn with_slot(mut self, name: impl Into<String>, mut definition: PropertyDefinition) -> Self {
        definition.is_slot = true;
        self.slots.insert(name, definition);
        self
    }

    pub fn with_required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// True when the component declares neither props nor slots.
    pub fn has_no_inputs(&self) -> bool {
        self.properties.is_empty() && self.slots.is_empty()
    }
}
