//! Argument derivation from component props and slots.

use indexmap::IndexMap;
use serde_json::Value;
use storyforge_schema::{ComponentSchema, PropertyDefinition, TypeTag};

/// Literal used when a scalar argument has no default.
pub const PLACEHOLDER: &str = "placeholder";

/// Literal used when a collection argument has no default.
pub const EMPTY_COLLECTION: &str = "[]";

/// Grouping of an argument in the preview tool's controls panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Props,
    Slots,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Props => "Props",
            Self::Slots => "Slots",
        }
    }
}

/// Widget used to edit an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Pick one of the enumerated values
    Select { options: Vec<String> },
    Text,
    Number,
    /// Raw value editor for booleans, collections and unknown types
    Freeform,
}

impl Control {
    /// Infer the control for a definition.
    ///
    /// An enum always wins over the declared type.
    pub fn infer(definition: &PropertyDefinition) -> Self {
        if let Some(options) = definition.enum_options() {
            return Self::Select {
                options: options.iter().map(value_text).collect(),
            };
        }

        match definition.representative_type() {
            Some(TypeTag::String) => Self::Text,
            Some(TypeTag::Number) => Self::Number,
            _ => Self::Freeform,
        }
    }

    /// Control literal as embedded in the document's `argTypes` block.
    pub fn literal(&self) -> String {
        match self {
            Self::Select { options } => {
                let quoted = options
                    .iter()
                    .map(|o| escape_single_quoted(o))
                    .collect::<Vec<_>>()
                    .join("','");
                format!("{{control: 'select', options: ['{}']}}", quoted)
            }
            Self::Text => r#"{control: "text"}"#.to_string(),
            Self::Number => r#"{control: "number"}"#.to_string(),
            Self::Freeform => r#"{control: "object"}"#.to_string(),
        }
    }
}

/// A normalized argument, ready for document assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgDefinition {
    pub name: String,

    /// Representative type, if the definition declares one
    pub ty: Option<TypeTag>,

    pub title: Option<String>,

    pub description: Option<String>,

    /// Whether the name is listed in the schema's required set
    pub required: bool,

    pub category: Category,

    pub control: Control,

    /// Default value as embedded in the document's `args` block
    pub default_literal: String,
}

impl ArgDefinition {
    fn from_definition(name: &str, definition: &PropertyDefinition, required: bool) -> Self {
        let ty = definition.representative_type().cloned();
        let default_literal = default_literal(ty.as_ref(), definition.default_value());

        Self {
            name: name.to_string(),
            ty,
            title: definition.title().map(str::to_string),
            description: definition.description().map(str::to_string),
            required,
            category: if definition.is_slot {
                Category::Slots
            } else {
                Category::Props
            },
            control: Control::infer(definition),
            default_literal,
        }
    }
}

/// Compile a schema's props and slots into argument definitions.
///
/// Props come first in declaration order, then slots. A slot sharing a
/// prop's name replaces that prop in place. An empty result means the
/// component has nothing to preview.
pub fn compile(schema: &ComponentSchema) -> Vec<ArgDefinition> {
    let mut args: IndexMap<&str, ArgDefinition> = IndexMap::new();

    for (name, definition) in schema.properties.iter().chain(schema.slots.iter()) {
        args.insert(name, ArgDefinition::from_definition(name, definition, schema.is_required(name)));
    }

    args.into_values().collect()
}

/// Render the default value literal for an argument.
fn default_literal(ty: Option<&TypeTag>, default: Option<&Value>) -> String {
    if ty.is_some_and(TypeTag::is_collection) {
        return default
            .map(Value::to_string)
            .unwrap_or_else(|| EMPTY_COLLECTION.to_string());
    }

    let text = default.map(value_text).unwrap_or_else(|| PLACEHOLDER.to_string());
    Value::String(text).to_string()
}

/// Plain text of a literal value: strings verbatim, everything else as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema() -> ComponentSchema {
        ComponentSchema::new("ui:card", "Card", "card", "components/card")
    }

    fn arg<'a>(args: &'a [ArgDefinition], name: &str) -> &'a ArgDefinition {
        args.iter().find(|a| a.name == name).unwrap()
    }

    #[test]
    fn empty_schema_compiles_to_nothing() {
        assert!(compile(&schema()).is_empty());
    }

    #[test]
    fn props_come_before_slots_in_declared_order() {
        let schema = schema()
            .with_slot("footer", PropertyDefinition::slot())
            .with_property("zeta", PropertyDefinition::typed("string"))
            .with_slot("body", PropertyDefinition::slot())
            .with_property("alpha", PropertyDefinition::typed("number").with_options([1, 2]));

        let names: Vec<_> = compile(&schema).into_iter().map(|a| a.name).collect();

        assert_eq!(names, vec!["zeta", "alpha", "footer", "body"]);
    }

    #[test]
    fn control_inference_matrix() {
        let types = ["string", "number", "boolean", "array", "object", "integer"];

        for ty in types {
            let plain = compile(&schema().with_property("x", PropertyDefinition::typed(ty)));
            let expected = match ty {
                "string" => Control::Text,
                "number" => Control::Number,
                _ => Control::Freeform,
            };
            assert_eq!(plain[0].control, expected, "type {}", ty);

            let with_enum = compile(
                &schema().with_property("x", PropertyDefinition::typed(ty).with_options(["a", "b", "c"])),
            );
            assert_eq!(
                with_enum[0].control,
                Control::Select {
                    options: vec!["a".into(), "b".into(), "c".into()]
                },
                "enum with type {}",
                ty
            );
        }
    }

    #[test]
    fn untyped_slot_is_freeform_with_placeholder() {
        let args = compile(&schema().with_slot("content", PropertyDefinition::slot()));

        assert_eq!(args[0].ty, None);
        assert_eq!(args[0].control, Control::Freeform);
        assert_eq!(args[0].category, Category::Slots);
        assert_eq!(args[0].default_literal, r#""placeholder""#);
    }

    #[test]
    fn empty_enum_falls_through_to_type() {
        let definition = PropertyDefinition::typed("string").with_options(Vec::<Value>::new());
        let args = compile(&schema().with_property("x", definition));
        assert_eq!(args[0].control, Control::Text);
    }

    #[test]
    fn representative_type_is_first_list_entry() {
        let definition: PropertyDefinition =
            serde_json::from_value(json!({"type": ["number", "string"]})).unwrap();
        let args = compile(&schema().with_property("n", definition));

        assert_eq!(args[0].ty, Some(TypeTag::Number));
        assert_eq!(args[0].control, Control::Number);
    }

    #[test]
    fn required_flag_follows_required_set() {
        let base = schema()
            .with_property("label", PropertyDefinition::typed("string"))
            .with_property("size", PropertyDefinition::typed("string"))
            .with_slot("label_slot", PropertyDefinition::slot());

        let args = compile(&base.clone().with_required(["label", "label_slot"]));
        assert!(arg(&args, "label").required);
        assert!(!arg(&args, "size").required);
        assert!(arg(&args, "label_slot").required);

        let args = compile(&base);
        assert!(args.iter().all(|a| !a.required));
    }

    #[test]
    fn default_literals() {
        let schema = schema()
            .with_property("count", PropertyDefinition::typed("number"))
            .with_property("items", PropertyDefinition::typed("array"))
            .with_property("config", PropertyDefinition::typed("object").with_default(json!({"a": 1})))
            .with_property("tags", PropertyDefinition::typed("array").with_default(json!(["x", "y"])))
            .with_property("label", PropertyDefinition::typed("string").with_default("Say \"hi\""))
            .with_property("max", PropertyDefinition::typed("number").with_default(10))
            .with_property("open", PropertyDefinition::typed("boolean").with_default(true));

        let args = compile(&schema);

        assert_eq!(arg(&args, "count").default_literal, r#""placeholder""#);
        assert_eq!(arg(&args, "count").control, Control::Number);
        assert_eq!(arg(&args, "items").default_literal, "[]");
        assert_eq!(arg(&args, "config").default_literal, r#"{"a":1}"#);
        assert_eq!(arg(&args, "tags").default_literal, r#"["x","y"]"#);
        assert_eq!(arg(&args, "label").default_literal, r#""Say \"hi\"""#);
        assert_eq!(arg(&args, "max").default_literal, r#""10""#);
        assert_eq!(arg(&args, "open").default_literal, r#""true""#);
    }

    #[test]
    fn blank_defaults_render_like_missing_ones() {
        let schema = schema()
            .with_property("open", PropertyDefinition::typed("boolean").with_default(false))
            .with_property("n", PropertyDefinition::typed("number").with_default(0))
            .with_property("s", PropertyDefinition::typed("string").with_default(""))
            .with_property("zero", PropertyDefinition::typed("string").with_default("0"))
            .with_property("items", PropertyDefinition::typed("array").with_default(json!([])))
            .with_property("config", PropertyDefinition::typed("object").with_default(json!({})));

        let args = compile(&schema);

        for name in ["open", "n", "s", "zero"] {
            assert_eq!(arg(&args, name).default_literal, r#""placeholder""#, "arg {}", name);
        }
        assert_eq!(arg(&args, "items").default_literal, "[]");
        assert_eq!(arg(&args, "config").default_literal, "[]");
    }

    #[test]
    fn slot_overwrites_prop_with_same_name_in_place() {
        let schema = schema()
            .with_property("media", PropertyDefinition::typed("string"))
            .with_property("heading", PropertyDefinition::typed("string"))
            .with_slot("media", PropertyDefinition::slot().with_title("Media"));

        let args = compile(&schema);

        assert_eq!(args.len(), 2);
        assert_eq!(args[0].name, "media");
        assert_eq!(args[0].category, Category::Slots);
        assert_eq!(args[0].title.as_deref(), Some("Media"));
        assert_eq!(args[1].name, "heading");
    }

    #[test]
    fn control_literals() {
        let select = Control::Select {
            options: vec!["a".into(), "it's".into()],
        };
        assert_eq!(select.literal(), r#"{control: 'select', options: ['a','it\'s']}"#);
        assert_eq!(Control::Text.literal(), r#"{control: "text"}"#);
        assert_eq!(Control::Number.literal(), r#"{control: "number"}"#);
        assert_eq!(Control::Freeform.literal(), r#"{control: "object"}"#);
    }

    #[test]
    fn numeric_enum_options_render_as_text() {
        let args = compile(&schema().with_property("level", PropertyDefinition::typed("number").with_options([1, 2, 3])));

        assert_eq!(
            args[0].control,
            Control::Select {
                options: vec!["1".into(), "2".into(), "3".into()]
            }
        );
    }
}
