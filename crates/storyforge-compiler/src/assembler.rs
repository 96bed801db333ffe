//! Story document assembly.

use minijinja::syntax::SyntaxConfig;
use minijinja::{context, Environment, UndefinedBehavior};
use storyforge_schema::ComponentSchema;

use crate::args::ArgDefinition;

/// Fixed story document layout.
///
/// Uses `[[ ]]` for substitutions so the Twig-style `{% %}` tags of the
/// generated document pass through untouched.
const STORY_TEMPLATE: &str = r#"{% stories [[ stories_id ]] with { title: [[ title ]] } %}

    {% story [[ story_id ]] with {
        name: '[[ story_name ]]',
        args: {
            [[ args ]]
        },
        argTypes: {
            [[ arg_types ]]
        },
        tags: [[ tags ]]
    } %}

    {% embed "[[ component_id ]]" with {
        [[ embed_args ]]
    } %}
    {% endembed %}

  {% endstory %}

{% endstories %}
"#;

const BLOCK_INDENT: &str = "            ";
const EMBED_INDENT: &str = "        ";

/// Errors that can occur when rendering a story document.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error("Failed to render story document: {0}")]
    Render(#[from] minijinja::Error),
}

/// Fixed parts of every generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSettings {
    /// Title namespace, e.g. `Components/SDC`
    pub namespace: String,
    pub story_id: String,
    pub story_name: String,
    pub tags: Vec<String>,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            namespace: "Components/SDC".to_string(),
            story_id: "default".to_string(),
            story_name: "Default SDC".to_string(),
            tags: vec!["project".to_string()],
        }
    }
}

/// A story document for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryDocument {
    /// Namespaced title shown in the preview tool
    pub title: String,

    /// Identifier of the stories group, derived from the machine name
    pub stories_id: String,

    pub component_id: String,

    pub story_id: String,

    pub story_name: String,

    /// Argument names passed through to the embedded component
    pub args_order: Vec<String>,

    /// Name/default-literal pairs, led by the synthetic `title`
    pub defaults: Vec<(String, String)>,

    /// Name/control-literal pairs
    pub arg_types: Vec<(String, String)>,

    pub tags: Vec<String>,
}

/// Assemble a story document from compiled arguments.
///
/// Returns `None` when there are no arguments.
pub fn assemble(
    component_id: &str,
    schema: &ComponentSchema,
    args: &[ArgDefinition],
    settings: &DocumentSettings,
) -> Option<StoryDocument> {
    if args.is_empty() {
        return None;
    }

    let mut defaults = Vec::with_capacity(args.len() + 1);
    defaults.push(("title".to_string(), json_string(&schema.name)));
    defaults.extend(args.iter().map(|a| (a.name.clone(), a.default_literal.clone())));

    Some(StoryDocument {
        title: format!("{}/{}", settings.namespace.trim_end_matches('/'), schema.name),
        stories_id: schema.machine_name.replace('-', "_"),
        component_id: component_id.to_string(),
        story_id: settings.story_id.clone(),
        story_name: settings.story_name.clone(),
        args_order: args.iter().map(|a| a.name.clone()).collect(),
        defaults,
        arg_types: args
            .iter()
            .map(|a| (a.name.clone(), a.control.literal()))
            .collect(),
        tags: settings.tags.clone(),
    })
}

/// Double-quoted, escaped string literal.
fn json_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Ordered, separator-joined list of document entries.
struct EntryList {
    separator: String,
    entries: Vec<String>,
}

impl EntryList {
    fn new(indent: &str) -> Self {
        Self {
            separator: format!(",\n{}", indent),
            entries: Vec::new(),
        }
    }

    fn push(&mut self, entry: impl Into<String>) -> &mut Self {
        self.entries.push(entry.into());
        self
    }

    fn push_pair(&mut self, name: &str, value: &str) -> &mut Self {
        self.push(format!("{}: {}", name, value))
    }

    fn finish(&self) -> String {
        self.entries.join(&self.separator)
    }
}

impl StoryDocument {
    /// Render the document text.
    pub fn render(&self) -> Result<String, AssembleError> {
        let mut args = EntryList::new(BLOCK_INDENT);
        for (name, literal) in &self.defaults {
            args.push_pair(name, literal);
        }

        let mut arg_types = EntryList::new(BLOCK_INDENT);
        for (name, literal) in &self.arg_types {
            arg_types.push_pair(name, literal);
        }

        let mut embed_args = EntryList::new(EMBED_INDENT);
        for name in &self.args_order {
            embed_args.push(name.as_str());
        }

        let tags = format!(
            "[{}]",
            self.tags
                .iter()
                .map(|t| format!("'{}'", t))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut env = Environment::new();
        env.set_syntax(
            SyntaxConfig::builder()
                .block_delimiters("[%", "%]")
                .variable_delimiters("[[", "]]")
                .comment_delimiters("[#", "#]")
                .build()?,
        );
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);

        let rendered = env.render_str(
            STORY_TEMPLATE,
            context! {
                stories_id => &self.stories_id,
                title => json_string(&self.title),
                story_id => &self.story_id,
                story_name => &self.story_name,
                args => args.finish(),
                arg_types => arg_types.finish(),
                tags => tags,
                component_id => &self.component_id,
                embed_args => embed_args.finish(),
            },
        )?;

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::compile;
    use pretty_assertions::assert_eq;
    use storyforge_schema::PropertyDefinition;

    fn button() -> ComponentSchema {
        ComponentSchema::new("my_theme:call-button", "Call Button", "call-button", "components")
            .with_property("label", PropertyDefinition::typed("string").with_default("Click"))
            .with_property(
                "variant",
                PropertyDefinition::typed("string").with_options(["primary", "secondary"]),
            )
            .with_property("items", PropertyDefinition::typed("array"))
            .with_slot("icon", PropertyDefinition::slot())
            .with_required(["label"])
    }

    fn build(schema: &ComponentSchema) -> Option<StoryDocument> {
        let args = compile(schema);
        assemble(&schema.id, schema, &args, &DocumentSettings::default())
    }

    #[test]
    fn renders_complete_document() {
        let doc = build(&button()).unwrap();

        let expected = r#"{% stories call_button with { title: "Components/SDC/Call Button" } %}

    {% story default with {
        name: 'Default SDC',
        args: {
            title: "Call Button",
            label: "Click",
            variant: "placeholder",
            items: [],
            icon: "placeholder"
        },
        argTypes: {
            label: {control: "text"},
            variant: {control: 'select', options: ['primary','secondary']},
            items: {control: "object"},
            icon: {control: "object"}
        },
        tags: ['project']
    } %}

    {% embed "my_theme:call-button" with {
        label,
        variant,
        items,
        icon
    } %}
    {% endembed %}

  {% endstory %}

{% endstories %}
"#;

        assert_eq!(doc.render().unwrap(), expected);
    }

    #[test]
    fn synthetic_title_only_in_defaults() {
        let doc = build(&button()).unwrap();

        assert_eq!(doc.defaults[0], ("title".to_string(), "\"Call Button\"".to_string()));
        assert_eq!(doc.defaults.len(), doc.args_order.len() + 1);
        assert!(!doc.args_order.contains(&"title".to_string()));
        assert!(doc.arg_types.iter().all(|(name, _)| name != "title"));
        assert_eq!(doc.args_order, vec!["label", "variant", "items", "icon"]);
    }

    #[test]
    fn empty_schema_yields_no_document() {
        let schema = ComponentSchema::new("ui:empty", "Empty", "empty", ".");
        assert_eq!(build(&schema), None);
    }

    #[test]
    fn rendering_is_idempotent() {
        let schema = button();
        let first = build(&schema).unwrap().render().unwrap();
        let second = build(&schema).unwrap().render().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn custom_namespace_and_tags() {
        let schema = button();
        let args = compile(&schema);
        let settings = DocumentSettings {
            namespace: "Design System/".to_string(),
            tags: vec!["project".to_string(), "autodocs".to_string()],
            ..Default::default()
        };

        let doc = assemble(&schema.id, &schema, &args, &settings).unwrap();
        let text = doc.render().unwrap();

        assert_eq!(doc.title, "Design System/Call Button");
        assert!(text.contains("tags: ['project', 'autodocs']"));
    }

    #[test]
    fn quotes_in_display_name_are_escaped() {
        let schema = ComponentSchema::new("ui:quote", r#"The "Best" Card"#, "quote", ".")
            .with_property("x", PropertyDefinition::typed("string"));

        let text = build(&schema).unwrap().render().unwrap();

        assert!(text.starts_with(
            r#"{% stories quote with { title: "Components/SDC/The \"Best\" Card" } %}"#
        ));
        assert!(text.contains(r#"title: "The \"Best\" Card","#));
    }

    #[test]
    fn template_braces_in_values_are_not_interpreted() {
        let schema = ComponentSchema::new("ui:odd", "Odd", "odd", ".")
            .with_property("x", PropertyDefinition::typed("string").with_default("[[ nope ]] {{ raw }}"));

        let text = build(&schema).unwrap().render().unwrap();

        assert!(text.contains(r#"x: "[[ nope ]] {{ raw }}""#));
    }
}
