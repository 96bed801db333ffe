//! Rendering of stories templates into Storybook server-framework JSON.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// A stories JSON document as read by Storybook's server framework.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoriesFile {
    pub title: String,
    pub parameters: Parameters,
    pub stories: Vec<StoryEntry>,
}

/// One story of a stories file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryEntry {
    pub name: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    pub parameters: Parameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameters {
    pub server: ServerParameters,
}

/// Where and under which id the preview tool fetches rendered markup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    pub id: String,
}

/// Errors that can occur when rendering a stories template.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template {0} has no stories header")]
    MissingHeader(PathBuf),
}

/// Turns a stories template into a stories JSON document.
pub trait StoryRenderer: Send + Sync {
    /// Render `template`. An empty `server_url` leaves the URL to the
    /// preview tool's own configuration.
    fn render(&self, template: &Path, server_url: &str) -> Result<StoriesFile, RenderError>;
}

/// Renderer reading Twig stories templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwigStoryRenderer;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\{%-?\s*stories\s+([A-Za-z0-9_]+)\s+with\s*\{\s*title:\s*(?:("(?:[^"\\]|\\.)*")|'([^']*)')"#,
    )
    .expect("Invalid stories header regex")
});

static STORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%-?\s*story\s+([A-Za-z0-9_]+)\s+with\s*\{").expect("Invalid story regex")
});

// Option keys only match at a key boundary of the top-level options hash.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[\s,{])name:\s*(?:'([^']*)'|"([^"]*)")"#).expect("Invalid story name regex")
});

static TAGS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s,{])tags:\s*\[([^\]]*)\]").expect("Invalid tags regex")
});

impl TwigStoryRenderer {
    /// Parse template source. Returns `None` without a stories header.
    pub fn parse(source: &str, server_url: &str) -> Option<StoriesFile> {
        let header = HEADER_RE.captures(source)?;
        let stories_id = header[1].to_string();
        let title = match (header.get(2), header.get(3)) {
            (Some(quoted), _) => serde_json::from_str(quoted.as_str())
                .unwrap_or_else(|_| quoted.as_str().trim_matches('"').to_string()),
            (None, Some(single)) => single.as_str().to_string(),
            (None, None) => String::new(),
        };

        let stories = STORY_RE
            .captures_iter(source)
            .filter_map(|story| {
                let whole = story.get(0)?;
                let story_id = story[1].to_string();

                // The story options end at the closing tag delimiter.
                let rest = &source[whole.end()..];
                let body = &rest[..rest.find("%}").unwrap_or(rest.len())];
                let options = top_level_options(body);

                let name = NAME_RE
                    .captures(&options)
                    .and_then(|c| c.get(1).or_else(|| c.get(2)))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| story_id.clone());

                let tags = TAGS_RE
                    .captures(&options)
                    .map(|c| parse_tags(&c[1]))
                    .unwrap_or_default();

                Some(StoryEntry {
                    name,
                    tags,
                    parameters: Parameters {
                        server: ServerParameters {
                            url: None,
                            id: format!("{}/{}", stories_id, story_id),
                        },
                    },
                })
            })
            .collect();

        Some(StoriesFile {
            title,
            parameters: Parameters {
                server: ServerParameters {
                    url: (!server_url.is_empty()).then(|| server_url.to_string()),
                    id: stories_id,
                },
            },
            stories,
        })
    }
}

impl StoryRenderer for TwigStoryRenderer {
    fn render(&self, template: &Path, server_url: &str) -> Result<StoriesFile, RenderError> {
        let source = fs::read_to_string(template).map_err(|source| RenderError::Read {
            path: template.to_path_buf(),
            source,
        })?;

        Self::parse(&source, server_url)
            .ok_or_else(|| RenderError::MissingHeader(template.to_path_buf()))
    }
}

/// Text of a story's options hash with nested `{...}` groups removed.
///
/// `body` starts just inside the opening brace; the matching closing brace
/// ends the hash.
fn top_level_options(body: &str) -> String {
    let mut options = String::with_capacity(body.len());
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in body.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
        } else {
            match c {
                '\'' | '"' => quote = Some(c),
                '{' => {
                    depth += 1;
                    continue;
                }
                '}' if depth == 0 => break,
                '}' => {
                    depth -= 1;
                    continue;
                }
                _ => {}
            }
        }

        if depth == 0 {
            options.push(c);
        }
    }

    options
}

fn parse_tags(list: &str) -> Vec<String> {
    list.split(',')
        .map(|t| t.trim().trim_matches(|c| c == '\'' || c == '"'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
