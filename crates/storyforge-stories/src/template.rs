//! Stories JSON files generated from stories templates.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use storyforge_compiler::{is_stale, RegenerationPolicy};
use walkdir::WalkDir;

use crate::outcome::{GenerateError, GenerationOutcome, SkipReason};
use crate::renderer::{StoryRenderer, TwigStoryRenderer};
use crate::store::{ArtifactStore, FsStore};

/// Default stories directory, relative to the application root.
pub const STORIES_DIRECTORY: &str = "../storybook/stories";

/// Directories under the root that are searched for stories templates.
pub const SCAN_DIRECTORIES: [&str; 3] = ["themes", "modules", "profiles"];

/// Path of the markup render endpoint on the application server.
pub const RENDER_PATH: &str = "/storybook/stories/render";

const TEMPLATE_SUFFIX: &str = ".stories.twig";

static TEMPLATE_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_-]+\.stories\.twig$").expect("Invalid template file regex")
});

/// Absolute URL of the render endpoint for a server base URL.
pub fn server_render_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), RENDER_PATH)
}

/// Whether batch generation leaves the server URL out.
///
/// Omitting wins; otherwise the URL is left out unless explicitly included.
pub fn omit_server_url(omit: bool, include: bool) -> bool {
    omit || !include
}

/// Options for generating a stories JSON file.
#[derive(Debug, Clone, Default)]
pub struct TemplateOptions {
    /// Regenerate even when the JSON file is newer than its template
    pub force: bool,

    /// Render endpoint embedded in the file; `None` leaves it out
    pub server_url: Option<String>,
}

/// Generates stories JSON files from `*.stories.twig` templates.
pub struct TemplateStoryGenerator {
    root: PathBuf,
    stories_dir: PathBuf,
    renderer: Box<dyn StoryRenderer>,
    store: Box<dyn ArtifactStore>,
}

impl TemplateStoryGenerator {
    /// Create a generator for an application root.
    ///
    /// `stories_dir` is resolved against `root` and created if missing.
    pub fn new(root: impl Into<PathBuf>, stories_dir: impl AsRef<Path>) -> Result<Self, GenerateError> {
        let root = root.into();
        let stories_dir = root.join(stories_dir);

        fs::create_dir_all(&stories_dir).map_err(|source| GenerateError::StoriesDirectory {
            path: stories_dir.clone(),
            source,
        })?;

        Ok(Self {
            root,
            stories_dir,
            renderer: Box::new(TwigStoryRenderer),
            store: Box::new(FsStore),
        })
    }

    /// Use a different renderer.
    pub fn with_renderer(mut self, renderer: impl StoryRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Use a different artifact store.
    pub fn with_store(mut self, store: impl ArtifactStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn stories_dir(&self) -> &Path {
        &self.stories_dir
    }

    /// Where the JSON file for a template is written.
    ///
    /// `card.stories.twig` becomes `card.stories.json`.
    pub fn destination_path(&self, template: &Path) -> PathBuf {
        let file_name = template
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let base = file_name.strip_suffix("twig").unwrap_or(file_name);
        self.stories_dir.join(format!("{}json", base))
    }

    /// Find stories templates below `dir`.
    ///
    /// Relative directories are resolved against the root. A missing
    /// directory yields no templates.
    pub fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
        let dir = self.root.join(dir);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut templates = Vec::new();

        for entry in WalkDir::new(&dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !TEMPLATE_FILE_RE.is_match(filename) {
                continue;
            }

            self.validate_template_path(path)?;
            templates.push(path.to_path_buf());
        }

        Ok(templates)
    }

    /// Check that a template has the right suffix and lies under the root.
    pub fn validate_template_path(&self, template: &Path) -> Result<(), GenerateError> {
        let has_suffix = template
            .to_str()
            .is_some_and(|p| p.ends_with(TEMPLATE_SUFFIX));
        if !has_suffix {
            return Err(GenerateError::InvalidTemplatePath(template.to_path_buf()));
        }

        let inside_root = match (fs::canonicalize(template), fs::canonicalize(&self.root)) {
            (Ok(template), Ok(root)) => template.starts_with(root),
            _ => false,
        };
        if !inside_root {
            return Err(GenerateError::OutsideRoot(template.to_path_buf()));
        }

        Ok(())
    }

    /// Generate the stories JSON file for one template.
    pub fn generate(
        &self,
        template: &Path,
        options: &TemplateOptions,
    ) -> Result<GenerationOutcome, GenerateError> {
        let destination = self.destination_path(template);

        let source_modified = self
            .store
            .modified(template)
            .map_err(|source| GenerateError::Metadata {
                path: template.to_path_buf(),
                source,
            })?;
        let destination_modified =
            self.store
                .modified(&destination)
                .map_err(|source| GenerateError::Metadata {
                    path: destination.clone(),
                    source,
                })?;

        let exists = destination_modified.is_some();
        let stale = match source_modified {
            Some(source) => is_stale(source, destination_modified),
            None => true,
        };

        if !RegenerationPolicy::StalenessGated.should_generate(exists, stale, options.force) {
            tracing::info!("Skipping JSON file generation for {}", destination.display());
            return Ok(GenerationOutcome::Skipped {
                destination,
                reason: SkipReason::UpToDate,
            });
        }

        let server_url = options.server_url.as_deref().unwrap_or_default();
        let stories = self
            .renderer
            .render(template, server_url)
            .map_err(|source| GenerateError::Render {
                destination: destination.clone(),
                source,
            })?;

        let json = serde_json::to_string(&stories).map_err(|e| GenerateError::Serialization {
            destination: destination.clone(),
            source: e.into(),
        })?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            if let Ok(pretty) = serde_json::to_string_pretty(&stories) {
                tracing::debug!("Stories for {}:\n{}", template.display(), pretty);
            }
        }

        self.store
            .write(&destination, &json)
            .map_err(|source| GenerateError::Write {
                destination: destination.clone(),
                source,
            })?;

        tracing::info!("JSON file generated for {}", destination.display());

        Ok(GenerationOutcome::Generated { destination })
    }

    /// Generate JSON files for every template under the scanned directories.
    ///
    /// Discovery errors abort before anything is written.
    pub fn generate_all(
        &self,
        options: &TemplateOptions,
    ) -> Result<Vec<Result<GenerationOutcome, GenerateError>>, GenerateError> {
        let mut templates = Vec::new();
        for dir in SCAN_DIRECTORIES {
            templates.extend(self.scan(Path::new(dir))?);
        }

        tracing::debug!("Found {} stories templates", templates.len());

        Ok(templates
            .par_iter()
            .map(|template| self.generate(template, options))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderError;
    use crate::StoriesFile;
    use std::time::{Duration, SystemTime};
    use tempfile::{tempdir, TempDir};

    const TEMPLATE: &str = "{% stories card with { title: \"Components/SDC/Card\" } %}\n\
        {% story default with { name: 'Default SDC', tags: ['project'] } %}{% endstory %}\n\
        {% endstories %}\n";

    fn site() -> (TempDir, PathBuf) {
        let temp = tempdir().unwrap();
        let root = temp.path().join("web");
        fs::create_dir_all(&root).unwrap();
        (temp, root)
    }

    fn write_template(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, TEMPLATE).unwrap();
    }

    fn set_mtime(path: &Path, secs: u64) {
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn builds_render_url() {
        assert_eq!(
            server_render_url("http://localhost:8080/"),
            "http://localhost:8080/storybook/stories/render"
        );
    }

    #[test]
    fn server_url_flags() {
        assert!(omit_server_url(false, false));
        assert!(omit_server_url(true, false));
        assert!(omit_server_url(true, true));
        assert!(!omit_server_url(false, true));
    }

    #[test]
    fn creates_stories_directory() {
        let (temp, root) = site();

        let generator = TemplateStoryGenerator::new(&root, STORIES_DIRECTORY).unwrap();

        assert!(generator.stories_dir().is_dir());
        assert!(temp.path().join("storybook").join("stories").is_dir());
    }

    #[test]
    fn destination_swaps_twig_for_json() {
        let (_temp, root) = site();
        let generator = TemplateStoryGenerator::new(&root, "stories").unwrap();

        assert_eq!(
            generator.destination_path(Path::new("themes/x/card.stories.twig")),
            root.join("stories").join("card.stories.json")
        );
    }

    #[test]
    fn regenerates_only_stale_files() {
        let (_temp, root) = site();
        let template = root.join("themes").join("t").join("card.stories.twig");
        write_template(&template);
        let generator = TemplateStoryGenerator::new(&root, "stories").unwrap();
        let destination = generator.destination_path(&template);
        let options = TemplateOptions::default();

        set_mtime(&template, 100);
        assert!(generator.generate(&template, &options).unwrap().is_generated());

        set_mtime(&destination, 150);
        let outcome = generator.generate(&template, &options).unwrap();
        assert_eq!(
            outcome,
            GenerationOutcome::Skipped {
                destination: destination.clone(),
                reason: SkipReason::UpToDate,
            }
        );

        set_mtime(&destination, 50);
        assert!(generator.generate(&template, &options).unwrap().is_generated());

        set_mtime(&destination, 150);
        let forced = TemplateOptions {
            force: true,
            ..Default::default()
        };
        assert!(generator.generate(&template, &forced).unwrap().is_generated());
    }

    #[test]
    fn writes_server_url_when_given() {
        let (_temp, root) = site();
        let template = root.join("modules").join("m").join("card.stories.twig");
        write_template(&template);
        let generator = TemplateStoryGenerator::new(&root, "stories").unwrap();

        let options = TemplateOptions {
            force: false,
            server_url: Some(server_render_url("http://localhost")),
        };
        let outcome = generator.generate(&template, &options).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(outcome.destination()).unwrap()).unwrap();
        assert_eq!(
            json["parameters"]["server"]["url"],
            "http://localhost/storybook/stories/render"
        );
        assert_eq!(json["title"], "Components/SDC/Card");
    }

    #[test]
    fn scans_and_generates_all_templates() {
        let (_temp, root) = site();
        write_template(&root.join("themes").join("t").join("card.stories.twig"));
        write_template(&root.join("profiles").join("p").join("hero.stories.twig"));
        fs::write(root.join("themes").join("t").join("notes.twig"), "x").unwrap();
        let generator = TemplateStoryGenerator::new(&root, "stories").unwrap();

        let results = generator.generate_all(&TemplateOptions::default()).unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.as_ref().unwrap().is_generated()));
        assert!(root.join("stories").join("card.stories.json").is_file());
        assert!(root.join("stories").join("hero.stories.json").is_file());
    }

    #[test]
    fn rejects_templates_outside_root() {
        let (temp, root) = site();
        let outside = temp.path().join("elsewhere").join("card.stories.twig");
        write_template(&outside);
        let generator = TemplateStoryGenerator::new(&root, "stories").unwrap();

        assert!(matches!(
            generator.validate_template_path(&outside),
            Err(GenerateError::OutsideRoot(_))
        ));
        assert!(matches!(
            generator.validate_template_path(Path::new("card.twig")),
            Err(GenerateError::InvalidTemplatePath(_))
        ));
    }

    #[test]
    fn render_failures_name_the_destination() {
        struct Failing;
        impl StoryRenderer for Failing {
            fn render(&self, template: &Path, _: &str) -> Result<StoriesFile, RenderError> {
                Err(RenderError::MissingHeader(template.to_path_buf()))
            }
        }

        let (_temp, root) = site();
        let template = root.join("themes").join("bad.stories.twig");
        write_template(&template);
        let generator = TemplateStoryGenerator::new(&root, "stories")
            .unwrap()
            .with_renderer(Failing);

        let err = generator
            .generate(&template, &TemplateOptions::default())
            .unwrap_err();

        assert!(matches!(err, GenerateError::Render { .. }));
        assert!(err.to_string().contains("bad.stories.json"));
    }
}
