//! Runner generation.
//!
//! [`RunnerGenerator`] resolves directories, formats the run options once,
//! then renders and writes one runner per discovered feature file. The
//! first failure aborts the run; runners already written stay on disk.

use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::discovery::{FeatureFile, FeatureFiles};
use crate::error::GenerationError;
use crate::host::BuildHost;
use crate::naming::NameRegistry;
use crate::options::FormattedOptions;
use crate::paths::{PathResolver, ResolvedPaths};
use crate::template::{MiniJinjaRenderer, RenderContext, TemplateRenderer};

/// Keys of the context passed to runner templates.
pub mod context_keys {
    /// Derived runner name.
    pub const CLASS_NAME: &str = "class_name";
    /// Quoted `classpath:` reference to the feature file.
    pub const FEATURE: &str = "feature";
    /// Dry-run flag.
    pub const DRY_RUN: &str = "dry_run";
    /// Strict flag.
    pub const STRICT: &str = "strict";
    /// Monochrome flag.
    pub const MONOCHROME: &str = "monochrome";
    /// Formatted glue list.
    pub const GLUE: &str = "glue";
    /// Formatted plugin list.
    pub const PLUGIN: &str = "plugin";
    /// Formatted name list.
    pub const NAME: &str = "name";
    /// Formatted tag expression.
    pub const TAGS: &str = "tags";
}

/// A runner written during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    /// Derived runner name.
    pub name: String,
    /// Feature file the runner executes.
    pub feature: Utf8PathBuf,
    /// Path of the written runner.
    pub path: Utf8PathBuf,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Directory registered with the host as a test source root.
    pub output_dir: Utf8PathBuf,
    /// Runners in the order they were written.
    pub sources: Vec<GeneratedSource>,
}

/// Generates runner sources from feature files.
pub struct RunnerGenerator<R = MiniJinjaRenderer> {
    config: GeneratorConfig,
    renderer: R,
}

impl RunnerGenerator<MiniJinjaRenderer> {
    /// Create a generator using the built-in templates.
    ///
    /// A configured `template-path` is read and registered under the
    /// configured template name, resolved against `project_dir` when
    /// relative.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Io`] when the template file cannot be read
    /// and [`GenerationError::Template`] when it fails to parse.
    pub fn with_builtin_templates(
        config: GeneratorConfig,
        project_dir: &Utf8Path,
    ) -> Result<Self, GenerationError> {
        let mut renderer = MiniJinjaRenderer::with_builtin()?;
        if let Some(path) = &config.template_path {
            renderer.register_file(&config.template, &project_dir.join(path))?;
        }
        Ok(Self::new(config, renderer))
    }
}

impl<R: TemplateRenderer> RunnerGenerator<R> {
    /// Create a generator rendering through `renderer`.
    pub fn new(config: GeneratorConfig, renderer: R) -> Self {
        Self { config, renderer }
    }

    /// Configuration used by this generator.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Split the generator into its configuration and renderer.
    pub fn into_parts(self) -> (GeneratorConfig, R) {
        (self.config, self.renderer)
    }

    /// Generate one runner per feature file and register the output
    /// directory with `host`.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered. [`GenerationError::Io`] covers
    /// listing and writing, including a runner that already exists on disk.
    pub fn generate<H>(&self, host: &mut H) -> Result<GenerationReport, GenerationError>
    where
        H: BuildHost + ?Sized,
    {
        self.config.validate()?;
        let paths = PathResolver::new(
            host.project_dir(),
            host.test_resource_root(),
            host.build_output_dir(),
        )
        .resolve(
            self.config.features_path.as_deref(),
            self.config.generated_source_path.as_deref(),
        )?;
        host.watch_features_dir(&paths.features_dir)?;

        let shared = options_context(&self.config.run_options().format());
        let deriver = self.config.name_deriver();
        let mut names = NameRegistry::default();
        let mut output = OutputDir::new(paths.output_dir.clone());
        let mut sources = Vec::new();

        for feature in FeatureFiles::open(&paths.features_dir, &self.config.feature_extension)? {
            let feature = feature?;
            debug!(path = %feature.path(), "generating runner for feature file");
            let name = deriver.derive(feature.base_name());
            debug!(%name, "converted feature file name");
            names.claim(&name, feature.path())?;

            let source = self.render(&shared, &name, &feature, &paths)?;
            let file_name = format!("{name}.{}", self.config.source_extension);
            let path = output.write_new(&file_name, &source)?;
            debug!(path = %path, "completed writing runner source");

            sources.push(GeneratedSource {
                name,
                feature: feature.path().to_owned(),
                path,
            });
        }

        host.add_test_compile_source_root(&paths.output_dir)?;
        info!(
            count = sources.len(),
            dir = %paths.output_dir,
            "generated runner sources"
        );
        Ok(GenerationReport {
            output_dir: paths.output_dir,
            sources,
        })
    }

    fn render(
        &self,
        shared: &RenderContext,
        name: &str,
        feature: &FeatureFile,
        paths: &ResolvedPaths,
    ) -> Result<String, GenerationError> {
        let mut context = shared.clone();
        context.insert(context_keys::CLASS_NAME, name);
        context.insert(
            context_keys::FEATURE,
            feature.classpath_reference(&paths.test_resource_root),
        );
        self.renderer.render(&self.config.template, &context)
    }
}

/// Generate runners for `host` using the built-in templates.
///
/// # Errors
///
/// See [`RunnerGenerator::generate`].
pub fn generate_runners<H>(
    config: GeneratorConfig,
    host: &mut H,
) -> Result<GenerationReport, GenerationError>
where
    H: BuildHost + ?Sized,
{
    let generator = RunnerGenerator::with_builtin_templates(config, host.project_dir())?;
    generator.generate(host)
}

fn options_context(options: &FormattedOptions) -> RenderContext {
    let mut context = RenderContext::new();
    context.insert(context_keys::DRY_RUN, options.dry_run);
    context.insert(context_keys::STRICT, options.strict);
    context.insert(context_keys::MONOCHROME, options.monochrome);
    context.insert(context_keys::GLUE, options.glue.as_str());
    context.insert(context_keys::PLUGIN, options.plugin.as_str());
    context.insert(context_keys::NAME, options.name.as_str());
    context.insert(context_keys::TAGS, options.tags.as_str());
    context
}

/// Output directory, created on the first write.
struct OutputDir {
    path: Utf8PathBuf,
    handle: Option<Dir>,
}

impl OutputDir {
    fn new(path: Utf8PathBuf) -> Self {
        Self { path, handle: None }
    }

    fn dir(&mut self) -> Result<&Dir, GenerationError> {
        let dir = match self.handle.take() {
            Some(dir) => dir,
            None => {
                Dir::create_ambient_dir_all(&self.path, ambient_authority())
                    .map_err(|err| GenerationError::io(self.path.clone(), err))?;
                Dir::open_ambient_dir(&self.path, ambient_authority())
                    .map_err(|err| GenerationError::io(self.path.clone(), err))?
            }
        };
        let dir: &Dir = self.handle.insert(dir);
        Ok(dir)
    }

    /// Write `contents` to a new file, failing if `file_name` exists.
    fn write_new(
        &mut self,
        file_name: &str,
        contents: &str,
    ) -> Result<Utf8PathBuf, GenerationError> {
        let path = self.path.join(file_name);
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let file = self
            .dir()?
            .open_with(file_name, &options)
            .map_err(|err| GenerationError::io(path.clone(), err))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(contents.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|err| GenerationError::io(path.clone(), err))?;
        Ok(path)
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use crate::options::RunOptions;
    use crate::tags::TagFilter;

    #[test]
    fn options_context_carries_formatted_values() {
        let options = RunOptions {
            dry_run: true,
            plugins: vec!["pretty".into(), "json:out.json".into()],
            tags: Some(TagFilter::new(None, Some("@wip"))),
            ..RunOptions::default()
        };
        let context = options_context(&options.format());
        assert_eq!(context.get(context_keys::DRY_RUN), Some(&true.into()));
        assert_eq!(context.get(context_keys::STRICT), Some(&true.into()));
        assert_eq!(
            context.get(context_keys::PLUGIN),
            Some(&r#"""pretty","json:out.json"""#.into())
        );
        assert_eq!(context.get(context_keys::TAGS), Some(&r#""~@wip""#.into()));
        assert_eq!(context.get(context_keys::GLUE), Some(&"".into()));
        assert!(context.get(context_keys::CLASS_NAME).is_none());
    }

    #[test]
    fn output_dir_is_created_lazily_and_never_overwrites() {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().join("out/runners"))
            .expect("temp dir path should be UTF-8");
        let mut output = OutputDir::new(root.clone());
        assert!(!root.exists());

        let path = output
            .write_new("LoginIT.java", "class LoginIT {}\n")
            .expect("first write should succeed");
        assert_eq!(path, root.join("LoginIT.java"));
        assert_eq!(
            std::fs::read_to_string(&path).expect("runner should be readable"),
            "class LoginIT {}\n"
        );

        let err = output
            .write_new("LoginIT.java", "class Other {}\n")
            .expect_err("second write should fail");
        assert!(err.is_io());
        assert_eq!(
            std::fs::read_to_string(&path).expect("runner should be readable"),
            "class LoginIT {}\n"
        );
    }
}
