//! Generate test-runner sources from Gherkin feature files.
//!
//! The crate lists the feature files in a project's features directory and
//! renders one runner source per file. Each runner carries the configured
//! execution options (tags, plugins, glue, names, and the dry-run, strict,
//! and monochrome flags) formatted for the test framework's annotation
//! syntax.
//!
//! The host build tool is reached through [`BuildHost`] and the template
//! engine through [`TemplateRenderer`]. [`generate_runners`] wires the
//! bundled `minijinja` renderer to a host:
//!
//! ```no_run
//! use feature_runners::{GeneratorConfig, StaticHost, generate_runners};
//!
//! let mut host = StaticHost::cargo_layout("/path/to/project");
//! let report = generate_runners(GeneratorConfig::default(), &mut host)?;
//! for source in &report.sources {
//!     println!("{} <- {}", source.path, source.feature);
//! }
//! # Ok::<(), feature_runners::GenerationError>(())
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod generator;
pub mod host;
pub mod naming;
pub mod options;
pub mod paths;
pub mod tags;
pub mod template;

pub use config::{ConfigOverrides, GeneratorConfig};
pub use discovery::{FeatureFile, FeatureFiles};
pub use error::GenerationError;
pub use generator::{GeneratedSource, GenerationReport, RunnerGenerator, generate_runners};
pub use host::{BuildHost, BuildScriptHost, StaticHost};
pub use naming::NameDeriver;
pub use options::{FormattedOptions, RunOptions, format_list};
pub use paths::{PathResolver, ResolvedPaths};
pub use tags::TagFilter;
pub use template::{ContextValue, MiniJinjaRenderer, RenderContext, TemplateRenderer};
