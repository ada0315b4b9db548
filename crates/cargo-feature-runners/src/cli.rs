//! Command-line interface.

use camino::Utf8PathBuf;
use clap::{Args, Parser};
use feature_runners::ConfigOverrides;

use crate::config::LogLevel;

/// Cargo entry point. Cargo invokes the binary as
/// `cargo-feature-runners feature-runners [ARGS]`.
#[derive(Parser)]
#[command(name = "cargo", bin_name = "cargo")]
pub(crate) enum CargoCli {
    /// Generate test-runner sources from Gherkin feature files.
    FeatureRunners(GenerateArgs),
}

/// Arguments for `cargo feature-runners`.
///
/// Flags override the `[package.metadata.feature-runners]` table of the
/// selected package.
#[derive(Args, Debug)]
#[command(author, version, about)]
pub(crate) struct GenerateArgs {
    /// Path to the package's `Cargo.toml`.
    #[arg(long, value_name = "PATH")]
    pub(crate) manifest_path: Option<Utf8PathBuf>,

    /// Workspace package to generate runners for.
    #[arg(long, short = 'p', value_name = "NAME")]
    pub(crate) package: Option<String>,

    /// Directory containing the feature files.
    #[arg(long, value_name = "DIR")]
    pub(crate) features_path: Option<Utf8PathBuf>,

    /// Directory receiving the generated runners.
    #[arg(long, value_name = "DIR")]
    pub(crate) generated_source_path: Option<Utf8PathBuf>,

    /// Affix added to each derived runner name.
    #[arg(long, value_name = "PATTERN")]
    pub(crate) test_pattern: Option<String>,

    /// Prepend the test pattern instead of appending it.
    #[arg(long)]
    pub(crate) prepend_test_pattern: bool,

    /// Template file replacing the configured template.
    #[arg(long, value_name = "PATH")]
    pub(crate) template_path: Option<Utf8PathBuf>,

    /// Extension of the generated files, without the dot.
    #[arg(long, value_name = "EXT")]
    pub(crate) source_extension: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, value_name = "LEVEL")]
    pub(crate) log_level: Option<LogLevel>,
}

impl GenerateArgs {
    /// Generator overrides carried by the flags.
    pub(crate) fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            generated_source_path: self.generated_source_path.clone(),
            features_path: self.features_path.clone(),
            test_pattern: self.test_pattern.clone(),
            prepend_test_pattern: self.prepend_test_pattern,
            source_extension: self.source_extension.clone(),
            template_path: self.template_path.clone(),
        }
    }
}
