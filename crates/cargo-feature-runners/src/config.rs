//! Command configuration parsed from environment variables.
//!
//! The log level can be set with `FEATURE_RUNNERS_LOG_LEVEL` and overridden
//! on the command line with `--log-level`.

use std::env;
use std::str::FromStr;

use feature_runners::GenerationError;
use tracing::Level;

/// Environment variable selecting the log level.
pub(crate) const LOG_LEVEL_ENV: &str = "FEATURE_RUNNERS_LOG_LEVEL";

/// Verbosity of the diagnostics written to stderr.
///
/// Accepts the `tracing` level names in any case, plus `warning`. Runs log
/// resolved directories and a summary at `info`, which is the default, and
/// one line per feature file at `debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LogLevel(Level);

impl Default for LogLevel {
    fn default() -> Self {
        Self(Level::INFO)
    }
}

impl FromStr for LogLevel {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = if name.eq_ignore_ascii_case("warning") {
            "warn"
        } else {
            name
        };
        name.parse::<Level>().map(Self).map_err(|_| {
            GenerationError::Configuration(format!(
                "unknown log level '{s}', expected trace, debug, info, warn or error"
            ))
        })
    }
}

impl LogLevel {
    /// Filter directive selecting this level and everything above it.
    #[must_use]
    pub(crate) fn directive(self) -> String {
        self.0.to_string().to_lowercase()
    }
}

/// Settings for the command itself, as opposed to the generator.
#[derive(Debug, Clone, Default)]
pub(crate) struct CliConfig {
    /// Stderr verbosity.
    pub(crate) log_level: LogLevel,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Configuration` when the log level variable
    /// holds an unknown value.
    pub(crate) fn from_env() -> Result<Self, GenerationError> {
        let log_level = match env::var(LOG_LEVEL_ENV) {
            Ok(val) => val.parse()?,
            Err(_) => LogLevel::default(),
        };
        Ok(Self { log_level })
    }

    /// Apply command-line overrides, which take precedence over the
    /// environment.
    #[must_use]
    pub(crate) fn apply_overrides(mut self, log_level: Option<LogLevel>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self
    }
}
