//! Semantic error types for runner generation.
//!
//! Every failure aborts the run. Files written before the failure are left
//! in place, so callers should surface the error rather than retry.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while resolving paths, rendering templates, or writing
/// runner sources.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A required directory could not be resolved or a configuration value
    /// is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Listing, creating, or writing a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being listed, created, or written.
        path: Utf8PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// The renderer could not find or render the named template.
    #[error("template `{name}` failed: {message}")]
    Template {
        /// Name of the template requested from the renderer.
        name: String,
        /// Renderer diagnostic.
        message: String,
    },

    /// Two feature files derived the same runner name within one run.
    #[error("feature files {first} and {second} both derive the runner name `{name}`")]
    NamingCollision {
        /// The derived name shared by both files.
        name: String,
        /// Feature file that claimed the name first.
        first: Utf8PathBuf,
        /// Feature file that attempted to reuse the name.
        second: Utf8PathBuf,
    },
}

impl GenerationError {
    /// Attach a path to an I/O failure.
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` when the error came from the filesystem.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_displays_message() {
        let error = GenerationError::Configuration("unable to determine features directory".into());
        assert_eq!(
            error.to_string(),
            "configuration error: unable to determine features directory"
        );
    }

    #[test]
    fn io_error_includes_path_and_source() {
        let source = std::io::Error::new(std::io::ErrorKind::AlreadyExists, "file exists");
        let error = GenerationError::io("target/LoginIT.java", source);
        assert!(error.is_io());
        assert_eq!(
            error.to_string(),
            "I/O error at target/LoginIT.java: file exists"
        );
    }

    #[test]
    fn naming_collision_names_both_files() {
        let error = GenerationError::NamingCollision {
            name: "LoginIT".into(),
            first: "features/login.feature".into(),
            second: "features/LOGIN.feature".into(),
        };
        let message = error.to_string();
        assert!(message.contains("features/login.feature"));
        assert!(message.contains("features/LOGIN.feature"));
        assert!(message.contains("`LoginIT`"));
    }
}
