//! Resolution of the directories a generation run reads and writes.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use crate::error::GenerationError;

/// Features directory name under the test-resource root.
pub const DEFAULT_FEATURES_DIR: &str = "features";

/// Output directory under the build-output area.
pub const DEFAULT_GENERATED_SOURCE_DIR: &str = "generated-test-sources/cucumber-runners";

/// Directories used by one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Root against which feature references are made relative.
    pub test_resource_root: Utf8PathBuf,
    /// Directory scanned for feature files.
    pub features_dir: Utf8PathBuf,
    /// Directory receiving generated runners. It may not exist yet.
    pub output_dir: Utf8PathBuf,
}

/// Resolves directories from host conventions and optional overrides.
///
/// Relative overrides are interpreted against the project directory.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    project_dir: &'a Utf8Path,
    test_resource_root: &'a Utf8Path,
    build_output_dir: &'a Utf8Path,
}

impl<'a> PathResolver<'a> {
    /// Create a resolver for the given host directories.
    #[must_use]
    pub fn new(
        project_dir: &'a Utf8Path,
        test_resource_root: &'a Utf8Path,
        build_output_dir: &'a Utf8Path,
    ) -> Self {
        Self {
            project_dir,
            test_resource_root,
            build_output_dir,
        }
    }

    /// Resolve the features and output directories.
    ///
    /// An existing `features_override` wins. Otherwise
    /// `<test-resource-root>/features` must exist. The output directory
    /// defaults to [`DEFAULT_GENERATED_SOURCE_DIR`] under the build-output
    /// area and is not created here.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Configuration`] when the test-resource root
    /// or the features directory does not exist.
    pub fn resolve(
        &self,
        features_override: Option<&Utf8Path>,
        output_override: Option<&Utf8Path>,
    ) -> Result<ResolvedPaths, GenerationError> {
        info!(path = %self.test_resource_root, "test resource directory");
        if !self.test_resource_root.is_dir() {
            return Err(GenerationError::Configuration(format!(
                "unable to determine test resource directory: {} does not exist",
                self.test_resource_root
            )));
        }

        let features_dir = self.features_dir(features_override)?;
        info!(path = %features_dir, "feature files directory");

        let output_dir = output_override.map_or_else(
            || self.build_output_dir.join(DEFAULT_GENERATED_SOURCE_DIR),
            |dir| self.project_dir.join(dir),
        );
        info!(path = %output_dir, "generated source files directory");

        Ok(ResolvedPaths {
            test_resource_root: self.test_resource_root.to_owned(),
            features_dir,
            output_dir,
        })
    }

    fn features_dir(
        &self,
        features_override: Option<&Utf8Path>,
    ) -> Result<Utf8PathBuf, GenerationError> {
        if let Some(dir) = features_override
            .map(|dir| self.project_dir.join(dir))
            .filter(|dir| dir.is_dir())
        {
            return Ok(dir);
        }
        let fallback = self.test_resource_root.join(DEFAULT_FEATURES_DIR);
        if fallback.is_dir() {
            Ok(fallback)
        } else {
            Err(GenerationError::Configuration(format!(
                "unable to determine features directory: {fallback} does not exist"
            )))
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    struct Project {
        _temp: TempDir,
        root: Utf8PathBuf,
    }

    impl Project {
        fn tests_dir(&self) -> Utf8PathBuf {
            self.root.join("tests")
        }

        fn target_dir(&self) -> Utf8PathBuf {
            self.root.join("target")
        }

        fn resolve(
            &self,
            features: Option<&str>,
            output: Option<&str>,
        ) -> Result<ResolvedPaths, GenerationError> {
            let tests = self.tests_dir();
            let target = self.target_dir();
            PathResolver::new(&self.root, &tests, &target)
                .resolve(features.map(Utf8Path::new), output.map(Utf8Path::new))
        }
    }

    #[fixture]
    fn project() -> Project {
        let temp = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .expect("temp dir path should be UTF-8");
        fs::create_dir_all(root.join("tests/features")).expect("failed to create features dir");
        fs::create_dir_all(root.join("specs")).expect("failed to create specs dir");
        Project { _temp: temp, root }
    }

    #[rstest]
    fn uses_conventional_directories_by_default(project: Project) {
        let paths = project.resolve(None, None).expect("paths should resolve");
        assert_eq!(paths.features_dir, project.root.join("tests/features"));
        assert_eq!(
            paths.output_dir,
            project.root.join("target/generated-test-sources/cucumber-runners")
        );
        assert!(!paths.output_dir.exists());
    }

    #[rstest]
    fn existing_override_wins(project: Project) {
        let paths = project
            .resolve(Some("specs"), Some("generated"))
            .expect("paths should resolve");
        assert_eq!(paths.features_dir, project.root.join("specs"));
        assert_eq!(paths.output_dir, project.root.join("generated"));
    }

    #[rstest]
    fn missing_override_falls_back_to_convention(project: Project) {
        let paths = project
            .resolve(Some("does-not-exist"), None)
            .expect("paths should resolve");
        assert_eq!(paths.features_dir, project.root.join("tests/features"));
    }

    #[rstest]
    fn missing_features_directory_is_a_configuration_error(project: Project) {
        fs::remove_dir(project.root.join("tests/features")).expect("failed to remove dir");
        let err = project.resolve(None, None).expect_err("resolution should fail");
        assert!(matches!(err, GenerationError::Configuration(_)));
        assert!(err.to_string().contains("features directory"));
    }

    #[rstest]
    fn missing_test_resource_root_is_a_configuration_error(project: Project) {
        fs::remove_dir_all(project.tests_dir()).expect("failed to remove dir");
        let err = project.resolve(Some("specs"), None).expect_err("resolution should fail");
        assert!(err.to_string().contains("test resource directory"));
    }
}
