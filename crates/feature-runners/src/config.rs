//! Generator configuration.
//!
//! [`GeneratorConfig`] collects every setting a run accepts. It deserializes
//! from a kebab-case table, so hosts can read it from manifests such as
//! `[package.metadata.feature-runners]`. Absent entries take the defaults
//! documented on each field.

use camino::Utf8PathBuf;
use serde::Deserialize;

use crate::discovery::DEFAULT_FEATURE_EXTENSION;
use crate::error::GenerationError;
use crate::naming::{DEFAULT_TEST_PATTERN, NameDeriver};
use crate::options::RunOptions;
use crate::template::BUILTIN_TEMPLATE;

/// Default extension of generated runner files.
pub const DEFAULT_SOURCE_EXTENSION: &str = "java";

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Output directory. Defaults to
    /// `<build-output>/generated-test-sources/cucumber-runners`.
    pub generated_source_path: Option<Utf8PathBuf>,
    /// Features directory. Defaults to `<test-resources>/features`.
    pub features_path: Option<Utf8PathBuf>,
    /// Append the test pattern to derived names (`true`) or prepend it.
    pub append_test_pattern: bool,
    /// Token combined with every derived name. Defaults to `IT`.
    pub test_pattern: String,
    /// Options embedded into each runner. Defaults apply when absent.
    pub cucumber_options: Option<RunOptions>,
    /// Extension identifying feature files. Defaults to `feature`.
    pub feature_extension: String,
    /// Extension of generated files. Defaults to `java`.
    pub source_extension: String,
    /// Name of the template used to render runners.
    pub template: String,
    /// File whose contents are registered under [`Self::template`].
    pub template_path: Option<Utf8PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generated_source_path: None,
            features_path: None,
            append_test_pattern: true,
            test_pattern: DEFAULT_TEST_PATTERN.to_owned(),
            cucumber_options: None,
            feature_extension: DEFAULT_FEATURE_EXTENSION.to_owned(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_owned(),
            template: BUILTIN_TEMPLATE.to_owned(),
            template_path: None,
        }
    }
}

impl GeneratorConfig {
    /// Run options with defaults applied.
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        self.cucumber_options.clone().unwrap_or_default()
    }

    /// Name deriver for the configured pattern and placement.
    #[must_use]
    pub fn name_deriver(&self) -> NameDeriver {
        NameDeriver::new(self.test_pattern.clone(), self.append_test_pattern)
    }

    /// Check values that cannot be expressed through types.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Configuration`] when an extension or the
    /// template name is blank, or an extension starts with a dot.
    pub fn validate(&self) -> Result<(), GenerationError> {
        for (key, value) in [
            ("feature-extension", &self.feature_extension),
            ("source-extension", &self.source_extension),
        ] {
            if value.trim().is_empty() {
                return Err(GenerationError::Configuration(format!("{key} must not be empty")));
            }
            if value.starts_with('.') {
                return Err(GenerationError::Configuration(format!(
                    "{key} must not start with a dot, found '{value}'"
                )));
            }
        }
        if self.template.trim().is_empty() {
            return Err(GenerationError::Configuration(
                "template must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Apply optional overrides to an existing configuration.
    ///
    /// This is intended for command-line flags that should take precedence
    /// over manifest settings.
    #[must_use]
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(path) = overrides.generated_source_path {
            self.generated_source_path = Some(path);
        }
        if let Some(path) = overrides.features_path {
            self.features_path = Some(path);
        }
        if let Some(pattern) = overrides.test_pattern {
            self.test_pattern = pattern;
        }
        if overrides.prepend_test_pattern {
            self.append_test_pattern = false;
        }
        if let Some(extension) = overrides.source_extension {
            self.source_extension = extension;
        }
        if let Some(path) = overrides.template_path {
            self.template_path = Some(path);
        }
        self
    }
}

/// Values that replace configured settings when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Replacement output directory.
    pub generated_source_path: Option<Utf8PathBuf>,
    /// Replacement features directory.
    pub features_path: Option<Utf8PathBuf>,
    /// Replacement test pattern.
    pub test_pattern: Option<String>,
    /// Force the test pattern to be prepended.
    pub prepend_test_pattern: bool,
    /// Replacement generated file extension.
    pub source_extension: Option<String>,
    /// Replacement template file.
    pub template_path: Option<Utf8PathBuf>,
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use crate::tags::TagFilter;
    use rstest::rstest;

    #[test]
    fn defaults_match_documented_values() {
        let config = GeneratorConfig::default();
        assert!(config.append_test_pattern);
        assert_eq!(config.test_pattern, "IT");
        assert_eq!(config.feature_extension, "feature");
        assert_eq!(config.source_extension, "java");
        assert_eq!(config.template, "junit-cucumber-runner");
        assert_eq!(config.run_options(), RunOptions::default());
    }

    #[test]
    fn deserializes_kebab_case_table() {
        let config: GeneratorConfig = serde_json::from_value(serde_json::json!({
            "features-path": "specs",
            "append-test-pattern": false,
            "test-pattern": "Test",
            "cucumber-options": {
                "glue": ["com.example.steps"],
                "tags": { "include": "@smoke", "exclude": "@wip" }
            }
        }))
        .expect("config should deserialize");
        assert_eq!(config.features_path, Some(Utf8PathBuf::from("specs")));
        assert_eq!(config.name_deriver().derive("login"), "TestLogin");
        let options = config.run_options();
        assert_eq!(options.glue, vec!["com.example.steps".to_owned()]);
        assert_eq!(options.tags, Some(TagFilter::new(Some("@smoke"), Some("@wip"))));
        assert!(options.strict);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = serde_json::from_value::<GeneratorConfig>(serde_json::json!({
            "feature-dir": "specs"
        }));
        assert!(result.is_err());
    }

    #[rstest]
    #[case::blank_feature_extension("feature-extension", " ")]
    #[case::dotted_feature_extension("feature-extension", ".feature")]
    #[case::blank_source_extension("source-extension", "")]
    #[case::dotted_source_extension("source-extension", ".java")]
    fn validate_rejects_bad_extensions(#[case] key: &str, #[case] value: &str) {
        let mut config = GeneratorConfig::default();
        if key == "feature-extension" {
            config.feature_extension = value.to_owned();
        } else {
            config.source_extension = value.to_owned();
        }
        let err = config.validate().expect_err("validation should fail");
        assert!(err.to_string().contains(key));
    }

    #[test]
    fn overrides_replace_selected_fields() {
        let config = GeneratorConfig::default().apply_overrides(ConfigOverrides {
            test_pattern: Some("Spec".into()),
            prepend_test_pattern: true,
            source_extension: Some("kt".into()),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.test_pattern, "Spec");
        assert!(!config.append_test_pattern);
        assert_eq!(config.source_extension, "kt");
        assert_eq!(config.features_path, None);

        let untouched = GeneratorConfig::default().apply_overrides(ConfigOverrides::default());
        assert_eq!(untouched, GeneratorConfig::default());
    }
}
