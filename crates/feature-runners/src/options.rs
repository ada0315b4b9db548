//! Execution options embedded into every generated runner.
//!
//! [`RunOptions`] holds the options as configured. [`FormattedOptions`]
//! holds the literal strings substituted into the runner template; it is
//! computed once per run and shared by every generated file.

use serde::Deserialize;

use crate::tags::TagFilter;

/// Options passed to the test framework by each generated runner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RunOptions {
    /// Check that every step has a definition without executing any.
    pub dry_run: bool,
    /// Fail the run when steps are undefined or pending.
    pub strict: bool,
    /// Disable coloured console output.
    pub monochrome: bool,
    /// Reporting plugins, for example `json:target/cucumber.json`.
    pub plugins: Vec<String>,
    /// Scenario name patterns to run.
    pub names: Vec<String>,
    /// Packages or paths searched for step definitions.
    pub glue: Vec<String>,
    /// Tag filter applied to scenarios.
    pub tags: Option<TagFilter>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            strict: true,
            monochrome: true,
            plugins: Vec::new(),
            names: Vec::new(),
            glue: Vec::new(),
            tags: None,
        }
    }
}

/// Template-ready rendering of [`RunOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedOptions {
    /// Literal dry-run flag.
    pub dry_run: bool,
    /// Literal strict flag.
    pub strict: bool,
    /// Literal monochrome flag.
    pub monochrome: bool,
    /// Formatted glue list.
    pub glue: String,
    /// Formatted plugin list.
    pub plugin: String,
    /// Formatted name list.
    pub name: String,
    /// Formatted tag expression.
    pub tags: String,
}

impl RunOptions {
    /// Format every option for the runner template.
    #[must_use]
    pub fn format(&self) -> FormattedOptions {
        FormattedOptions {
            dry_run: self.dry_run,
            strict: self.strict,
            monochrome: self.monochrome,
            glue: format_list(&self.glue),
            plugin: format_list(&self.plugins),
            name: format_list(&self.names),
            tags: self
                .tags
                .as_ref()
                .map_or_else(String::new, TagFilter::expression),
        }
    }
}

/// Format a list option.
///
/// An empty list yields an empty string and a single element is quoted once.
/// Longer lists quote each element, join them with commas, and quote the
/// joined string again, so `["a", "b"]` becomes `""a","b""`. Downstream
/// templates depend on this exact shape.
#[must_use]
pub fn format_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [single] => quote(single),
        many => quote(
            &many
                .iter()
                .map(|item| quote(item))
                .collect::<Vec<_>>()
                .join(","),
        ),
    }
}

pub(crate) fn quote(value: &str) -> String {
    format!("\"{value}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|&s| s.to_owned()).collect()
    }

    #[rstest]
    #[case::empty(&[], "")]
    #[case::single(&["a"], r#""a""#)]
    #[case::pair(&["a", "b"], r#"""a","b"""#)]
    #[case::triple(&["pretty", "json:out.json", "junit:out.xml"], r#"""pretty","json:out.json","junit:out.xml"""#)]
    fn formats_lists(#[case] items: &[&str], #[case] expected: &str) {
        assert_eq!(format_list(&owned(items)), expected);
    }

    #[test]
    fn defaults_match_documented_values() {
        let options = RunOptions::default();
        assert!(!options.dry_run);
        assert!(options.strict);
        assert!(options.monochrome);
        assert!(options.plugins.is_empty());
        assert!(options.names.is_empty());
        assert!(options.glue.is_empty());
        assert!(options.tags.is_none());
    }

    #[test]
    fn default_options_format_to_empty_strings() {
        let formatted = RunOptions::default().format();
        assert_eq!(
            formatted,
            FormattedOptions {
                dry_run: false,
                strict: true,
                monochrome: true,
                glue: String::new(),
                plugin: String::new(),
                name: String::new(),
                tags: String::new(),
            }
        );
    }

    #[test]
    fn format_delegates_tags_to_the_filter() {
        let options = RunOptions {
            glue: owned(&["com.example.steps"]),
            tags: Some(TagFilter::new(Some("@smoke"), Some("@wip"))),
            ..RunOptions::default()
        };
        let formatted = options.format();
        assert_eq!(formatted.glue, r#""com.example.steps""#);
        assert_eq!(formatted.tags, r#""@smoke","~@wip""#);
    }

    #[test]
    fn missing_fields_take_default_values() -> Result<(), serde_json::Error> {
        let options: RunOptions = serde_json::from_str(r#"{ "dry-run": true, "plugins": ["pretty"] }"#)?;
        assert!(options.dry_run);
        assert!(options.strict);
        assert!(options.monochrome);
        assert_eq!(options.plugins, owned(&["pretty"]));
        Ok(())
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<RunOptions>(r#"{ "colour": false }"#);
        assert!(result.is_err());
    }
}
