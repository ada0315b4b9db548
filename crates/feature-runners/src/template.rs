//! Template rendering for runner sources.
//!
//! The generator only depends on [`TemplateRenderer`]: a template name and a
//! flat key/value context in, rendered text out. [`MiniJinjaRenderer`] is
//! the bundled implementation and ships the JUnit runner template under
//! [`BUILTIN_TEMPLATE`].

use std::collections::BTreeMap;

use camino::Utf8Path;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

use crate::error::GenerationError;

/// Name of the bundled JUnit 4 runner template.
pub const BUILTIN_TEMPLATE: &str = "junit-cucumber-runner";

static BUILTIN_SOURCE: &str = include_str!("../templates/junit-cucumber-runner.java.j2");

/// A value stored in a [`RenderContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// Literal boolean.
    Flag(bool),
    /// Pre-formatted text, inserted verbatim.
    Text(String),
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Flat key/value context handed to a renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenderContext {
    entries: BTreeMap<String, ContextValue>,
}

impl RenderContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key)
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Renders a named template with a flat context.
pub trait TemplateRenderer {
    /// Render template `name` with `context`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Template`] when the template is unknown or
    /// fails to render.
    fn render(&self, name: &str, context: &RenderContext) -> Result<String, GenerationError>;
}

/// [`TemplateRenderer`] backed by `minijinja`.
///
/// Undefined context keys are errors rather than empty output.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Create a renderer with no templates registered.
    #[must_use]
    pub fn empty() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }

    /// Create a renderer holding the built-in runner template.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Template`] if the bundled template fails
    /// to parse.
    pub fn with_builtin() -> Result<Self, GenerationError> {
        let mut renderer = Self::empty();
        renderer
            .env
            .add_template(BUILTIN_TEMPLATE, BUILTIN_SOURCE)
            .map_err(|err| template_error(BUILTIN_TEMPLATE, &err))?;
        Ok(renderer)
    }

    /// Register `source` under `name`, replacing any template of that name.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Template`] when `source` has a syntax error.
    pub fn register(&mut self, name: &str, source: String) -> Result<(), GenerationError> {
        self.env
            .add_template_owned(name.to_owned(), source)
            .map_err(|err| template_error(name, &err))
    }

    /// Register the contents of the file at `path` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Io`] when the file cannot be read and
    /// [`GenerationError::Template`] when it fails to parse.
    pub fn register_file(&mut self, name: &str, path: &Utf8Path) -> Result<(), GenerationError> {
        let source =
            std::fs::read_to_string(path).map_err(|err| GenerationError::io(path, err))?;
        self.register(name, source)
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, name: &str, context: &RenderContext) -> Result<String, GenerationError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|err| template_error(name, &err))?;
        template
            .render(context)
            .map_err(|err| template_error(name, &err))
    }
}

fn template_error(name: &str, err: &minijinja::Error) -> GenerationError {
    GenerationError::Template {
        name: name.to_owned(),
        message: err.to_string(),
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

    #[fixture]
    fn runner_context() -> RenderContext {
        let mut context = RenderContext::new();
        context.insert("class_name", "LoginIT");
        context.insert("feature", "\"classpath:features/login.feature\"");
        context.insert("dry_run", false);
        context.insert("strict", true);
        context.insert("monochrome", true);
        for key in ["glue", "plugin", "name", "tags"] {
            context.insert(key, "");
        }
        context
    }

    #[rstest]
    fn builtin_template_renders_default_runner(runner_context: RenderContext) {
        let renderer = MiniJinjaRenderer::with_builtin().expect("builtin template should parse");
        let source = renderer
            .render(BUILTIN_TEMPLATE, &runner_context)
            .expect("template should render");
        assert!(source.starts_with("import cucumber.api.CucumberOptions;"));
        assert!(source.contains("features = \"classpath:features/login.feature\","));
        assert!(source.contains("dryRun = false,"));
        assert!(source.contains("strict = true,"));
        assert!(source.contains("monochrome = true\n)"));
        assert!(source.contains("public class LoginIT {"));
        assert!(!source.contains("glue"));
        assert!(!source.contains("tags"));
        assert!(source.ends_with("}\n"));
    }

    #[rstest]
    fn builtin_template_includes_populated_options(mut runner_context: RenderContext) {
        runner_context.insert("glue", "\"com.example.steps\"");
        runner_context.insert("tags", "\"@smoke\",\"~@wip\"");
        let renderer = MiniJinjaRenderer::with_builtin().expect("builtin template should parse");
        let source = renderer
            .render(BUILTIN_TEMPLATE, &runner_context)
            .expect("template should render");
        assert!(source.contains("monochrome = true,\n        glue = { \"com.example.steps\" },"));
        assert!(source.contains("tags = { \"@smoke\",\"~@wip\" }\n)"));
    }

    #[rstest]
    fn unknown_template_is_a_template_error(runner_context: RenderContext) {
        let renderer = MiniJinjaRenderer::empty();
        let err = renderer
            .render("missing", &runner_context)
            .expect_err("rendering should fail");
        assert!(matches!(err, GenerationError::Template { ref name, .. } if name == "missing"));
    }

    #[test]
    fn undefined_keys_are_rejected() {
        let mut renderer = MiniJinjaRenderer::empty();
        renderer
            .register("runner", "class {{ class_name }}".to_owned())
            .expect("template should parse");
        let err = renderer
            .render("runner", &RenderContext::new())
            .expect_err("rendering should fail");
        assert!(matches!(err, GenerationError::Template { .. }));
    }

    #[test]
    fn registered_template_replaces_builtin() {
        let mut renderer = MiniJinjaRenderer::with_builtin().expect("builtin template should parse");
        renderer
            .register(BUILTIN_TEMPLATE, "// {{ class_name }}".to_owned())
            .expect("template should parse");
        let mut context = RenderContext::new();
        context.insert("class_name", "CheckoutIT");
        let source = renderer
            .render(BUILTIN_TEMPLATE, &context)
            .expect("template should render");
        assert_eq!(source, "// CheckoutIT");
    }

    #[test]
    fn syntax_errors_are_reported_on_registration() {
        let mut renderer = MiniJinjaRenderer::empty();
        let err = renderer
            .register("broken", "{% if %}".to_owned())
            .expect_err("registration should fail");
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn context_serializes_as_flat_map() {
        let mut context = RenderContext::new();
        context.insert("strict", true);
        context.insert("glue", "\"a\"");
        let json = serde_json::to_string(&context).expect("context should serialize");
        assert_eq!(json, r#"{"glue":"\"a\"","strict":true}"#);
    }
}
