//! End-to-end behaviour of runner generation against a temporary project.

use std::cell::RefCell;
use std::fs;

use camino::Utf8PathBuf;
use feature_runners::{
    ContextValue, GenerationError, GeneratorConfig, RenderContext, RunOptions, RunnerGenerator,
    StaticHost, TagFilter, TemplateRenderer, generate_runners,
};
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Project {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl Project {
    fn features_dir(&self) -> Utf8PathBuf {
        self.root.join("tests/features")
    }

    fn output_dir(&self) -> Utf8PathBuf {
        self.root.join("target/generated-test-sources/cucumber-runners")
    }

    fn add_feature(&self, name: &str) {
        fs::write(self.features_dir().join(name), "Feature: Example\n")
            .expect("failed to write feature file");
    }

    fn host(&self) -> StaticHost {
        StaticHost::cargo_layout(self.root.clone())
    }

    fn generated_files(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.output_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<_> = entries
            .map(|entry| {
                entry
                    .expect("entry should be readable")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }

    fn read_output(&self, file: &str) -> String {
        fs::read_to_string(self.output_dir().join(file)).expect("runner should be readable")
    }
}

#[fixture]
fn project() -> Project {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
        .expect("temp dir path should be UTF-8");
    fs::create_dir_all(root.join("tests/features")).expect("failed to create features dir");
    Project { _temp: temp, root }
}

/// Renderer recording every context it receives.
#[derive(Default)]
struct RecordingRenderer {
    contexts: RefCell<Vec<RenderContext>>,
}

impl TemplateRenderer for RecordingRenderer {
    fn render(&self, name: &str, context: &RenderContext) -> Result<String, GenerationError> {
        self.contexts.borrow_mut().push(context.clone());
        Ok(format!("{name}\n"))
    }
}

struct FailingRenderer;

impl TemplateRenderer for FailingRenderer {
    fn render(&self, name: &str, _context: &RenderContext) -> Result<String, GenerationError> {
        Err(GenerationError::Template {
            name: name.to_owned(),
            message: "template not found".to_owned(),
        })
    }
}

fn text(context: &RenderContext, key: &str) -> String {
    match context.get(key) {
        Some(ContextValue::Text(value)) => value.clone(),
        other => panic!("expected text under {key}, found {other:?}"),
    }
}

#[rstest]
fn generates_one_runner_per_feature_with_default_options(project: Project) {
    project.add_feature("checkout.feature");
    project.add_feature("login.feature");
    let mut host = project.host();

    let report = generate_runners(GeneratorConfig::default(), &mut host)
        .expect("generation should succeed");

    assert_eq!(project.generated_files(), vec!["CheckoutIT.java", "LoginIT.java"]);
    assert_eq!(report.output_dir, project.output_dir());
    assert_eq!(report.sources.len(), 2);
    assert_eq!(host.source_roots(), &[project.output_dir()]);

    let login = project.read_output("LoginIT.java");
    assert!(login.contains("features = \"classpath:features/login.feature\","));
    assert!(login.contains("dryRun = false,"));
    assert!(login.contains("strict = true,"));
    assert!(login.contains("monochrome = true\n)"));
    assert!(login.contains("public class LoginIT {"));
    for absent in ["glue =", "plugin =", "name =", "tags ="] {
        assert!(!login.contains(absent), "unexpected `{absent}` in runner");
    }

    let checkout = project.read_output("CheckoutIT.java");
    assert!(checkout.contains("features = \"classpath:features/checkout.feature\","));
    assert!(checkout.contains("public class CheckoutIT {"));
}

#[rstest]
fn second_run_fails_instead_of_overwriting(project: Project) {
    project.add_feature("login.feature");
    let mut host = project.host();
    generate_runners(GeneratorConfig::default(), &mut host).expect("first run should succeed");
    let first = project.read_output("LoginIT.java");

    let mut rerun_host = project.host();
    let err = generate_runners(GeneratorConfig::default(), &mut rerun_host)
        .expect_err("second run should fail");

    assert!(err.is_io(), "expected an I/O error, got {err}");
    assert!(rerun_host.source_roots().is_empty());
    assert_eq!(project.read_output("LoginIT.java"), first);
}

#[rstest]
fn missing_features_directory_is_reported(project: Project) {
    fs::remove_dir(project.features_dir()).expect("failed to remove features dir");
    let mut host = project.host();

    let err = generate_runners(GeneratorConfig::default(), &mut host)
        .expect_err("generation should fail");

    assert!(matches!(err, GenerationError::Configuration(_)));
    assert!(host.source_roots().is_empty());
}

#[rstest]
fn empty_features_directory_registers_output_without_files(project: Project) {
    let mut host = project.host();

    let report = generate_runners(GeneratorConfig::default(), &mut host)
        .expect("generation should succeed");

    assert!(report.sources.is_empty());
    assert!(!project.output_dir().exists());
    assert_eq!(host.source_roots(), &[project.output_dir()]);
}

#[rstest]
fn ignores_other_files_and_subdirectories(project: Project) {
    project.add_feature("login.feature");
    fs::write(project.features_dir().join("README.md"), "# notes\n")
        .expect("failed to write readme");
    fs::create_dir_all(project.features_dir().join("nested"))
        .expect("failed to create nested dir");
    fs::write(project.features_dir().join("nested/deep.feature"), "Feature: Deep\n")
        .expect("failed to write nested feature");
    let mut host = project.host();

    generate_runners(GeneratorConfig::default(), &mut host).expect("generation should succeed");

    assert_eq!(project.generated_files(), vec!["LoginIT.java"]);
}

#[cfg(target_os = "linux")]
#[rstest]
fn names_differing_only_by_case_collide(project: Project) {
    project.add_feature("login.feature");
    project.add_feature("LOGIN.feature");
    let mut host = project.host();

    let err = generate_runners(GeneratorConfig::default(), &mut host)
        .expect_err("generation should fail");

    assert!(matches!(err, GenerationError::NamingCollision { ref name, .. } if name == "LoginIT"));
    assert!(host.source_roots().is_empty());
}

#[rstest]
fn renderer_receives_formatted_options_and_feature_reference(project: Project) {
    project.add_feature("login_flow.feature");
    let config = GeneratorConfig {
        append_test_pattern: false,
        cucumber_options: Some(RunOptions {
            dry_run: true,
            glue: vec!["com.example.steps".into(), "com.example.hooks".into()],
            plugins: vec!["pretty".into()],
            tags: Some(TagFilter::new(Some("@smoke, @fast"), Some("@wip"))),
            ..RunOptions::default()
        }),
        ..GeneratorConfig::default()
    };
    let generator = RunnerGenerator::new(config, RecordingRenderer::default());
    let mut host = project.host();

    let report = generator.generate(&mut host).expect("generation should succeed");

    assert_eq!(project.generated_files(), vec!["ITLoginFlow.java"]);
    assert_eq!(
        report.sources.first().map(|source| source.name.as_str()),
        Some("ITLoginFlow")
    );
    let contexts = generator_contexts(generator);
    let [context] = contexts.as_slice() else {
        panic!("expected exactly one render, got {}", contexts.len());
    };
    assert_eq!(text(context, "class_name"), "ITLoginFlow");
    assert_eq!(
        text(context, "feature"),
        "\"classpath:features/login_flow.feature\""
    );
    assert_eq!(context.get("dry_run"), Some(&ContextValue::Flag(true)));
    assert_eq!(context.get("monochrome"), Some(&ContextValue::Flag(true)));
    assert_eq!(
        text(context, "glue"),
        r#"""com.example.steps","com.example.hooks"""#
    );
    assert_eq!(text(context, "plugin"), r#""pretty""#);
    assert_eq!(text(context, "name"), "");
    assert_eq!(text(context, "tags"), r#""@smoke","@fast","~@wip""#);
    assert_eq!(project.read_output("ITLoginFlow.java"), "junit-cucumber-runner\n");
}

fn generator_contexts(generator: RunnerGenerator<RecordingRenderer>) -> Vec<RenderContext> {
    let (_, renderer) = generator.into_parts();
    renderer.contexts.into_inner()
}

#[rstest]
fn template_failure_leaves_no_file(project: Project) {
    project.add_feature("login.feature");
    let generator = RunnerGenerator::new(GeneratorConfig::default(), FailingRenderer);
    let mut host = project.host();

    let err = generator.generate(&mut host).expect_err("generation should fail");

    assert!(matches!(err, GenerationError::Template { .. }));
    assert!(project.generated_files().is_empty());
}

#[rstest]
fn custom_template_and_overrides_are_honoured(project: Project) {
    fs::create_dir_all(project.root.join("specs")).expect("failed to create specs dir");
    fs::write(project.root.join("specs/search.feature"), "Feature: Search\n")
        .expect("failed to write feature");
    fs::write(
        project.root.join("runner.kt.j2"),
        "class {{ class_name }} // {{ feature }} strict={{ strict }}\n",
    )
    .expect("failed to write template");
    let config = GeneratorConfig {
        features_path: Some("specs".into()),
        generated_source_path: Some("generated".into()),
        test_pattern: "Spec".into(),
        source_extension: "kt".into(),
        template_path: Some("runner.kt.j2".into()),
        ..GeneratorConfig::default()
    };
    let mut host = project.host();

    let report = generate_runners(config, &mut host).expect("generation should succeed");

    let expected = project.root.join("generated/SearchSpec.kt");
    assert_eq!(
        report.sources.first().map(|source| source.path.as_path()),
        Some(expected.as_path())
    );
    let contents = fs::read_to_string(&expected).expect("runner should be readable");
    assert_eq!(
        contents,
        "class SearchSpec // \"classpath:../specs/search.feature\" strict=true\n"
    );
}

#[cfg(target_os = "linux")]
#[rstest]
fn non_utf8_sibling_does_not_abort_generation(project: Project) {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    project.add_feature("login.feature");
    let sibling = project
        .features_dir()
        .as_std_path()
        .join(OsStr::from_bytes(b"caf\xe9.txt"));
    fs::write(sibling, "notes\n").expect("failed to write sibling");
    let mut host = project.host();

    generate_runners(GeneratorConfig::default(), &mut host).expect("generation should succeed");

    assert_eq!(project.generated_files(), vec!["LoginIT.java"]);
}
