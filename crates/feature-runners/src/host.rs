//! Host build tool integration.
//!
//! A [`BuildHost`] supplies the project layout and receives the generated
//! source directory once a run succeeds. [`StaticHost`] records what it is
//! told and suits tools that report afterwards; [`BuildScriptHost`] speaks
//! the Cargo build-script protocol.

use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::GenerationError;

/// Test-resource directory relative to a Cargo package root.
pub const CARGO_TEST_RESOURCE_DIR: &str = "tests";

/// Environment variable exported to the compiled crate by
/// [`BuildScriptHost`], naming the generated source directory.
pub const GENERATED_DIR_ENV: &str = "FEATURE_RUNNERS_DIR";

/// Project model of the build tool driving generation.
pub trait BuildHost {
    /// Directory against which relative configuration paths resolve.
    fn project_dir(&self) -> &Utf8Path;

    /// Root of the test resources. Feature references are relative to it.
    fn test_resource_root(&self) -> &Utf8Path;

    /// Build-output area holding the default generated source directory.
    fn build_output_dir(&self) -> &Utf8Path;

    /// Register `dir` as an additional test compile source root.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot record the registration.
    fn add_test_compile_source_root(&mut self, dir: &Utf8Path) -> Result<(), GenerationError>;

    /// Notify the host that generation reads from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot record the dependency.
    fn watch_features_dir(&mut self, _dir: &Utf8Path) -> Result<(), GenerationError> {
        Ok(())
    }
}

/// Host with a fixed layout that records registrations in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticHost {
    project_dir: Utf8PathBuf,
    test_resource_root: Utf8PathBuf,
    build_output_dir: Utf8PathBuf,
    source_roots: Vec<Utf8PathBuf>,
}

impl StaticHost {
    /// Create a host from explicit directories.
    #[must_use]
    pub fn new(
        project_dir: impl Into<Utf8PathBuf>,
        test_resource_root: impl Into<Utf8PathBuf>,
        build_output_dir: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            test_resource_root: test_resource_root.into(),
            build_output_dir: build_output_dir.into(),
            source_roots: Vec::new(),
        }
    }

    /// Create a host following Cargo conventions: resources in `tests/` and
    /// build output in `target/`.
    #[must_use]
    pub fn cargo_layout(project_dir: impl Into<Utf8PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let test_resource_root = project_dir.join(CARGO_TEST_RESOURCE_DIR);
        let build_output_dir = project_dir.join("target");
        Self::new(project_dir, test_resource_root, build_output_dir)
    }

    /// Use `build_output_dir` instead of the current build-output area.
    #[must_use]
    pub fn with_build_output_dir(mut self, build_output_dir: impl Into<Utf8PathBuf>) -> Self {
        self.build_output_dir = build_output_dir.into();
        self
    }

    /// Source roots registered so far, in registration order.
    #[must_use]
    pub fn source_roots(&self) -> &[Utf8PathBuf] {
        &self.source_roots
    }
}

impl BuildHost for StaticHost {
    fn project_dir(&self) -> &Utf8Path {
        &self.project_dir
    }

    fn test_resource_root(&self) -> &Utf8Path {
        &self.test_resource_root
    }

    fn build_output_dir(&self) -> &Utf8Path {
        &self.build_output_dir
    }

    fn add_test_compile_source_root(&mut self, dir: &Utf8Path) -> Result<(), GenerationError> {
        if !self.source_roots.iter().any(|root| root == dir) {
            self.source_roots.push(dir.to_owned());
        }
        Ok(())
    }
}

/// Host for use inside a Cargo `build.rs`.
///
/// Generated sources land under `OUT_DIR`. Registration exports
/// [`GENERATED_DIR_ENV`] to the crate being built, and the features
/// directory is declared with `cargo:rerun-if-changed`.
#[derive(Debug)]
pub struct BuildScriptHost<W = io::Stdout> {
    project_dir: Utf8PathBuf,
    test_resource_root: Utf8PathBuf,
    out_dir: Utf8PathBuf,
    directives: W,
}

impl BuildScriptHost<io::Stdout> {
    /// Read `CARGO_MANIFEST_DIR` and `OUT_DIR` from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Configuration`] when either variable is
    /// unset, which happens outside a build script.
    pub fn from_env() -> Result<Self, GenerationError> {
        let project_dir = env_path("CARGO_MANIFEST_DIR")?;
        let out_dir = env_path("OUT_DIR")?;
        Ok(Self::with_writer(project_dir, out_dir, io::stdout()))
    }
}

impl<W: Write> BuildScriptHost<W> {
    /// Create a host emitting directives to `directives`.
    pub fn with_writer(
        project_dir: impl Into<Utf8PathBuf>,
        out_dir: impl Into<Utf8PathBuf>,
        directives: W,
    ) -> Self {
        let project_dir = project_dir.into();
        let test_resource_root = project_dir.join(CARGO_TEST_RESOURCE_DIR);
        Self {
            project_dir,
            test_resource_root,
            out_dir: out_dir.into(),
            directives,
        }
    }

    /// Consume the host and return the directive sink.
    pub fn into_writer(self) -> W {
        self.directives
    }

    fn emit(&mut self, directive: &str) -> Result<(), GenerationError> {
        writeln!(self.directives, "cargo:{directive}")
            .map_err(|err| GenerationError::io(self.out_dir.clone(), err))
    }
}

impl<W: Write> BuildHost for BuildScriptHost<W> {
    fn project_dir(&self) -> &Utf8Path {
        &self.project_dir
    }

    fn test_resource_root(&self) -> &Utf8Path {
        &self.test_resource_root
    }

    fn build_output_dir(&self) -> &Utf8Path {
        &self.out_dir
    }

    fn add_test_compile_source_root(&mut self, dir: &Utf8Path) -> Result<(), GenerationError> {
        self.emit(&format!("rustc-env={GENERATED_DIR_ENV}={dir}"))
    }

    fn watch_features_dir(&mut self, dir: &Utf8Path) -> Result<(), GenerationError> {
        self.emit(&format!("rerun-if-changed={dir}"))
    }
}

fn env_path(key: &str) -> Result<Utf8PathBuf, GenerationError> {
    std::env::var(key).map(Utf8PathBuf::from).map_err(|_| {
        GenerationError::Configuration(format!(
            "{key} is not set. Build-script generation must run within Cargo."
        ))
    })
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;

    #[test]
    fn cargo_layout_uses_tests_and_target() {
        let host = StaticHost::cargo_layout("/work/app");
        assert_eq!(host.test_resource_root(), Utf8Path::new("/work/app/tests"));
        assert_eq!(host.build_output_dir(), Utf8Path::new("/work/app/target"));
    }

    #[test]
    fn static_host_records_each_root_once() {
        let mut host = StaticHost::cargo_layout("/work/app");
        let root = Utf8Path::new("/work/app/target/generated");
        host.add_test_compile_source_root(root).expect("registration should succeed");
        host.add_test_compile_source_root(root).expect("registration should succeed");
        assert_eq!(host.source_roots(), &[root.to_owned()]);
    }

    #[test]
    fn build_script_host_emits_cargo_directives() {
        let mut host = BuildScriptHost::with_writer("/work/app", "/work/out", Vec::new());
        assert_eq!(host.build_output_dir(), Utf8Path::new("/work/out"));
        host.watch_features_dir(Utf8Path::new("/work/app/tests/features"))
            .expect("directive should be written");
        host.add_test_compile_source_root(Utf8Path::new("/work/out/runners"))
            .expect("directive should be written");
        let output = String::from_utf8(host.into_writer()).expect("directives should be UTF-8");
        assert_eq!(
            output,
            "cargo:rerun-if-changed=/work/app/tests/features\n\
             cargo:rustc-env=FEATURE_RUNNERS_DIR=/work/out/runners\n"
        );
    }
}
