//! Package selection and configuration from `cargo metadata`.

use camino::Utf8Path;
use cargo_metadata::{Metadata, MetadataCommand, Package};
use eyre::{Context, OptionExt, Result};
use feature_runners::{GeneratorConfig, StaticHost};
use tracing::debug;

/// Key of the generator table under `[package.metadata]`.
pub(crate) const METADATA_KEY: &str = "feature-runners";

/// A package prepared for generation.
#[derive(Debug)]
pub(crate) struct CargoProject {
    /// Package name.
    pub(crate) name: String,
    /// Host rooted at the package directory.
    pub(crate) host: StaticHost,
    /// Generator settings from the package metadata.
    pub(crate) config: GeneratorConfig,
}

/// Load the package selected by `manifest_path` and `package`.
///
/// # Errors
///
/// Returns an error when `cargo metadata` fails, no package matches, or the
/// metadata table does not deserialize.
pub(crate) fn load_project(
    manifest_path: Option<&Utf8Path>,
    package: Option<&str>,
) -> Result<CargoProject> {
    let mut command = MetadataCommand::new();
    command.no_deps();
    if let Some(path) = manifest_path {
        command.manifest_path(path);
    }
    let metadata = command.exec().wrap_err("failed to run cargo metadata")?;
    let selected = select_package(&metadata, manifest_path, package)?;
    debug!(package = %selected.name, manifest = %selected.manifest_path, "selected package");

    let config = package_config(selected)?;
    let project_dir = selected
        .manifest_path
        .parent()
        .ok_or_eyre("package manifest has no parent directory")?;
    let host = StaticHost::cargo_layout(project_dir)
        .with_build_output_dir(metadata.target_directory.clone());
    Ok(CargoProject {
        name: selected.name.clone(),
        host,
        config,
    })
}

fn select_package<'a>(
    metadata: &'a Metadata,
    manifest_path: Option<&Utf8Path>,
    package: Option<&str>,
) -> Result<&'a Package> {
    let members = metadata.workspace_packages();
    if let Some(name) = package {
        return members
            .into_iter()
            .find(|candidate| candidate.name == name)
            .ok_or_else(|| eyre::eyre!("package `{name}` is not a workspace member"));
    }
    if let Some(path) = manifest_path {
        let canonical = path
            .canonicalize_utf8()
            .wrap_err_with(|| format!("failed to resolve manifest path {path}"))?;
        if let Some(found) = members
            .into_iter()
            .find(|candidate| candidate.manifest_path == canonical)
        {
            return Ok(found);
        }
    }
    metadata.root_package().ok_or_eyre(
        "could not determine which package to use; pass --package or --manifest-path",
    )
}

/// Deserialize `[package.metadata.feature-runners]`, falling back to the
/// defaults when the table is absent.
fn package_config(package: &Package) -> Result<GeneratorConfig> {
    match package.metadata.get(METADATA_KEY) {
        None | Some(serde_json::Value::Null) => Ok(GeneratorConfig::default()),
        Some(table) => serde_json::from_value(table.clone()).wrap_err_with(|| {
            format!(
                "invalid [package.metadata.{METADATA_KEY}] in {}",
                package.manifest_path
            )
        }),
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn package_with_metadata(metadata: serde_json::Value) -> Package {
        serde_json::from_value(json!({
            "name": "shop",
            "version": "0.1.0",
            "id": "shop 0.1.0 (path+file:///work/shop)",
            "source": null,
            "authors": [],
            "edition": "2021",
            "rust_version": null,
            "dependencies": [],
            "targets": [],
            "features": {},
            "manifest_path": "/work/shop/Cargo.toml",
            "metadata": metadata,
        }))
        .expect("package json should deserialize")
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!({ "docs": { "rs": { "all-features": true } } }))]
    fn absent_table_yields_defaults(#[case] metadata: serde_json::Value) {
        let config = package_config(&package_with_metadata(metadata))
            .expect("defaults should apply");
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn reads_generator_table() {
        let package = package_with_metadata(json!({
            "feature-runners": {
                "test-pattern": "Spec",
                "append-test-pattern": false,
                "cucumber-options": { "glue": ["com.example.steps"] },
            }
        }));
        let config = package_config(&package).expect("table should deserialize");
        assert_eq!(config.test_pattern, "Spec");
        assert!(!config.append_test_pattern);
        assert_eq!(config.run_options().glue, vec!["com.example.steps"]);
    }

    #[test]
    fn rejects_unknown_keys() {
        let package = package_with_metadata(json!({
            "feature-runners": { "test-patern": "Spec" }
        }));
        let err = package_config(&package).expect_err("typo should be rejected");
        assert!(format!("{err:#}").contains("/work/shop/Cargo.toml"));
    }
}
