//! Feature file discovery.
//!
//! Only the top level of the features directory is listed. Entries are
//! yielded lazily in the order the filesystem returns them. Entries whose
//! names are not valid UTF-8 cannot be referenced from a runner and are
//! skipped.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, ReadDir};
use tracing::debug;

use crate::error::GenerationError;
use crate::options::quote;

/// Default extension of feature files.
pub const DEFAULT_FEATURE_EXTENSION: &str = "feature";

const CLASSPATH_SCHEME: &str = "classpath:";

/// A feature file found in the features directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFile {
    path: Utf8PathBuf,
    base_name: String,
}

impl FeatureFile {
    /// Path of the feature file as discovered.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// File name with every `.<extension>` occurrence removed.
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Path relative to `root`, climbing out of `root` with `..` when the
    /// file lives elsewhere.
    #[must_use]
    pub fn relative_to(&self, root: &Utf8Path) -> Utf8PathBuf {
        relative_path(root, &self.path)
    }

    /// Quoted `classpath:` reference used by generated runners to locate the
    /// feature, with `/` separators on every platform.
    #[must_use]
    pub fn classpath_reference(&self, root: &Utf8Path) -> String {
        let relative = self.relative_to(root);
        quote(&format!(
            "{CLASSPATH_SCHEME}{}",
            relative.as_str().replace('\\', "/")
        ))
    }
}

/// Lazy, single-pass listing of feature files in one directory.
pub struct FeatureFiles {
    dir: Utf8PathBuf,
    extension: String,
    entries: ReadDir,
}

impl FeatureFiles {
    /// Open `dir` for listing files whose extension equals `extension`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Io`] when the directory cannot be opened or
    /// read.
    pub fn open(dir: &Utf8Path, extension: &str) -> Result<Self, GenerationError> {
        let handle = Dir::open_ambient_dir(dir, ambient_authority())
            .map_err(|err| GenerationError::io(dir, err))?;
        let entries = handle
            .entries()
            .map_err(|err| GenerationError::io(dir, err))?;
        Ok(Self {
            dir: dir.to_owned(),
            extension: extension.to_owned(),
            entries,
        })
    }

    fn feature_from_name(&self, name: &str) -> Option<FeatureFile> {
        let path = self.dir.join(name);
        if path.extension() != Some(self.extension.as_str()) {
            return None;
        }
        let base_name = name.replace(&format!(".{}", self.extension), "");
        Some(FeatureFile { path, base_name })
    }
}

impl Iterator for FeatureFiles {
    type Item = Result<FeatureFile, GenerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(GenerationError::io(self.dir.clone(), err))),
            };
            let is_dir = match entry.file_type() {
                Ok(file_type) => file_type.is_dir(),
                Err(err) => return Some(Err(GenerationError::io(self.dir.clone(), err))),
            };
            if is_dir {
                continue;
            }
            let name = match entry.file_name() {
                Ok(name) => name,
                Err(err) => {
                    debug!(dir = %self.dir, error = %err, "skipping entry with non-UTF-8 name");
                    continue;
                }
            };
            if let Some(feature) = self.feature_from_name(&name) {
                return Some(Ok(feature));
            }
        }
    }
}

/// Express `path` relative to `root`. Both must be absolute, or both
/// relative to the same directory.
fn relative_path(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    let mut root_rest = root.components();
    let mut path_rest = path.components();
    loop {
        let (mut root_next, mut path_next) = (root_rest.clone(), path_rest.clone());
        match (root_next.next(), path_next.next()) {
            (Some(a), Some(b)) if a == b => {
                root_rest = root_next;
                path_rest = path_next;
            }
            _ => break,
        }
    }
    let mut relative: Utf8PathBuf = root_rest.map(|_| "..").collect();
    relative.extend(path_rest);
    relative
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

    struct FeatureDir {
        _temp: TempDir,
        path: Utf8PathBuf,
    }

    #[fixture]
    fn feature_dir() -> FeatureDir {
        let temp = TempDir::new().expect("failed to create temp dir");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("features"))
            .expect("temp dir path should be UTF-8");
        fs::create_dir_all(path.join("nested")).expect("failed to create features dir");
        for name in ["login.feature", "checkout.feature", "notes.txt", "nested/deep.feature"] {
            fs::write(path.join(name), "Feature: Example\n").expect("failed to write file");
        }
        fs::create_dir(path.join("archive.feature")).expect("failed to create dir");
        FeatureDir { _temp: temp, path }
    }

    fn base_names(dir: &Utf8Path) -> Vec<String> {
        let mut names: Vec<_> = FeatureFiles::open(dir, DEFAULT_FEATURE_EXTENSION)
            .expect("features dir should open")
            .map(|feature| feature.expect("entry should be readable").base_name)
            .collect();
        names.sort();
        names
    }

    #[rstest]
    fn lists_top_level_feature_files_only(feature_dir: FeatureDir) {
        assert_eq!(base_names(&feature_dir.path), vec!["checkout", "login"]);
    }

    #[rstest]
    fn honours_custom_extension(feature_dir: FeatureDir) {
        let names: Vec<_> = FeatureFiles::open(&feature_dir.path, "txt")
            .expect("features dir should open")
            .map(|feature| feature.expect("entry should be readable").base_name)
            .collect();
        assert_eq!(names, vec!["notes"]);
    }

    #[test]
    fn repeated_extension_is_removed_from_base_name() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .expect("temp dir path should be UTF-8");
        fs::write(dir.join("login.feature.feature"), "Feature: Login\n")
            .expect("failed to write file");
        assert_eq!(base_names(&dir), vec!["login"]);
    }

    #[cfg(target_os = "linux")]
    #[rstest]
    fn skips_entries_with_non_utf8_names(feature_dir: FeatureDir) {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"caf\xe9.txt");
        fs::write(feature_dir.path.as_std_path().join(name), "notes\n")
            .expect("failed to write file");
        assert_eq!(base_names(&feature_dir.path), vec!["checkout", "login"]);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let missing = Utf8PathBuf::from_path_buf(temp.path().join("absent"))
            .expect("temp dir path should be UTF-8");
        let result = FeatureFiles::open(&missing, DEFAULT_FEATURE_EXTENSION);
        assert!(result.is_err_and(|err| err.is_io()));
    }

    #[rstest]
    #[case("/project/tests", "/project/tests/features/login.feature", r#""classpath:features/login.feature""#)]
    #[case("/project/tests", "/project/specs/login.feature", r#""classpath:../specs/login.feature""#)]
    #[case("/project/tests", "/elsewhere/login.feature", r#""classpath:../../elsewhere/login.feature""#)]
    fn builds_classpath_reference(#[case] root: &str, #[case] path: &str, #[case] expected: &str) {
        let feature = FeatureFile {
            path: Utf8PathBuf::from(path),
            base_name: "login".into(),
        };
        assert_eq!(feature.classpath_reference(Utf8Path::new(root)), expected);
    }
}
