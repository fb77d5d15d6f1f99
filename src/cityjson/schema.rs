use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::SchemaError;

/// Discovers the CityJSON schema versions available on disk.
///
/// The expected layout is `<root>/<version>/<name>.schema.json`, e.g.
/// `schemas/1.0/cityjson.schema.json`.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    root: PathBuf,
    versions: Vec<String>,
}

impl SchemaStore {
    /// Lists the version directories below `root`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingDirectory`] if `root` is not a directory,
    /// or an I/O error if it cannot be read.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(SchemaError::MissingDirectory(root.display().to_string()));
        }
        let mut versions = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                versions.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        versions.sort_by(|a, b| compare_versions(a, b));
        Ok(Self {
            root: root.to_path_buf(),
            versions,
        })
    }

    /// The supported versions, oldest first.
    #[must_use]
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Selects a version: the requested one, or the latest when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedVersion`] if the version is not on
    /// disk (or no version is on disk at all).
    pub fn resolve(&self, requested: Option<&str>) -> Result<SchemaVersion, SchemaError> {
        let found = match requested {
            Some(version) => self.versions.iter().find(|v| *v == version),
            None => self.versions.last(),
        };
        let Some(version) = found else {
            return Err(SchemaError::UnsupportedVersion {
                version: requested.unwrap_or("latest").to_owned(),
                supported: self.versions.clone(),
            });
        };
        Ok(SchemaVersion {
            version: version.clone(),
            dir: self.root.join(version),
        })
    }
}

/// One resolved schema version.
#[derive(Debug, Clone)]
pub struct SchemaVersion {
    version: String,
    dir: PathBuf,
}

impl SchemaVersion {
    /// The version string, e.g. `"1.0"`.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Loads `<name>.schema.json` of this version.
    ///
    /// References inside the schema are returned as-is.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingSchema`] if the file does not exist, or an
    /// I/O or JSON error if it cannot be read.
    pub fn fetch(&self, name: &str) -> Result<Value, SchemaError> {
        let path = self.dir.join(format!("{name}.schema.json"));
        if !path.is_file() {
            return Err(SchemaError::MissingSchema(path.display().to_string()));
        }
        let text = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Orders dotted version strings numerically where possible ("1.10" > "1.9").
fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |s: &str| -> Option<Vec<u64>> { s.split('.').map(|p| p.parse().ok()).collect() };
    match (parse(a), parse(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("citylift-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn store_with(name: &str, versions: &[&str]) -> (PathBuf, SchemaStore) {
        let root = scratch_dir(name);
        for v in versions {
            fs::create_dir_all(root.join(v)).unwrap();
        }
        let store = SchemaStore::discover(&root).unwrap();
        (root, store)
    }

    #[test]
    fn versions_are_sorted_numerically() {
        let (root, store) = store_with("sorted", &["1.9", "1.10", "0.9"]);
        assert_eq!(store.versions(), &["0.9", "1.9", "1.10"]);
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn latest_is_resolved_by_default() {
        let (root, store) = store_with("latest", &["0.9", "1.0"]);
        assert_eq!(store.resolve(None).unwrap().version(), "1.0");
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn unknown_version_is_unsupported() {
        let (root, store) = store_with("unknown", &["1.0"]);
        let err = store.resolve(Some("3.0")).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnsupportedVersion { ref version, .. } if version == "3.0"
        ));
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn schema_file_is_loaded() {
        let (root, store) = store_with("fetch", &["1.0"]);
        fs::write(
            root.join("1.0").join("cityjson.schema.json"),
            r#"{"title": "CityJSON", "type": "object"}"#,
        )
        .unwrap();
        let schema = store.resolve(Some("1.0")).unwrap().fetch("cityjson").unwrap();
        assert_eq!(schema["title"], "CityJSON");
        assert!(matches!(
            store.resolve(Some("1.0")).unwrap().fetch("metadata"),
            Err(SchemaError::MissingSchema(_))
        ));
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn missing_root_is_reported() {
        let err = SchemaStore::discover("/nonexistent/citylift/schemas").unwrap_err();
        assert!(matches!(err, SchemaError::MissingDirectory(_)));
    }
}
