//! Role definition sources.
//!
//! A source yields one [`RoleUnit`] per logical definition. The registry
//! validates the whole batch before anything is published.

use std::fs;
use std::path::{Path, PathBuf};

use rk_common::RoleData;

use super::RegistryError;

/// One decoded definition together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleUnit {
    /// Human-readable origin used in error messages (file name, label).
    pub origin: String,
    /// The decoded definition.
    pub data: RoleData,
}

impl RoleUnit {
    pub fn new(origin: impl Into<String>, data: RoleData) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// Anything that can produce a batch of role definitions.
pub trait RoleSource {
    /// Read every unit. Any failure aborts the whole load.
    fn read_units(&self) -> Result<Vec<RoleUnit>, RegistryError>;
}

/// Reads one definition per file from a single directory.
///
/// `.toml` files are decoded as TOML, everything else as JSON. Sub-directories
/// and hidden files are skipped. Files are read in name order.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_unit(path: &Path, origin: String) -> Result<RoleUnit, RegistryError> {
        let bytes = fs::read(path).map_err(|source| RegistryError::Unreadable {
            origin: origin.clone(),
            source,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let data = if is_toml {
            std::str::from_utf8(&bytes)
                .map_err(|e| e.to_string())
                .and_then(|text| toml::from_str::<RoleData>(text).map_err(|e| e.to_string()))
        } else {
            serde_json::from_slice::<RoleData>(&bytes).map_err(|e| e.to_string())
        }
        .map_err(|reason| RegistryError::Malformed {
            origin: origin.clone(),
            reason,
        })?;

        Ok(RoleUnit { origin, data })
    }
}

impl RoleSource for DirectorySource {
    fn read_units(&self) -> Result<Vec<RoleUnit>, RegistryError> {
        let unreadable = |source| RegistryError::Unreadable {
            origin: self.dir.display().to_string(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            // Follows symlinks, so linked definition files load like plain ones.
            if !fs::metadata(entry.path()).map_err(unreadable)?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            files.push((name, entry.path()));
        }
        files.sort();

        files
            .into_iter()
            .map(|(name, path)| Self::read_unit(&path, name))
            .collect()
    }
}

/// Definitions held in memory, for embedding and tests.
#[derive(Debug, Clone)]
pub struct MemorySource {
    units: Vec<RoleUnit>,
}

impl MemorySource {
    /// Build a source whose units are labelled by their own names.
    pub fn from_roles(roles: impl IntoIterator<Item = RoleData>) -> Self {
        let units = roles
            .into_iter()
            .map(|data| RoleUnit::new(data.name.clone(), data))
            .collect();
        Self { units }
    }
}

impl RoleSource for MemorySource {
    fn read_units(&self) -> Result<Vec<RoleUnit>, RegistryError> {
        Ok(self.units.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_reads_json_and_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("owner.json"),
            r#"{"name":"owner","colour":"§4","tier":3}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("admin.toml"),
            "name = \"admin\"\ninherits = \"owner\"\ntier = 2\n",
        )
        .unwrap();

        let units = DirectorySource::new(dir.path()).read_units().unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].origin, "admin.toml");
        assert_eq!(units[0].data.inherits.as_deref(), Some("owner"));
        assert_eq!(units[1].origin, "owner.json");
        assert_eq!(units[1].data.colour.as_deref(), Some("§4"));
    }

    #[test]
    fn test_directory_skips_subdirectories_and_hidden_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();
        fs::write(dir.path().join(".gitkeep"), "").unwrap();
        fs::write(dir.path().join("member.json"), r#"{"name":"member","tier":0}"#).unwrap();

        let units = DirectorySource::new(dir.path()).read_units().unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].data.name, "member");
    }

    #[test]
    fn test_missing_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = DirectorySource::new(&missing).read_units().unwrap_err();
        assert!(matches!(err, RegistryError::Unreadable { .. }));
    }

    #[test]
    fn test_malformed_file_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let err = DirectorySource::new(dir.path()).read_units().unwrap_err();
        assert!(matches!(err, RegistryError::Malformed { .. }));
        assert_eq!(err.origin(), "broken.json");
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_follows_symlinked_files() {
        let shared = tempfile::tempdir().unwrap();
        let target = shared.path().join("owner.json");
        fs::write(&target, r#"{"name":"owner","tier":3}"#).unwrap();

        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("owner.json")).unwrap();
        fs::write(dir.path().join("member.json"), r#"{"name":"member","tier":0}"#).unwrap();

        let units = DirectorySource::new(dir.path()).read_units().unwrap();

        let names: Vec<_> = units.iter().map(|u| u.data.name.as_str()).collect();
        assert_eq!(names, vec!["member", "owner"]);
    }
}
