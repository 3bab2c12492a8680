//! Repository configuration loaded from YAML.
//!
//! ```yaml
//! repositories:
//!   - https://github.com/example/app-one.git
//! target: build/examples
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// Which repositories to clone and where.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExamplesConfig {
    /// Clone URIs.
    #[serde(default)]
    pub repositories: Vec<String>,

    /// Directory the repositories are cloned into.
    #[serde(default)]
    pub target: Option<PathBuf>,
}

impl ExamplesConfig {
    /// Parse a configuration document. `origin` is only used for error
    /// messages.
    pub fn from_yaml(text: &str, origin: &Path) -> Result<Self> {
        // An empty document deserialises to unit, not to a mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Fail with [`ConfigError::EmptyRepositoryList`] when nothing is
    /// configured to clone.
    pub fn require_repositories(&self) -> Result<&[String]> {
        if self.repositories.is_empty() {
            return Err(ConfigError::EmptyRepositoryList);
        }
        Ok(&self.repositories)
    }
}

/// Read and parse the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<ExamplesConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = ExamplesConfig::from_yaml(&text, path)?;
    debug!(path = %path.display(), repositories = config.repositories.len(), "Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repositories_and_target() {
        let yaml = "repositories:\n  - https://example.com/a.git\n  - https://example.com/b.git\ntarget: build/examples\n";
        let config = ExamplesConfig::from_yaml(yaml, Path::new("config.yml")).unwrap();
        assert_eq!(config.repositories.len(), 2);
        assert_eq!(config.target, Some(PathBuf::from("build/examples")));
    }

    #[test]
    fn test_target_is_optional() {
        let yaml = "repositories:\n  - https://example.com/a.git\n";
        let config = ExamplesConfig::from_yaml(yaml, Path::new("config.yml")).unwrap();
        assert!(config.target.is_none());
    }

    #[test]
    fn test_empty_document_has_no_repositories() {
        let config = ExamplesConfig::from_yaml("", Path::new("config.yml")).unwrap();
        assert!(matches!(
            config.require_repositories(),
            Err(ConfigError::EmptyRepositoryList)
        ));
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let err = ExamplesConfig::from_yaml("repositories: [unclosed", Path::new("bad.yml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.yml"));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "repositories:\n  - git@example.com:org/app.git\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.require_repositories().unwrap(), ["git@example.com:org/app.git"]);
    }
}
