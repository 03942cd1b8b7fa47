//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents a pacta project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .pacta/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            let pacta_dir = current.join(".pacta");
            if pacta_dir.is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path, force: bool) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let pacta_dir = root.join(".pacta");
        if pacta_dir.exists() && !force {
            return Err(ProjectError::AlreadyExists(root.clone()));
        }

        std::fs::create_dir_all(pacta_dir.join("snapshots"))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        let config_path = pacta_dir.join("config.yaml");
        if !config_path.exists() || force {
            std::fs::write(&config_path, Self::default_config())
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        // The cache is machine-local: re-fetchable, never version controlled
        std::fs::write(pacta_dir.join(".gitignore"), "cache.db\ncache.db-*\n")
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Ok(Self { root })
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .pacta directory
    pub fn pacta_dir(&self) -> PathBuf {
        self.root.join(".pacta")
    }

    /// Location of the SQLite cache database
    pub fn cache_path(&self) -> PathBuf {
        self.pacta_dir().join("cache.db")
    }

    /// Default directory for exported snapshots
    pub fn snapshots_dir(&self) -> PathBuf {
        self.pacta_dir().join("snapshots")
    }

    fn default_config() -> &'static str {
        r#"# Pacta project configuration
#
# catalog_url: https://catalog.example.gov/api
# group_codes:
#   - "787000"
#   - "787010"
# retry_attempts: 3
# retry_delay_ms: 2000
# request_timeout_secs: 30
"#
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("No pacta project found (searched from {searched_from} upwards). Run 'pacta init' first")]
    NotFound { searched_from: PathBuf },

    #[error("Project already initialized at {0}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_and_discover() {
        let tmp = TempDir::new().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();
        assert!(project.pacta_dir().is_dir());
        assert!(project.snapshots_dir().is_dir());

        let nested = project.root().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        let found = Project::discover_from(&nested).unwrap();
        assert_eq!(found.root(), project.root());
    }

    #[test]
    fn test_init_twice_fails_without_force() {
        let tmp = TempDir::new().unwrap();
        Project::init(tmp.path(), false).unwrap();
        assert!(matches!(
            Project::init(tmp.path(), false),
            Err(ProjectError::AlreadyExists(_))
        ));
        assert!(Project::init(tmp.path(), true).is_ok());
    }

    #[test]
    fn test_discover_outside_project_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Project::discover_from(tmp.path()),
            Err(ProjectError::NotFound { .. })
        ));
    }
}
