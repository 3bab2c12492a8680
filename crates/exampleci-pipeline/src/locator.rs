//! Build and settings file discovery for example projects.

use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

pub const KOTLIN_BUILD_FILE: &str = "build.gradle.kts";
pub const GROOVY_BUILD_FILE: &str = "build.gradle";
pub const KOTLIN_SETTINGS_FILE: &str = "settings.gradle.kts";
pub const GROOVY_SETTINGS_FILE: &str = "settings.gradle";

/// Files the pipeline needs from one example project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    /// Project root directory.
    pub root: PathBuf,

    /// The `build.gradle.kts` file.
    pub build_file: PathBuf,

    /// Settings file, if the project has one.
    pub settings_file: Option<PathBuf>,
}

/// Find the build file of `project_dir`.
///
/// Only the Kotlin DSL is supported because the version patch targets its
/// syntax; a Groovy `build.gradle` is rejected.
pub fn locate_build_file(project_dir: &Path) -> Result<PathBuf> {
    let kotlin = project_dir.join(KOTLIN_BUILD_FILE);
    if kotlin.is_file() {
        return Ok(kotlin);
    }
    let groovy = project_dir.join(GROOVY_BUILD_FILE);
    if groovy.is_file() {
        return Err(PipelineError::UnsupportedBuildFile(groovy));
    }
    Err(PipelineError::MissingBuildFile(project_dir.to_path_buf()))
}

/// Find the settings file of `project_dir`, preferring the Kotlin DSL.
pub fn locate_settings_file(project_dir: &Path) -> Option<PathBuf> {
    [KOTLIN_SETTINGS_FILE, GROOVY_SETTINGS_FILE]
        .iter()
        .map(|name| project_dir.join(name))
        .find(|path| path.is_file())
}

/// Locate both files for `project_dir`.
pub fn locate_project(project_dir: &Path) -> Result<ProjectDescriptor> {
    Ok(ProjectDescriptor {
        root: project_dir.to_path_buf(),
        build_file: locate_build_file(project_dir)?,
        settings_file: locate_settings_file(project_dir),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_kotlin_build_file_preferred() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(KOTLIN_BUILD_FILE), "").unwrap();
        fs::write(dir.path().join(GROOVY_BUILD_FILE), "").unwrap();

        let build = locate_build_file(dir.path()).unwrap();
        assert_eq!(build, dir.path().join(KOTLIN_BUILD_FILE));
    }

    #[test]
    fn test_groovy_build_file_unsupported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(GROOVY_BUILD_FILE), "").unwrap();

        let err = locate_build_file(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedBuildFile(_)));
    }

    #[test]
    fn test_missing_build_file() {
        let dir = tempdir().unwrap();
        let err = locate_build_file(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingBuildFile(_)));
    }

    #[test]
    fn test_directory_named_like_build_file_is_ignored() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(KOTLIN_BUILD_FILE)).unwrap();

        let err = locate_build_file(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingBuildFile(_)));
    }

    #[test]
    fn test_settings_file_order() {
        let dir = tempdir().unwrap();
        assert_eq!(locate_settings_file(dir.path()), None);

        fs::write(dir.path().join(GROOVY_SETTINGS_FILE), "").unwrap();
        assert_eq!(
            locate_settings_file(dir.path()),
            Some(dir.path().join(GROOVY_SETTINGS_FILE))
        );

        fs::write(dir.path().join(KOTLIN_SETTINGS_FILE), "").unwrap();
        assert_eq!(
            locate_settings_file(dir.path()),
            Some(dir.path().join(KOTLIN_SETTINGS_FILE))
        );
    }

    #[test]
    fn test_locate_project_without_settings() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(KOTLIN_BUILD_FILE), "").unwrap();

        let project = locate_project(dir.path()).unwrap();
        assert_eq!(project.root, dir.path());
        assert!(project.settings_file.is_none());
    }
}
