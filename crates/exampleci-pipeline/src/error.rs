//! Fatal pipeline conditions and their process exit codes.

use std::path::PathBuf;

use exampleci_core::ConfigError;

/// Exit code for each fatal condition.
pub mod exit_code {
    pub const CONFIG: i32 = 3;
    pub const VERSION_UNRESOLVED: i32 = 4;
    pub const MISSING_PROJECTS: i32 = 5;
    pub const UNSUPPORTED_BUILD_FILE: i32 = 6;
    pub const MISSING_BUILD_FILE: i32 = 7;
    pub const MISSING_SETTINGS_FILE: i32 = 8;
    pub const BUILD_FAILED: i32 = 9;
    pub const PATCH_TARGET_MISSING: i32 = 10;
    pub const IO: i32 = 11;
}

/// Conditions that abort a verification run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid dependency coordinate pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("unable to resolve a version: {0}")]
    VersionUnresolved(String),

    #[error("can not find projects to build, the path {0} doesn't exist or is not a directory")]
    ProjectsPathMissing(PathBuf),

    #[error("no projects available at {0}")]
    NoProjects(PathBuf),

    #[error("only Gradle Kotlin (build.gradle.kts) files are supported, found {0}")]
    UnsupportedBuildFile(PathBuf),

    #[error("unable to infer the build file for project {0}")]
    MissingBuildFile(PathBuf),

    #[error("the project {0} is missing a Gradle settings file")]
    MissingSettingsFile(PathBuf),

    #[error("unable to test {project}, command '{command}' failed with exit code {exit_code}")]
    BuildFailed {
        project: PathBuf,
        command: String,
        exit_code: i32,
        output: String,
    },

    #[error("{coordinate} not found in {build_file}")]
    PatchTargetMissing {
        build_file: PathBuf,
        coordinate: String,
    },

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Process exit code for this condition.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Config(_) | PipelineError::InvalidPattern(_) => exit_code::CONFIG,
            PipelineError::VersionUnresolved(_) => exit_code::VERSION_UNRESOLVED,
            PipelineError::ProjectsPathMissing(_) | PipelineError::NoProjects(_) => {
                exit_code::MISSING_PROJECTS
            }
            PipelineError::UnsupportedBuildFile(_) => exit_code::UNSUPPORTED_BUILD_FILE,
            PipelineError::MissingBuildFile(_) => exit_code::MISSING_BUILD_FILE,
            PipelineError::MissingSettingsFile(_) => exit_code::MISSING_SETTINGS_FILE,
            PipelineError::BuildFailed { .. } => exit_code::BUILD_FAILED,
            PipelineError::PatchTargetMissing { .. } => exit_code::PATCH_TARGET_MISSING,
            PipelineError::Io { .. } => exit_code::IO,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
