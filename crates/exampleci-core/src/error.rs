//! Error taxonomy for the core building blocks.

use std::path::PathBuf;

/// Failures while running an external command.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("invocation has no program")]
    EmptyProgram,

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while loading the repository configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("the repositories to clone are missing, make sure the config defines a repositories section")]
    EmptyRepositoryList,

    #[error("unable to determine the target path for the cloned repositories")]
    MissingCloneTarget,

    #[error("unable to create clone target {path}: {source}")]
    CreateTarget {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
