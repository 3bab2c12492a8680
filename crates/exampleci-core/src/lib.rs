//! exampleci Core Library
//!
//! Building blocks shared by the verification pipeline and the CLI:
//! - `exec`: the command executor seam every external process goes through
//! - `git`: best-effort repository cloning
//! - `config`: the YAML repository list
//! - `telemetry`: tracing initialisation

pub mod config;
pub mod error;
pub mod exec;
pub mod fakes;
pub mod git;
pub mod telemetry;

pub use config::{load_config, ExamplesConfig};
pub use error::{ConfigError, ExecError, Result};
pub use exec::{CommandExecutor, CommandOutput, Invocation, ProcessExecutor};
pub use git::{clone_repositories, repository_dir_name, CloneReport};
