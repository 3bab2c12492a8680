//! exampleci Pipeline - release verification for example projects
//!
//! Provides the verification pipeline that:
//! - Resolves the library version (explicit or inferred from Gradle)
//! - Optionally clones the example repositories
//! - Pins every example's build file to that version
//! - Runs `clean check` on each example, stopping at the first failure

pub mod error;
pub mod gradle;
pub mod locator;
pub mod patch;
pub mod pipeline;
pub mod runner;
pub mod version;

// Re-export key types
pub use error::{PipelineError, Result};
pub use gradle::GradleWrapper;
pub use locator::{locate_project, ProjectDescriptor};
pub use patch::{patch_build_file, replace_version, Patched, DEFAULT_COORDINATE};
pub use pipeline::{
    list_projects, remove_projects_dir, PipelineOptions, PipelineReport, VerifyPipeline,
};
pub use runner::{BuildOutcome, BuildRunner};
pub use version::{extract_inferred_version, resolve_version, ResolvedVersion};
