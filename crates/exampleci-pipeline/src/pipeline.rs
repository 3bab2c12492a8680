//! Verification pipeline orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use exampleci_core::{clone_repositories, load_config, CloneReport, CommandExecutor};
use tokio::fs;
use tracing::{error, info, warn};

use crate::error::{PipelineError, Result};
use crate::gradle::GradleWrapper;
use crate::locator::locate_project;
use crate::patch::{patch_build_file, DEFAULT_COORDINATE};
use crate::runner::{BuildOutcome, BuildRunner};
use crate::version::{resolve_version, ResolvedVersion};

/// Project name Gradle reports for the library being released.
pub const DEFAULT_PROJECT_NAME: &str = "dgs-framework";

/// Everything a verification run needs to know up front.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Version to pin; inferred from Gradle when `None`.
    pub version: Option<String>,

    /// Directory holding one subdirectory per example project. Falls back to
    /// the config `target` when cloning, then to `<gradle_root>/build/examples`.
    pub projects_dir: Option<PathBuf>,

    /// Clone the configured repositories before building.
    pub clone: bool,

    /// Keep the projects directory after a successful run.
    pub keep_projects_dir: bool,

    /// Log full process output at info level.
    pub verbose: bool,

    /// Repository configuration file, read only when cloning.
    pub config_path: PathBuf,

    /// Root of the library project whose version is inferred.
    pub gradle_root: PathBuf,

    pub gradle: GradleWrapper,

    /// Project name expected in the inferred-version line.
    pub project_name: Option<String>,

    /// Dependency coordinate whose version is pinned.
    pub coordinate: String,

    /// Fail when a build file does not mention the coordinate.
    pub strict_patch: bool,
}

impl PipelineOptions {
    /// Defaults relative to the library project at `gradle_root`.
    pub fn new(gradle_root: impl Into<PathBuf>) -> Self {
        let gradle_root = gradle_root.into();
        Self {
            version: None,
            projects_dir: None,
            clone: false,
            keep_projects_dir: false,
            verbose: false,
            config_path: gradle_root.join("scripts").join("config.yml"),
            gradle: GradleWrapper::in_root(&gradle_root),
            gradle_root,
            project_name: Some(DEFAULT_PROJECT_NAME.to_string()),
            coordinate: DEFAULT_COORDINATE.to_string(),
            strict_patch: false,
        }
    }

    /// `<gradle_root>/build/examples`
    pub fn default_projects_dir(&self) -> PathBuf {
        self.gradle_root.join("build").join("examples")
    }
}

/// Result of a successful verification run. Every entry in `builds` passed.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Version pinned into every example.
    pub version: ResolvedVersion,

    /// Directory the examples were read from.
    pub projects_dir: PathBuf,

    /// Clone results, when cloning was requested.
    pub clone: Option<CloneReport>,

    /// One outcome per example, in build order.
    pub builds: Vec<BuildOutcome>,

    /// Whether the projects directory was deleted.
    pub removed_projects_dir: bool,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}

/// List the example projects below `projects_dir`, sorted by name.
///
/// A path that is absent or not a directory is reported as missing.
pub async fn list_projects(projects_dir: &Path) -> Result<Vec<PathBuf>> {
    if !is_dir(projects_dir).await {
        return Err(PipelineError::ProjectsPathMissing(projects_dir.to_path_buf()));
    }

    let mut entries = fs::read_dir(projects_dir)
        .await
        .map_err(|e| PipelineError::io(projects_dir, e))?;
    let mut projects = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| PipelineError::io(projects_dir, e))?
    {
        let path = entry.path();
        if is_dir(&path).await {
            projects.push(path);
        }
    }
    projects.sort();

    if projects.is_empty() {
        return Err(PipelineError::NoProjects(projects_dir.to_path_buf()));
    }
    Ok(projects)
}

/// Delete the projects directory after a successful run.
///
/// Failure is logged and reported as `false`; it never fails the run.
pub async fn remove_projects_dir(projects_dir: &Path) -> bool {
    info!(path = %projects_dir.display(), "Removing projects directory");
    match fs::remove_dir_all(projects_dir).await {
        Ok(()) => true,
        Err(e) => {
            error!(path = %projects_dir.display(), error = %e, "Failed deleting projects directory");
            false
        }
    }
}

/// Release verification pipeline orchestrator.
pub struct VerifyPipeline;

impl VerifyPipeline {
    /// Resolve the version, optionally clone, then patch and build every
    /// example in turn.
    ///
    /// The first failing example aborts the run; the projects directory is
    /// only removed after every build passed.
    pub async fn run(
        executor: Arc<dyn CommandExecutor>,
        options: &PipelineOptions,
    ) -> Result<PipelineReport> {
        let start = Instant::now();
        let executor = executor.as_ref();

        let version = resolve_version(
            executor,
            &options.gradle,
            &options.gradle_root,
            options.version.as_deref(),
            options.project_name.as_deref(),
            options.verbose,
        )
        .await?;

        let mut projects_dir = options
            .projects_dir
            .clone()
            .unwrap_or_else(|| options.default_projects_dir());

        let clone = if options.clone {
            let config = load_config(&options.config_path)?;
            if options.verbose {
                info!(path = %options.config_path.display(), "Configuration loaded: {config:?}");
            }
            if options.projects_dir.is_none() {
                if let Some(target) = &config.target {
                    projects_dir = target.clone();
                }
            }

            info!(target = %projects_dir.display(), "Cloning example repositories");
            let report =
                clone_repositories(executor, config.require_repositories()?, &projects_dir)
                    .await?;
            info!(
                cloned = report.cloned.len(),
                failed = report.failed.len(),
                "Clone finished"
            );
            Some(report)
        } else {
            None
        };

        let projects = list_projects(&projects_dir).await?;
        let mut builds = Vec::with_capacity(projects.len());

        for project_dir in &projects {
            info!(project = %project_dir.display(), "Processing project");

            let project = locate_project(project_dir)?;
            let patched = patch_build_file(&project.build_file, &options.coordinate, &version).await?;
            if !patched.changed_anything() {
                if options.strict_patch {
                    return Err(PipelineError::PatchTargetMissing {
                        build_file: project.build_file.clone(),
                        coordinate: options.coordinate.clone(),
                    });
                }
                warn!(
                    build_file = %project.build_file.display(),
                    coordinate = %options.coordinate,
                    "Coordinate not found, build file left unchanged"
                );
            }

            let outcome = BuildRunner::run(executor, &options.gradle, &project).await?;
            info!(
                project = %project_dir.display(),
                duration_ms = outcome.duration_ms,
                "Project built"
            );
            builds.push(outcome);
        }

        let removed_projects_dir =
            !options.keep_projects_dir && remove_projects_dir(&projects_dir).await;

        let duration_ms = start.elapsed().as_millis() as u64;

        Ok(PipelineReport {
            version,
            projects_dir,
            clone,
            builds,
            removed_projects_dir,
            duration_ms,
        })
    }
}
