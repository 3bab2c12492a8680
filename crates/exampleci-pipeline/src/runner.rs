//! Example project build execution.

use std::path::PathBuf;

use exampleci_core::CommandExecutor;
use tracing::{error, info};

use crate::error::{PipelineError, Result};
use crate::gradle::GradleWrapper;
use crate::locator::ProjectDescriptor;

/// A passing build of one example project.
///
/// Failures never produce an outcome; they surface as
/// [`PipelineError::BuildFailed`].
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Project root.
    pub project: PathBuf,

    /// Captured stdout.
    pub output: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

/// Runs `clean check` for one example project.
pub struct BuildRunner;

impl BuildRunner {
    /// Build `project` with its own settings file.
    ///
    /// A project without a settings file is rejected before anything is
    /// spawned. A spawn failure or a non-zero exit is fatal; only passing
    /// builds produce an outcome.
    pub async fn run(
        executor: &dyn CommandExecutor,
        gradle: &GradleWrapper,
        project: &ProjectDescriptor,
    ) -> Result<BuildOutcome> {
        let settings = project
            .settings_file
            .as_deref()
            .ok_or_else(|| PipelineError::MissingSettingsFile(project.root.clone()))?;

        let invocation = gradle.build(&project.root, settings);
        let command = invocation.to_string();
        info!(project = %project.root.display(), "Running {command}");

        let output = executor
            .execute(&invocation)
            .await
            .map_err(|e| PipelineError::BuildFailed {
                project: project.root.clone(),
                command: command.clone(),
                exit_code: -1,
                output: e.to_string(),
            })?;

        if !output.success() {
            error!(
                project = %project.root.display(),
                exit_code = output.exit_code,
                "Build failed:\n{}",
                output.combined()
            );
            return Err(PipelineError::BuildFailed {
                project: project.root.clone(),
                command,
                exit_code: output.exit_code,
                output: output.combined(),
            });
        }

        info!("{}", output.stdout);

        Ok(BuildOutcome {
            project: project.root.clone(),
            output: output.stdout,
            duration_ms: output.duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exampleci_core::fakes::ScriptedExecutor;
    use exampleci_core::CommandOutput;

    fn project(settings: Option<&str>) -> ProjectDescriptor {
        ProjectDescriptor {
            root: PathBuf::from("/ex/app"),
            build_file: PathBuf::from("/ex/app/build.gradle.kts"),
            settings_file: settings.map(PathBuf::from),
        }
    }

    #[tokio::test]
    async fn test_missing_settings_spawns_nothing() {
        let exec = ScriptedExecutor::new();
        let gradle = GradleWrapper::new("gradlew");

        let err = BuildRunner::run(&exec, &gradle, &project(None))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::MissingSettingsFile(_)));
        assert!(exec.calls().is_empty());
    }

    #[tokio::test]
    async fn test_successful_build() {
        let exec =
            ScriptedExecutor::new().respond("check", CommandOutput::ok("BUILD SUCCESSFUL in 3s"));
        let gradle = GradleWrapper::new("gradlew");

        let outcome = BuildRunner::run(
            &exec,
            &gradle,
            &project(Some("/ex/app/settings.gradle.kts")),
        )
        .await
        .unwrap();

        assert_eq!(outcome.project, PathBuf::from("/ex/app"));
        assert!(outcome.output.contains("BUILD SUCCESSFUL"));
        let calls = exec.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0]
            .args
            .windows(2)
            .any(|w| w == ["-c", "/ex/app/settings.gradle.kts"]));
    }

    #[tokio::test]
    async fn test_failed_build_is_fatal() {
        let exec = ScriptedExecutor::new()
            .respond("check", CommandOutput::failed(1, "Compilation failed"));
        let gradle = GradleWrapper::new("gradlew");

        let err = BuildRunner::run(&exec, &gradle, &project(Some("/ex/app/settings.gradle")))
            .await
            .unwrap_err();

        match err {
            PipelineError::BuildFailed {
                exit_code, output, command, ..
            } => {
                assert_eq!(exit_code, 1);
                assert!(output.contains("Compilation failed"));
                assert!(command.ends_with("clean check"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_spawn_failure_is_build_failure() {
        let exec = ScriptedExecutor::new().fail_spawn("gradlew");
        let gradle = GradleWrapper::new("gradlew");

        let err = BuildRunner::run(&exec, &gradle, &project(Some("/ex/app/settings.gradle.kts")))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::BuildFailed { exit_code: -1, .. }));
    }
}
