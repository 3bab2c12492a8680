//! Git integration for acquiring example repositories.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use crate::error::{ConfigError, Result};
use crate::exec::{CommandExecutor, Invocation};

/// Outcome of a best-effort clone pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneReport {
    /// Directories that were cloned successfully.
    pub cloned: Vec<PathBuf>,

    /// URIs that could not be cloned.
    pub failed: Vec<String>,
}

/// Directory name `git clone` picks for `uri`: the last path segment without
/// a trailing `.git`.
pub fn repository_dir_name(uri: &str) -> String {
    let trimmed = uri.trim_end_matches('/');
    let last = trimmed
        .rsplit(|c: char| c == '/' || c == ':')
        .next()
        .unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

/// Clone every repository in `repositories` into `target`.
///
/// An empty repository list or an empty target path is fatal and is
/// reported before anything touches the filesystem. A repository that fails
/// to clone is logged and skipped.
pub async fn clone_repositories(
    executor: &dyn CommandExecutor,
    repositories: &[String],
    target: &Path,
) -> Result<CloneReport> {
    if repositories.is_empty() {
        return Err(ConfigError::EmptyRepositoryList);
    }
    if target.as_os_str().is_empty() {
        return Err(ConfigError::MissingCloneTarget);
    }

    if !fs::try_exists(target).await.unwrap_or(false) {
        info!(target = %target.display(), "Target directory is missing, creating");
        fs::create_dir_all(target)
            .await
            .map_err(|source| ConfigError::CreateTarget {
                path: target.to_path_buf(),
                source,
            })?;
    }

    let mut report = CloneReport::default();
    for uri in repositories {
        let invocation = Invocation::new("git")
            .args(["clone", uri.as_str()])
            .current_dir(target);

        match executor.execute(&invocation).await {
            Ok(output) if output.success() => {
                let dir = target.join(repository_dir_name(uri));
                info!(repository = %uri, target = %target.display(), "Repository cloned");
                report.cloned.push(dir);
            }
            Ok(output) => {
                warn!(
                    repository = %uri,
                    exit_code = output.exit_code,
                    stderr = %output.stderr.trim(),
                    "Unable to clone repository"
                );
                report.failed.push(uri.clone());
            }
            Err(e) => {
                warn!(repository = %uri, error = %e, "Unable to clone repository");
                report.failed.push(uri.clone());
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::CommandOutput;
    use crate::fakes::ScriptedExecutor;

    #[test]
    fn test_repository_dir_name() {
        assert_eq!(
            repository_dir_name("https://github.com/org/app-one.git"),
            "app-one"
        );
        assert_eq!(repository_dir_name("git@github.com:org/app.git"), "app");
        assert_eq!(repository_dir_name("https://example.com/plain/"), "plain");
        assert_eq!(repository_dir_name("git@host:repo"), "repo");
    }

    #[tokio::test]
    async fn test_empty_repository_list_is_fatal_before_mkdir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("examples");
        let exec = ScriptedExecutor::new();

        let err = clone_repositories(&exec, &[], &target).await.unwrap_err();
        assert!(matches!(err, ConfigError::EmptyRepositoryList));
        assert!(!target.exists());
        assert!(exec.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_target_is_fatal() {
        let exec = ScriptedExecutor::new();
        let repos = vec!["https://example.com/a.git".to_string()];

        let err = clone_repositories(&exec, &repos, Path::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCloneTarget));
    }

    #[tokio::test]
    async fn test_clone_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("examples");
        let exec = ScriptedExecutor::new()
            .respond("broken", CommandOutput::failed(128, "repository not found"))
            .fail_spawn("unreachable");
        let repos = vec![
            "https://example.com/broken.git".to_string(),
            "https://example.com/unreachable.git".to_string(),
            "https://example.com/good.git".to_string(),
        ];

        let report = clone_repositories(&exec, &repos, &target).await.unwrap();

        assert!(target.is_dir());
        assert_eq!(report.cloned, vec![target.join("good")]);
        assert_eq!(report.failed.len(), 2);
        assert_eq!(exec.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_clone_runs_inside_target() {
        let dir = tempfile::tempdir().unwrap();
        let exec = ScriptedExecutor::new();
        let repos = vec!["https://example.com/app.git".to_string()];

        clone_repositories(&exec, &repos, dir.path()).await.unwrap();

        let calls = exec.calls();
        assert_eq!(calls[0].program, "git");
        assert_eq!(calls[0].args, vec!["clone", "https://example.com/app.git"]);
        assert_eq!(calls[0].cwd.as_deref(), Some(dir.path()));
    }
}
