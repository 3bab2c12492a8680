//! Version resolution: explicit, or inferred from Gradle's `project` task.

use std::fmt;
use std::path::Path;

use exampleci_core::CommandExecutor;
use regex::Regex;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::gradle::GradleWrapper;

/// The version string written into every example's build file.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion(String);

impl ResolvedVersion {
    /// Wrap a version string as given, rejecting blank values.
    pub fn new(version: impl AsRef<str>) -> Result<Self> {
        let version = version.as_ref();
        if version.trim().is_empty() {
            return Err(PipelineError::VersionUnresolved(
                "version string is empty".to_string(),
            ));
        }
        Ok(Self(version.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pull the version out of Gradle's `Inferred project: <name>, version: <v>`
/// line. When `project_name` is given only that project's line matches.
pub fn extract_inferred_version(output: &str, project_name: Option<&str>) -> Option<String> {
    let name = match project_name {
        Some(name) => regex::escape(name),
        None => r"[^,\s]+".to_string(),
    };
    let pattern = format!(r"Inferred project: {name}, version: ([0-9A-Za-z\-.]+)");
    let re = Regex::new(&pattern).ok()?;
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Use `explicit` when present, otherwise ask Gradle for the version of the
/// project at `gradle_root`.
///
/// There is no fallback: a failed introspection or an output without the
/// inferred-project line is fatal.
pub async fn resolve_version(
    executor: &dyn CommandExecutor,
    gradle: &GradleWrapper,
    gradle_root: &Path,
    explicit: Option<&str>,
    project_name: Option<&str>,
    verbose: bool,
) -> Result<ResolvedVersion> {
    if let Some(version) = explicit.filter(|v| !v.trim().is_empty()) {
        return ResolvedVersion::new(version);
    }

    info!("Version not supplied, inferring");
    let invocation = gradle.introspect(gradle_root);
    let output = executor
        .execute(&invocation)
        .await
        .map_err(|e| PipelineError::VersionUnresolved(e.to_string()))?;

    let combined = output.combined();
    if verbose {
        info!(command = %invocation, "Process output:\n{combined}");
    } else {
        debug!(command = %invocation, "Process output:\n{combined}");
    }

    if !output.success() {
        return Err(PipelineError::VersionUnresolved(format!(
            "'{invocation}' exited with code {}",
            output.exit_code
        )));
    }

    let version = extract_inferred_version(&combined, project_name).ok_or_else(|| {
        PipelineError::VersionUnresolved(format!("no inferred project version in the output of '{invocation}'"))
    })?;
    let version = ResolvedVersion::new(version)?;
    info!(version = %version, "Version resolved");
    Ok(version)
}
