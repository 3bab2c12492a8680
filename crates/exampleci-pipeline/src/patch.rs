//! Pinning the library version inside a build file.

use std::path::Path;

use regex::{NoExpand, Regex};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::version::ResolvedVersion;

/// Dependency coordinate whose version gets pinned by default.
pub const DEFAULT_COORDINATE: &str = "graphql-dgs-platform-dependencies";

/// Text after substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub text: String,

    /// Number of `<coordinate>:<version>` tokens rewritten.
    pub replacements: usize,
}

impl Patched {
    pub fn changed_anything(&self) -> bool {
        self.replacements > 0
    }
}

/// Replace the version of every `<coordinate>:<version>` token in `text`.
///
/// Only the version segment changes. Text without a matching token comes back
/// unchanged with zero replacements.
pub fn replace_version(text: &str, coordinate: &str, version: &str) -> Result<Patched> {
    let re = Regex::new(&format!(r"{}:([0-9\w\-.]+)", regex::escape(coordinate)))?;
    let replacements = re.find_iter(text).count();
    if replacements == 0 {
        return Ok(Patched {
            text: text.to_string(),
            replacements,
        });
    }

    let pinned = format!("{coordinate}:{version}");
    Ok(Patched {
        text: re.replace_all(text, NoExpand(&pinned)).into_owned(),
        replacements,
    })
}

/// Rewrite `build_file` in place with `coordinate` pinned to `version`.
///
/// The file is always written back, even when nothing matched.
pub async fn patch_build_file(
    build_file: &Path,
    coordinate: &str,
    version: &ResolvedVersion,
) -> Result<Patched> {
    let text = tokio::fs::read_to_string(build_file)
        .await
        .map_err(|e| PipelineError::io(build_file, e))?;

    let patched = replace_version(&text, coordinate, version.as_str())?;

    tokio::fs::write(build_file, &patched.text)
        .await
        .map_err(|e| PipelineError::io(build_file, e))?;

    debug!(
        build_file = %build_file.display(),
        replacements = patched.replacements,
        "Build file patched"
    );
    Ok(patched)
}
