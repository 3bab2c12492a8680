//! Gradle wrapper invocations.

use std::path::{Path, PathBuf};

use exampleci_core::Invocation;

/// Tasks run against every example project.
pub const BUILD_TASKS: [&str; 2] = ["clean", "check"];

/// The Gradle wrapper script used for introspection and example builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradleWrapper {
    /// Path to `gradlew`.
    pub program: PathBuf,
}

impl GradleWrapper {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The `gradlew` script inside `root`.
    pub fn in_root(root: &Path) -> Self {
        Self::new(root.join("gradlew"))
    }

    fn invocation(&self) -> Invocation {
        Invocation::new(self.program.to_string_lossy().into_owned())
    }

    /// `gradlew --info --stacktrace -p <root> project`, whose output carries
    /// the inferred project version.
    pub fn introspect(&self, root: &Path) -> Invocation {
        self.invocation()
            .args(["--info", "--stacktrace", "-p"])
            .path_arg(root)
            .arg("project")
    }

    /// `gradlew -p <project> -s -w --info --stacktrace -c <settings> clean check`
    pub fn build(&self, project: &Path, settings: &Path) -> Invocation {
        self.invocation()
            .arg("-p")
            .path_arg(project)
            .args(["-s", "-w", "--info", "--stacktrace", "-c"])
            .path_arg(settings)
            .args(BUILD_TASKS)
    }
}
