//! exampleci - verify example projects against a new library release
//!
//! Pins every example project to the library version being released and runs
//! its Gradle build.
//!
//! ## Exit codes
//!
//! - `0`: every example built
//! - `2`: invalid command line
//! - `3`: configuration error (unreadable config, no repositories, no target)
//! - `4`: version could not be resolved
//! - `5`: projects directory missing or empty
//! - `6`: unsupported `build.gradle` example
//! - `7`: example without a build file
//! - `8`: example without a settings file
//! - `9`: example build failed
//! - `10`: `--strict-patch` and the coordinate was not found
//! - `11`: unexpected I/O error

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use exampleci_core::{telemetry, ProcessExecutor};
use exampleci_pipeline::error::exit_code;
use exampleci_pipeline::{GradleWrapper, PipelineOptions, VerifyPipeline, DEFAULT_COORDINATE};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "exampleci")]
#[command(author = "Stevedores Org")]
#[command(disable_version_flag = true)]
#[command(about = "Verify that example projects build against a new library version", long_about = None)]
#[command(after_help = "Example: exampleci -c <project version>")]
struct Cli {
    /// Version to apply; when omitted it is inferred from Gradle's project task
    #[arg(short = 'c', long = "version", value_name = "VERSION")]
    version: Option<String>,

    /// Directory holding the example projects [default: <gradle-root>/build/examples]
    #[arg(short = 'p', long = "path", value_name = "DIR")]
    path: Option<PathBuf>,

    /// Clone the example repositories listed in the config before building
    #[arg(short = 'g', long = "clone")]
    clone: bool,

    /// Keep the projects directory after a successful run
    #[arg(short = 'k', long = "keep")]
    keep: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Repository config [default: <gradle-root>/scripts/config.yml]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Root of the library project
    #[arg(long, value_name = "DIR", default_value = ".")]
    gradle_root: PathBuf,

    /// Gradle wrapper [default: <gradle-root>/gradlew]
    #[arg(long, value_name = "FILE")]
    gradlew: Option<PathBuf>,

    /// Project name expected in Gradle's inferred-version line
    #[arg(long, default_value = exampleci_pipeline::pipeline::DEFAULT_PROJECT_NAME)]
    project_name: String,

    /// Dependency coordinate whose version gets pinned
    #[arg(long, default_value = DEFAULT_COORDINATE)]
    coordinate: String,

    /// Fail when an example's build file does not mention the coordinate
    #[arg(long)]
    strict_patch: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Turn the flags into pipeline options with absolute paths.
    fn into_options(self, cwd: &Path) -> PipelineOptions {
        let gradle_root = absolute(cwd, &self.gradle_root);
        let mut options = PipelineOptions::new(gradle_root);

        options.version = self.version.filter(|v| !v.trim().is_empty());
        options.projects_dir = self.path.map(|p| absolute(cwd, &p));
        options.clone = self.clone;
        options.keep_projects_dir = self.keep;
        options.verbose = self.verbose;
        if let Some(config) = self.config {
            options.config_path = absolute(cwd, &config);
        }
        if let Some(gradlew) = self.gradlew {
            options.gradle = GradleWrapper::new(absolute(cwd, &gradlew));
        }
        options.project_name = Some(self.project_name);
        options.coordinate = self.coordinate;
        options.strict_patch = self.strict_patch;
        options
    }
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn exit_byte(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    let options = cli.into_options(&cwd);

    if let Some(version) = &options.version {
        info!(version = %version, "Using supplied version");
    }

    match VerifyPipeline::run(Arc::new(ProcessExecutor), &options).await {
        Ok(report) => {
            info!(
                version = %report.version,
                projects = report.builds.len(),
                duration_ms = report.duration_ms,
                "Build successful"
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(exit_code = e.exit_code(), "{e}");
            Ok(ExitCode::from(exit_byte(e.exit_code())))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.json, telemetry::level_for(cli.verbose));

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(exit_byte(exit_code::IO))
        }
    }
}
