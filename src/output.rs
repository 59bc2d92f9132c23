//! Step output for CI runners.
//!
//! GitHub Actions passes a file path in `GITHUB_OUTPUT`; appending
//! `NEW_VERSION=<version>` to it exposes the version to later steps.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::Version;
use crate::error::Result;

pub const OUTPUT_ENV_VAR: &str = "GITHUB_OUTPUT";
pub const OUTPUT_NAME: &str = "NEW_VERSION";

/// Output file named by the environment, if any.
pub fn output_file_from_env() -> Option<PathBuf> {
    std::env::var_os(OUTPUT_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Append `NEW_VERSION=<version>` to `path`.
pub fn write_step_output(path: &Path, version: &Version) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}={}", OUTPUT_NAME, version)?;
    Ok(())
}
