use crate::domain::Version;
use crate::error::{AutoversionError, Result};
use crate::publish::Toolchain;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

const REDACTED: &str = "***";

/// `dotnet` CLI toolchain
///
/// Every command runs with the configured working directory as its current
/// directory. The API key is passed to `dotnet nuget push` and is redacted
/// from every logged command line and error message.
#[derive(Debug, Clone)]
pub struct DotnetToolchain {
    program: String,
    working_dir: PathBuf,
    configuration: String,
    output_dir: PathBuf,
    source: String,
    api_key: String,
}

impl DotnetToolchain {
    /// Toolchain pushing to `source` (as given, not normalized) with `api_key`.
    pub fn new(
        working_dir: impl Into<PathBuf>,
        source: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        DotnetToolchain {
            program: "dotnet".to_string(),
            working_dir: working_dir.into(),
            configuration: "Release".to_string(),
            output_dir: PathBuf::from("."),
            source: source.into(),
            api_key: api_key.into(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = configuration.into();
        self
    }

    /// Directory (relative to the working directory) packages are written to
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn build_args(&self) -> Vec<String> {
        vec![
            "build".to_string(),
            "-c".to_string(),
            self.configuration.clone(),
        ]
    }

    pub fn pack_args(&self, version: &Version, no_build: bool) -> Vec<String> {
        let mut args = vec!["pack".to_string()];
        if no_build {
            args.push("--no-build".to_string());
        }
        args.extend([
            "-c".to_string(),
            self.configuration.clone(),
            format!("-p:PackageVersion={}", version),
            "--output".to_string(),
            self.output_dir.display().to_string(),
        ]);
        args
    }

    pub fn push_args(&self) -> Vec<String> {
        vec![
            "nuget".to_string(),
            "push".to_string(),
            self.output_dir.join("*.nupkg").display().to_string(),
            "--api-key".to_string(),
            self.api_key.clone(),
            "--source".to_string(),
            self.source.clone(),
        ]
    }

    /// Command line for logs, with the API key masked
    pub fn describe(&self, args: &[String]) -> String {
        let mut shown = vec![self.program.clone()];
        let mut mask_next = false;
        for arg in args {
            if mask_next {
                shown.push(REDACTED.to_string());
                mask_next = false;
                continue;
            }
            mask_next = arg == "--api-key";
            shown.push(arg.clone());
        }
        shown.join(" ")
    }

    fn redact(&self, text: &str) -> String {
        if self.api_key.is_empty() {
            return text.to_string();
        }
        text.replace(&self.api_key, REDACTED)
    }

    fn run(&self, args: &[String], failure: fn(String) -> AutoversionError) -> Result<()> {
        let command_line = self.describe(args);
        info!(command = %command_line, "executing");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|e| failure(format!("Failed to execute {}: {}", command_line, e)))?;

        let stdout = self.redact(&String::from_utf8_lossy(&output.stdout));
        let stderr = self.redact(&String::from_utf8_lossy(&output.stderr));
        debug!(command = %command_line, stdout = %stdout.trim(), "command output");

        if !output.status.success() {
            return Err(failure(format!(
                "{} failed with exit code {}\nStdout: {}\nStderr: {}",
                command_line,
                output.status.code().unwrap_or(-1),
                stdout.trim(),
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl Toolchain for DotnetToolchain {
    fn build(&self) -> Result<()> {
        self.run(&self.build_args(), AutoversionError::BuildFailed)
    }

    fn pack(&self, version: &Version, no_build: bool) -> Result<()> {
        self.run(&self.pack_args(version, no_build), AutoversionError::PackFailed)
    }

    fn push(&self) -> Result<()> {
        self.run(&self.push_args(), AutoversionError::PushFailed)
    }
}
