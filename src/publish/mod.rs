//! Build, pack and push pipeline
//!
//! Runs after a version is resolved. Steps are strictly sequential and each
//! one is a precondition for the next: a failed build skips pack and push,
//! a failed pack skips push. Nothing is retried or rolled back.

pub mod dotnet;
pub mod mock;

pub use dotnet::DotnetToolchain;
pub use mock::{RecordingToolchain, Step};

use crate::domain::Version;
use crate::error::Result;
use tracing::info;

/// Packaging toolchain driven by the pipeline
pub trait Toolchain: Send + Sync {
    /// Compile the project
    fn build(&self) -> Result<()>;

    /// Produce a package stamped with `version`.
    ///
    /// With `no_build` the already-built output is packed; otherwise packing
    /// triggers its own build.
    fn pack(&self, version: &Version, no_build: bool) -> Result<()>;

    /// Push the produced package to the feed
    fn push(&self) -> Result<()>;
}

/// Pipeline switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOptions {
    /// Pack from the existing build output
    pub skip_compile_step: bool,
    /// Run build, pack and push at all
    pub should_publish: bool,
}

/// What the pipeline did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Skipped,
    Published,
}

/// Run build, pack and push for `version`, or nothing when publishing is off.
pub fn run_pipeline<T: Toolchain + ?Sized>(
    toolchain: &T,
    version: &Version,
    options: &PublishOptions,
) -> Result<PublishOutcome> {
    if !options.should_publish {
        info!("publishing disabled, skipping build, pack and push");
        return Ok(PublishOutcome::Skipped);
    }

    info!(version = %version, "building package");
    toolchain.build()?;

    info!(version = %version, no_build = options.skip_compile_step, "packing package");
    toolchain.pack(version, options.skip_compile_step)?;

    info!(version = %version, "pushing package");
    toolchain.push()?;

    Ok(PublishOutcome::Published)
}
