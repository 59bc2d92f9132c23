//! Main workflow orchestration logic
//!
//! Wires the gateways together: resolve the version, then run the publish
//! pipeline. The first error aborts every later step and no version is
//! reported.

use crate::config::Settings;
use crate::error::Result;
use crate::feed::{Feed, NugetFeed};
use crate::git::{Git2Repository, SourceControl};
use crate::publish::{self, DotnetToolchain, PublishOutcome, Toolchain};
use crate::resolver::{Resolution, VersionResolver};
use tracing::info;

/// Result of a successful workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub resolution: Resolution,
    pub outcome: PublishOutcome,
}

/// Run the workflow against explicit gateways.
pub async fn run_workflow<S, F, T>(
    scm: &S,
    feed: &F,
    toolchain: &T,
    settings: &Settings,
) -> Result<WorkflowResult>
where
    S: SourceControl + ?Sized,
    F: Feed + ?Sized,
    T: Toolchain + ?Sized,
{
    let resolution = VersionResolver::new(scm, feed)
        .resolve(&settings.resolve_options())
        .await?;

    info!(version = %resolution.version, source = %resolution.source, "version resolved");

    let outcome =
        publish::run_pipeline(toolchain, &resolution.version, &settings.publish_options())?;

    Ok(WorkflowResult {
        resolution,
        outcome,
    })
}

/// Run the workflow with git2, the NuGet feed and the dotnet toolchain.
pub async fn run_autoversion(settings: &Settings) -> Result<WorkflowResult> {
    let repo = Git2Repository::open(
        &settings.working_directory,
        settings.remote.clone(),
        Some(settings.credential.clone()),
    )?;

    let feed = NugetFeed::new(
        &settings.feed_address,
        settings.credential.clone(),
        settings.feed_timeout,
    )?;

    let toolchain = DotnetToolchain::new(
        &settings.working_directory,
        settings.feed_address.clone(),
        settings.credential.clone(),
    )
    .with_program(settings.dotnet.clone())
    .with_configuration(settings.configuration.clone())
    .with_output_dir(settings.output_dir.clone());

    run_workflow(&repo, &feed, &toolchain, settings).await
}
