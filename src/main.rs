use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::error;

use nuget_autoversion::cli::{run_autoversion, WorkflowResult};
use nuget_autoversion::config::{load_config, Overrides, Settings};
use nuget_autoversion::{logging, output, ui, AutoversionError};

#[derive(clap::Parser)]
#[command(
    name = "nuget-autoversion",
    version,
    about = "Resolve the next package version from commit history or the package feed, and optionally publish"
)]
struct Args {
    #[arg(
        long,
        env = "AUTOVERSION_TOKEN",
        hide_env_values = true,
        help = "Credential for feed queries, pushes and marker publication (falls back to GITHUB_TOKEN)"
    )]
    token: Option<String>,

    #[arg(long, help = "Package feed URL (feed root or .../index.json)")]
    feed: Option<String>,

    #[arg(long, help = "Package identifier on the feed")]
    package_id: Option<String>,

    #[arg(long, default_value = ".", help = "Root for git and build operations")]
    work_dir: PathBuf,

    #[arg(long, help = "Prefix of processing marker tags [default: processed-]")]
    marker_prefix: Option<String>,

    #[arg(long, help = "Number of recent commits scanned for a version request [default: 10]")]
    lookback: Option<usize>,

    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Pack from the existing build output (--skip-compile-step=false overrides the file)"
    )]
    skip_compile_step: Option<bool>,

    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Build, pack and push the package (--publish=false overrides the file)"
    )]
    publish: Option<bool>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Resolve only: create no marker and publish nothing")]
    dry_run: bool,

    #[arg(short, long, help = "Show debug diagnostics on stderr")]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    match run(args).await {
        Ok(result) => println!("{}", result.resolution.version),
        Err(e) => {
            let message = format!("{:#}", e);
            let kind = e
                .downcast_ref::<AutoversionError>()
                .map(AutoversionError::kind)
                .unwrap_or("Other");
            error!(kind, error = %message, "autoversion failed");
            ui::display_error(&message);
            process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<WorkflowResult> {
    let overrides = Overrides {
        credential: args
            .token
            .or_else(|| std::env::var("GITHUB_TOKEN").ok()),
        feed_address: args.feed,
        package_id: args.package_id,
        marker_prefix: args.marker_prefix,
        lookback: args.lookback,
        skip_compile_step: args.skip_compile_step,
        should_publish: args.publish,
        dry_run: args.dry_run,
    };

    let config = load_config(args.config.as_deref(), &args.work_dir)
        .context("Failed to load configuration")?;
    let settings =
        Settings::assemble(config, overrides, args.work_dir).context("Invalid inputs")?;

    ui::display_status(&format!(
        "Resolving version of {} from the last {} commits",
        settings.package_id, settings.lookback
    ));

    let result = run_autoversion(&settings).await?;

    ui::display_resolution(&result.resolution);
    ui::display_status(ui::format_outcome(result.outcome));

    if let Some(path) = output::output_file_from_env() {
        output::write_step_output(&path, &result.resolution.version)
            .with_context(|| format!("Failed to write step output to {}", path.display()))?;
    }

    Ok(result)
}
