//! User-facing status output.
//!
//! Everything here goes to stderr so stdout carries only the resolved
//! version.

use console::style;

use crate::notice::ResolutionNotice;
use crate::publish::PublishOutcome;
use crate::resolver::Resolution;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().for_stderr(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green().for_stderr(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow().for_stderr(), message);
}

/// Print a non-fatal notice.
pub fn display_notice(notice: &ResolutionNotice) {
    eprintln!("{} {}", style("!").yellow().bold().for_stderr(), notice);
}

/// One-line summary of a resolution, e.g. `1.2.4 (patch increment over feed version 1.2.3)`.
pub fn format_resolution(resolution: &Resolution) -> String {
    format!("{} ({})", resolution.version, resolution.source)
}

pub fn format_outcome(outcome: PublishOutcome) -> &'static str {
    match outcome {
        PublishOutcome::Published => "Package built, packed and pushed",
        PublishOutcome::Skipped => "Skipping packing and publishing as per configuration",
    }
}

/// Print the notices and summary of a finished run.
pub fn display_resolution(resolution: &Resolution) {
    for notice in &resolution.notices {
        display_notice(notice);
    }
    display_success(&format!(
        "Resolved version {}",
        style(format_resolution(resolution)).bold().for_stderr()
    ));
}
