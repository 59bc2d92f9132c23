//! Command-line workflow

pub mod orchestration;

pub use orchestration::{run_autoversion, run_workflow, WorkflowResult};
