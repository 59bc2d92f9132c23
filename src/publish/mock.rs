use crate::domain::Version;
use crate::error::{AutoversionError, Result};
use crate::publish::Toolchain;
use std::sync::Mutex;

/// A pipeline step as observed by [`RecordingToolchain`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Build,
    Pack { version: Version, no_build: bool },
    Push,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepKind {
    Build,
    Pack,
    Push,
}

/// Toolchain that records the steps it is asked to run
///
/// A step configured to fail is still recorded, then returns its error.
pub struct RecordingToolchain {
    steps: Mutex<Vec<Step>>,
    failing: Option<StepKind>,
}

impl RecordingToolchain {
    pub fn new() -> Self {
        RecordingToolchain {
            steps: Mutex::new(Vec::new()),
            failing: None,
        }
    }

    pub fn failing_build() -> Self {
        Self::failing_at(StepKind::Build)
    }

    pub fn failing_pack() -> Self {
        Self::failing_at(StepKind::Pack)
    }

    pub fn failing_push() -> Self {
        Self::failing_at(StepKind::Push)
    }

    fn failing_at(kind: StepKind) -> Self {
        RecordingToolchain {
            steps: Mutex::new(Vec::new()),
            failing: Some(kind),
        }
    }

    /// Steps run so far, in order
    pub fn steps(&self) -> Vec<Step> {
        self.steps
            .lock()
            .map(|steps| steps.clone())
            .unwrap_or_default()
    }

    fn record(&self, step: Step, kind: StepKind) -> Result<()> {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push(step);
        }

        if self.failing != Some(kind) {
            return Ok(());
        }

        let reason = "simulated failure".to_string();
        Err(match kind {
            StepKind::Build => AutoversionError::BuildFailed(reason),
            StepKind::Pack => AutoversionError::PackFailed(reason),
            StepKind::Push => AutoversionError::PushFailed(reason),
        })
    }
}

impl Default for RecordingToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolchain for RecordingToolchain {
    fn build(&self) -> Result<()> {
        self.record(Step::Build, StepKind::Build)
    }

    fn pack(&self, version: &Version, no_build: bool) -> Result<()> {
        self.record(
            Step::Pack {
                version: *version,
                no_build,
            },
            StepKind::Pack,
        )
    }

    fn push(&self) -> Result<()> {
        self.record(Step::Push, StepKind::Push)
    }
}
