//! Multi-step application state machine.

pub mod overlay;
mod runner;

pub use runner::{ApplicationRunner, FORWARD_CONTROLS, SUBMIT_LABEL};

use crate::error::FailureClass;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbandonReason {
    NoApplyButton,
    StepLimitExceeded,
    NoForwardControl,
    UploadFailed,
}

impl fmt::Display for AbandonReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AbandonReason::NoApplyButton => "no apply button",
            AbandonReason::StepLimitExceeded => "step limit exceeded",
            AbandonReason::NoForwardControl => "no forward control",
            AbandonReason::UploadFailed => "upload failed",
        };
        f.write_str(label)
    }
}

/// Terminal result of one application attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApplicationOutcome {
    Submitted { title: String },
    Abandoned { reason: AbandonReason },
    Error { cause: String, class: FailureClass },
}

impl ApplicationOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, ApplicationOutcome::Submitted { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationState {
    Idle,
    Applying,
    /// 1-based iteration of the step loop.
    StepLoop { iteration: usize },
    Submitted,
    Abandoned,
    Error,
}

impl ApplicationState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationState::Submitted | ApplicationState::Abandoned | ApplicationState::Error
        )
    }
}
