//! Stage transition rules applied to an [`Application`].
//!
//! An application is `Active(i)` while `i < stages.len()`, `ApprovedFinal` once every stage
//! has approved, and `RejectedFinal` after a rejection or cancellation. Only the reopen
//! back-channel used by reconsideration moves an application out of a final state.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Application, HistoryAction, StageEvent, StageStatus};

pub const DEFAULT_REJECT_REASON: &str = "Rejected by authority";
pub const DEFAULT_CANCEL_REASON: &str = "Canceled by user";

/// Errors raised when a stage transition is not permitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("action not allowed; current stage belongs to {expected}")]
    StageMismatch { expected: String },
    #[error("application is canceled")]
    AlreadyCanceled,
    #[error("application has already passed every stage")]
    AlreadyApproved,
    #[error("unknown action '{0}'")]
    UnknownAction(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Active(usize),
    ApprovedFinal,
    RejectedFinal,
}

impl PipelineState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active(_) => "active",
            Self::ApprovedFinal => "approved",
            Self::RejectedFinal => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageAction {
    Approve,
    Reject,
    Cancel,
}

impl FromStr for StageAction {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            "cancel" => Ok(Self::Cancel),
            _ => Err(PipelineError::UnknownAction(value.to_string())),
        }
    }
}

/// A single actor's request to move the current stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommand {
    pub action: StageAction,
    pub organization: Option<String>,
    pub signer: Option<String>,
    pub reason: Option<String>,
}

impl StageCommand {
    pub fn approve(organization: impl Into<String>, signer: impl Into<String>) -> Self {
        Self {
            action: StageAction::Approve,
            organization: Some(organization.into()),
            signer: Some(signer.into()),
            reason: None,
        }
    }

    pub fn reject(
        organization: impl Into<String>,
        signer: impl Into<String>,
        reason: Option<String>,
    ) -> Self {
        Self {
            action: StageAction::Reject,
            organization: Some(organization.into()),
            signer: Some(signer.into()),
            reason,
        }
    }

    pub fn cancel(signer: Option<String>, reason: Option<String>) -> Self {
        Self {
            action: StageAction::Cancel,
            organization: None,
            signer,
            reason,
        }
    }
}

impl Application {
    pub fn state(&self) -> PipelineState {
        if self.canceled {
            PipelineState::RejectedFinal
        } else if self.current_stage_index >= self.stages.len() {
            PipelineState::ApprovedFinal
        } else {
            PipelineState::Active(self.current_stage_index)
        }
    }

    /// Index of the stage awaiting action, or why no stage can be acted on.
    pub fn open_stage(&self) -> Result<usize, PipelineError> {
        match self.state() {
            PipelineState::RejectedFinal => Err(PipelineError::AlreadyCanceled),
            PipelineState::ApprovedFinal => Err(PipelineError::AlreadyApproved),
            PipelineState::Active(index) => Ok(index),
        }
    }

    /// Applies `command` to the current stage. On error the application is left untouched.
    pub fn apply(
        &mut self,
        command: &StageCommand,
        at: DateTime<Utc>,
    ) -> Result<(), PipelineError> {
        let index = self.open_stage()?;

        // Cancellation is open to any actor; approve/reject require the stage's organization.
        if command.action != StageAction::Cancel {
            let expected = &self.stages[index].organization;
            if command.organization.as_deref().map(str::trim) != Some(expected.as_str()) {
                return Err(PipelineError::StageMismatch {
                    expected: expected.clone(),
                });
            }
        }

        match command.action {
            StageAction::Approve => {
                self.decide(
                    index,
                    StageStatus::Approved,
                    HistoryAction::Approve,
                    command,
                    None,
                    at,
                );
                self.current_stage_index = (index + 1).min(self.stages.len());
            }
            StageAction::Reject => {
                let reason = reason_or(command, DEFAULT_REJECT_REASON);
                self.decide(
                    index,
                    StageStatus::Rejected,
                    HistoryAction::Reject,
                    command,
                    Some(reason),
                    at,
                );
                self.canceled = true;
            }
            StageAction::Cancel => {
                let reason = reason_or(command, DEFAULT_CANCEL_REASON);
                self.decide(
                    index,
                    StageStatus::Rejected,
                    HistoryAction::Cancel,
                    command,
                    Some(reason),
                    at,
                );
                self.canceled = true;
            }
        }

        Ok(())
    }

    /// Reopens the most recently decided stage: clears the canceled flag, steps the index back
    /// by one (never below zero) and resets every stage from the new index onward to pending.
    /// Returns the stage index now awaiting action.
    pub fn reopen_previous_stage(
        &mut self,
        requested_by: Option<String>,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> usize {
        self.canceled = false;
        self.current_stage_index = self.current_stage_index.saturating_sub(1);

        for stage in self.stages.iter_mut().skip(self.current_stage_index) {
            stage.reset();
        }

        let index = self.current_stage_index;
        self.history.push(StageEvent {
            stage_index: index,
            organization: self.stages[index].organization.clone(),
            action: HistoryAction::Reopen,
            signed_by: requested_by,
            reason,
            at,
        });
        index
    }

    fn decide(
        &mut self,
        index: usize,
        status: StageStatus,
        action: HistoryAction,
        command: &StageCommand,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) {
        let signer = command.signer.clone();
        let stage = &mut self.stages[index];
        stage.decide(status, signer.clone(), reason.clone(), at);
        self.history.push(StageEvent {
            stage_index: index,
            organization: stage.organization.clone(),
            action,
            signed_by: signer,
            reason,
            at,
        });
    }
}

fn reason_or(command: &StageCommand, fallback: &str) -> String {
    command
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
