//! Workflow state machine.
//!
//! Pure transition table; the orchestrator feeds events in and records the
//! resulting states.

use std::fmt;

use serde::Serialize;

/// Stage of a single scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    Provisioning,
    Locating,
    Authenticating,
    Connecting,
    CleaningUp,
    Done,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Provisioning => "provisioning",
            Self::Locating => "locating",
            Self::Authenticating => "authenticating",
            Self::Connecting => "connecting",
            Self::CleaningUp => "cleaning up",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// Input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    Start,
    ResourceRunning,
    /// Terminal Error status, poll ceiling, or a failed create call.
    ProvisioningAborted,
    Found,
    NotFound,
    TokensIssued,
    IssuanceFailed,
    /// Connected, timed out or refused.
    ConnectionFinished,
    Cancelled,
    CleanupFinished,
}

impl FlowState {
    /// Apply `event`, returning the next state or `None` if the event is not
    /// valid in this state.
    #[must_use]
    pub fn next(self, event: FlowEvent) -> Option<Self> {
        use FlowEvent as E;
        use FlowState as S;

        match (self, event) {
            (S::Idle, E::Start) => Some(S::Provisioning),
            (S::Provisioning, E::ResourceRunning) => Some(S::Locating),
            (S::Provisioning, E::ProvisioningAborted) => Some(S::CleaningUp),
            (S::Locating, E::Found) => Some(S::Authenticating),
            (S::Locating, E::NotFound) => Some(S::CleaningUp),
            (S::Authenticating, E::TokensIssued) => Some(S::Connecting),
            (S::Authenticating, E::IssuanceFailed) => Some(S::CleaningUp),
            (S::Connecting, E::ConnectionFinished) => Some(S::CleaningUp),
            (S::Provisioning | S::Locating | S::Authenticating | S::Connecting, E::Cancelled) => {
                Some(S::CleaningUp)
            }
            (S::CleaningUp, E::CleanupFinished) => Some(S::Done),
            _ => None,
        }
    }
}
