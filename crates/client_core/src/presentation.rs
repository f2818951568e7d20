//! Reconciles the decorative reveal delay with the generation call.
//!
//! Each submission cycle owns one [`PresentationState`]. The two async
//! completions (delay and generation result) are fed in as
//! [`PresentationEvent`]s in whatever order they happen; whichever arrives
//! second produces the single [`TerminalAction`] for the cycle.

use shared::error::ClientFailure;

use crate::types::{Artifact, GenerationResult};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PresentationState {
    #[default]
    Idle,
    AwaitingBoth,
    DelayElapsedAwaitingResult,
    ResultReadyAwaitingDelay(GenerationResult),
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationEvent {
    DelayElapsed,
    /// The user closed the reveal presentation early. Same gate as
    /// [`PresentationEvent::DelayElapsed`].
    Dismissed,
    ResultArrived(GenerationResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalAction {
    DisplayArtifact(Artifact),
    ReportFailure(ClientFailure),
}

impl From<GenerationResult> for TerminalAction {
    fn from(result: GenerationResult) -> Self {
        match result {
            GenerationResult::Success(artifact) => Self::DisplayArtifact(artifact),
            GenerationResult::Failure { error_message } => {
                Self::ReportFailure(ClientFailure::application(error_message))
            }
            GenerationResult::NetworkError { detail } => {
                Self::ReportFailure(ClientFailure::NetworkError { detail })
            }
        }
    }
}

impl PresentationState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }

    pub fn is_waiting_for_delay(&self) -> bool {
        matches!(self, Self::AwaitingBoth | Self::ResultReadyAwaitingDelay(_))
    }

    /// Advances the machine. Returns the next state and, at most once per
    /// cycle, the terminal action to perform.
    pub fn apply(self, event: PresentationEvent) -> (Self, Option<TerminalAction>) {
        use PresentationEvent as E;

        match (self, event) {
            (Self::AwaitingBoth, E::DelayElapsed | E::Dismissed) => {
                (Self::DelayElapsedAwaitingResult, None)
            }
            (Self::AwaitingBoth, E::ResultArrived(result)) => {
                (Self::ResultReadyAwaitingDelay(result), None)
            }
            (Self::DelayElapsedAwaitingResult, E::ResultArrived(result)) => {
                (Self::Resolved, Some(result.into()))
            }
            (Self::ResultReadyAwaitingDelay(stored), E::DelayElapsed | E::Dismissed) => {
                (Self::Resolved, Some(stored.into()))
            }
            // Duplicate completions leave the machine where it is.
            (state @ Self::DelayElapsedAwaitingResult, E::DelayElapsed | E::Dismissed) => {
                (state, None)
            }
            (state @ Self::ResultReadyAwaitingDelay(_), E::ResultArrived(_)) => (state, None),
            (Self::Resolved, _) => (Self::Resolved, None),
            (Self::Idle, _) => (Self::Idle, None),
        }
    }
}
