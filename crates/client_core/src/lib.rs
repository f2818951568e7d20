//! Client-side controller for the QR generator service.
//!
//! [`GenerationCoordinator`] races a fixed reveal delay against the
//! generation call and emits exactly one visible outcome per submission.
//! [`StepNavigator`] loads the encoder's construction frames and pages
//! through them. Rendering is left to a [`Presenter`] implementation.

pub mod coordinator;
pub mod error;
pub mod navigator;
pub mod presentation;
pub mod presenter;
pub mod share;
pub mod transport;
pub mod types;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use coordinator::{CoordinatorConfig, GenerationCoordinator};
pub use error::{GenerateError, ShareError, StepFetchError};
pub use navigator::{StepNavigator, STEP_TITLES};
pub use presentation::{PresentationEvent, PresentationState, TerminalAction};
pub use presenter::Presenter;
pub use share::{ClipboardSink, ShareAction, ShareOutcome, SharePayload, ShareTarget};
pub use transport::{HttpQrApi, QrApi};
pub use types::{Artifact, GenerationResult, StepFrame, StepView};
