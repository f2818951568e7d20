use shared::domain::CycleToken;

use crate::types::{Artifact, StepView};

/// Display seam between the controllers and whatever renders them.
///
/// Calls happen while the caller holds its own state lock, so
/// implementations must not call back into the coordinator or navigator.
pub trait Presenter: Send + Sync {
    /// Hide the previous artifact and its download/share actions, clear
    /// alerts, then show the loading indicator and the reveal presentation.
    fn begin_cycle(&self, token: CycleToken);
    fn close_reveal(&self);
    fn set_loading(&self, visible: bool);
    fn display_artifact(&self, artifact: &Artifact, display_size: u32);
    fn show_success_alert(&self);
    fn hide_success_alert(&self);
    fn show_error(&self, message: &str);

    fn open_step_viewer(&self);
    fn close_step_viewer(&self);
    fn show_step(&self, view: StepView<'_>);
    fn report_step_error(&self, message: &str);

    fn confirm_link_copied(&self, url: &str);
}
