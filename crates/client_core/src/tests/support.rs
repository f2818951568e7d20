//! Scripted fakes shared by the controller test suites.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{CycleToken, GenerationRequest},
    protocol::StepsForm,
};
use tokio::time::Instant;

use crate::{
    error::{GenerateError, StepFetchError},
    presenter::Presenter,
    transport::QrApi,
    types::{Artifact, StepFrame, StepView},
};

pub struct GenerateScript {
    pub after: Duration,
    pub outcome: Result<Artifact, GenerateError>,
}

pub struct StepsScript {
    pub after: Duration,
    pub outcome: Result<Vec<StepFrame>, StepFetchError>,
}

#[derive(Default)]
pub struct ScriptedApi {
    generate: Mutex<VecDeque<GenerateScript>>,
    steps: Mutex<VecDeque<StepsScript>>,
    pub generate_calls: Mutex<Vec<String>>,
    pub steps_calls: Mutex<Vec<StepsForm>>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_generate(&self, after_ms: u64, outcome: Result<Artifact, GenerateError>) {
        self.generate.lock().expect("lock").push_back(GenerateScript {
            after: Duration::from_millis(after_ms),
            outcome,
        });
    }

    pub fn push_steps(&self, after_ms: u64, outcome: Result<Vec<StepFrame>, StepFetchError>) {
        self.steps.lock().expect("lock").push_back(StepsScript {
            after: Duration::from_millis(after_ms),
            outcome,
        });
    }

    pub fn steps_calls(&self) -> Vec<StepsForm> {
        self.steps_calls.lock().expect("lock").clone()
    }
}

#[async_trait]
impl QrApi for ScriptedApi {
    async fn generate(&self, request: &GenerationRequest) -> Result<Artifact, GenerateError> {
        self.generate_calls
            .lock()
            .expect("lock")
            .push(request.content.clone());
        let script = self
            .generate
            .lock()
            .expect("lock")
            .pop_front()
            .expect("unscripted generate call");
        tokio::time::sleep(script.after).await;
        script.outcome
    }

    async fn fetch_steps(&self, form: &StepsForm) -> Result<Vec<StepFrame>, StepFetchError> {
        self.steps_calls.lock().expect("lock").push(form.clone());
        let script = self
            .steps
            .lock()
            .expect("lock")
            .pop_front()
            .expect("unscripted steps call");
        tokio::time::sleep(script.after).await;
        script.outcome
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    BeginCycle(CycleToken),
    CloseReveal,
    Loading(bool),
    DisplayArtifact { url: String, size: u32 },
    SuccessShown,
    SuccessHidden,
    Error(String),
    StepViewerOpened,
    StepViewerClosed,
    Step {
        indicator: String,
        index: usize,
        can_previous: bool,
        can_next: bool,
        description: String,
    },
    StepError(String),
    LinkCopied(String),
}

impl Call {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::DisplayArtifact { .. } | Self::Error(_))
    }
}

pub struct RecordingPresenter {
    start: Instant,
    calls: Mutex<Vec<(Duration, Call)>>,
}

impl RecordingPresenter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            start: Instant::now(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn record(&self, call: Call) {
        let at = self.start.elapsed();
        self.calls.lock().expect("lock").push((at, call));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .expect("lock")
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    /// Terminal display actions with the time they fired.
    pub fn terminal(&self) -> Vec<(Duration, Call)> {
        self.calls
            .lock()
            .expect("lock")
            .iter()
            .filter(|(_, call)| call.is_terminal())
            .cloned()
            .collect()
    }

    pub fn steps_shown(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Step { .. }))
            .collect()
    }

    pub fn last_step(&self) -> Option<Call> {
        self.steps_shown().pop()
    }
}

impl Presenter for RecordingPresenter {
    fn begin_cycle(&self, token: CycleToken) {
        self.record(Call::BeginCycle(token));
    }

    fn close_reveal(&self) {
        self.record(Call::CloseReveal);
    }

    fn set_loading(&self, visible: bool) {
        self.record(Call::Loading(visible));
    }

    fn display_artifact(&self, artifact: &Artifact, display_size: u32) {
        self.record(Call::DisplayArtifact {
            url: artifact.url.clone(),
            size: display_size,
        });
    }

    fn show_success_alert(&self) {
        self.record(Call::SuccessShown);
    }

    fn hide_success_alert(&self) {
        self.record(Call::SuccessHidden);
    }

    fn show_error(&self, message: &str) {
        self.record(Call::Error(message.to_string()));
    }

    fn open_step_viewer(&self) {
        self.record(Call::StepViewerOpened);
    }

    fn close_step_viewer(&self) {
        self.record(Call::StepViewerClosed);
    }

    fn show_step(&self, view: StepView<'_>) {
        self.record(Call::Step {
            indicator: view.indicator(),
            index: view.index,
            can_previous: view.can_go_previous(),
            can_next: view.can_go_next(),
            description: view.frame.description.clone(),
        });
    }

    fn report_step_error(&self, message: &str) {
        self.record(Call::StepError(message.to_string()));
    }

    fn confirm_link_copied(&self, url: &str) {
        self.record(Call::LinkCopied(url.to_string()));
    }
}

pub fn artifact(name: &str) -> Artifact {
    Artifact {
        url: format!("/static/generated/{name}.png"),
        data: "data:image/png;base64,iVBORw0KGgo=".into(),
        version: Some("2".into()),
    }
}

pub fn frames(count: usize) -> Vec<StepFrame> {
    (0..count)
        .map(|i| StepFrame {
            image: format!("data:image/png;base64,frame{i}"),
            description: format!("<h3>server title {i}</h3><p>detail {i}</p>"),
        })
        .collect()
}

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Paused-clock timestamps land on the scheduled tick; allow one tick of slack.
pub fn assert_at(actual: Duration, expected_ms: u64) {
    let expected = ms(expected_ms);
    let slack = ms(1);
    assert!(
        actual + slack >= expected && actual <= expected + slack,
        "expected action at {expected:?}, fired at {actual:?}"
    );
}
