//! Drives one submission from form snapshot to a single visible outcome.

use std::{mem, sync::Arc, time::Duration};

use shared::domain::{CycleToken, GenerationRequest};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    navigator::StepNavigator,
    presentation::{PresentationEvent, PresentationState, TerminalAction},
    presenter::Presenter,
    transport::QrApi,
    types::{Artifact, GenerationResult},
};

pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(5000);
pub const DEFAULT_SUCCESS_ALERT_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub reveal_delay: Duration,
    pub success_alert_duration: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            reveal_delay: DEFAULT_REVEAL_DELAY,
            success_alert_duration: DEFAULT_SUCCESS_ALERT_DURATION,
        }
    }
}

#[derive(Default)]
struct CoordinatorState {
    token: CycleToken,
    presentation: PresentationState,
    request: Option<Arc<GenerationRequest>>,
    delay_task: Option<JoinHandle<()>>,
    alert_task: Option<JoinHandle<()>>,
    steps_task: Option<JoinHandle<()>>,
    artifact: Option<Artifact>,
}

pub struct GenerationCoordinator {
    api: Arc<dyn QrApi>,
    presenter: Arc<dyn Presenter>,
    navigator: Arc<StepNavigator>,
    config: CoordinatorConfig,
    inner: Mutex<CoordinatorState>,
}

impl GenerationCoordinator {
    pub fn new(
        api: Arc<dyn QrApi>,
        presenter: Arc<dyn Presenter>,
        navigator: Arc<StepNavigator>,
        config: CoordinatorConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            api,
            presenter,
            navigator,
            config,
            inner: Mutex::new(CoordinatorState::default()),
        })
    }

    /// Starts a new cycle, superseding whatever the previous one was doing.
    /// The outcome is delivered through the presenter.
    pub async fn submit(self: &Arc<Self>, request: GenerationRequest) -> CycleToken {
        let request = Arc::new(request);
        let mut guard = self.inner.lock().await;

        guard.token = guard.token.next();
        let token = guard.token;
        if let Some(task) = guard.delay_task.take() {
            task.abort();
        }
        if let Some(task) = guard.alert_task.take() {
            task.abort();
        }
        if let Some(task) = guard.steps_task.take() {
            task.abort();
        }
        guard.presentation = PresentationState::AwaitingBoth;
        guard.request = Some(Arc::clone(&request));
        guard.artifact = None;

        self.presenter.begin_cycle(token);
        self.presenter.set_loading(true);
        info!(
            cycle = %token,
            ecl = %request.ecl,
            version = %request.version,
            "submission started"
        );

        let coordinator = Arc::clone(self);
        let delay = self.config.reveal_delay;
        guard.delay_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            coordinator
                .handle_event(token, PresentationEvent::DelayElapsed)
                .await;
        }));
        drop(guard);

        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let result = GenerationResult::from(coordinator.api.generate(&request).await);
            coordinator
                .handle_event(token, PresentationEvent::ResultArrived(result))
                .await;
        });

        token
    }

    /// The user closed the reveal presentation early. Cancels the pending
    /// delay so the result is shown as soon as it is available.
    pub async fn dismiss_reveal(self: &Arc<Self>) {
        let mut guard = self.inner.lock().await;
        if !guard.presentation.is_waiting_for_delay() {
            return;
        }
        if let Some(task) = guard.delay_task.take() {
            task.abort();
        }
        let token = guard.token;
        debug!(cycle = %token, "reveal dismissed early");
        self.apply_locked(&mut guard, token, PresentationEvent::Dismissed);
    }

    pub async fn current_token(&self) -> CycleToken {
        self.inner.lock().await.token
    }

    pub async fn presentation(&self) -> PresentationState {
        self.inner.lock().await.presentation.clone()
    }

    /// Artifact displayed by the current cycle, if it resolved successfully.
    pub async fn current_artifact(&self) -> Option<Artifact> {
        self.inner.lock().await.artifact.clone()
    }

    async fn handle_event(self: &Arc<Self>, token: CycleToken, event: PresentationEvent) {
        let mut guard = self.inner.lock().await;
        if guard.token != token {
            debug!(cycle = %token, current = %guard.token, "discarding stale completion");
            return;
        }
        self.apply_locked(&mut guard, token, event);
    }

    fn apply_locked(
        self: &Arc<Self>,
        state: &mut CoordinatorState,
        token: CycleToken,
        event: PresentationEvent,
    ) {
        match &event {
            PresentationEvent::DelayElapsed | PresentationEvent::Dismissed => {
                state.delay_task = None;
                self.presenter.close_reveal();
            }
            PresentationEvent::ResultArrived(result) => {
                debug!(cycle = %token, success = result.is_success(), "generation settled");
                self.presenter.set_loading(false);
            }
        }

        let current = mem::take(&mut state.presentation);
        let (next, action) = current.apply(event);
        state.presentation = next;

        if let Some(action) = action {
            self.perform(state, token, action);
        }
    }

    fn perform(
        self: &Arc<Self>,
        state: &mut CoordinatorState,
        token: CycleToken,
        action: TerminalAction,
    ) {
        let Some(request) = state.request.clone() else {
            warn!(cycle = %token, "terminal action without a captured request");
            return;
        };

        match action {
            TerminalAction::DisplayArtifact(artifact) => {
                info!(
                    cycle = %token,
                    url = %artifact.url,
                    version = ?artifact.version,
                    "displaying artifact"
                );
                self.presenter.display_artifact(&artifact, request.size);
                self.presenter.show_success_alert();
                state.artifact = Some(artifact);
                state.alert_task = Some(self.spawn_alert_timeout(token));

                if request.show_steps {
                    let navigator = Arc::clone(&self.navigator);
                    state.steps_task = Some(tokio::spawn(async move {
                        navigator
                            .fetch_and_show(&request.content, request.ecl, request.version)
                            .await;
                    }));
                }
            }
            TerminalAction::ReportFailure(failure) => {
                warn!(cycle = %token, failure = ?failure, "generation failed");
                self.presenter.show_error(&failure.user_message());
            }
        }
    }

    fn spawn_alert_timeout(self: &Arc<Self>, token: CycleToken) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        let duration = self.config.success_alert_duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut guard = coordinator.inner.lock().await;
            if guard.token == token {
                guard.alert_task = None;
                coordinator.presenter.hide_success_alert();
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
