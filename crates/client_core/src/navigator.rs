//! Fetches construction-step frames and pages through them.

use std::sync::Arc;

use shared::{
    domain::{ErrorCorrectionLevel, Version},
    protocol::StepsForm,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    presenter::Presenter,
    transport::QrApi,
    types::{StepFrame, StepView},
};

pub const STEP_TITLES: [&str; 5] = [
    "Step 1: Add Finder Patterns and Separator",
    "Step 2: Add Alignment Patterns, Timing Patterns and Dark Module",
    "Step 3: Fill Data",
    "Step 4: Apply Best Mask",
    "Step 5: Add Format and Version Information",
];

const TITLE_OPEN: &str = "<h3>";
const TITLE_CLOSE: &str = "</h3>";

#[derive(Default)]
struct NavigatorState {
    frames: Vec<StepFrame>,
    cursor: Option<usize>,
    viewer_open: bool,
    latest_fetch: u64,
}

pub struct StepNavigator {
    api: Arc<dyn QrApi>,
    presenter: Arc<dyn Presenter>,
    inner: Mutex<NavigatorState>,
}

impl StepNavigator {
    pub fn new(api: Arc<dyn QrApi>, presenter: Arc<dyn Presenter>) -> Arc<Self> {
        Arc::new(Self {
            api,
            presenter,
            inner: Mutex::new(NavigatorState::default()),
        })
    }

    /// Loads a fresh frame sequence and opens the viewer on its first frame.
    /// On failure the previous frames and cursor stay as they were.
    pub async fn fetch_and_show(&self, content: &str, ecl: ErrorCorrectionLevel, version: Version) {
        let fetch_id = {
            let mut guard = self.inner.lock().await;
            guard.latest_fetch += 1;
            guard.latest_fetch
        };

        self.presenter.set_loading(true);
        let form = StepsForm::new(content, ecl, version);
        let result = self.api.fetch_steps(&form).await;

        let mut guard = self.inner.lock().await;
        if guard.latest_fetch != fetch_id {
            debug!(fetch_id, latest = guard.latest_fetch, "dropping superseded steps response");
            return;
        }
        self.presenter.set_loading(false);

        let mut frames = match result {
            Ok(frames) => frames,
            Err(err) => {
                warn!(error = %err, "steps fetch failed");
                self.presenter.report_step_error(&err.to_string());
                return;
            }
        };

        apply_canonical_titles(&mut frames);
        info!(total = frames.len(), "construction steps loaded");
        guard.frames = frames;
        guard.cursor = None;
        guard.viewer_open = true;
        self.presenter.open_step_viewer();
        if self.show_locked(&mut guard, 0).is_none() {
            warn!("steps response contained no frames");
        }
    }

    /// Shows the frame at `index`, clamped into the loaded sequence. Returns
    /// the index actually shown, or `None` when nothing is loaded.
    pub async fn show(&self, index: i64) -> Option<usize> {
        let mut guard = self.inner.lock().await;
        self.show_locked(&mut guard, index)
    }

    pub async fn next(&self) -> Option<usize> {
        let mut guard = self.inner.lock().await;
        let target = guard.cursor? as i64 + 1;
        self.show_locked(&mut guard, target)
    }

    pub async fn previous(&self) -> Option<usize> {
        let mut guard = self.inner.lock().await;
        let target = guard.cursor? as i64 - 1;
        self.show_locked(&mut guard, target)
    }

    /// Hides the viewer; frames and cursor are kept.
    pub async fn close(&self) {
        let mut guard = self.inner.lock().await;
        if guard.viewer_open {
            guard.viewer_open = false;
            self.presenter.close_step_viewer();
        }
    }

    /// Reopens the viewer at the remembered cursor.
    pub async fn reopen(&self) -> Option<usize> {
        let mut guard = self.inner.lock().await;
        let cursor = guard.cursor?;
        guard.viewer_open = true;
        self.presenter.open_step_viewer();
        self.show_locked(&mut guard, cursor as i64)
    }

    pub async fn cursor(&self) -> Option<usize> {
        self.inner.lock().await.cursor
    }

    pub async fn frame_count(&self) -> usize {
        self.inner.lock().await.frames.len()
    }

    pub async fn is_open(&self) -> bool {
        self.inner.lock().await.viewer_open
    }

    fn show_locked(&self, state: &mut NavigatorState, index: i64) -> Option<usize> {
        let last = state.frames.len().checked_sub(1)?;
        let index = index.clamp(0, last as i64) as usize;
        state.cursor = Some(index);
        self.presenter.show_step(StepView {
            index,
            total: state.frames.len(),
            frame: &state.frames[index],
        });
        Some(index)
    }
}

/// Replaces the title element of the first `STEP_TITLES.len()` frames.
/// Frames past the known titles keep the server's title.
pub fn apply_canonical_titles(frames: &mut [StepFrame]) {
    for (frame, title) in frames.iter_mut().zip(STEP_TITLES) {
        frame.description = replace_title(&frame.description, title);
    }
}

fn replace_title(description: &str, title: &str) -> String {
    let Some(open) = description.find(TITLE_OPEN) else {
        return description.to_string();
    };
    let body = open + TITLE_OPEN.len();
    let Some(close) = description[body..].find(TITLE_CLOSE) else {
        return description.to_string();
    };
    let rest = body + close + TITLE_CLOSE.len();
    format!(
        "{}{TITLE_OPEN}{title}{TITLE_CLOSE}{}",
        &description[..open],
        &description[rest..]
    )
}

#[cfg(test)]
#[path = "tests/navigator_tests.rs"]
mod tests;
