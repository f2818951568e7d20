//! Share action for a displayed artifact.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use shared::error::ClientFailure;
use tracing::{info, warn};
use url::Url;

use crate::{error::ShareError, presenter::Presenter, types::Artifact};

pub const SHARE_TITLE: &str = "My QR Code";
pub const SHARE_TEXT: &str = "Check out my generated QR code";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

/// Native share sheet, when the platform has one.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    async fn share(&self, payload: &SharePayload) -> Result<()>;
}

pub trait ClipboardSink: Send + Sync {
    fn copy_text(&self, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared { url: String },
    CopiedToClipboard { url: String },
    /// Logged and otherwise ignored.
    Failed(ClientFailure),
}

pub struct ShareAction {
    server_url: String,
    target: Option<Arc<dyn ShareTarget>>,
    clipboard: Arc<dyn ClipboardSink>,
    presenter: Arc<dyn Presenter>,
}

impl ShareAction {
    pub fn new(
        server_url: impl Into<String>,
        target: Option<Arc<dyn ShareTarget>>,
        clipboard: Arc<dyn ClipboardSink>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            target,
            clipboard,
            presenter,
        }
    }

    pub async fn share(&self, artifact: &Artifact) -> ShareOutcome {
        match self.try_share(artifact).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "share failed");
                ShareOutcome::Failed(ClientFailure::ShareFailure {
                    detail: err.to_string(),
                })
            }
        }
    }

    async fn try_share(&self, artifact: &Artifact) -> Result<ShareOutcome, ShareError> {
        let url = absolute_artifact_url(&self.server_url, &artifact.url)?;

        if let Some(target) = &self.target {
            let payload = SharePayload {
                title: SHARE_TITLE.to_string(),
                text: SHARE_TEXT.to_string(),
                url: url.clone(),
            };
            target.share(&payload).await.map_err(ShareError::Platform)?;
            info!(%url, "artifact shared");
            return Ok(ShareOutcome::Shared { url });
        }

        self.clipboard
            .copy_text(&url)
            .map_err(ShareError::Clipboard)?;
        self.presenter.confirm_link_copied(&url);
        info!(%url, "artifact link copied to clipboard");
        Ok(ShareOutcome::CopiedToClipboard { url })
    }
}

/// Resolves a server-relative artifact path against the server's origin.
pub fn absolute_artifact_url(server_url: &str, artifact_url: &str) -> Result<String, ShareError> {
    let invalid = |source| ShareError::InvalidUrl {
        base: server_url.to_string(),
        url: artifact_url.to_string(),
        source,
    };
    let base = Url::parse(server_url).map_err(invalid)?;
    let joined = base.join(artifact_url).map_err(invalid)?;
    Ok(joined.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use anyhow::anyhow;
    use shared::domain::CycleToken;

    use crate::types::StepView;

    #[derive(Default)]
    struct RecordingClipboard {
        copied: Mutex<Vec<String>>,
        fail: bool,
    }

    impl ClipboardSink for RecordingClipboard {
        fn copy_text(&self, text: &str) -> Result<()> {
            if self.fail {
                return Err(anyhow!("no display"));
            }
            self.copied.lock().expect("lock").push(text.to_string());
            Ok(())
        }
    }

    struct RejectingTarget;

    #[async_trait]
    impl ShareTarget for RejectingTarget {
        async fn share(&self, _payload: &SharePayload) -> Result<()> {
            Err(anyhow!("user cancelled"))
        }
    }

    struct AcceptingTarget {
        seen: Mutex<Option<SharePayload>>,
    }

    #[async_trait]
    impl ShareTarget for AcceptingTarget {
        async fn share(&self, payload: &SharePayload) -> Result<()> {
            *self.seen.lock().expect("lock") = Some(payload.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct ConfirmOnly {
        confirmed: Mutex<Vec<String>>,
    }

    impl Presenter for ConfirmOnly {
        fn begin_cycle(&self, _token: CycleToken) {}
        fn close_reveal(&self) {}
        fn set_loading(&self, _visible: bool) {}
        fn display_artifact(&self, _artifact: &Artifact, _display_size: u32) {}
        fn show_success_alert(&self) {}
        fn hide_success_alert(&self) {}
        fn show_error(&self, _message: &str) {}
        fn open_step_viewer(&self) {}
        fn close_step_viewer(&self) {}
        fn show_step(&self, _view: StepView<'_>) {}
        fn report_step_error(&self, _message: &str) {}
        fn confirm_link_copied(&self, url: &str) {
            self.confirmed.lock().expect("lock").push(url.to_string());
        }
    }

    fn artifact() -> Artifact {
        Artifact {
            url: "/static/generated/qrcode_17.png".into(),
            data: "data:image/png;base64,AA==".into(),
            version: Some("1".into()),
        }
    }

    #[test]
    fn absolute_url_uses_server_origin() {
        assert_eq!(
            absolute_artifact_url("http://localhost:5002", "/static/generated/a.png")
                .expect("url"),
            "http://localhost:5002/static/generated/a.png"
        );
        assert_eq!(
            absolute_artifact_url("https://qr.example.org/app/", "/static/a.png").expect("url"),
            "https://qr.example.org/static/a.png"
        );
        assert!(absolute_artifact_url("not a url", "/static/a.png").is_err());
    }

    #[tokio::test]
    async fn falls_back_to_clipboard_and_confirms() {
        let clipboard = Arc::new(RecordingClipboard::default());
        let presenter = Arc::new(ConfirmOnly::default());
        let action = ShareAction::new(
            "http://localhost:5002",
            None,
            clipboard.clone(),
            presenter.clone(),
        );

        let outcome = action.share(&artifact()).await;
        let expected = "http://localhost:5002/static/generated/qrcode_17.png".to_string();
        assert_eq!(
            outcome,
            ShareOutcome::CopiedToClipboard {
                url: expected.clone()
            }
        );
        assert_eq!(*clipboard.copied.lock().expect("lock"), vec![expected.clone()]);
        assert_eq!(*presenter.confirmed.lock().expect("lock"), vec![expected]);
    }

    #[tokio::test]
    async fn platform_share_gets_title_text_and_absolute_url() {
        let target = Arc::new(AcceptingTarget {
            seen: Mutex::new(None),
        });
        let clipboard = Arc::new(RecordingClipboard::default());
        let action = ShareAction::new(
            "http://localhost:5002",
            Some(target.clone()),
            clipboard.clone(),
            Arc::new(ConfirmOnly::default()),
        );

        assert!(matches!(
            action.share(&artifact()).await,
            ShareOutcome::Shared { .. }
        ));
        let seen = target.seen.lock().expect("lock").clone().expect("payload");
        assert_eq!(seen.title, SHARE_TITLE);
        assert_eq!(seen.text, SHARE_TEXT);
        assert_eq!(seen.url, "http://localhost:5002/static/generated/qrcode_17.png");
        assert!(clipboard.copied.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn rejected_platform_share_is_reported_not_raised() {
        let presenter = Arc::new(ConfirmOnly::default());
        let action = ShareAction::new(
            "http://localhost:5002",
            Some(Arc::new(RejectingTarget)),
            Arc::new(RecordingClipboard::default()),
            presenter.clone(),
        );

        let outcome = action.share(&artifact()).await;
        assert!(matches!(
            outcome,
            ShareOutcome::Failed(ClientFailure::ShareFailure { .. })
        ));
        assert!(presenter.confirmed.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn clipboard_failure_is_a_share_failure() {
        let action = ShareAction::new(
            "http://localhost:5002",
            None,
            Arc::new(RecordingClipboard {
                fail: true,
                ..RecordingClipboard::default()
            }),
            Arc::new(ConfirmOnly::default()),
        );
        assert!(matches!(
            action.share(&artifact()).await,
            ShareOutcome::Failed(_)
        ));
    }
}
