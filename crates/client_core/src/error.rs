use shared::error::{ClientFailure, GENERATION_FALLBACK_MESSAGE, NETWORK_ERROR_MESSAGE};
use thiserror::Error;

/// Why a `/generate` call produced no artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("{}", .0.as_deref().unwrap_or(GENERATION_FALLBACK_MESSAGE))]
    Application(Option<String>),
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network(String),
}

impl GenerateError {
    /// Blank server messages fall back to the generic text.
    pub fn application(message: Option<String>) -> Self {
        Self::Application(message.filter(|m| !m.trim().is_empty()))
    }

    pub fn network(detail: impl ToString) -> Self {
        Self::Network(detail.to_string())
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<GenerateError> for ClientFailure {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::Application(message) => Self::ApplicationFailure { message },
            GenerateError::Network(detail) => Self::NetworkError { detail },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepFetchError {
    #[error("Failed to get QR code creation steps: {}", .0.as_deref().unwrap_or("unknown error"))]
    Application(Option<String>),
    #[error("Error while getting QR code creation steps: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("artifact url '{url}' cannot be resolved against '{base}': {source}")]
    InvalidUrl {
        base: String,
        url: String,
        source: url::ParseError,
    },
    #[error("platform share rejected: {0}")]
    Platform(anyhow::Error),
    #[error("clipboard unavailable: {0}")]
    Clipboard(anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_errors_keep_their_user_message() {
        let app = GenerateError::application(Some("  ".into()));
        assert_eq!(app, GenerateError::Application(None));
        assert_eq!(app.to_string(), GENERATION_FALLBACK_MESSAGE);
        assert_eq!(
            ClientFailure::from(GenerateError::application(Some("too long".into()))),
            ClientFailure::ApplicationFailure {
                message: Some("too long".into())
            }
        );

        let net = GenerateError::network("reset");
        assert!(net.is_network());
        assert_eq!(net.to_string(), NETWORK_ERROR_MESSAGE);
        assert!(ClientFailure::from(net).is_network());
    }
}
