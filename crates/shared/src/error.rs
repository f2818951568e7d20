use thiserror::Error;

pub const GENERATION_FALLBACK_MESSAGE: &str = "Error generating QR code, please try again.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error, please check your connection and try again.";

/// Failures surfaced by the generator client. None of them escape the
/// presentation layer; each is turned into an alert or a log line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientFailure {
    /// The server processed the request and reported a semantic failure.
    #[error("{}", .message.as_deref().unwrap_or(GENERATION_FALLBACK_MESSAGE))]
    ApplicationFailure { message: Option<String> },
    /// The request never produced a readable response.
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    NetworkError { detail: String },
    /// The platform share action was rejected.
    #[error("share failed: {detail}")]
    ShareFailure { detail: String },
}

impl ClientFailure {
    pub fn application(message: Option<String>) -> Self {
        Self::ApplicationFailure {
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    pub fn network(detail: impl ToString) -> Self {
        Self::NetworkError {
            detail: detail.to_string(),
        }
    }

    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkError { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter content")]
    EmptyContent,
    #[error("unknown error correction level '{0}' (expected L, M, Q or H)")]
    UnknownErrorCorrectionLevel(String),
    #[error("version must be 1-40 or auto, got '{0}'")]
    VersionOutOfRange(String),
    #[error("unknown module shape '{0}'")]
    UnknownModuleShape(String),
    #[error("unknown image filter '{0}'")]
    UnknownFilter(String),
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_failure_prefers_server_message() {
        let failure = ClientFailure::application(Some("content too long".into()));
        assert_eq!(failure.user_message(), "content too long");
    }

    #[test]
    fn application_failure_falls_back_on_blank_message() {
        let failure = ClientFailure::application(Some("   ".into()));
        assert_eq!(failure.user_message(), GENERATION_FALLBACK_MESSAGE);
        assert_eq!(
            ClientFailure::application(None).user_message(),
            GENERATION_FALLBACK_MESSAGE
        );
    }

    #[test]
    fn network_error_hides_transport_detail_from_user() {
        let failure = ClientFailure::network("connection refused");
        assert!(failure.is_network());
        assert_eq!(failure.user_message(), NETWORK_ERROR_MESSAGE);
    }
}
