use crate::error::GenerateError;

/// A generated QR image as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Server-relative download path, e.g. `/static/generated/qrcode_1.png`.
    pub url: String,
    /// Embeddable image data (`data:image/png;base64,...`).
    pub data: String,
    /// Version the server actually used; resolves `auto` to a number.
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success(Artifact),
    Failure { error_message: Option<String> },
    NetworkError { detail: String },
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<Result<Artifact, GenerateError>> for GenerationResult {
    fn from(value: Result<Artifact, GenerateError>) -> Self {
        match value {
            Ok(artifact) => Self::Success(artifact),
            Err(GenerateError::Network(detail)) => Self::NetworkError { detail },
            Err(GenerateError::Application(error_message)) => Self::Failure { error_message },
        }
    }
}

/// One snapshot of the encoding algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFrame {
    pub image: String,
    /// Rich text; holds exactly one `<h3>` title element.
    pub description: String,
}

/// Everything a front end needs to render the step viewer at one position.
#[derive(Debug, Clone, Copy)]
pub struct StepView<'a> {
    pub index: usize,
    pub total: usize,
    pub frame: &'a StepFrame,
}

impl StepView<'_> {
    pub fn indicator(&self) -> String {
        format!("Step {}/{}", self.index + 1, self.total)
    }

    pub fn can_go_previous(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.index + 1 < self.total
    }
}
