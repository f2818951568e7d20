use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{ErrorCorrectionLevel, GenerationRequest, Version};

pub const GENERATE_PATH: &str = "/generate";
pub const STEPS_PATH: &str = "/get_qr_steps";

/// Form body posted to the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateForm {
    pub content: String,
    pub ecl: &'static str,
    pub version: String,
    pub unit_size: u8,
    pub margin: u8,
    pub border_size: u8,
    pub frame: bool,
    pub foreground_color: String,
    pub background_color: String,
    pub module_shape: &'static str,
    pub filter_name: &'static str,
    pub size: u32,
}

impl From<&GenerationRequest> for GenerateForm {
    fn from(request: &GenerationRequest) -> Self {
        let styling = &request.styling;
        Self {
            content: request.content.clone(),
            ecl: request.ecl.as_str(),
            version: request.version.form_value(),
            unit_size: styling.unit_size,
            margin: styling.margin,
            border_size: styling.border_size,
            frame: styling.frame,
            foreground_color: styling.foreground_color.clone(),
            background_color: styling.background_color.clone(),
            module_shape: styling.module_shape.as_str(),
            filter_name: styling.filter_name.as_str(),
            size: request.size,
        }
    }
}

/// Form body posted to the step-visualization endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepsForm {
    pub content: String,
    pub ecl: &'static str,
    pub version: String,
}

impl StepsForm {
    pub fn new(content: impl Into<String>, ecl: ErrorCorrectionLevel, version: Version) -> Self {
        Self {
            content: content.into(),
            ecl: ecl.as_str(),
            version: version.form_value(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// The server reports the version it used either as a number or a string.
    #[serde(
        default,
        deserialize_with = "lenient_version",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFrameBody {
    pub image: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepFrameBody>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn lenient_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    }))
}
