use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! token_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

token_newtype!(CycleToken);

impl CycleToken {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

pub const MAX_VERSION: u8 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    #[default]
    L,
    M,
    Q,
    H,
}

impl ErrorCorrectionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        }
    }
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            _ => Err(ValidationError::UnknownErrorCorrectionLevel(raw.to_string())),
        }
    }
}

/// Symbol version requested from the generator. `Auto` lets the server pick
/// the smallest version that fits the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Version {
    #[default]
    Auto,
    Fixed(u8),
}

impl Version {
    pub fn form_value(self) -> String {
        match self {
            Self::Auto => "auto".to_string(),
            Self::Fixed(v) => v.to_string(),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.form_value())
    }
}

impl FromStr for Version {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("auto") || raw == "0" {
            return Ok(Self::Auto);
        }
        match raw.parse::<u8>() {
            Ok(v) if (1..=MAX_VERSION).contains(&v) => Ok(Self::Fixed(v)),
            _ => Err(ValidationError::VersionOutOfRange(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleShape {
    #[default]
    Square,
    Circle,
    Diamond,
}

impl ModuleShape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Circle => "circle",
            Self::Diamond => "diamond",
        }
    }
}

impl FromStr for ModuleShape {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "circle" => Ok(Self::Circle),
            "diamond" => Ok(Self::Diamond),
            _ => Err(ValidationError::UnknownModuleShape(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFilter {
    #[default]
    None,
    Blur,
    EdgeEnhance,
    Smooth,
}

impl ImageFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Blur => "blur",
            Self::EdgeEnhance => "edge_enhance",
            Self::Smooth => "smooth",
        }
    }
}

impl FromStr for ImageFilter {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "blur" => Ok(Self::Blur),
            "edge_enhance" => Ok(Self::EdgeEnhance),
            "smooth" => Ok(Self::Smooth),
            _ => Err(ValidationError::UnknownFilter(raw.to_string())),
        }
    }
}

/// Rendering options forwarded verbatim to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylingOptions {
    pub unit_size: u8,
    pub margin: u8,
    pub border_size: u8,
    pub frame: bool,
    pub foreground_color: String,
    pub background_color: String,
    pub module_shape: ModuleShape,
    pub filter_name: ImageFilter,
}

impl Default for StylingOptions {
    fn default() -> Self {
        Self {
            unit_size: 3,
            margin: 4,
            border_size: 4,
            frame: true,
            foreground_color: "black".into(),
            background_color: "white".into(),
            module_shape: ModuleShape::default(),
            filter_name: ImageFilter::default(),
        }
    }
}

pub const UNIT_SIZE_RANGE: std::ops::RangeInclusive<u8> = 1..=10;
pub const MARGIN_RANGE: std::ops::RangeInclusive<u8> = 0..=10;
pub const BORDER_SIZE_RANGE: std::ops::RangeInclusive<u8> = 0..=10;

/// Snapshot of the form at submission time. Coordinators hold it behind an
/// `Arc` and never mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub content: String,
    pub ecl: ErrorCorrectionLevel,
    pub version: Version,
    pub styling: StylingOptions,
    /// Display size of the rendered artifact in pixels.
    pub size: u32,
    pub show_steps: bool,
}

impl GenerationRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ecl: ErrorCorrectionLevel::default(),
            version: Version::default(),
            styling: StylingOptions::default(),
            size: 300,
            show_steps: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        if let Version::Fixed(v) = self.version {
            if !(1..=MAX_VERSION).contains(&v) {
                return Err(ValidationError::VersionOutOfRange(v.to_string()));
            }
        }
        check_range("unit_size", self.styling.unit_size, &UNIT_SIZE_RANGE)?;
        check_range("margin", self.styling.margin, &MARGIN_RANGE)?;
        check_range("border_size", self.styling.border_size, &BORDER_SIZE_RANGE)?;
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: u8,
    range: &std::ops::RangeInclusive<u8>,
) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
