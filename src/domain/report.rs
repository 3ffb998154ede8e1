use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::domain::error::{AppError, Result};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Docx,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// Per-report options. Unknown keys are ignored when deserializing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportOptions {
    /// Output variant; the composer's configured default applies when absent.
    pub format: Option<ReportFormat>,

    /// Fixed generation time, mainly for reproducible output.
    pub generated_at: Option<DateTime<FixedOffset>>,
}

impl ReportOptions {
    pub fn pdf() -> Self {
        Self {
            format: Some(ReportFormat::Pdf),
            ..Default::default()
        }
    }

    pub fn docx() -> Self {
        Self {
            format: Some(ReportFormat::Docx),
            ..Default::default()
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value.clone())
            .map_err(|e| AppError::InvalidInput(format!("Invalid report options: {}", e)))
    }
}

/// What a finished composition produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub format: ReportFormat,
    /// Known for PDF only; word processors paginate DOCX themselves.
    pub page_count: Option<usize>,
    pub size_bytes: u64,
    /// Records rendered with an invalid-data marker instead of their content.
    pub render_issues: usize,
}
