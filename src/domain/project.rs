//! Project and inspection records as delivered by the persistence layer.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use validator::{Validate, ValidationError};

use crate::domain::error::Result;

/// Building project the SLF report is issued for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Project {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "project id is required"))]
    pub id: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "project name is required"))]
    pub name: String,

    pub owner: Option<String>,
    pub address: Option<String>,
    pub building_function: Option<String>,

    #[validate(required(message = "floor count is required"))]
    pub floors: Option<u32>,

    /// Building height in meters.
    pub height: Option<f64>,

    /// Gross floor area in square meters.
    pub area: Option<f64>,

    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Underscore-separated request kind, e.g. `baru` or `perpanjangan_slf`.
    #[validate(
        required(message = "request type is required"),
        custom(function = "not_blank", message = "request type must not be empty")
    )]
    pub request_type: Option<String>,
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::from("value is blank")));
    }
    Ok(())
}

impl Project {
    /// Checks the fields every report needs before any output is produced.
    pub fn ensure_reportable(&self) -> Result<()> {
        self.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl InspectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InspectionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown inspection status: {}", s)),
        }
    }
}

/// Reference to a user record (inspector, drafter, uploader).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl PersonRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    /// Display name, falling back to the id when no name was joined in.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.id.as_deref().filter(|id| !id.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    #[serde(default)]
    pub id: String,

    /// `YYYY-MM-DD` or RFC 3339; parsed only when rendered.
    pub scheduled_date: Option<String>,

    pub status: InspectionStatus,
    pub inspector: Option<PersonRef>,
    pub drafter: Option<PersonRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn valid_project() -> Project {
        Project {
            id: "PRJ-001".into(),
            name: "Gedung Serbaguna".into(),
            floors: Some(4),
            request_type: Some("baru".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_project_is_reportable() {
        assert!(valid_project().ensure_reportable().is_ok());
    }

    #[test]
    fn test_missing_required_fields_are_rejected() {
        let mut project = valid_project();
        project.floors = None;
        assert!(matches!(
            project.ensure_reportable(),
            Err(crate::domain::error::AppError::InvalidInput(_))
        ));

        let mut project = valid_project();
        project.id.clear();
        assert!(project.ensure_reportable().is_err());

        let mut project = valid_project();
        project.request_type = Some(String::new());
        assert!(project.ensure_reportable().is_err());

        let mut project = valid_project();
        project.request_type = Some("  ".into());
        assert!(project.ensure_reportable().is_err());

        let mut project = valid_project();
        project.request_type = None;
        assert!(project.ensure_reportable().is_err());
    }

    #[test]
    fn test_whitespace_only_identity_is_rejected() {
        let mut project = valid_project();
        project.id = "   ".into();
        assert!(matches!(
            project.ensure_reportable(),
            Err(crate::domain::error::AppError::InvalidInput(_))
        ));

        let mut project = valid_project();
        project.name = "\t\n".into();
        assert!(matches!(
            project.ensure_reportable(),
            Err(crate::domain::error::AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_project_deserializes_with_missing_optionals() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "id": "PRJ-9",
            "name": "Ruko",
            "floors": 3,
            "request_type": "perpanjangan_slf"
        }))
        .unwrap();
        assert_eq!(project.floors, Some(3));
        assert!(project.height.is_none());
        assert!(project.ensure_reportable().is_ok());
    }

    #[test]
    fn test_inspection_status_round_trips_through_str() {
        assert_eq!(InspectionStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            InspectionStatus::from_str("COMPLETED"),
            Ok(InspectionStatus::Completed)
        );
        assert!(InspectionStatus::from_str("archived").is_err());
    }

    #[test]
    fn test_person_display_name_falls_back_to_id() {
        let person = PersonRef {
            id: Some("usr-12".into()),
            name: Some("  ".into()),
        };
        assert_eq!(person.display_name(), Some("usr-12"));
        assert_eq!(PersonRef::default().display_name(), None);
    }
}
