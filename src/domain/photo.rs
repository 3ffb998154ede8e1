use serde::{Deserialize, Serialize};

use crate::domain::project::PersonRef;

/// Geotagged documentation photo taken during an inspection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub id: String,
    pub caption: Option<String>,
    pub floor: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub uploaded_by: Option<PersonRef>,
    /// RFC 3339 upload timestamp.
    #[serde(default)]
    pub created_at: String,
}

impl Photo {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption
            .as_deref()
            .map(str::trim)
            .filter(|caption| !caption.is_empty())
    }
}
