//! Composer configuration.
//!
//! Layered with figment: built-in defaults, then an optional
//! `slf-report.toml`, then `SLF_REPORT_*` environment variables (nested keys
//! separated by `__`, e.g. `SLF_REPORT_PAGE__MARGIN_TOP=60`).

use chrono::FixedOffset;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::error::{AppError, Result};
use crate::domain::report::ReportFormat;
use crate::infrastructure::document::PageGeometry;
use crate::shared::locale::offset_from_minutes;

pub const CONFIG_FILE: &str = "slf-report.toml";
pub const ENV_PREFIX: &str = "SLF_REPORT_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Directory generated reports are written to.
    pub reports_dir: PathBuf,
    /// Offset used for every rendered date, minutes east of UTC (WIB = 420).
    pub utc_offset_minutes: i32,
    pub default_format: ReportFormat,
    pub page: PageGeometry,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("reports"),
            utc_offset_minutes: 7 * 60,
            default_format: ReportFormat::Pdf,
            page: PageGeometry::a4(),
        }
    }
}

impl ComposerConfig {
    /// Loads `.env`, then the default figment layers.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_figment(Self::figment(Path::new(CONFIG_FILE)))
    }

    pub fn figment(config_file: &Path) -> Figment {
        Figment::from(Serialized::defaults(ComposerConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: ComposerConfig = figment
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))?;
        config.timezone()?;
        Ok(config)
    }

    pub fn with_reports_dir(mut self, reports_dir: impl Into<PathBuf>) -> Self {
        self.reports_dir = reports_dir.into();
        self
    }

    pub fn timezone(&self) -> Result<FixedOffset> {
        offset_from_minutes(self.utc_offset_minutes).ok_or_else(|| {
            AppError::Config(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ))
        })
    }
}
