pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use crate::application::use_cases::report_composer::{ReportComposerUseCase, ReportInput};
pub use crate::domain::error::{AppError, Result};
pub use crate::domain::photo::Photo;
pub use crate::domain::project::{Inspection, InspectionStatus, PersonRef, Project};
pub use crate::domain::report::{ReportArtifact, ReportFormat, ReportOptions};
pub use crate::domain::response::{ChecklistResponse, ResponseItem, ResponseRecord, SimakResponse};
pub use crate::infrastructure::config::ComposerConfig;

/// Installs the fmt subscriber. `RUST_LOG` overrides the default `info`
/// filter; calling this more than once is harmless.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Loads configuration and returns a ready composer.
pub fn composer_from_env() -> Result<ReportComposerUseCase> {
    init_tracing();
    let config = ComposerConfig::load()?;
    tracing::info!(
        reports_dir = %config.reports_dir.display(),
        format = %config.default_format,
        "SLF report composer configured"
    );
    Ok(ReportComposerUseCase::new(config))
}
