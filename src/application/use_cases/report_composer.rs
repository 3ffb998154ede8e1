//! SLF report composition.
//!
//! A report is built in one pass through a fixed pipeline:
//! header, project info, inspection info, checklist, simak, photo
//! documentation, conclusion and footer. Optional stages are skipped when
//! their input is empty; the rest keep their relative order.

pub mod grouping;
pub mod sections;

use chrono::{DateTime, FixedOffset, Utc};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::photo::Photo;
use crate::domain::project::{Inspection, Project};
use crate::domain::report::{ReportArtifact, ReportFormat, ReportOptions};
use crate::domain::response::ResponseRecord;
use crate::infrastructure::artifact_store::publish_report_bytes;
use crate::infrastructure::config::ComposerConfig;
use crate::infrastructure::document::{DocumentInfo, PageGeometry, RenderedDocument, ReportWriter};
use crate::infrastructure::storage::ensure_reports_dir;

pub use grouping::{group_by_category, CategoryGroup};
pub use sections::{RenderContext, Section, Stage};

/// Borrowed view over everything one report is built from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub project: &'a Project,
    pub inspection: Option<&'a Inspection>,
    pub checklist: &'a [ResponseRecord],
    pub simak: &'a [ResponseRecord],
    pub photos: &'a [Photo],
}

/// Runs the section builders in pipeline order, skipping empty stages.
pub fn build_sections(input: &ReportInput<'_>, ctx: &RenderContext) -> Vec<Section> {
    let mut out = Vec::with_capacity(8);
    out.push(sections::header(input.project, ctx));
    out.push(sections::project_info(input.project));
    if let Some(inspection) = input.inspection {
        out.push(sections::inspection_info(inspection, ctx));
    }
    if !input.checklist.is_empty() {
        out.push(sections::checklist(input.checklist));
    }
    if !input.simak.is_empty() {
        out.push(sections::simak(input.simak));
    }
    if !input.photos.is_empty() {
        out.push(sections::photos(input.photos, ctx));
    }
    out.push(sections::conclusion());
    out.push(sections::footer());
    out
}

/// Lays the sections out into a finished in-memory document.
pub fn render_document(
    format: ReportFormat,
    geometry: PageGeometry,
    sections: &[Section],
    info: &DocumentInfo,
) -> Result<RenderedDocument> {
    let mut writer = ReportWriter::new(format, geometry);
    for section in sections {
        debug!(
            stage = section.stage.as_str(),
            blocks = section.blocks.len(),
            page = writer.cursor().page() + 1,
            "Writing report section"
        );
        writer.write_all(&section.blocks);
    }
    writer.finish(info)
}

fn pdf_date(at: &DateTime<FixedOffset>) -> String {
    let offset = at.format("%:z").to_string();
    let (hours, minutes) = offset.split_once(':').unwrap_or((offset.as_str(), "00"));
    format!("D:{}{}'{}'", at.format("%Y%m%d%H%M%S"), hours, minutes)
}

pub struct ReportComposerUseCase {
    config: ComposerConfig,
}

impl ReportComposerUseCase {
    pub fn new(config: ComposerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Builds one report and returns the path of the completed file.
    ///
    /// A returned path always points at a fully written document; on error
    /// no report file is left behind.
    pub async fn compose(
        &self,
        project: &Project,
        inspection: Option<&Inspection>,
        checklist: &[ResponseRecord],
        simak: &[ResponseRecord],
        photos: &[Photo],
        options: &ReportOptions,
    ) -> Result<PathBuf> {
        let input = ReportInput {
            project,
            inspection,
            checklist,
            simak,
            photos,
        };
        self.compose_artifact(&input, options)
            .await
            .map(|artifact| artifact.path)
    }

    pub async fn compose_artifact(
        &self,
        input: &ReportInput<'_>,
        options: &ReportOptions,
    ) -> Result<ReportArtifact> {
        let project = input.project;
        project.ensure_reportable().map_err(|err| {
            warn!(project_id = %project.id, error = %err, "Rejected report request");
            err
        })?;

        let timezone = self.config.timezone()?;
        let format = options.format.unwrap_or(self.config.default_format);
        let generated_at = options
            .generated_at
            .unwrap_or_else(|| Utc::now().fixed_offset())
            .with_timezone(&timezone);

        info!(
            project_id = %project.id,
            format = %format,
            checklist = input.checklist.len(),
            simak = input.simak.len(),
            photos = input.photos.len(),
            "Composing SLF report"
        );

        let reports_dir = ensure_reports_dir(&self.config.reports_dir)
            .await
            .map_err(|err| {
                error!(
                    error = %err,
                    reports_dir = %self.config.reports_dir.display(),
                    "Failed to create reports dir"
                );
                AppError::Io(format!(
                    "Failed to create reports dir {}: {}",
                    self.config.reports_dir.display(),
                    err
                ))
            })?;

        let ctx = RenderContext {
            generated_at,
            timezone,
        };
        let sections = build_sections(input, &ctx);

        let mut render_issues = 0;
        for section in &sections {
            for issue in &section.issues {
                render_issues += 1;
                warn!(
                    project_id = %project.id,
                    stage = section.stage.as_str(),
                    error = %issue,
                    "Record rendered as invalid data"
                );
            }
        }

        let info = DocumentInfo {
            title: format!("Laporan SLF - {}", project.name),
            creation_date: pdf_date(&generated_at),
        };
        let rendered = render_document(format, self.config.page, &sections, &info).map_err(|err| {
            error!(project_id = %project.id, error = %err, "Failed to render report");
            err
        })?;

        let page_count = rendered.page_count;
        let size_bytes = rendered.bytes.len() as u64;
        let project_id = project.id.clone();
        let timestamp_ms = generated_at.timestamp_millis();
        let path = tokio::task::spawn_blocking(move || {
            publish_report_bytes(
                &reports_dir,
                &project_id,
                timestamp_ms,
                format.extension(),
                &rendered.bytes,
            )
        })
        .await
        .map_err(|err| AppError::Internal(format!("Report writer task failed: {}", err)))?
        .map_err(|err| {
            error!(project_id = %project.id, error = %err, "Failed to write report");
            err
        })?;

        info!(
            project_id = %project.id,
            path = %path.display(),
            pages = page_count,
            bytes = size_bytes,
            render_issues,
            "SLF report written"
        );

        Ok(ReportArtifact {
            path,
            format,
            page_count: (format == ReportFormat::Pdf).then_some(page_count),
            size_bytes,
            render_issues,
        })
    }
}
