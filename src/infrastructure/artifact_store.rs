use crate::domain::error::{AppError, Result};
use crate::infrastructure::storage::report_file_name;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// How many later timestamps to try when a report name is already taken.
const MAX_NAME_ATTEMPTS: i64 = 1000;

fn io_err(msg: impl Into<String>) -> AppError {
    AppError::Io(msg.into())
}

/// Removes a temp or placeholder file when dropped unless disarmed.
struct Cleanup {
    path: PathBuf,
    armed: bool,
}

impl Cleanup {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for Cleanup {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Publishes a finished report under `reports_dir` as
/// `SLF_Report_<projectId>_<timestamp>.<ext>`.
///
/// The bytes are written and synced to a hidden temp file first. The final
/// name is then reserved with `create_new`, advancing the timestamp while a
/// name is taken, and the temp file is renamed over the reservation. On any
/// failure both files are removed, so an existing report file is always
/// complete.
pub fn publish_report_bytes(
    reports_dir: &Path,
    project_id: &str,
    timestamp_ms: i64,
    extension: &str,
    bytes: &[u8],
) -> Result<PathBuf> {
    let tmp_path = reports_dir.join(format!(".slf-report.tmp-{}", Uuid::new_v4()));
    let tmp_guard = Cleanup::new(tmp_path.clone());
    {
        let mut file = fs::File::create(&tmp_path).map_err(|e| {
            io_err(format!(
                "Failed to create temp file {}: {e}",
                tmp_path.display()
            ))
        })?;
        file.write_all(bytes).map_err(|e| {
            io_err(format!(
                "Failed to write temp file {}: {e}",
                tmp_path.display()
            ))
        })?;
        file.sync_all().map_err(|e| {
            io_err(format!(
                "Failed to flush temp file {}: {e}",
                tmp_path.display()
            ))
        })?;
    }

    let final_path = reserve_report_path(reports_dir, project_id, timestamp_ms, extension)?;
    let reservation = Cleanup::new(final_path.clone());

    fs::rename(&tmp_path, &final_path).map_err(|e| {
        io_err(format!(
            "Failed to rename temp file {} to {}: {e}",
            tmp_path.display(),
            final_path.display()
        ))
    })?;

    reservation.disarm();
    tmp_guard.disarm();
    Ok(final_path)
}

fn reserve_report_path(
    reports_dir: &Path,
    project_id: &str,
    timestamp_ms: i64,
    extension: &str,
) -> Result<PathBuf> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = reports_dir.join(report_file_name(
            project_id,
            timestamp_ms + attempt,
            extension,
        ));
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(io_err(format!(
                    "Failed to reserve report file {}: {e}",
                    candidate.display()
                )))
            }
        }
    }

    Err(io_err(format!(
        "No free report file name for project {} in {}",
        project_id,
        reports_dir.display()
    )))
}
