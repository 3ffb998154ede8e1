use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static UNSAFE_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());

/// Creates the reports directory if needed. Safe to call concurrently.
pub async fn ensure_reports_dir(reports_dir: &Path) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(reports_dir).await?;
    Ok(reports_dir.to_path_buf())
}

/// Makes a project id safe to embed in a file name.
pub fn sanitize_name_segment(raw: &str) -> String {
    let cleaned = UNSAFE_NAME_CHARS.replace_all(raw.trim(), "_").to_string();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}

pub fn report_file_name(project_id: &str, timestamp_ms: i64, extension: &str) -> String {
    format!(
        "SLF_Report_{}_{}.{}",
        sanitize_name_segment(project_id),
        timestamp_ms,
        extension
    )
}
