//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails, and the document printed by `authflow run --json`.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::services::orchestrator::RunReport;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

#[derive(Serialize)]
struct RunDocument<'a> {
    success: bool,
    reports: &'a [RunReport],
}

/// Format the reports of one `run` invocation.
///
/// `success` is true only when every report succeeded.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_reports(reports: &[RunReport]) -> Result<String> {
    let doc = RunDocument {
        success: reports.iter().all(RunReport::is_success),
        reports,
    };
    serde_json::to_string_pretty(&doc).context("JSON serialization failed")
}
