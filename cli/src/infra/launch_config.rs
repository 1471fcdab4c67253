//! Launch configuration file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Read the launch configuration at `path` and check that it is a JSON
/// object. The text is returned unchanged for the create request.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON object.
pub async fn read_launch_config(path: &Path) -> Result<String> {
    let owned: PathBuf = path.to_path_buf();
    let content = tokio::task::spawn_blocking(move || {
        std::fs::read_to_string(&owned)
            .with_context(|| format!("cannot read launch config {}", owned.display()))
    })
    .await
    .context("spawn_blocking for read_launch_config")??;

    let parsed: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("launch config {} is not valid JSON", path.display()))?;
    anyhow::ensure!(
        parsed.is_object(),
        "launch config {} must be a JSON object",
        path.display()
    );
    Ok(content)
}
