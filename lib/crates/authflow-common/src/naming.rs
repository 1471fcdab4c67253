//! Resource naming helpers.
//!
//! Deployment names must be unique within a project, so every run appends a
//! random suffix to a fixed prefix.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Length of the random suffix appended to deployment names.
pub const SUFFIX_LEN: usize = 6;

/// Generate a lowercase alphanumeric suffix of `len` characters.
#[must_use]
pub fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Build a deployment name of the form `{prefix}_{suffix}`.
#[must_use]
pub fn deployment_name(prefix: &str) -> String {
    format!("{prefix}_{}", random_suffix(SUFFIX_LEN))
}
