//! Application service: configuration use-cases.

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{FlowConfig, validate_config};

/// Load configuration without validating it (`config show`).
///
/// # Errors
///
/// Returns an error if the store cannot be read or parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<FlowConfig> {
    store.load()
}

/// Load configuration and reject values the workflow cannot run with.
///
/// # Errors
///
/// Returns an error if the store cannot be read or a value is invalid.
pub fn load_valid_config(store: &impl ConfigStore) -> Result<FlowConfig> {
    let config = store.load()?;
    validate_config(&config).with_context(|| match store.path() {
        Ok(path) => format!("invalid configuration in {}", path.display()),
        Err(_) => "invalid configuration".to_string(),
    })?;
    Ok(config)
}
