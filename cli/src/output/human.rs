//! Human-readable terminal renderer.

use std::path::Path;

use crate::application::services::orchestrator::{CleanupOutcome, RunReport};
use crate::domain::{ConnectionOutcome, FlowConfig};
use crate::output::OutputContext;

/// Renders run results and configuration as terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.info(&format!("authflow v{version}"));
    }

    /// Render the summary of one scenario run.
    ///
    /// The `connected: {bool}` line is printed even when `quiet`.
    pub fn render_report(&self, report: &RunReport) {
        self.ctx.header(&format!("{} scenario", report.scenario));
        self.ctx.kv("Deployment:", &report.deployment_name);
        if let Some(id) = &report.deployment_id {
            self.ctx.kv("Id:", id);
        }
        if let Some(attempt) = &report.connection {
            self.ctx.kv("Connection:", &describe_connection(&attempt.outcome));
        }
        if let Some(error) = &report.error {
            let stage = report
                .failed_stage
                .map_or_else(String::new, |s| format!(" while {s}"));
            self.ctx.error(&format!("failed{stage}: {error}"));
        }
        self.ctx.kv("Cleanup:", &describe_cleanup(&report.cleanup));
        println!("{}", report.status_line());
    }

    /// Render the effective configuration and where it was read from.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn render_config(&self, config: &FlowConfig, path: &Path) -> anyhow::Result<()> {
        self.ctx.kv("Config file:", &path.display().to_string());
        if !path.exists() {
            self.ctx.info("file not found, showing defaults");
        }
        println!();
        print!("{}", serde_yaml::to_string(config)?);
        Ok(())
    }
}

/// One-line description of a connection outcome.
#[must_use]
pub fn describe_connection(outcome: &ConnectionOutcome) -> String {
    outcome.to_string()
}

/// One-line description of the cleanup step.
#[must_use]
pub fn describe_cleanup(cleanup: &CleanupOutcome) -> String {
    match cleanup {
        CleanupOutcome::Stopped { id } => format!("deployment {id} stopped"),
        CleanupOutcome::AlreadyGone { id } => format!("deployment {id} already gone"),
        CleanupOutcome::Skipped { reason } => format!("skipped ({reason})"),
        CleanupOutcome::Failed { id, error } => format!("failed to stop {id}: {error}"),
    }
}
