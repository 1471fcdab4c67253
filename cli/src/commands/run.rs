//! Run command: provision, authenticate, connect and tear down per scenario.

use std::path::Path;

use anyhow::{Context, Result};
use authflow_common::deployment_name;
use clap::{Args, ValueEnum};

use crate::app::AppContext;
use crate::application::cancel::{CancelHandle, CancelSignal};
use crate::application::services::config_service;
use crate::application::services::orchestrator::{
    CleanupOutcome, LookupBy, Platform, RunReport, ScenarioPlan, run_scenario,
};
use crate::application::services::plan::{Scenario, scenario_plan};
use crate::domain::config::{FlowConfig, REFRESH_TOKEN_PLACEHOLDER, validate_config};
use crate::domain::TransportKind;
use crate::infra::launch_config::read_launch_config;
use crate::infra::locator::HttpLocatorTransport;
use crate::infra::platform::PlatformClient;
use crate::output::TerminalReporter;
use crate::output::json::format_reports;

/// Environment variable holding the platform refresh token.
pub const REFRESH_TOKEN_ENV: &str = "AUTHFLOW_REFRESH_TOKEN";

/// Returned when at least one scenario did not succeed. The reports have
/// already been printed.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ScenariosFailed(pub String);

/// Which scenarios to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioArg {
    /// Hosted platform only
    Cloud,
    /// Local API service only
    Local,
    /// Cloud, then local
    Both,
}

impl ScenarioArg {
    fn scenarios(self) -> Vec<Scenario> {
        match self {
            Self::Cloud => vec![Scenario::Cloud],
            Self::Local => vec![Scenario::Local],
            Self::Both => vec![Scenario::Cloud, Scenario::Local],
        }
    }
}

/// Field used to locate the created deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LookupArg {
    Id,
    Name,
}

impl From<LookupArg> for LookupBy {
    fn from(arg: LookupArg) -> Self {
        match arg {
            LookupArg::Id => Self::Id,
            LookupArg::Name => Self::Name,
        }
    }
}

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Scenarios to run
    #[arg(long, value_enum, default_value_t = ScenarioArg::Both)]
    pub scenario: ScenarioArg,

    /// Run both scenarios at the same time instead of one after the other
    #[arg(long)]
    pub concurrent: bool,

    /// Also stop deployments that ended in the Error state
    #[arg(long)]
    pub stop_on_error: bool,

    /// Delay between status polls, in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Give up waiting for the deployment after this many polls
    #[arg(long, value_name = "N")]
    pub max_poll_attempts: Option<u32>,

    /// Deadline for the connection attempt, in milliseconds
    #[arg(long, value_name = "MS")]
    pub connect_timeout_ms: Option<u64>,

    /// Network transport for the worker connection
    #[arg(long, value_enum)]
    pub transport: Option<TransportKind>,

    /// Locate the deployment by id or by name
    #[arg(long, value_enum, default_value_t = LookupArg::Id)]
    pub lookup: LookupArg,

    /// Platform refresh token used by the cloud scenario
    #[arg(long, env = REFRESH_TOKEN_ENV, hide_env_values = true)]
    pub refresh_token: Option<String>,
}

impl RunArgs {
    /// Apply command-line overrides on top of the file configuration.
    pub fn apply(&self, config: &mut FlowConfig) {
        if self.stop_on_error {
            config.provisioning.stop_on_error = true;
        }
        if let Some(ms) = self.poll_interval_ms {
            config.provisioning.poll_interval_ms = ms;
        }
        if let Some(n) = self.max_poll_attempts {
            config.provisioning.max_poll_attempts = n;
        }
        if let Some(ms) = self.connect_timeout_ms {
            config.connection.timeout_ms = ms;
        }
        if let Some(transport) = self.transport {
            config.connection.transport = transport;
        }
    }

    fn refresh_token(&self) -> String {
        self.refresh_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| REFRESH_TOKEN_PLACEHOLDER.to_string())
    }
}

/// Entry point for `authflow run`.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the launch configuration
/// cannot be read, or any scenario fails. Deployments are stopped before
/// the error is returned.
pub async fn run(app: &AppContext, args: RunArgs) -> Result<()> {
    let mut config = config_service::load_valid_config(&app.config_store)?;
    args.apply(&mut config);
    validate_config(&config).context("invalid command-line override")?;

    let launch_config = read_launch_config(Path::new(&config.launch_config_path)).await?;
    let scenarios = args.scenario.scenarios();

    let refresh_token = args.refresh_token();
    if refresh_token == REFRESH_TOKEN_PLACEHOLDER && scenarios.contains(&Scenario::Cloud) {
        app.output.warn(&format!(
            "{REFRESH_TOKEN_ENV} is not set; the cloud scenario will be rejected"
        ));
    }

    let lookup = LookupBy::from(args.lookup);
    let plans: Vec<(Scenario, ScenarioPlan)> = scenarios
        .iter()
        .map(|&scenario| {
            let name = deployment_name(&config.name_prefix);
            let plan = scenario_plan(&config, scenario, &launch_config, name, lookup);
            (scenario, plan)
        })
        .collect();

    let cloud = PlatformClient::new(Scenario::Cloud.api_url(&config), Some(refresh_token))?;
    let local = PlatformClient::new(Scenario::Local.api_url(&config), None)?;
    let transport = HttpLocatorTransport::new();
    let client_for = |scenario: Scenario| match scenario {
        Scenario::Cloud => &cloud,
        Scenario::Local => &local,
    };

    let (handle, cancel) = CancelSignal::new();
    let interrupt = tokio::spawn(cancel_on_interrupt(handle));

    let reports = match plans.as_slice() {
        [(a, plan_a), (b, plan_b)] if args.concurrent => {
            let reporter_a = TerminalReporter::new(&app.output)
                .with_label(&plan_a.label)
                .without_spinner();
            let reporter_b = TerminalReporter::new(&app.output)
                .with_label(&plan_b.label)
                .without_spinner();
            let (ra, rb) = tokio::join!(
                execute(client_for(*a), &transport, plan_a, &reporter_a, cancel.clone()),
                execute(client_for(*b), &transport, plan_b, &reporter_b, cancel.clone()),
            );
            vec![ra, rb]
        }
        _ => {
            let mut reports = Vec::with_capacity(plans.len());
            for (scenario, plan) in &plans {
                if cancel.is_cancelled() {
                    tracing::warn!(scenario = %scenario, "skipping scenario after interrupt");
                    break;
                }
                let reporter = TerminalReporter::new(&app.output).with_label(&plan.label);
                reports.push(
                    execute(client_for(*scenario), &transport, plan, &reporter, cancel.clone())
                        .await,
                );
            }
            reports
        }
    };
    interrupt.abort();

    if app.is_json() {
        println!("{}", format_reports(&reports)?);
    } else {
        let renderer = app.renderer();
        for report in &reports {
            renderer.render_report(report);
        }
    }

    let failures: Vec<String> = reports
        .iter()
        .filter(|r| !r.is_success())
        .map(failure_summary)
        .collect();
    if !failures.is_empty() {
        return Err(ScenariosFailed(failures.join("; ")).into());
    }
    Ok(())
}

async fn execute(
    client: &PlatformClient,
    transport: &HttpLocatorTransport,
    plan: &ScenarioPlan,
    reporter: &TerminalReporter<'_>,
    cancel: CancelSignal,
) -> RunReport {
    let platform = Platform {
        deployments: client,
        identity: client,
        login: client,
        transport,
    };
    run_scenario(&platform, plan, reporter, cancel).await
}

async fn cancel_on_interrupt(handle: CancelHandle) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("interrupt received, cleaning up");
        handle.cancel();
    }
}

/// One-line description of why a run did not succeed.
#[must_use]
pub fn failure_summary(report: &RunReport) -> String {
    let mut parts = Vec::new();
    if let Some(error) = &report.error {
        match report.failed_stage {
            Some(stage) => parts.push(format!("{} failed while {stage}: {error}", report.scenario)),
            None => parts.push(format!("{} failed: {error}", report.scenario)),
        }
    }
    if let CleanupOutcome::Failed { id, error } = &report.cleanup {
        parts.push(format!(
            "{}: deployment {id} may still be running ({error})",
            report.scenario
        ));
    }
    parts.join("; ")
}
