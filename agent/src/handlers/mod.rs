//! HTTP handlers, one module per probe kind

pub mod ping;
pub mod traceroute;
pub mod transfer;

use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::runner::{CommandOutput, CommandRunner};
use axum::{routing::get, Router};
use protocol::ProbeKind;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Shared, read-only state of the agent
pub struct AgentState<R> {
    pub probes: ProbeConfig,
    pub runner: R,
    pub log_command_output: bool,
}

impl<R: CommandRunner> AgentState<R> {
    pub fn new(probes: ProbeConfig, runner: R, log_command_output: bool) -> Self {
        Self {
            probes,
            runner,
            log_command_output,
        }
    }

    /// Run one command, logging its raw output when enabled
    async fn run(&self, argv: Vec<String>, timeout: std::time::Duration) -> CommandOutput {
        let output = self.runner.run(&argv, timeout).await;
        if self.log_command_output {
            debug!("{} -> {:?}: {}", argv.join(" "), output.status, output.text);
        }
        output
    }
}

#[derive(Debug, Deserialize)]
pub struct AddressQuery {
    pub address: Option<String>,
}

impl AddressQuery {
    /// The probe target, rejected when absent or when it could be read as
    /// a command-line option by the probe binary
    pub fn target(&self) -> Result<&str, ProbeError> {
        let address = self.address.as_deref().map(str::trim).unwrap_or_default();
        if address.is_empty() {
            return Err(ProbeError::MissingAddress);
        }
        if address.starts_with('-') || address.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ProbeError::InvalidAddress(address.to_string()));
        }
        Ok(address)
    }
}

pub fn router<R: CommandRunner>(state: Arc<AgentState<R>>) -> Router {
    Router::new()
        .route(ProbeKind::Ping.path(), get(ping::handle_ping::<R>))
        .route(ProbeKind::Transfer.path(), get(transfer::handle_transfer::<R>))
        .route(ProbeKind::Traceroute.path(), get(traceroute::handle_traceroute::<R>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
