//! Traceroute handler

use super::{AddressQuery, AgentState};
use crate::error::ProbeError;
use crate::report::ProbeResult;
use crate::runner::CommandRunner;
use axum::extract::{Query, State};
use std::sync::Arc;
use tracing::info;

/// Handle `GET /traceroute?address=<host>`
///
/// The tool output goes back untouched, colour escapes included.
pub async fn handle_traceroute<R: CommandRunner>(
    State(state): State<Arc<AgentState<R>>>,
    Query(query): Query<AddressQuery>,
) -> Result<String, ProbeError> {
    let target = query.target()?;
    Ok(run_traceroute(&state, target).await.to_markup())
}

pub async fn run_traceroute<R: CommandRunner>(state: &AgentState<R>, target: &str) -> ProbeResult {
    let probes = &state.probes;
    info!("Traceroute probe to {}", target);

    let output = state
        .run(
            vec![probes.traceroute_bin.clone(), target.to_string()],
            probes.command_timeout(),
        )
        .await;

    ProbeResult::Traceroute {
        output: output.text,
    }
}
