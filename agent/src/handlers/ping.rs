//! Ping probe handler (ICMP round-trip statistics)

use super::{AddressQuery, AgentState};
use crate::error::ProbeError;
use crate::parse::parse_ping;
use crate::report::ProbeResult;
use crate::runner::CommandRunner;
use axum::extract::{Query, State};
use std::sync::Arc;
use tracing::{info, warn};

/// Handle `GET /ping?address=<host>`
pub async fn handle_ping<R: CommandRunner>(
    State(state): State<Arc<AgentState<R>>>,
    Query(query): Query<AddressQuery>,
) -> Result<String, ProbeError> {
    let target = query.target()?;
    let result = run_ping(&state, target).await?;
    Ok(result.to_markup())
}

/// Ping `target` and parse the replies.
///
/// No reply time in the output is a failure that carries the raw text.
pub async fn run_ping<R: CommandRunner>(
    state: &AgentState<R>,
    target: &str,
) -> Result<ProbeResult, ProbeError> {
    let probes = &state.probes;
    info!("Ping probe to {} ({} requests)", target, probes.ping_count);

    let argv = vec![
        probes.ping_bin.clone(),
        "-c".to_string(),
        probes.ping_count.to_string(),
        target.to_string(),
    ];
    let output = state.run(argv, probes.command_timeout()).await;

    let Some(stats) = parse_ping(&output.text) else {
        warn!("Ping to {} produced no samples ({:?})", target, output.status);
        return Err(ProbeError::ParseFailure {
            probe: "Ping",
            raw: output.text,
        });
    };

    info!(
        "Ping to {}: {} samples, {}% loss",
        target,
        stats.rtts_ms.len(),
        stats.packet_loss_pct
    );

    Ok(ProbeResult::Ping {
        target: target.to_string(),
        stats,
    })
}
