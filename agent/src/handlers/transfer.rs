//! HTTP transfer timing handler (repeated curl requests)

use super::{AddressQuery, AgentState};
use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::parse::{parse_content_length, parse_time_total};
use crate::report::{ProbeResult, TransferStats, PREVIEW_UNAVAILABLE};
use crate::runner::{CommandOutput, CommandRunner};
use axum::extract::{Query, State};
use std::sync::Arc;
use tracing::{debug, info, warn};

const TIMING_FORMAT: &str = "time_total:%{time_total}, http_code:%{http_code}, size_download:%{size_download}, ssl_verify:%{ssl_verify}, remote_ip:%{remote_ip}\n";

const INFO_FORMAT: &str = "http_code:%{http_code}, size_download:%{size_download}, remote_ip:%{remote_ip}, time_total:%{time_total}, content_type:%{content_type}, redirect_url:%{redirect_url}, ssl_verify:%{ssl_verify}, method:%{method}\n";

/// Handle `GET /curl_ping_test?address=<url>`
pub async fn handle_transfer<R: CommandRunner>(
    State(state): State<Arc<AgentState<R>>>,
    Query(query): Query<AddressQuery>,
) -> Result<String, ProbeError> {
    let url = query.target()?;
    let result = run_transfer(&state, url).await?;
    Ok(result.to_markup())
}

/// curl invocation capped in time and bandwidth
fn capped_curl(probes: &ProbeConfig, args: &[&str], url: &str) -> Vec<String> {
    let mut argv = vec![probes.curl_bin.clone()];
    argv.extend(args.iter().map(|arg| arg.to_string()));
    argv.extend([
        "--max-time".to_string(),
        probes.transfer_timeout_sec.to_string(),
        "--limit-rate".to_string(),
        probes.transfer_rate_limit.clone(),
        url.to_string(),
    ]);
    argv
}

/// First `limit` characters of a body fetch, or the placeholder
fn preview(output: &CommandOutput, limit: usize) -> String {
    output
        .usable_text()
        .map(|body| body.chars().take(limit).collect())
        .unwrap_or_else(|| PREVIEW_UNAVAILABLE.to_string())
}

/// Time repeated fetches of `url` and collect its response details.
///
/// The pre-flight header check refuses oversized resources before any
/// timing request is made. Attempts whose output has no `time_total` are
/// left out of the samples; no sample at all is a failure.
pub async fn run_transfer<R: CommandRunner>(
    state: &AgentState<R>,
    url: &str,
) -> Result<ProbeResult, ProbeError> {
    let probes = &state.probes;
    info!("Transfer probe to {} ({} attempts)", url, probes.transfer_attempts);

    let headers = state
        .run(
            vec![probes.curl_bin.clone(), "-sI".to_string(), url.to_string()],
            probes.command_timeout(),
        )
        .await;
    let content_length = parse_content_length(&headers.text);
    if content_length > probes.max_content_length {
        warn!(
            "Refusing transfer probe to {}: Content-Length {} exceeds {}",
            url, content_length, probes.max_content_length
        );
        return Err(ProbeError::PayloadTooLarge { content_length });
    }

    let mut samples_s = Vec::new();
    let mut last_raw = String::new();
    for attempt in 1..=probes.transfer_attempts {
        let output = state
            .run(capped_curl(probes, &["-o", "/dev/null", "-s", "-w", TIMING_FORMAT], url), probes.transfer_timeout())
            .await;
        match parse_time_total(&output.text) {
            Some(seconds) => {
                debug!("Transfer {} attempt {}: {:.3}s", url, attempt, seconds);
                samples_s.push(seconds);
            }
            None => debug!("Transfer {} attempt {}: no timing ({:?})", url, attempt, output.status),
        }
        last_raw = output.text;
    }

    if samples_s.is_empty() {
        warn!("Transfer probe to {} produced no samples", url);
        return Err(ProbeError::ParseFailure {
            probe: "Transfer test",
            raw: last_raw,
        });
    }

    let info = state
        .run(
            capped_curl(probes, &["-s", "-o", "/dev/null", "-D", "-", "-w", INFO_FORMAT], url),
            probes.transfer_timeout(),
        )
        .await;

    let body = state
        .run(capped_curl(probes, &["-s"], url), probes.transfer_timeout())
        .await;

    info!("Transfer to {}: {} of {} attempts timed", url, samples_s.len(), probes.transfer_attempts);

    Ok(ProbeResult::Transfer {
        target: url.to_string(),
        stats: TransferStats {
            samples_s,
            response_info: info.text,
            preview: preview(&body, probes.preview_chars),
        },
    })
}
