//! Extraction of numeric telemetry from raw probe output

use regex::Regex;
use std::sync::OnceLock;

/// Statistics pulled from one `ping` run
#[derive(Debug, Clone, PartialEq)]
pub struct PingStats {
    /// Round-trip times in milliseconds, in reply order
    pub rtts_ms: Vec<f64>,
    /// TTL of each reply, never longer than `rtts_ms`
    pub ttls: Vec<u32>,
    pub packet_loss_pct: u32,
}

fn rtt_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"time=([\d.]+) ms").unwrap())
}

fn ttl_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"ttl=(\d+)").unwrap())
}

fn loss_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)% packet loss").unwrap())
}

fn time_total_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"time_total:([\d.]+)").unwrap())
}

fn content_length_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Content-Length: (\d+)").unwrap())
}

/// Parse `ping` output. Returns `None` when no reply time could be found.
pub fn parse_ping(raw: &str) -> Option<PingStats> {
    let rtts_ms: Vec<f64> = rtt_pattern()
        .captures_iter(raw)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();

    if rtts_ms.is_empty() {
        return None;
    }

    let ttls = ttl_pattern()
        .captures_iter(raw)
        .filter_map(|caps| caps[1].parse().ok())
        .take(rtts_ms.len())
        .collect();

    let packet_loss_pct = loss_pattern()
        .captures(raw)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0);

    Some(PingStats {
        rtts_ms,
        ttls,
        packet_loss_pct,
    })
}

/// `time_total` in seconds from one curl `-w` line
pub fn parse_time_total(raw: &str) -> Option<f64> {
    time_total_pattern()
        .captures(raw)
        .and_then(|caps| caps[1].parse().ok())
}

/// Advertised body size from a header dump; 0 when absent.
///
/// Values too large for `u64` saturate to `u64::MAX`.
pub fn parse_content_length(headers: &str) -> u64 {
    content_length_pattern()
        .captures(headers)
        .map(|caps| caps[1].parse().unwrap_or(u64::MAX))
        .unwrap_or(0)
}
