//! Probe results and their colour-marked text reports

use crate::parse::PingStats;
use protocol::markup::{paint, ColorTag};

/// Body preview placeholder when the page could not be fetched
pub const PREVIEW_UNAVAILABLE: &str = "(content unavailable)";

/// Statistics of one transfer probe
#[derive(Debug, Clone, PartialEq)]
pub struct TransferStats {
    /// `time_total` of each successful attempt, in seconds
    pub samples_s: Vec<f64>,
    /// Header dump and `-w` summary of one request, verbatim
    pub response_info: String,
    /// Start of the response body, or [`PREVIEW_UNAVAILABLE`]
    pub preview: String,
}

/// Outcome of one probe, built per request and dropped once answered
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult {
    Ping { target: String, stats: PingStats },
    Transfer { target: String, stats: TransferStats },
    Traceroute { output: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl Summary {
    pub fn of(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        Some(Self { min, max, mean })
    }
}

impl ProbeResult {
    /// Render the multi-line marked-up report sent back to the gateway
    pub fn to_markup(&self) -> String {
        match self {
            ProbeResult::Ping { target, stats } => ping_report(target, stats),
            ProbeResult::Transfer { target, stats } => transfer_report(target, stats),
            ProbeResult::Traceroute { output } => output.clone(),
        }
    }
}

/// A millisecond sample as ping printed it, keeping one decimal for whole numbers
fn raw_ms(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn ping_timing(ms: f64) -> String {
    paint(ColorTag::Success, format!("{}ms ({:.3}s)", raw_ms(ms), ms / 1000.0))
}

fn transfer_timing(seconds: f64) -> String {
    paint(ColorTag::Success, format!("{:.2}ms ({:.3}s)", seconds * 1000.0, seconds))
}

fn ping_report(target: &str, stats: &PingStats) -> String {
    let mut lines = vec![format!("{} ping {} results:", paint(ColorTag::Title, "[PING]"), target)];

    for (i, rtt) in stats.rtts_ms.iter().enumerate() {
        let ttl = stats
            .ttls
            .get(i)
            .map(|ttl| ttl.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "Attempt {}: {} TTL: {}",
            i + 1,
            ping_timing(*rtt),
            paint(ColorTag::Warning, ttl)
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Packet loss: {}",
        paint(ColorTag::Error, format!("{}%", stats.packet_loss_pct))
    ));

    if let Some(summary) = Summary::of(&stats.rtts_ms) {
        lines.push(format!(
            "Max: {}, Min: {}, Avg: {}",
            ping_timing(summary.max),
            ping_timing(summary.min),
            paint(
                ColorTag::Success,
                format!("{:.2}ms ({:.3}s)", summary.mean, summary.mean / 1000.0)
            )
        ));
    }

    lines.join("\n")
}

fn transfer_report(target: &str, stats: &TransferStats) -> String {
    let mut lines = vec![format!("{} curl {} results:", paint(ColorTag::Title, "[CURL]"), target)];

    for (i, seconds) in stats.samples_s.iter().enumerate() {
        lines.push(format!("Attempt {}: {}", i + 1, transfer_timing(*seconds)));
    }

    lines.push(String::new());
    if let Some(summary) = Summary::of(&stats.samples_s) {
        lines.push(format!(
            "Max: {}, Min: {}, Avg: {}",
            transfer_timing(summary.max),
            transfer_timing(summary.min),
            transfer_timing(summary.mean)
        ));
    }

    lines.push(String::new());
    lines.push(paint(ColorTag::Info, "[Response info]"));
    lines.push(stats.response_info.clone());
    lines.push(paint(ColorTag::Info, "[Page content (first 500 chars)]"));
    lines.push(stats.preview.clone());

    lines.join("\n")
}
