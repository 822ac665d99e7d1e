//! Protocol constants and probe kind definitions

use std::fmt;

/// Default port the agent listens on
pub const DEFAULT_AGENT_PORT: u16 = 48080;

/// Default port the gateway listens on
pub const DEFAULT_GATEWAY_PORT: u16 = 48081;

/// Query parameter carrying the probe target
pub const ADDRESS_PARAM: &str = "address";

/// Probe kinds understood by both services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    /// ICMP echo via the OS `ping` binary
    Ping,

    /// Repeated HTTP transfer timing via `curl`
    Transfer,

    /// Hop listing via `nexttrace`
    Traceroute,
}

impl ProbeKind {
    pub const ALL: [ProbeKind; 3] = [ProbeKind::Ping, ProbeKind::Transfer, ProbeKind::Traceroute];

    /// HTTP path of this probe on both the agent and the gateway
    pub fn path(self) -> &'static str {
        match self {
            ProbeKind::Ping => "/ping",
            ProbeKind::Transfer => "/curl_ping_test",
            ProbeKind::Traceroute => "/traceroute",
        }
    }

    /// Whether the gateway strips markup instead of colour-parsing it
    pub fn strips_markup(self) -> bool {
        matches!(self, ProbeKind::Traceroute)
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProbeKind::Ping => "ping",
            ProbeKind::Transfer => "curl",
            ProbeKind::Traceroute => "traceroute",
        };
        f.write_str(name)
    }
}
