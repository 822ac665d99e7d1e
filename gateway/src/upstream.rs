//! Forwarding probe requests to a node's agent

use crate::registry::NodeRecord;
use anyhow::{Context, Result};
use protocol::{ProbeKind, ADDRESS_PARAM};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of agent report texts
pub trait Backend: Send + Sync + 'static {
    /// Body returned by `node`'s agent for a `kind` probe of `address`.
    ///
    /// Non-2xx answers still carry report text and are returned as bodies;
    /// only transport failures are errors.
    fn fetch(
        &self,
        node: &NodeRecord,
        kind: ProbeKind,
        address: &str,
    ) -> impl Future<Output = Result<String>> + Send;
}

pub struct HttpBackend {
    client: reqwest::Client,
    default_port: u16,
}

impl HttpBackend {
    pub fn new(default_port: u16, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            default_port,
        })
    }
}

impl Backend for HttpBackend {
    async fn fetch(&self, node: &NodeRecord, kind: ProbeKind, address: &str) -> Result<String> {
        let url = node.agent_url(self.default_port, kind);
        debug!("Forwarding {} probe of {} to {}", kind, address, url);

        // Node addresses stay out of client-visible error text
        let response = self
            .client
            .get(&url)
            .query(&[(ADDRESS_PARAM, address)])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to reach node {}", node.name))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Node {} answered {} probe with {}", node.name, kind, status);
        }

        response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to read response from node {}", node.name))
    }
}
