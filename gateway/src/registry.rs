//! Static table of nodes running an agent

use anyhow::Result;
use protocol::{NodeSummary, ProbeKind};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    pub address: String,
    pub alias: String,
    /// Agent port, when it differs from `backend.port`
    #[serde(default)]
    pub port: Option<u16>,
}

impl NodeRecord {
    /// Agent URL of `kind` on this node, without the query string
    pub fn agent_url(&self, default_port: u16, kind: ProbeKind) -> String {
        let port = self.port.unwrap_or(default_port);
        if self.address.contains(':') && !self.address.starts_with('[') {
            format!("http://[{}]:{}{}", self.address, port, kind.path())
        } else {
            format!("http://{}:{}{}", self.address, port, kind.path())
        }
    }

    /// First line of every probe image
    pub fn header(&self) -> String {
        format!("node: {} ({})", self.name, self.alias)
    }

    pub fn summary(&self) -> NodeSummary {
        NodeSummary {
            name: self.name.clone(),
            alias: self.alias.clone(),
        }
    }
}

/// Node names must be non-empty and unique, and every node needs an address
pub fn validate(nodes: &[NodeRecord]) -> Result<()> {
    let mut seen = HashSet::new();
    for node in nodes {
        if node.name.trim().is_empty() {
            anyhow::bail!("node names must not be empty");
        }
        if node.address.trim().is_empty() {
            anyhow::bail!("node {} has no address", node.name);
        }
        if !seen.insert(node.name.as_str()) {
            anyhow::bail!("duplicate node name: {}", node.name);
        }
    }
    Ok(())
}

/// Read-only node lookup, in configuration order
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: Vec<NodeRecord>,
}

impl NodeRegistry {
    pub fn new(nodes: Vec<NodeRecord>) -> Result<Self> {
        validate(&nodes)?;
        Ok(Self { nodes })
    }

    pub fn lookup(&self, name: &str) -> Option<&NodeRecord> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn summaries(&self) -> Vec<NodeSummary> {
        self.nodes.iter().map(NodeRecord::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
