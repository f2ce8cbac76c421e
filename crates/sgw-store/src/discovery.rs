use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use sgw_types::{GatewayResult, RequestContext};

use crate::memory::InMemoryNode;
use crate::traits::{NodeDiscovery, NodeHandle};

/// Declarative description of one statically configured node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(default = "default_online")]
    pub online: bool,
}

fn default_online() -> bool {
    true
}

impl NodeSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            online: true,
        }
    }
}

/// Discovery provider returning a fixed set of node handles.
///
/// The same handles are returned on every call, so node state survives
/// refresh cycles.
#[derive(Clone, Default)]
pub struct StaticDiscovery {
    nodes: Vec<NodeHandle>,
}

impl StaticDiscovery {
    pub fn new(nodes: Vec<NodeHandle>) -> Self {
        Self { nodes }
    }

    /// Build in-memory nodes from their specs.
    pub fn in_memory(specs: &[NodeSpec]) -> Self {
        let nodes = specs
            .iter()
            .map(|spec| {
                let node = InMemoryNode::new(spec.id.clone());
                node.set_online(spec.online);
                Arc::new(node) as NodeHandle
            })
            .collect();
        Self { nodes }
    }

    pub fn nodes(&self) -> &[NodeHandle] {
        &self.nodes
    }
}

#[async_trait]
impl NodeDiscovery for StaticDiscovery {
    async fn discover_nodes(&self, ctx: &RequestContext) -> GatewayResult<Vec<NodeHandle>> {
        debug!(
            correlation_id = %ctx.correlation_id,
            count = self.nodes.len(),
            "static discovery"
        );
        Ok(self.nodes.clone())
    }
}

impl std::fmt::Debug for StaticDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.nodes.iter().map(|n| n.id()).collect();
        f.debug_struct("StaticDiscovery").field("nodes", &ids).finish()
    }
}
