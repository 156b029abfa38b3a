//! Wire shapes shared between the workflow document model and the REST client.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single step of a workflow document.
///
/// Only `id` and `name` carry meaning for connection handling; every other
/// attribute is kept verbatim in `extra` so documents round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkflowNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// A directed link from an output port to another node.
///
/// `node` references the target either by display name or by id, depending on
/// which keying the surrounding [`Connections`] map uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEdge {
    pub node: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConnectionEdge {
    pub fn to(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            extra: Map::new(),
        }
    }

    /// Copy of this edge pointing at `node`; all other fields are kept.
    pub fn retarget(&self, node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            extra: self.extra.clone(),
        }
    }
}

/// Output groups leaving one node, keyed by connection type (`main`,
/// `ai_languageModel`, `ai_tool`, ...). The outer index of each group is the
/// output port.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeConnections {
    pub groups: IndexMap<String, Vec<Vec<ConnectionEdge>>>,
}

impl NodeConnections {
    pub const MAIN: &'static str = "main";

    /// Ports of the `main` group; empty when the node has none.
    pub fn main(&self) -> &[Vec<ConnectionEdge>] {
        self.groups
            .get(Self::MAIN)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every edge of every group, in document order.
    pub fn edges(&self) -> impl Iterator<Item = &ConnectionEdge> {
        self.groups.values().flatten().flatten()
    }
}

/// Source node reference -> output groups, in document order.
pub type Connections = IndexMap<String, NodeConnections>;

/// Entry returned by the workflow listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One page of the paginated workflow listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPage {
    pub data: Vec<WorkflowSummary>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}
