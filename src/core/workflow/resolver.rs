//! Rewrites a name-keyed connection graph into the id-keyed form expected by the API.
//!
//! Workflow files reference nodes by display name, both as the source key of each
//! connection entry and as the `node` target of every edge. Every connection type
//! (`main`, `ai_languageModel`, `ai_tool`, ...) is rewritten the same way. The remote API wants the
//! same graph keyed by node ids. Dangling names are not fatal: the offending source or
//! edge is dropped, a warning is logged and a [`ResolveDiagnostic`] is recorded so the
//! caller can still submit a best-effort graph.

use n8n_workflow_types::{ConnectionEdge, Connections, NodeConnections, WorkflowNode};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Problem found while rewriting connection references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveDiagnostic {
    /// A connection group is keyed by a name no node carries. The group is dropped.
    UnknownSource { source: String },
    /// An edge points at a name no node carries. The edge is dropped.
    UnknownTarget {
        source: String,
        group: String,
        port: usize,
        target: String,
    },
    /// Two nodes share a display name; the later node wins the lookup.
    DuplicateNodeName {
        name: String,
        kept_id: String,
        shadowed_id: String,
    },
}

impl ResolveDiagnostic {
    /// Returns `true` when the diagnostic caused part of the graph to be omitted.
    pub fn is_omission(&self) -> bool {
        matches!(
            self,
            ResolveDiagnostic::UnknownSource { .. } | ResolveDiagnostic::UnknownTarget { .. }
        )
    }
}

impl fmt::Display for ResolveDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveDiagnostic::UnknownSource { source } => {
                write!(f, "source node '{}' not found; its connections were dropped", source)
            }
            ResolveDiagnostic::UnknownTarget {
                source,
                group,
                port,
                target,
            } => write!(
                f,
                "target node '{}' (from '{}', {} output {}) not found; edge dropped",
                target, source, group, port
            ),
            ResolveDiagnostic::DuplicateNodeName {
                name,
                kept_id,
                shadowed_id,
            } => write!(
                f,
                "node name '{}' is used more than once; '{}' resolves to id '{}' (shadowing '{}')",
                name, name, kept_id, shadowed_id
            ),
        }
    }
}

/// Id-keyed graph together with every problem noticed while building it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub connections: Connections,
    pub diagnostics: Vec<ResolveDiagnostic>,
}

impl Resolution {
    /// Number of dropped sources and edges.
    pub fn omissions(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.is_omission())
            .count()
    }
}

/// Rewrite `connections` from node names to node ids.
pub fn resolve_connections(nodes: &[WorkflowNode], connections: &Connections) -> Connections {
    resolve_connections_with_diagnostics(nodes, connections).connections
}

/// Same as [`resolve_connections`], also returning the diagnostics as values.
pub fn resolve_connections_with_diagnostics(
    nodes: &[WorkflowNode],
    connections: &Connections,
) -> Resolution {
    let mut diagnostics = Vec::new();
    let lookup = name_lookup(nodes, &mut diagnostics);
    let mut resolved = Connections::with_capacity(connections.len());

    for (source, groups) in connections {
        let Some(source_id) = lookup.get(source.as_str()) else {
            tracing::warn!(source = %source, "connection source does not match any node");
            diagnostics.push(ResolveDiagnostic::UnknownSource {
                source: source.clone(),
            });
            continue;
        };

        let mut resolved_groups = NodeConnections::default();
        for (group, ports) in &groups.groups {
            let mut kept_ports = Vec::with_capacity(ports.len());
            for (port, edges) in ports.iter().enumerate() {
                let origin = EdgeOrigin {
                    source,
                    group,
                    port,
                };
                let kept = resolve_port(origin, edges, &lookup, &mut diagnostics);
                // Ports with no surviving edge are removed, not kept as `[]`.
                if !kept.is_empty() {
                    kept_ports.push(kept);
                }
            }
            resolved_groups.groups.insert(group.clone(), kept_ports);
        }

        resolved.insert((*source_id).to_string(), resolved_groups);
    }

    Resolution {
        connections: resolved,
        diagnostics,
    }
}

#[derive(Clone, Copy)]
struct EdgeOrigin<'a> {
    source: &'a str,
    group: &'a str,
    port: usize,
}

fn resolve_port(
    origin: EdgeOrigin<'_>,
    edges: &[ConnectionEdge],
    lookup: &HashMap<&str, &str>,
    diagnostics: &mut Vec<ResolveDiagnostic>,
) -> Vec<ConnectionEdge> {
    let mut kept = Vec::with_capacity(edges.len());
    for edge in edges {
        match lookup.get(edge.node.as_str()) {
            Some(target_id) => kept.push(edge.retarget(*target_id)),
            None => {
                tracing::warn!(
                    source = %origin.source,
                    group = %origin.group,
                    port = origin.port,
                    target = %edge.node,
                    "connection target does not match any node"
                );
                diagnostics.push(ResolveDiagnostic::UnknownTarget {
                    source: origin.source.to_string(),
                    group: origin.group.to_string(),
                    port: origin.port,
                    target: edge.node.clone(),
                });
            }
        }
    }
    kept
}

// Last write wins on duplicate names.
fn name_lookup<'a>(
    nodes: &'a [WorkflowNode],
    diagnostics: &mut Vec<ResolveDiagnostic>,
) -> HashMap<&'a str, &'a str> {
    let mut lookup = HashMap::with_capacity(nodes.len());
    for node in nodes {
        if let Some(previous) = lookup.insert(node.name.as_str(), node.id.as_str()) {
            tracing::debug!(
                name = %node.name,
                kept = %node.id,
                shadowed = %previous,
                "duplicate node name"
            );
            diagnostics.push(ResolveDiagnostic::DuplicateNodeName {
                name: node.name.clone(),
                kept_id: node.id.clone(),
                shadowed_id: previous.to_string(),
            });
        }
    }
    lookup
}
