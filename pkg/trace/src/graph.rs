use std::collections::HashSet;

use kview_types::trace::{EdgeKey, NodeKey, TraceEdge, TraceGraph, TraceNode};

/// Accumulates trace nodes and edges, deduplicating by their composite
/// key value types while preserving first-seen order. Re-adding an
/// existing key is a no-op, so building the same walk twice yields the
/// same graph.
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<TraceNode>,
    edges: Vec<TraceEdge>,
    seen_nodes: HashSet<NodeKey>,
    seen_edges: HashSet<EdgeKey>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self, key: NodeKey, healthy: bool, message: &str) {
        if !self.seen_nodes.insert(key.clone()) {
            return;
        }
        self.nodes.push(TraceNode {
            kind: key.kind,
            name: key.name,
            healthy,
            message: message.to_string(),
        });
    }

    pub fn edge(&mut self, from: NodeKey, to: NodeKey, healthy: bool, message: &str) {
        let key = EdgeKey {
            from: from.clone(),
            to: to.clone(),
        };
        if !self.seen_edges.insert(key) {
            return;
        }
        self.edges.push(TraceEdge {
            from,
            to,
            healthy,
            message: message.to_string(),
        });
    }

    pub fn finish(self) -> TraceGraph {
        TraceGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}
