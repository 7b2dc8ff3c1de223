use serde::{Deserialize, Serialize};

/// Object kinds that can appear in a topology trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Ingress,
    Service,
    Pod,
}

impl std::fmt::Display for TraceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceKind::Ingress => write!(f, "ingress"),
            TraceKind::Service => write!(f, "service"),
            TraceKind::Pod => write!(f, "pod"),
        }
    }
}

impl std::str::FromStr for TraceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ingress" => Ok(TraceKind::Ingress),
            "service" => Ok(TraceKind::Service),
            "pod" => Ok(TraceKind::Pod),
            other => Err(format!("unknown trace kind '{}'", other)),
        }
    }
}

/// Identity of a node in the trace graph. Two nodes are the same node
/// iff kind and name both match — no string-concatenated keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    pub name: String,
}

impl NodeKey {
    pub fn new(kind: TraceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub from: NodeKey,
    pub to: NodeKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceNode {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    pub name: String,
    pub healthy: bool,
    pub message: String,
}

impl TraceNode {
    pub fn key(&self) -> NodeKey {
        NodeKey::new(self.kind, self.name.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEdge {
    pub from: NodeKey,
    pub to: NodeKey,
    pub healthy: bool,
    pub message: String,
}

impl TraceEdge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            from: self.from.clone(),
            to: self.to.clone(),
        }
    }
}

/// The deduplicated node/edge sets returned by a trace request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceGraph {
    pub nodes: Vec<TraceNode>,
    pub edges: Vec<TraceEdge>,
}
