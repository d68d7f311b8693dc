//! The coverage graph (§3): every target attaches to a node through its
//! `canonPath`; edges record structural relationships the planner and
//! any future presenter can walk without re-deriving them from the
//! schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Schema,
    Property,
    Branch,
    Constraint,
    Enum,
    Operation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    #[serde(rename = "canonPath")]
    pub canon_path: String,
    #[serde(rename = "operationKey", default, skip_serializing_if = "Option::is_none")]
    pub operation_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Structural,
    Logical,
    Reference,
    Operation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverageGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl CoverageGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, kind: NodeKind, canon_path: &str) -> String {
        let id = format!("{}:{}", node_kind_tag(kind), canon_path);
        if !self.nodes.iter().any(|n| n.id == id) {
            self.nodes.push(GraphNode {
                id: id.clone(),
                kind,
                canon_path: canon_path.to_string(),
                operation_key: None,
                meta: None,
            });
        }
        id
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>, kind: EdgeKind) {
        self.edges.push(GraphEdge {
            from: from.into(),
            to: to.into(),
            kind,
            meta: None,
        });
    }
}

fn node_kind_tag(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Schema => "schema",
        NodeKind::Property => "property",
        NodeKind::Branch => "branch",
        NodeKind::Constraint => "constraint",
        NodeKind::Enum => "enum",
        NodeKind::Operation => "operation",
    }
}
