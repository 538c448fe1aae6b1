// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Typed Graph Store
 * Concurrency-safe operational graph of evidence and hypotheses
 *
 * Nodes are keyed by stable string id; edges are an append-only list of
 * directed, labelled relations. All reads tolerate concurrent readers;
 * writes take the single writer lock. Read methods that enumerate nodes
 * return them in ascending id order so downstream planning stays
 * deterministic.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::errors::{CoreError, CoreResult};

/// Semantic role of a graph node. Closed at runtime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Observed execution evidence.
    Evidence,
    /// Generated hypotheses.
    Hypothesis,
    /// A technique option.
    Technique,
    /// Potential attack path steps.
    AttackPath,
    /// Verified sensitive-data exposure.
    DataExposure,
    /// Privilege escalation opportunity.
    PrivEsc,
    /// Lateral reachability between segments.
    LateralReachability,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Evidence => "evidence",
            NodeKind::Hypothesis => "hypothesis",
            NodeKind::Technique => "technique",
            NodeKind::AttackPath => "attack_path",
            NodeKind::DataExposure => "data_exposure",
            NodeKind::PrivEsc => "priv_esc",
            NodeKind::LateralReachability => "lateral_reachability",
        };
        f.write_str(s)
    }
}

/// How two graph nodes relate. Closed at runtime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Links evidence to hypotheses or paths it supports.
    Supports,
    /// Links facts to reachable next actions.
    Enables,
    /// Links a node to a more specific node.
    Refines,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdgeKind::Supports => "supports",
            EdgeKind::Enables => "enables",
            EdgeKind::Refines => "refines",
        };
        f.write_str(s)
    }
}

/// A fact in the operational reasoning graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub created_at: Option<DateTime<Utc>>,
    pub metadata: HashMap<String, String>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            created_at: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A directed, weighted relation between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub src_id: String,
    pub dst_id: String,
    pub kind: EdgeKind,
    pub weight: f64,
    pub created_at: Option<DateTime<Utc>>,
}

impl Edge {
    pub fn new(
        src_id: impl Into<String>,
        dst_id: impl Into<String>,
        kind: EdgeKind,
        weight: f64,
    ) -> Self {
        Self {
            src_id: src_id.into(),
            dst_id: dst_id.into(),
            kind,
            weight,
            created_at: None,
        }
    }
}

#[derive(Debug, Default)]
struct GraphInner {
    nodes: HashMap<String, Node>,
    edges: Vec<Edge>,
}

/// In-memory operational graph of evidence and hypotheses.
#[derive(Debug, Default)]
pub struct Graph {
    inner: RwLock<GraphInner>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a node by id. Sets the creation time if unset and
    /// normalizes missing metadata. Nodes with empty ids are ignored.
    pub fn upsert_node(&self, mut node: Node) {
        if node.id.is_empty() {
            return;
        }
        if node.created_at.is_none() {
            node.created_at = Some(Utc::now());
        }
        self.inner.write().nodes.insert(node.id.clone(), node);
    }

    /// Appends an edge. Both endpoints must already exist.
    pub fn add_edge(&self, mut edge: Edge) -> CoreResult<()> {
        if edge.src_id.is_empty() || edge.dst_id.is_empty() {
            return Err(CoreError::MissingField { field: "edge endpoint" });
        }
        let mut inner = self.inner.write();
        if !inner.nodes.contains_key(&edge.src_id) {
            return Err(CoreError::UnknownEndpoint {
                id: edge.src_id.clone(),
            });
        }
        if !inner.nodes.contains_key(&edge.dst_id) {
            return Err(CoreError::UnknownEndpoint {
                id: edge.dst_id.clone(),
            });
        }
        if edge.created_at.is_none() {
            edge.created_at = Some(Utc::now());
        }
        inner.edges.push(edge);
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<Node> {
        self.inner.read().nodes.get(id).cloned()
    }

    /// All nodes of a kind, sorted ascending by id.
    pub fn nodes_by_kind(&self, kind: NodeKind) -> Vec<Node> {
        let inner = self.inner.read();
        let mut out: Vec<Node> = inner
            .nodes
            .values()
            .filter(|n| n.kind == kind)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    /// All edges originating at a node, in insertion order.
    pub fn edges_from(&self, node_id: &str) -> Vec<Edge> {
        self.inner
            .read()
            .edges
            .iter()
            .filter(|e| e.src_id == node_id)
            .cloned()
            .collect()
    }

    /// True when at least one edge of the requested kind exists.
    pub fn has_edge_kind(&self, kind: EdgeKind) -> bool {
        self.inner.read().edges.iter().any(|e| e.kind == kind)
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.read().edges.len()
    }

    /// Renders the graph as Graphviz DOT text. Nodes are emitted in
    /// ascending id order, edges in insertion order; for the same graph the
    /// output is byte-identical.
    pub fn to_dot(&self) -> String {
        let inner = self.inner.read();

        let mut ids: Vec<&String> = inner.nodes.keys().collect();
        ids.sort();

        let mut out = String::from("digraph reasoning {\n");
        for id in ids {
            let n = &inner.nodes[id];
            out.push_str(&format!(
                "  \"{}\" [label=\"{}\\n({})\"];\n",
                n.id,
                escape_dot(&n.label),
                n.kind
            ));
        }
        for e in &inner.edges {
            out.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}:{:.2}\"];\n",
                e.src_id, e.dst_id, e.kind, e.weight
            ));
        }
        out.push_str("}\n");
        out
    }

    /// Visits every node and edge under a single read lock. Used by the
    /// snapshot projection to stay consistent without cloning the graph.
    pub(crate) fn visit<R>(&self, f: impl FnOnce(&HashMap<String, Node>, &[Edge]) -> R) -> R {
        let inner = self.inner.read();
        f(&inner.nodes, &inner.edges)
    }
}

fn escape_dot(input: &str) -> String {
    input.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_is_idempotent_by_id() {
        let graph = Graph::new();
        graph.upsert_node(Node::new("n1", NodeKind::Evidence, "first"));
        graph.upsert_node(Node::new("n1", NodeKind::Evidence, "second"));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node("n1").unwrap().label, "second");
        assert!(graph.node("n1").unwrap().created_at.is_some());
    }

    #[test]
    fn test_empty_id_ignored() {
        let graph = Graph::new();
        graph.upsert_node(Node::new("", NodeKind::Evidence, "ghost"));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_add_edge_requires_endpoints() {
        let graph = Graph::new();
        graph.upsert_node(Node::new("a", NodeKind::Evidence, "a"));
        let err = graph
            .add_edge(Edge::new("a", "missing", EdgeKind::Supports, 1.0))
            .unwrap_err();
        assert_eq!(err, CoreError::UnknownEndpoint { id: "missing".into() });

        graph.upsert_node(Node::new("b", NodeKind::Hypothesis, "b"));
        graph
            .add_edge(Edge::new("a", "b", EdgeKind::Supports, 1.0))
            .unwrap();
        assert!(graph.has_edge_kind(EdgeKind::Supports));
        assert!(!graph.has_edge_kind(EdgeKind::Enables));
        assert_eq!(graph.edges_from("a").len(), 1);
    }

    #[test]
    fn test_multi_edges_permitted() {
        let graph = Graph::new();
        graph.upsert_node(Node::new("a", NodeKind::Evidence, "a"));
        graph.upsert_node(Node::new("b", NodeKind::Hypothesis, "b"));
        graph
            .add_edge(Edge::new("a", "b", EdgeKind::Supports, 1.0))
            .unwrap();
        graph
            .add_edge(Edge::new("a", "b", EdgeKind::Supports, 0.5))
            .unwrap();
        assert_eq!(graph.edges_from("a").len(), 2);
    }

    #[test]
    fn test_nodes_by_kind_sorted() {
        let graph = Graph::new();
        graph.upsert_node(Node::new("z", NodeKind::Evidence, "z"));
        graph.upsert_node(Node::new("a", NodeKind::Evidence, "a"));
        graph.upsert_node(Node::new("m", NodeKind::Hypothesis, "m"));
        let ids: Vec<String> = graph
            .nodes_by_kind(NodeKind::Evidence)
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec!["a", "z"]);
    }

    #[test]
    fn test_dot_is_deterministic_and_escaped() {
        let graph = Graph::new();
        graph.upsert_node(Node::new("b", NodeKind::Hypothesis, "said \"hello\""));
        graph.upsert_node(Node::new("a", NodeKind::Evidence, "seed"));
        graph
            .add_edge(Edge::new("a", "b", EdgeKind::Supports, 0.8))
            .unwrap();

        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph reasoning {"));
        assert!(dot.contains("\"a\" [label=\"seed\\n(evidence)\"];"));
        assert!(dot.contains("said \\\"hello\\\""));
        assert!(dot.contains("\"a\" -> \"b\" [label=\"supports:0.80\"];"));
        assert_eq!(dot, graph.to_dot());
    }
}
