// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Graph Snapshot
 * Counting projection used for all search expansion
 *
 * The snapshot reduces a graph to kind -> count mappings: enough to decide
 * action-class preconditions in O(1), cheap to clone in inner search loops,
 * and hashable into a canonical string for cache keys. The live graph is
 * never mutated through a snapshot.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use std::collections::BTreeMap;

use crate::catalog::action_class::ActionClass;
use crate::graph::pattern::GraphPattern;
use crate::graph::store::{EdgeKind, Graph, NodeKind};

/// Compact counting projection of a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSnapshot {
    node_counts: BTreeMap<NodeKind, usize>,
    edge_counts: BTreeMap<EdgeKind, usize>,
}

impl GraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects the live graph under a single read lock.
    pub fn from_graph(graph: &Graph) -> Self {
        graph.visit(|nodes, edges| {
            let mut snapshot = Self::default();
            for node in nodes.values() {
                *snapshot.node_counts.entry(node.kind).or_insert(0) += 1;
            }
            for edge in edges {
                *snapshot.edge_counts.entry(edge.kind).or_insert(0) += 1;
            }
            snapshot
        })
    }

    pub fn has_node_kind(&self, kind: NodeKind) -> bool {
        self.node_counts.get(&kind).copied().unwrap_or(0) > 0
    }

    pub fn has_edge_kind(&self, kind: EdgeKind) -> bool {
        self.edge_counts.get(&kind).copied().unwrap_or(0) > 0
    }

    pub fn node_kind_count(&self, kind: NodeKind) -> usize {
        self.node_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Node kinds currently present, in kind order.
    pub fn present_node_kinds(&self) -> impl Iterator<Item = NodeKind> + '_ {
        self.node_counts
            .iter()
            .filter(|(_, c)| **c > 0)
            .map(|(k, _)| *k)
    }

    /// Registers a virtual node of the given kind. Used to seed the scorer's
    /// availability walk.
    pub fn add_node_kind(&mut self, kind: NodeKind) {
        *self.node_counts.entry(kind).or_insert(0) += 1;
    }

    /// Folds an action class's productions into the projection.
    pub fn apply(&mut self, action: &ActionClass) {
        for kind in &action.produces_nodes {
            *self.node_counts.entry(*kind).or_insert(0) += 1;
        }
        for kind in &action.produces_edges {
            *self.edge_counts.entry(*kind).or_insert(0) += 1;
        }
    }

    /// Snapshot equivalent of the graph pattern matcher.
    pub fn matches(&self, patterns: &[GraphPattern]) -> bool {
        for pattern in patterns {
            for kind in &pattern.required_node_kinds {
                if !self.has_node_kind(*kind) {
                    return false;
                }
            }
            for kind in &pattern.required_edge_kinds {
                if !self.has_edge_kind(*kind) {
                    return false;
                }
            }
        }
        true
    }

    /// Canonical hash: `n:<kind>:<count>` keys sorted ascending, then
    /// `e:<kind>:<count>` keys sorted ascending, joined with `|`.
    pub fn hash(&self) -> String {
        let mut node_keys: Vec<String> = self
            .node_counts
            .iter()
            .map(|(k, c)| format!("n:{k}:{c}"))
            .collect();
        node_keys.sort();
        let mut edge_keys: Vec<String> = self
            .edge_counts
            .iter()
            .map(|(k, c)| format!("e:{k}:{c}"))
            .collect();
        edge_keys.sort();
        node_keys.extend(edge_keys);
        node_keys.join("|")
    }
}
