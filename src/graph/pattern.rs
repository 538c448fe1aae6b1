// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Structural graph patterns and the matcher deciding whether a graph
//! satisfies them. Patterns are AND-joined; a pattern is satisfied when
//! each required node kind and edge kind exists at least once.

use serde::{Deserialize, Serialize};

use crate::graph::store::{EdgeKind, Graph, NodeKind};

/// Conjunction of required node kinds and edge kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphPattern {
    #[serde(default)]
    pub required_node_kinds: Vec<NodeKind>,
    #[serde(default)]
    pub required_edge_kinds: Vec<EdgeKind>,
}

impl GraphPattern {
    pub fn nodes(kinds: impl Into<Vec<NodeKind>>) -> Self {
        Self {
            required_node_kinds: kinds.into(),
            required_edge_kinds: Vec::new(),
        }
    }

    pub fn edges(kinds: impl Into<Vec<EdgeKind>>) -> Self {
        Self {
            required_node_kinds: Vec::new(),
            required_edge_kinds: kinds.into(),
        }
    }
}

/// Checks whether all patterns are satisfied by existing nodes and edges.
pub fn matches_graph(graph: &Graph, patterns: &[GraphPattern]) -> bool {
    for pattern in patterns {
        for kind in &pattern.required_node_kinds {
            if graph.nodes_by_kind(*kind).is_empty() {
                return false;
            }
        }
        for kind in &pattern.required_edge_kinds {
            if !graph.has_edge_kind(*kind) {
                return false;
            }
        }
    }
    true
}
