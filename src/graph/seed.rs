// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Deterministic synthetic environment seeding for simulation runs.

use serde::{Deserialize, Serialize};

use crate::graph::store::{Edge, EdgeKind, Graph, Node, NodeKind};

/// Synthetic environment profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeedScenario {
    Minimal,
    Rich,
}

/// Generates deterministic graph state for simulation.
pub fn seed_synthetic_environment(graph: &Graph, scenario: SeedScenario) {
    graph.upsert_node(Node::new(
        "env-public-web",
        NodeKind::Evidence,
        "public web app exposure",
    ));

    if scenario == SeedScenario::Rich {
        graph.upsert_node(Node::new(
            "env-hybrid-cloud",
            NodeKind::Evidence,
            "hybrid cloud infrastructure",
        ));
        graph.upsert_node(Node::new(
            "env-segment-a",
            NodeKind::Hypothesis,
            "internal segmented network",
        ));
        graph.upsert_node(Node::new(
            "env-cred-reuse",
            NodeKind::Evidence,
            "credential reuse across services",
        ));
        graph.upsert_node(Node::new(
            "env-priv-boundary",
            NodeKind::Hypothesis,
            "misconfigured privilege boundary",
        ));

        let _ = graph.add_edge(Edge::new(
            "env-public-web",
            "env-segment-a",
            EdgeKind::Supports,
            1.0,
        ));
        let _ = graph.add_edge(Edge::new(
            "env-cred-reuse",
            "env-priv-boundary",
            EdgeKind::Supports,
            1.0,
        ));
    }
}
