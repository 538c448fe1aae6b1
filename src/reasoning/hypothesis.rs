// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Hypotheses: inferred operational propositions, and the deterministic
//! baseline generation that derives them from graph evidence.

use serde::{Deserialize, Serialize};

use crate::graph::store::{Graph, NodeKind};

/// An inferred operational proposition with transparent evidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hypothesis {
    pub id: String,
    /// Action class this hypothesis is anchored to, when one applies.
    pub action_class_id: Option<String>,
    pub statement: String,
    /// Graph node ids supporting this proposition.
    pub supporting_node_ids: Vec<String>,
    /// Bounded confidence in [0, 1].
    pub confidence: f64,
    /// How many inference steps removed from direct observation.
    pub inference_depth: u32,
}

/// Derives baseline deterministic hypotheses from current graph evidence.
///
/// Every evidence node yields one hypothesis; confidence is 0.8 for
/// evidence whose metadata records a successful execution, 0.5 otherwise.
pub fn generate_hypotheses(graph: &Graph) -> Vec<Hypothesis> {
    let evidence_nodes = graph.nodes_by_kind(NodeKind::Evidence);
    let mut out = Vec::with_capacity(evidence_nodes.len());
    for (idx, node) in evidence_nodes.iter().enumerate() {
        let success = node
            .metadata
            .get("success")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        out.push(Hypothesis {
            id: format!("hyp-{}-{}", idx + 1, node.id),
            action_class_id: None,
            statement: format!("evidence from {} may enable follow-on actions", node.label),
            supporting_node_ids: vec![node.id.clone()],
            confidence: if success { 0.8 } else { 0.5 },
            inference_depth: 0,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::store::Node;

    #[test]
    fn test_confidence_split_on_success_metadata() {
        let graph = Graph::new();
        graph.upsert_node(
            Node::new("ev-a", NodeKind::Evidence, "probe a").with_metadata("success", "true"),
        );
        graph.upsert_node(
            Node::new("ev-b", NodeKind::Evidence, "probe b").with_metadata("success", "false"),
        );
        graph.upsert_node(Node::new("ev-c", NodeKind::Evidence, "probe c"));

        let hyps = generate_hypotheses(&graph);
        assert_eq!(hyps.len(), 3);
        // evidence nodes are visited in id order
        assert_eq!(hyps[0].id, "hyp-1-ev-a");
        assert_eq!(hyps[0].confidence, 0.8);
        assert_eq!(hyps[1].confidence, 0.5);
        assert_eq!(hyps[2].confidence, 0.5);
        assert_eq!(hyps[0].supporting_node_ids, vec!["ev-a"]);
        assert!(hyps[0]
            .statement
            .contains("evidence from probe a may enable follow-on actions"));
    }

    #[test]
    fn test_non_evidence_nodes_ignored() {
        let graph = Graph::new();
        graph.upsert_node(Node::new("hyp-x", NodeKind::Hypothesis, "not evidence"));
        assert!(generate_hypotheses(&graph).is_empty());
    }
}
