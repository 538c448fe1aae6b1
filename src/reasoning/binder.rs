// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Action Binder
 * Deterministic action-class-driven hypothesis generation and graph updates
 *
 * Action classes act as graph rules: when phase and preconditions match,
 * the binder emits deterministic hypotheses anchored to the matching class
 * ids. After a successful execution the binder applies the class's
 * production semantics to the live graph. Only the binder mutates the graph
 * during a cycle.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use chrono::Utc;
use tracing::debug;

use crate::catalog::action_class::{ActionCatalog, ActionClass};
use crate::errors::CoreResult;
use crate::evidence::artifact::EvidenceArtifact;
use crate::governance::phase::Phase;
use crate::governance::state::CampaignState;
use crate::graph::pattern::matches_graph;
use crate::graph::store::{Edge, Graph, Node, NodeKind};
use crate::reasoning::hypothesis::Hypothesis;

/// Normalized event emitted by the executor.
#[derive(Debug, Clone, Default)]
pub struct EvidenceEvent {
    pub technique_id: String,
    pub target: String,
    pub success: bool,
    pub output: String,
    /// Signed artifact backing the event, when one was produced.
    pub artifact: Option<EvidenceArtifact>,
}

/// Coarse monotone mapping from execution progress to the active phase.
pub fn phase_for_state(state: &CampaignState) -> Phase {
    match state.executions() {
        n if n >= 5 => Phase::Objective,
        n if n >= 3 => Phase::LateralMovement,
        _ => Phase::Recon,
    }
}

/// Binds the catalogue to hypothesis generation and graph mutation.
#[derive(Debug, Default)]
pub struct ActionBinder;

impl ActionBinder {
    /// Emits a hypothesis for every bound class whose phase equals the
    /// state-derived phase and whose preconditions match the live graph.
    /// Classes are visited in ascending id order.
    pub fn match_and_generate(
        &self,
        catalog: &ActionCatalog,
        graph: &Graph,
        state: &CampaignState,
    ) -> Vec<Hypothesis> {
        let current_phase = phase_for_state(state);
        let mut out = Vec::new();
        for ac in catalog.classes() {
            if ac.phase != current_phase {
                continue;
            }
            if !matches_graph(graph, &ac.preconditions) {
                continue;
            }
            out.push(Hypothesis {
                id: format!("hyp-ac-{}", ac.id),
                action_class_id: Some(ac.id.clone()),
                statement: format!("action class {} is feasible in {}", ac.name, ac.phase),
                supporting_node_ids: Vec::new(),
                confidence: 0.5 + ac.confidence_boost,
                inference_depth: 1,
            });
        }
        debug!(
            phase = %current_phase,
            hypotheses = out.len(),
            "action-class matching complete"
        );
        out
    }

    /// Mutates the graph using action-class production semantics: a fresh
    /// evidence node for the execution, one node per produced kind, and one
    /// edge per produced edge kind from the evidence node to the first
    /// produced node.
    pub fn apply_action(
        &self,
        graph: &Graph,
        action: &ActionClass,
        event: &EvidenceEvent,
    ) -> CoreResult<()> {
        let ts = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let evidence_node_id = format!("ev-{}-{}", ts, event.technique_id);
        graph.upsert_node(
            Node::new(
                evidence_node_id.clone(),
                NodeKind::Evidence,
                format!("{}@{}", event.technique_id, event.target),
            )
            .with_metadata("success", event.success.to_string())
            .with_metadata("target", event.target.clone()),
        );

        let mut produced_ids = Vec::with_capacity(action.produces_nodes.len());
        for (idx, kind) in action.produces_nodes.iter().enumerate() {
            let node_id = format!("ac-{}-{}-{}", action.id, idx, ts);
            graph.upsert_node(Node::new(
                node_id.clone(),
                *kind,
                format!("{} produced {}", action.id, kind),
            ));
            produced_ids.push(node_id);
        }

        let Some(first_produced) = produced_ids.first() else {
            return Ok(());
        };
        for kind in &action.produces_edges {
            graph.add_edge(Edge::new(
                evidence_node_id.clone(),
                first_produced.clone(),
                *kind,
                1.0,
            ))?;
        }
        Ok(())
    }
}
