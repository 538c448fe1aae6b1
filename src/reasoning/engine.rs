// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Reasoning Engine
 * Cycle orchestrator over the in-memory operational graph
 *
 * The engine owns the graph, catalogue, effect registry, and planner; the
 * campaign state and exposure tracker are injected per cycle. One cycle is
 * strictly ordered: governance gate, planning (with ignorable advisory
 * merge), deadline-bounded execution, execution and exposure accounting,
 * mandatory signed evidence, and binder-driven graph mutation.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::advisory::HypothesisExpander;
use crate::catalog::action_class::{ActionCatalog, ActionClass};
use crate::errors::{CoreError, CoreResult};
use crate::evidence::artifact::EvidenceArtifact;
use crate::governance::exposure::ExposureTracker;
use crate::governance::phase::Phase;
use crate::governance::state::{CampaignState, CampaignStatus};
use crate::graph::snapshot::GraphSnapshot;
use crate::graph::store::{Edge, EdgeKind, Graph, Node, NodeKind};
use crate::reasoning::attack_path::{
    enrich_ranked_with_paths, expand_attack_paths, AttackPathConfig,
};
use crate::reasoning::binder::{phase_for_state, ActionBinder, EvidenceEvent};
use crate::reasoning::campaign::{plan_campaign, Campaign, CampaignOptions};
use crate::reasoning::hypothesis::{self, Hypothesis};
use crate::reasoning::memory::{apply_state_memory_adjustments, CampaignTrace};
use crate::reasoning::planner::{
    sort_ranked, Planner, PlannerQuery, RankedAction, TechniqueEffect, TechniqueScoreWeights,
};
use crate::reasoning::registry::EffectRegistry;
use crate::reasoning::scorer::{AttackPath, ScoreConfig};

/// Fixed exposure cost charged per execution attempt.
const EXECUTION_EXPOSURE: u64 = 10;

/// Default deadline for a single executor invocation.
const DEFAULT_CYCLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes a selected technique against a target. The only operation in
/// the core that may block or await; it runs under the cycle deadline and
/// must return promptly on cancellation.
#[async_trait]
pub trait TechniqueExecutor: Send + Sync {
    async fn run(&self, technique_id: &str, target: &str) -> CoreResult<EvidenceArtifact>;
}

/// Structured planning output for executor consumption.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub selected: RankedAction,
    pub ranked: Vec<RankedAction>,
    pub created_at: DateTime<Utc>,
}

/// Complete result of one reasoning + execution cycle. The decision and
/// signed artifact are always present for an attempted execution, even when
/// the executor failed.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub decision: Decision,
    pub artifact: Option<EvidenceArtifact>,
    pub executor_error: Option<CoreError>,
    pub halted_by_exposure: bool,
}

/// Execution wiring for a full reasoning cycle.
#[derive(Clone, Default)]
pub struct CycleConfig {
    pub target: String,
    pub allowed_techniques: Vec<String>,
    pub executor: Option<Arc<dyn TechniqueExecutor>>,
    /// Zero means the 30 s default.
    pub timeout: Duration,
}

/// Orchestrates the full reasoning lifecycle over an in-memory graph.
pub struct Engine {
    graph: Graph,
    catalog: ActionCatalog,
    registry: Arc<EffectRegistry>,
    planner: Planner,
    binder: ActionBinder,
    expander: Option<Box<dyn HypothesisExpander>>,
    cycle: RwLock<CycleConfig>,
    attack_path_config: RwLock<AttackPathConfig>,
    score_config: RwLock<ScoreConfig>,
}

impl Engine {
    /// Constructs an engine with an empty graph, catalogue, and registry.
    /// The advisory expander is optional and never authoritative.
    pub fn new(expander: Option<Box<dyn HypothesisExpander>>) -> Self {
        let registry = Arc::new(EffectRegistry::new());
        let planner = Planner::new(Arc::clone(&registry), TechniqueScoreWeights::default());
        Self {
            graph: Graph::new(),
            catalog: ActionCatalog::new(),
            registry,
            planner,
            binder: ActionBinder,
            expander,
            cycle: RwLock::new(CycleConfig::default()),
            attack_path_config: RwLock::new(AttackPathConfig::default()),
            score_config: RwLock::new(ScoreConfig::default()),
        }
    }

    /// The underlying operational graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Atomically replaces the action-class set driving deterministic
    /// reasoning.
    pub fn bind_action_classes(&self, classes: Vec<ActionClass>) {
        self.catalog.bind(classes);
    }

    pub fn action_class(&self, id: &str) -> Option<ActionClass> {
        self.catalog.by_id(id)
    }

    /// Registers effect metadata for a technique. Duplicate registration is
    /// a programmer error.
    pub fn register_technique_effect(&self, effect: TechniqueEffect) -> CoreResult<()> {
        self.registry.register(effect)
    }

    /// Registers or replaces effect metadata.
    pub fn upsert_technique_effect(&self, effect: TechniqueEffect) {
        self.registry.upsert(effect);
    }

    pub fn effect_for_technique(&self, technique_id: &str) -> CoreResult<TechniqueEffect> {
        self.registry.effect_for(technique_id)
    }

    pub fn known_techniques(&self) -> Vec<String> {
        self.registry.known_techniques()
    }

    /// Checks the configurable technique-per-class coverage invariant.
    pub fn verify_catalog_coverage(&self, min_techniques_per_class: usize) -> CoreResult<()> {
        self.registry
            .verify_catalog_coverage(&self.catalog, min_techniques_per_class)
    }

    /// Updates graph state from executor evidence.
    pub fn ingest_evidence(&self, event: &EvidenceEvent) -> CoreResult<()> {
        if event.technique_id.is_empty() {
            return Err(CoreError::MissingField {
                field: "technique_id",
            });
        }
        if event.target.is_empty() {
            return Err(CoreError::MissingField { field: "target" });
        }
        let node_id = format!(
            "ev-{}-{}",
            Utc::now().timestamp_nanos_opt().unwrap_or_default(),
            event.technique_id
        );
        self.graph.upsert_node(
            Node::new(
                node_id,
                NodeKind::Evidence,
                format!("{}@{}", event.technique_id, event.target),
            )
            .with_metadata("success", event.success.to_string())
            .with_metadata("target", event.target.clone()),
        );
        Ok(())
    }

    /// Creates deterministic hypotheses from evidence and action-class
    /// matching, then appends advisory hypotheses when an expander is
    /// configured. Advisory failures are swallowed.
    pub fn generate_hypotheses(&self, state: &CampaignState) -> Vec<Hypothesis> {
        let mut hypotheses = hypothesis::generate_hypotheses(&self.graph);
        hypotheses.extend(
            self.binder
                .match_and_generate(&self.catalog, &self.graph, state),
        );
        if let Some(expander) = &self.expander {
            match expander.expand(&self.graph, state) {
                Ok(advisory) => hypotheses.extend(advisory),
                Err(err) => {
                    warn!(error = %err, "advisory expansion failed; planning continues")
                }
            }
        }
        hypotheses
    }

    /// Runs hypothesis generation, scoring, and action selection.
    pub fn plan_next_action(
        &self,
        query: &PlannerQuery,
        state: &CampaignState,
    ) -> CoreResult<Decision> {
        let hypotheses = self.generate_hypotheses(state);
        for h in &hypotheses {
            let mut node = Node::new(h.id.clone(), NodeKind::Hypothesis, h.statement.clone())
                .with_metadata("confidence", format!("{:.2}", h.confidence));
            if let Some(ac_id) = &h.action_class_id {
                node = node.with_metadata("action_class", ac_id.clone());
            }
            self.graph.upsert_node(node);
            for support in &h.supporting_node_ids {
                let _ = self.graph.add_edge(Edge::new(
                    support.clone(),
                    h.id.clone(),
                    EdgeKind::Supports,
                    h.confidence,
                ));
            }
        }

        let mut ranked = self.planner.ranked_actions(query);
        apply_state_memory_adjustments(&mut ranked, state);
        sort_ranked(&mut ranked);

        let phase = phase_for_state(state);
        if matches!(
            phase,
            Phase::LateralMovement | Phase::C2 | Phase::Objective
        ) {
            let paths = self.expand_attack_paths(state);
            if !paths.is_empty() {
                enrich_ranked_with_paths(&mut ranked, &paths);
            }
        }

        if ranked.is_empty() {
            return Err(CoreError::NoCandidates);
        }
        let decision = Decision {
            selected: ranked[0].clone(),
            ranked,
            created_at: Utc::now(),
        };

        let selected_node_id = format!("tech-{}", decision.selected.technique_id);
        self.graph.upsert_node(Node::new(
            selected_node_id.clone(),
            NodeKind::Technique,
            decision.selected.technique_id.clone(),
        ));
        for h in &hypotheses {
            let _ = self.graph.add_edge(Edge::new(
                h.id.clone(),
                selected_node_id.clone(),
                EdgeKind::Enables,
                h.confidence,
            ));
        }

        debug!(
            selected = %decision.selected.technique_id,
            candidates = decision.ranked.len(),
            "next action planned"
        );
        Ok(decision)
    }

    /// Computes feasible, scored attack paths from the current graph using
    /// virtual snapshot simulation.
    pub fn expand_attack_paths(&self, state: &CampaignState) -> Vec<AttackPath> {
        let classes = self.catalog.classes();
        let cfg = self.attack_path_config.read().clone();
        let score_cfg = self.score_config.read().clone();
        expand_attack_paths(&self.graph, &classes, state, &cfg, &score_cfg)
    }

    /// Computes prioritized strategic campaigns for a requested objective
    /// node kind. An absent objective is an invalid argument.
    pub fn plan_campaign(
        &self,
        objective: Option<NodeKind>,
        opts: CampaignOptions,
        state: &CampaignState,
    ) -> CoreResult<Vec<Campaign>> {
        let Some(objective) = objective else {
            return Err(CoreError::InvalidArgument("objective is required".into()));
        };
        let classes = self.catalog.classes();
        let score_cfg = self.score_config.read().clone();
        Ok(plan_campaign(
            &self.graph,
            &classes,
            objective,
            opts,
            state,
            &score_cfg,
        ))
    }

    /// Stores execution wiring for [`run_cycle`](Self::run_cycle).
    pub fn configure_cycle(&self, cfg: CycleConfig) {
        *self.cycle.write() = cfg;
    }

    /// Replaces the attack-path search configuration.
    pub fn configure_attack_paths(&self, cfg: AttackPathConfig) {
        *self.attack_path_config.write() = cfg;
    }

    /// Replaces the scoring constants.
    pub fn configure_scoring(&self, cfg: ScoreConfig) {
        *self.score_config.write() = cfg;
    }

    /// Graphviz DOT output for the current reasoning graph.
    pub fn dot(&self) -> String {
        self.graph.to_dot()
    }

    /// Executes one deterministic reasoning + execution cycle against the
    /// injected campaign state and exposure tracker.
    ///
    /// Hard governance failures (`CampaignNotRunnable`, `ExposureExceeded`)
    /// return `Err` before any planning occurs. Executor failures are
    /// surfaced in the outcome next to the decision and the signed
    /// artifact.
    pub async fn run_cycle(
        &self,
        state: &CampaignState,
        exposure: &ExposureTracker,
    ) -> CoreResult<CycleOutcome> {
        let cfg = self.cycle.read().clone();
        if cfg.target.is_empty() {
            return Err(CoreError::MissingField { field: "target" });
        }
        let Some(executor) = cfg.executor.clone() else {
            return Err(CoreError::MissingField { field: "executor" });
        };

        // Governance gate: lifecycle first, then the exposure latch.
        match state.status() {
            CampaignStatus::Initialized => state.start()?,
            CampaignStatus::Running => {}
            CampaignStatus::Halted | CampaignStatus::Completed => {
                return Err(CoreError::CampaignNotRunnable {
                    status: state.status().to_string(),
                })
            }
        }
        if exposure.halted() {
            let _ = state.halt("exposure limit exceeded");
            return Err(CoreError::ExposureExceeded);
        }

        let decision = self.plan_next_action(
            &PlannerQuery {
                target: cfg.target.clone(),
                allowed_techniques: cfg.allowed_techniques.clone(),
                current_technique_id: None,
                top_n: 1,
            },
            state,
        )?;

        let timeout = if cfg.timeout.is_zero() {
            DEFAULT_CYCLE_TIMEOUT
        } else {
            cfg.timeout
        };
        let technique_id = decision.selected.technique_id.clone();
        // No lock is held across this await point.
        let executed = match tokio::time::timeout(
            timeout,
            executor.run(&technique_id, &cfg.target),
        )
        .await
        {
            Ok(Ok(artifact)) => Ok(artifact),
            Ok(Err(err @ CoreError::ExecutorFailed(_))) => Err(err),
            Ok(Err(err)) => Err(CoreError::ExecutorFailed(err.to_string())),
            Err(_) => Err(CoreError::ExecutorFailed(format!(
                "deadline of {timeout:?} exceeded"
            ))),
        };

        // Execution accounting happens regardless of outcome. A latched
        // tracker halts the campaign at the next cycle's governance gate.
        let _ = state.record_execution();
        let _ = exposure.add(EXECUTION_EXPOSURE);
        let halted_by_exposure = exposure.halted();

        // Evidence is mandatory for every attempted execution.
        let (artifact, executor_error) = match executed {
            Ok(mut artifact) => {
                if !artifact.is_signed() {
                    if let Err(err) = artifact.sign() {
                        warn!(error = %err, "executor artifact could not be signed");
                    }
                }
                (artifact, None)
            }
            Err(err) => {
                let mut artifact = EvidenceArtifact::new(
                    state.campaign_id(),
                    technique_id.clone(),
                    cfg.target.clone(),
                    false,
                    String::new(),
                    exposure.score(),
                );
                if let Err(sign_err) = artifact.sign() {
                    warn!(error = %sign_err, "failure artifact could not be signed");
                }
                (artifact, Some(err))
            }
        };

        let event = EvidenceEvent {
            technique_id: artifact.technique_id.clone(),
            target: artifact.target.clone(),
            success: artifact.success,
            output: artifact.output.clone(),
            artifact: Some(artifact.clone()),
        };
        let mut applied = false;
        if let Some(ac_id) = decision.selected.action_class_id.as_deref() {
            if let Some(action) = self.catalog.by_id(ac_id) {
                applied = self.binder.apply_action(&self.graph, &action, &event).is_ok();
            }
        }
        if !applied {
            let _ = self.ingest_evidence(&event);
        }

        info!(
            technique = %technique_id,
            target = %cfg.target,
            success = artifact.success,
            exposure = exposure.score(),
            "cycle complete"
        );
        Ok(CycleOutcome {
            decision,
            artifact: Some(artifact),
            executor_error,
            halted_by_exposure,
        })
    }

    /// Runs `n` planner-only cycles without an executor, recording the
    /// state status, current phase, and selected score per cycle.
    pub fn simulate_campaign_cycles(&self, n: usize, state: &CampaignState) -> CampaignTrace {
        let mut trace = CampaignTrace::default();
        let cfg = self.cycle.read().clone();
        for _ in 0..n {
            trace.state_progression.push(state.status());
            trace.phase_transitions.push(phase_for_state(state));
            let decision = self.plan_next_action(
                &PlannerQuery {
                    target: cfg.target.clone(),
                    allowed_techniques: cfg.allowed_techniques.clone(),
                    current_technique_id: None,
                    top_n: 1,
                },
                state,
            );
            match decision {
                Ok(decision) => {
                    trace
                        .confidence_evolution
                        .push(decision.selected.score);
                    if let Some(ac_id) = decision.selected.action_class_id.as_deref() {
                        state.record_action_memory(ac_id, true, true);
                    }
                }
                Err(_) => trace.confidence_evolution.push(0.0),
            }
        }
        trace
    }

    /// Counting projection of the live graph; planning inputs for callers
    /// that run searches out of band.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::from_graph(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_evidence_requires_fields() {
        let engine = Engine::new(None);
        let err = engine
            .ingest_evidence(&EvidenceEvent {
                technique_id: String::new(),
                target: "host".into(),
                success: true,
                output: String::new(),
                artifact: None,
            })
            .unwrap_err();
        assert_eq!(err, CoreError::MissingField { field: "technique_id" });

        let err = engine
            .ingest_evidence(&EvidenceEvent {
                technique_id: "T-1".into(),
                target: String::new(),
                success: true,
                output: String::new(),
                artifact: None,
            })
            .unwrap_err();
        assert_eq!(err, CoreError::MissingField { field: "target" });
    }

    #[test]
    fn test_ingest_evidence_upserts_node_with_metadata() {
        let engine = Engine::new(None);
        engine
            .ingest_evidence(&EvidenceEvent {
                technique_id: "T-1".into(),
                target: "host-1".into(),
                success: true,
                output: String::new(),
                artifact: None,
            })
            .unwrap();
        let nodes = engine.graph().nodes_by_kind(NodeKind::Evidence);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].label, "T-1@host-1");
        assert_eq!(nodes[0].metadata.get("success").unwrap(), "true");
        assert_eq!(nodes[0].metadata.get("target").unwrap(), "host-1");
    }

    #[test]
    fn test_plan_campaign_requires_objective() {
        let engine = Engine::new(None);
        let state = CampaignState::new("camp").unwrap();
        assert!(matches!(
            engine.plan_campaign(None, CampaignOptions::default(), &state),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_plan_next_action_without_candidates() {
        let engine = Engine::new(None);
        let state = CampaignState::new("camp").unwrap();
        let err = engine
            .plan_next_action(
                &PlannerQuery {
                    target: "host".into(),
                    ..Default::default()
                },
                &state,
            )
            .unwrap_err();
        assert_eq!(err, CoreError::NoCandidates);
    }
}
