// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Reasoning and Planning Library
 * Deterministic adversary-simulation advisory core
 *
 * Given a typed knowledge graph of evidence, hypotheses, techniques, and
 * attack-path nodes plus a catalogue of canonical action classes, the core
 * answers three queries: next-action selection, attack-path expansion, and
 * campaign planning. Cycles are gated by intent, ROE, exposure, and
 * campaign lifecycle governance. The core performs no real adversarial
 * action and no network I/O.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod advisory;
pub mod catalog;
pub mod errors;
pub mod evidence;
pub mod governance;
pub mod graph;
pub mod reasoning;

pub use advisory::{HypothesisExpander, ValidatedExpander, CANONICAL_ACTION_CLASS_IDS};
pub use catalog::{load_action_classes_from_dir, ActionCatalog, ActionClass};
pub use errors::{CoreError, CoreResult, IntentError};
pub use evidence::EvidenceArtifact;
pub use governance::{
    phase_allowed, CampaignState, CampaignStatus, ExposureLevel, ExposureSnapshot,
    ExposureTracker, IntentContract, Phase, PhaseMachine, RoeEnforcer,
};
pub use graph::{
    matches_graph, seed_synthetic_environment, Edge, EdgeKind, Graph, GraphPattern, GraphSnapshot,
    Node, NodeKind, SeedScenario,
};
pub use reasoning::{
    phase_for_state, AttackPath, AttackPathConfig, AttackStep, Campaign, CampaignOptions,
    CampaignTrace, CycleConfig, CycleOutcome, Decision, Engine, EvidenceEvent, Hypothesis,
    PlannerQuery, RankedAction, ScoreConfig, TechniqueEffect, TechniqueExecutor,
    TechniqueScoreWeights,
};
