// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! The reasoning core: hypothesis generation, action binding, scoring,
//! beam-search path and campaign planning, and the cycle orchestrator.

pub mod attack_path;
pub mod binder;
pub mod campaign;
pub mod engine;
pub mod hypothesis;
pub mod memory;
pub mod planner;
pub mod registry;
pub mod scorer;

pub use attack_path::{expand_attack_paths, AttackPathConfig, RoePolicy};
pub use binder::{phase_for_state, ActionBinder, EvidenceEvent};
pub use campaign::{plan_campaign, AttackStep, Campaign, CampaignOptions};
pub use engine::{CycleConfig, CycleOutcome, Decision, Engine, TechniqueExecutor};
pub use hypothesis::{generate_hypotheses, Hypothesis};
pub use memory::CampaignTrace;
pub use planner::{
    score_technique, Planner, PlannerQuery, RankedAction, TechniqueEffect, TechniqueScoreWeights,
};
pub use registry::EffectRegistry;
pub use scorer::{score_path, AttackPath, ScoreConfig, UnlockCache};
