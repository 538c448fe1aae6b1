// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Campaign Planner
 * Objective-biased beam search emitting prioritized multi-step campaigns
 *
 * Builds on the attack-path machinery with stricter pruning: cumulative
 * risk must stay within tolerance, average step confidence must clear the
 * threshold, and feasibility must never regress versus the parent
 * candidate. Campaigns are collected whenever a candidate's last action
 * produces the requested objective.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use std::cmp::Ordering;
use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::action_class::ActionClass;
use crate::governance::phase::{phase_allowed, Phase};
use crate::governance::state::CampaignState;
use crate::graph::snapshot::GraphSnapshot;
use crate::graph::store::{Graph, NodeKind};
use crate::reasoning::attack_path::ActionClassIndex;
use crate::reasoning::binder::phase_for_state;
use crate::reasoning::hypothesis::Hypothesis;
use crate::reasoning::scorer::{
    average_feasibility, cumulative_risk, score_path, ScoreConfig, UnlockCache,
};

/// Campaign-oriented projection of an action-class step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttackStep {
    pub action_class_id: String,
    pub statement: String,
    pub confidence: f64,
    pub phase: Phase,
}

/// A strategic sequence of attack steps toward an objective.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub steps: Vec<AttackStep>,
    pub score: f64,
    pub risk: f64,
    pub objective: NodeKind,
    pub confidence: f64,
}

/// Search bounds and pruning behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CampaignOptions {
    pub max_depth: usize,
    pub risk_tolerance: f64,
    pub confidence_threshold: f64,
    pub beam_width: usize,
    pub top_n: usize,
    pub objective_bias_weight: f64,
}

impl Default for CampaignOptions {
    /// Conservative deterministic planning defaults.
    fn default() -> Self {
        Self {
            max_depth: 5,
            risk_tolerance: 2.0,
            confidence_threshold: 0.55,
            beam_width: 25,
            top_n: 10,
            objective_bias_weight: 0.35,
        }
    }
}

impl CampaignOptions {
    /// Non-positive fields fall back to defaults.
    fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            max_depth: if self.max_depth == 0 {
                defaults.max_depth
            } else {
                self.max_depth
            },
            risk_tolerance: if self.risk_tolerance <= 0.0 {
                defaults.risk_tolerance
            } else {
                self.risk_tolerance
            },
            confidence_threshold: if self.confidence_threshold <= 0.0 {
                defaults.confidence_threshold
            } else {
                self.confidence_threshold
            },
            beam_width: if self.beam_width == 0 {
                defaults.beam_width
            } else {
                self.beam_width
            },
            top_n: if self.top_n == 0 {
                defaults.top_n
            } else {
                self.top_n
            },
            objective_bias_weight: if self.objective_bias_weight <= 0.0 {
                defaults.objective_bias_weight
            } else {
                self.objective_bias_weight
            },
        }
    }
}

#[derive(Clone)]
struct CampaignCandidate {
    snapshot: GraphSnapshot,
    actions: Vec<ActionClass>,
    steps: Vec<AttackStep>,
    score: f64,
    risk: f64,
    confidence: f64,
    objective_reached: bool,
    phase_progress: Vec<Phase>,
    feasibility: f64,
    key: String,
}

impl CampaignCandidate {
    fn root(snapshot: GraphSnapshot) -> Self {
        Self {
            snapshot,
            actions: Vec::new(),
            steps: Vec::new(),
            score: 0.0,
            risk: 0.0,
            confidence: 0.0,
            objective_reached: false,
            phase_progress: Vec::new(),
            feasibility: 0.0,
            key: String::new(),
        }
    }
}

/// Computes prioritized strategic campaigns for a requested objective node
/// kind. Pure over the snapshot; the live graph is never mutated.
pub fn plan_campaign(
    graph: &Graph,
    classes: &[ActionClass],
    objective: NodeKind,
    opts: CampaignOptions,
    state: &CampaignState,
    score_cfg: &ScoreConfig,
) -> Vec<Campaign> {
    if classes.is_empty() {
        return Vec::new();
    }
    let opts = opts.normalized();
    let mut sorted_classes = classes.to_vec();
    sorted_classes.sort_by(|a, b| a.id.cmp(&b.id));

    let index = ActionClassIndex::build(&sorted_classes);
    let mut unlock_cache = UnlockCache::new();
    let current_phase = phase_for_state(state);

    let mut beam = vec![CampaignCandidate::root(GraphSnapshot::from_graph(graph))];
    let mut seen: HashSet<String> = HashSet::new();
    let mut campaigns: Vec<Campaign> = Vec::new();

    for _depth in 1..=opts.max_depth {
        beam = prune_campaign_beam(beam, opts.beam_width);
        let mut next_beam: Vec<CampaignCandidate> = Vec::with_capacity(beam.len());
        for candidate in &beam {
            for action in index.eligible(&candidate.snapshot) {
                if candidate.actions.iter().any(|c| c.id == action.id) {
                    continue;
                }
                if !campaign_phase_allowed(current_phase, &candidate.phase_progress, action.phase)
                    || !candidate.snapshot.matches(&action.preconditions)
                {
                    continue;
                }
                let Some(projected) = project_candidate(
                    candidate,
                    &action,
                    &sorted_classes,
                    objective,
                    &opts,
                    score_cfg,
                    &mut unlock_cache,
                ) else {
                    continue;
                };
                if projected.objective_reached {
                    let campaign = Campaign {
                        steps: projected.steps.clone(),
                        score: projected.score,
                        risk: projected.risk,
                        objective,
                        confidence: projected.confidence,
                    };
                    if seen.insert(campaign_key(&campaign)) {
                        campaigns.push(campaign);
                    }
                }
                next_beam.push(projected);
            }
        }
        next_beam = prune_campaign_beam(next_beam, opts.beam_width);
        if next_beam.is_empty() {
            break;
        }
        beam = next_beam;
    }

    campaigns.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| campaign_key(a).cmp(&campaign_key(b)))
    });
    campaigns.truncate(opts.top_n);
    debug!(
        campaigns = campaigns.len(),
        objective = %objective,
        "campaign planning complete"
    );
    campaigns
}

fn prune_campaign_beam(mut beam: Vec<CampaignCandidate>, width: usize) -> Vec<CampaignCandidate> {
    beam.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    beam.truncate(width);
    beam
}

#[allow(clippy::too_many_arguments)]
fn project_candidate(
    candidate: &CampaignCandidate,
    action: &ActionClass,
    classes: &[ActionClass],
    objective: NodeKind,
    opts: &CampaignOptions,
    score_cfg: &ScoreConfig,
    unlock_cache: &mut UnlockCache,
) -> Option<CampaignCandidate> {
    let mut snapshot = candidate.snapshot.clone();
    if !snapshot.matches(&action.preconditions) {
        return None;
    }
    snapshot.apply(action);

    let mut actions = candidate.actions.clone();
    actions.push(action.clone());
    let risk = cumulative_risk(&actions);
    if risk > opts.risk_tolerance {
        return None;
    }

    let mut steps = candidate.steps.clone();
    steps.push(attack_step_for_action(action));
    let confidence = average_step_confidence(&steps);
    if confidence < opts.confidence_threshold {
        return None;
    }

    let feasibility = average_feasibility(&actions);
    if !candidate.steps.is_empty() && feasibility + 1e-9 < candidate.feasibility {
        return None;
    }

    let reached = action.produces_nodes.contains(&objective);
    let distance = objective_distance(&actions, objective);
    let proximity = objective_proximity_bias(distance, action, objective);

    let mut phase_progress = candidate.phase_progress.clone();
    phase_progress.push(action.phase);

    let snapshot_hash = snapshot.hash();
    let scored = score_path(
        hypotheses_from_steps(&steps),
        &actions,
        classes,
        reached.then_some(objective),
        score_cfg,
        unlock_cache,
        &snapshot_hash,
    );
    let score = scored.score + proximity * opts.objective_bias_weight;

    let key = if candidate.key.is_empty() {
        action.id.clone()
    } else {
        format!("{},{}", candidate.key, action.id)
    };
    Some(CampaignCandidate {
        snapshot,
        actions,
        steps,
        score,
        risk,
        confidence,
        objective_reached: reached,
        phase_progress,
        feasibility,
        key,
    })
}

fn attack_step_for_action(action: &ActionClass) -> AttackStep {
    AttackStep {
        action_class_id: action.id.clone(),
        statement: format!("action class {} is feasible", action.name),
        confidence: 0.5 + action.confidence_boost,
        phase: action.phase,
    }
}

fn hypotheses_from_steps(steps: &[AttackStep]) -> Vec<Hypothesis> {
    steps
        .iter()
        .enumerate()
        .map(|(idx, step)| Hypothesis {
            id: format!("campaign-hyp-{}-{}", step.action_class_id, idx + 1),
            action_class_id: Some(step.action_class_id.clone()),
            statement: step.statement.clone(),
            supporting_node_ids: Vec::new(),
            confidence: step.confidence,
            inference_depth: (idx + 1) as u32,
        })
        .collect()
}

fn average_step_confidence(steps: &[AttackStep]) -> f64 {
    if steps.is_empty() {
        return 0.0;
    }
    steps.iter().map(|s| s.confidence).sum::<f64>() / steps.len() as f64
}

/// Steps since the most recent objective-producing action; the full length
/// when none produced it.
fn objective_distance(actions: &[ActionClass], objective: NodeKind) -> usize {
    if actions.is_empty() {
        return 0;
    }
    for (i, action) in actions.iter().enumerate().rev() {
        if action.produces_nodes.contains(&objective) {
            return actions.len() - i - 1;
        }
    }
    actions.len()
}

/// Objective bias: direct production wins outright, objective-referencing
/// preconditions count half each, and anything else decays with distance.
fn objective_proximity_bias(distance: usize, action: &ActionClass, objective: NodeKind) -> f64 {
    if action.produces_nodes.contains(&objective) {
        return 1.0;
    }
    let supporting = action
        .preconditions
        .iter()
        .flat_map(|p| p.required_node_kinds.iter())
        .filter(|kind| **kind == objective)
        .count();
    if supporting > 0 {
        return 0.5 * supporting as f64;
    }
    1.0 / (distance as f64 + 1.0)
}

fn campaign_phase_allowed(root: Phase, progress: &[Phase], candidate: Phase) -> bool {
    match progress.last() {
        Some(last) => phase_allowed(*last, candidate),
        None => phase_allowed(root, candidate),
    }
}

pub(crate) fn campaign_key(campaign: &Campaign) -> String {
    let ids: Vec<&str> = campaign
        .steps
        .iter()
        .map(|s| s.action_class_id.as_str())
        .collect();
    format!("{}|{}", ids.join(","), campaign.objective)
}
