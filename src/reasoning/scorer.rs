// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Path Scorer
 * Deterministic multi-factor scoring for action-class sequences
 *
 * A path's score combines average step confidence, progressive-availability
 * feasibility, an unlocked-action bonus, a risk penalty, a depth penalty,
 * and objective proximity. The same inputs always produce the same score;
 * the unlock bonus is cached by snapshot hashes.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::action_class::ActionClass;
use crate::graph::snapshot::GraphSnapshot;
use crate::graph::store::NodeKind;
use crate::reasoning::hypothesis::Hypothesis;

/// An ordered, scored sequence of hypotheses modelling a feasible attack
/// chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttackPath {
    pub steps: Vec<Hypothesis>,
    pub score: f64,
    pub risk: f64,
    pub objective: Option<NodeKind>,
    pub objective_proximity_score: f64,
    pub valid: bool,
}

/// Scoring constants. All fields are overridable; the defaults below are
/// the calibrated production values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreConfig {
    pub confidence_weight: f64,
    pub feasibility_weight: f64,
    pub unlock_factor: f64,
    pub risk_threshold: f64,
    pub small_risk_factor: f64,
    pub depth_factor: f64,
    pub objective_proximity_factor: f64,
    /// Node kinds that count as generic objectives for proximity.
    pub objective_node_kinds: Vec<NodeKind>,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            confidence_weight: 0.8,
            feasibility_weight: 1.1,
            unlock_factor: 0.15,
            risk_threshold: 2.0,
            small_risk_factor: 0.4,
            depth_factor: 0.25,
            objective_proximity_factor: 1.35,
            objective_node_kinds: vec![NodeKind::AttackPath, NodeKind::Technique],
        }
    }
}

/// Cache for the unlock bonus, keyed by
/// `graph_hash|before_hash|after_hash`.
pub type UnlockCache = HashMap<String, f64>;

/// Scores a path of action classes. Pure with respect to the live graph;
/// only the cache is written.
#[allow(clippy::too_many_arguments)]
pub fn score_path(
    steps: Vec<Hypothesis>,
    path_classes: &[ActionClass],
    universe: &[ActionClass],
    objective: Option<NodeKind>,
    cfg: &ScoreConfig,
    unlock_cache: &mut UnlockCache,
    graph_hash: &str,
) -> AttackPath {
    let total_conf: f64 = steps.iter().map(|s| s.confidence).sum();
    let avg_conf = if steps.is_empty() {
        0.0
    } else {
        total_conf / steps.len() as f64
    };

    let risk = cumulative_risk(path_classes);
    let feasibility = average_feasibility(path_classes);
    let unlock_bonus = cfg.unlock_factor
        * unlocked_action_count(universe, path_classes, unlock_cache, graph_hash);
    let proximity = objective_proximity(path_classes, objective, cfg);

    let mut score = (avg_conf * cfg.confidence_weight)
        + (feasibility * cfg.feasibility_weight)
        + unlock_bonus
        - risk_penalty(risk, cfg)
        - (steps.len() as f64 * cfg.depth_factor)
        + proximity;
    if objective.is_some() {
        score *= cfg.objective_proximity_factor;
    }

    AttackPath {
        steps,
        score,
        risk,
        objective,
        objective_proximity_score: proximity,
        valid: true,
    }
}

/// Sum of the path's risk weights.
pub fn cumulative_risk(classes: &[ActionClass]) -> f64 {
    classes.iter().map(|c| c.risk_weight).sum()
}

/// Walks the path with a virtual availability set seeded with Evidence.
/// Each step contributes the fraction of its required node kinds that are
/// already available (1.0 when it requires nothing); produced kinds are
/// folded in after the step. Returns the mean fraction, 1.0 for an empty
/// path.
pub fn average_feasibility(classes: &[ActionClass]) -> f64 {
    if classes.is_empty() {
        return 1.0;
    }
    let mut available = GraphSnapshot::new();
    available.add_node_kind(NodeKind::Evidence);

    let mut total_ratio = 0.0;
    for class in classes {
        let mut required = 0usize;
        let mut matched = 0usize;
        for pattern in &class.preconditions {
            for kind in &pattern.required_node_kinds {
                required += 1;
                if available.has_node_kind(*kind) {
                    matched += 1;
                }
            }
        }
        total_ratio += if required == 0 {
            1.0
        } else {
            matched as f64 / required as f64
        };
        for kind in &class.produces_nodes {
            available.add_node_kind(*kind);
        }
    }
    total_ratio / classes.len() as f64
}

/// Quadratic above the threshold, mildly linear below it.
pub fn risk_penalty(risk: f64, cfg: &ScoreConfig) -> f64 {
    if risk > cfg.risk_threshold {
        risk * risk
    } else {
        risk * cfg.small_risk_factor
    }
}

/// Rewards a path whose last step produces the requested objective, or any
/// configured generic objective kind; otherwise decays with path length.
pub fn objective_proximity(
    classes: &[ActionClass],
    objective: Option<NodeKind>,
    cfg: &ScoreConfig,
) -> f64 {
    let Some(last) = classes.last() else {
        return 1.0;
    };
    if let Some(objective) = objective {
        if last.produces_nodes.contains(&objective) {
            return 1.0;
        }
    }
    if last
        .produces_nodes
        .iter()
        .any(|k| cfg.objective_node_kinds.contains(k))
    {
        return 0.9;
    }
    1.0 / (classes.len() as f64 + 1.0)
}

/// Counts universe classes, outside the path, whose preconditions match the
/// virtual snapshot after the full path but not before its final step.
/// Results are cached by snapshot hashes.
fn unlocked_action_count(
    universe: &[ActionClass],
    path_classes: &[ActionClass],
    cache: &mut UnlockCache,
    graph_hash: &str,
) -> f64 {
    if path_classes.is_empty() {
        return 0.0;
    }

    let mut before = GraphSnapshot::new();
    before.add_node_kind(NodeKind::Evidence);
    for class in &path_classes[..path_classes.len() - 1] {
        before.apply(class);
    }
    let mut after = before.clone();
    after.apply(&path_classes[path_classes.len() - 1]);

    let key = format!("{graph_hash}|{}|{}", before.hash(), after.hash());
    if let Some(cached) = cache.get(&key) {
        return *cached;
    }

    let mut count = 0.0;
    for candidate in universe {
        if path_classes.iter().any(|c| c.id == candidate.id) {
            continue;
        }
        if after.matches(&candidate.preconditions) && !before.matches(&candidate.preconditions) {
            count += 1.0;
        }
    }
    cache.insert(key, count);
    count
}
