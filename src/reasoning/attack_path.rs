// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Attack-Path Expander
 * Beam search over graph snapshots producing scored feasible paths
 *
 * Expansion never touches the live graph: every candidate carries its own
 * counting snapshot, re-verifies its latest step, applies it virtually, and
 * extends with eligible non-repeating actions whose phase is still allowed.
 * Pruning, emission, and ordering are fully deterministic.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::action_class::ActionClass;
use crate::governance::phase::{phase_allowed, Phase};
use crate::governance::state::CampaignState;
use crate::graph::snapshot::GraphSnapshot;
use crate::graph::store::{Graph, NodeKind};
use crate::reasoning::binder::phase_for_state;
use crate::reasoning::hypothesis::Hypothesis;
use crate::reasoning::scorer::{
    cumulative_risk, score_path, AttackPath, ScoreConfig, UnlockCache,
};

/// ROE hook consulted for every step. Receives the live graph and campaign
/// state for monotonic context; it must not mutate either.
pub type RoePolicy = dyn Fn(&ActionClass, &Graph, &CampaignState) -> bool + Send + Sync;

/// Controls search depth, pruning, scoring, and objective detection.
#[derive(Clone)]
pub struct AttackPathConfig {
    pub max_depth: usize,
    pub beam_width: usize,
    pub risk_threshold: f64,
    pub depth_penalty: f64,
    pub confidence_weight: f64,
    pub start_node_kinds: Vec<NodeKind>,
    pub objective_node_kinds: Vec<NodeKind>,
    pub roe_policy: Arc<RoePolicy>,
}

impl Default for AttackPathConfig {
    /// Conservative attack-path search defaults.
    fn default() -> Self {
        Self {
            max_depth: 4,
            beam_width: 25,
            risk_threshold: 2.0,
            depth_penalty: 0.1,
            confidence_weight: 0.25,
            start_node_kinds: vec![
                NodeKind::Evidence,
                NodeKind::Hypothesis,
                NodeKind::Technique,
            ],
            objective_node_kinds: vec![NodeKind::AttackPath, NodeKind::Technique],
            roe_policy: Arc::new(|_, _, _| true),
        }
    }
}

impl fmt::Debug for AttackPathConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttackPathConfig")
            .field("max_depth", &self.max_depth)
            .field("beam_width", &self.beam_width)
            .field("risk_threshold", &self.risk_threshold)
            .field("depth_penalty", &self.depth_penalty)
            .field("confidence_weight", &self.confidence_weight)
            .field("start_node_kinds", &self.start_node_kinds)
            .field("objective_node_kinds", &self.objective_node_kinds)
            .finish_non_exhaustive()
    }
}

struct AttackCandidate {
    snapshot: GraphSnapshot,
    stack: Vec<ActionClass>,
    score: f64,
    key: String,
}

/// Maps each required node kind to the classes requiring it, plus classes
/// with no preconditions at all.
pub(crate) struct ActionClassIndex {
    by_required_node: HashMap<NodeKind, Vec<ActionClass>>,
    without_requirements: Vec<ActionClass>,
}

impl ActionClassIndex {
    pub(crate) fn build(classes: &[ActionClass]) -> Self {
        let mut index = Self {
            by_required_node: HashMap::new(),
            without_requirements: Vec::new(),
        };
        for class in classes {
            let required = required_node_kinds(class);
            if required.is_empty() {
                index.without_requirements.push(class.clone());
                continue;
            }
            for kind in required {
                index
                    .by_required_node
                    .entry(kind)
                    .or_default()
                    .push(class.clone());
            }
        }
        index
    }

    /// Classes reachable from the kinds present in the snapshot,
    /// deduplicated and sorted ascending by id.
    pub(crate) fn eligible(&self, snapshot: &GraphSnapshot) -> Vec<ActionClass> {
        let mut seen: BTreeMap<String, ActionClass> = BTreeMap::new();
        for class in &self.without_requirements {
            seen.insert(class.id.clone(), class.clone());
        }
        for kind in snapshot.present_node_kinds() {
            if let Some(classes) = self.by_required_node.get(&kind) {
                for class in classes {
                    seen.insert(class.id.clone(), class.clone());
                }
            }
        }
        seen.into_values().collect()
    }
}

fn required_node_kinds(class: &ActionClass) -> Vec<NodeKind> {
    let mut set: Vec<NodeKind> = class
        .preconditions
        .iter()
        .flat_map(|p| p.required_node_kinds.iter().copied())
        .collect();
    set.sort();
    set.dedup();
    set
}

/// One hypothesis per path step, anchored to the step's action class.
pub(crate) fn build_path_hypotheses(stack: &[ActionClass]) -> Vec<Hypothesis> {
    stack
        .iter()
        .enumerate()
        .map(|(idx, ac)| Hypothesis {
            id: format!("path-hyp-{}-{}", ac.id, idx + 1),
            action_class_id: Some(ac.id.clone()),
            statement: format!("action class {} is feasible", ac.name),
            supporting_node_ids: Vec::new(),
            confidence: 0.5 + ac.confidence_boost,
            inference_depth: (idx + 1) as u32,
        })
        .collect()
}

pub(crate) fn find_objective(
    objective_node_kinds: &[NodeKind],
    produced: &[NodeKind],
) -> Option<NodeKind> {
    objective_node_kinds
        .iter()
        .copied()
        .find(|objective| produced.contains(objective))
}

fn stack_key(stack: &[ActionClass]) -> String {
    stack
        .iter()
        .map(|c| c.id.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn path_key(path: &AttackPath) -> String {
    let ids: Vec<&str> = path
        .steps
        .iter()
        .map(|s| s.action_class_id.as_deref().unwrap_or(""))
        .collect();
    format!(
        "{}|{}",
        ids.join(","),
        path.objective.map(|o| o.to_string()).unwrap_or_default()
    )
}

fn prune_beam(mut beam: Vec<AttackCandidate>, width: usize) -> Vec<AttackCandidate> {
    beam.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    beam.truncate(width);
    beam
}

/// Computes feasible, scored attack paths from the current graph using
/// virtual snapshot simulation.
pub fn expand_attack_paths(
    graph: &Graph,
    classes: &[ActionClass],
    state: &CampaignState,
    cfg: &AttackPathConfig,
    score_cfg: &ScoreConfig,
) -> Vec<AttackPath> {
    if classes.is_empty() {
        return Vec::new();
    }
    let seeded: usize = cfg
        .start_node_kinds
        .iter()
        .map(|k| graph.nodes_by_kind(*k).len())
        .sum();
    if seeded == 0 {
        return Vec::new();
    }

    let index = ActionClassIndex::build(classes);
    let mut unlock_cache = UnlockCache::new();
    let current_phase: Phase = phase_for_state(state);
    let base_snapshot = GraphSnapshot::from_graph(graph);
    let base_hash = base_snapshot.hash();

    let mut beam: Vec<AttackCandidate> = Vec::new();
    for root in index.eligible(&base_snapshot) {
        if !phase_allowed(current_phase, root.phase)
            || !(cfg.roe_policy)(&root, graph, state)
            || !base_snapshot.matches(&root.preconditions)
        {
            continue;
        }
        let stack = vec![root];
        let scored = score_path(
            build_path_hypotheses(&stack),
            &stack,
            classes,
            None,
            score_cfg,
            &mut unlock_cache,
            &base_hash,
        );
        let key = stack_key(&stack);
        beam.push(AttackCandidate {
            snapshot: base_snapshot.clone(),
            stack,
            score: scored.score,
            key,
        });
    }
    beam = prune_beam(beam, cfg.beam_width);

    let mut paths: Vec<AttackPath> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for depth in 1..=cfg.max_depth {
        if beam.is_empty() {
            break;
        }
        let mut next_beam: Vec<AttackCandidate> = Vec::new();
        for candidate in &beam {
            let Some(latest) = candidate.stack.last() else {
                continue;
            };
            let mut snapshot = candidate.snapshot.clone();
            if !snapshot.matches(&latest.preconditions)
                || !(cfg.roe_policy)(latest, graph, state)
            {
                continue;
            }
            snapshot.apply(latest);

            let risk = cumulative_risk(&candidate.stack);
            let mut risk_limit = cfg.risk_threshold;
            if risk_limit > 0.0 && risk_limit < 2.0 {
                risk_limit *= 0.9;
            }
            if risk_limit > 0.0 && risk > risk_limit {
                continue;
            }

            let objective = find_objective(&cfg.objective_node_kinds, &latest.produces_nodes);
            let snapshot_hash = snapshot.hash();
            let path = score_path(
                build_path_hypotheses(&candidate.stack),
                &candidate.stack,
                classes,
                objective,
                score_cfg,
                &mut unlock_cache,
                &snapshot_hash,
            );
            if objective.is_some() {
                let key = path_key(&path);
                if seen.insert(key) {
                    paths.push(path);
                }
            }

            if depth == cfg.max_depth {
                continue;
            }
            for next in index.eligible(&snapshot) {
                if !phase_allowed(current_phase, next.phase)
                    || candidate.stack.iter().any(|c| c.id == next.id)
                {
                    continue;
                }
                if !snapshot.matches(&next.preconditions) {
                    continue;
                }
                let mut next_stack = candidate.stack.clone();
                next_stack.push(next);
                let scored = score_path(
                    build_path_hypotheses(&next_stack),
                    &next_stack,
                    classes,
                    None,
                    score_cfg,
                    &mut unlock_cache,
                    &snapshot_hash,
                );
                let key = stack_key(&next_stack);
                next_beam.push(AttackCandidate {
                    snapshot: snapshot.clone(),
                    stack: next_stack,
                    score: scored.score,
                    key,
                });
            }
        }
        beam = prune_beam(next_beam, cfg.beam_width);
    }

    paths.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.steps.len().cmp(&b.steps.len()))
    });
    debug!(
        paths = paths.len(),
        phase = %current_phase,
        "attack-path expansion complete"
    );
    paths
}

/// Applies a path bonus to ranked actions that start some expanded path.
pub(crate) fn enrich_ranked_with_paths(
    ranked: &mut Vec<crate::reasoning::planner::RankedAction>,
    paths: &[AttackPath],
) {
    if ranked.is_empty() || paths.is_empty() {
        return;
    }
    let mut best_by_action: HashMap<&str, f64> = HashMap::new();
    for path in paths {
        let Some(first) = path.steps.first() else {
            continue;
        };
        let Some(action_id) = first.action_class_id.as_deref() else {
            continue;
        };
        let entry = best_by_action.entry(action_id).or_insert(f64::MIN);
        if path.score > *entry {
            *entry = path.score;
        }
    }
    for action in ranked.iter_mut() {
        let Some(ac_id) = action.action_class_id.as_deref() else {
            continue;
        };
        if let Some(best) = best_by_action.get(ac_id) {
            let bonus = best * 0.1;
            action.score += bonus;
            action.reason = format!("{} path_bonus={bonus:.2}", action.reason);
        }
    }
    crate::reasoning::planner::sort_ranked(ranked);
}
