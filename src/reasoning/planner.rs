// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Next-Action Planner
 * Ranks technique candidates from registered effect metadata
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

use crate::reasoning::registry::EffectRegistry;

/// Expected outcomes for a technique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TechniqueEffect {
    pub technique_id: String,
    /// Action class the technique maps to, when known.
    pub action_class_id: Option<String>,
    pub impact: f64,
    pub risk: f64,
    pub stealth: f64,
    #[serde(default)]
    pub produces: Vec<String>,
}

/// Weighted multi-factor scoring configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TechniqueScoreWeights {
    pub impact_weight: f64,
    pub risk_weight: f64,
    pub stealth_weight: f64,
}

impl Default for TechniqueScoreWeights {
    /// Conservative defaults.
    fn default() -> Self {
        Self {
            impact_weight: 0.5,
            risk_weight: 0.2,
            stealth_weight: 0.3,
        }
    }
}

/// Computes a single normalized score from effect factors.
pub fn score_technique(effect: &TechniqueEffect, weights: TechniqueScoreWeights) -> f64 {
    (effect.impact * weights.impact_weight)
        + ((1.0 - effect.risk) * weights.risk_weight)
        + (effect.stealth * weights.stealth_weight)
}

/// Planner query input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerQuery {
    pub target: String,
    #[serde(default)]
    pub allowed_techniques: Vec<String>,
    #[serde(default)]
    pub current_technique_id: Option<String>,
    #[serde(default)]
    pub top_n: usize,
}

/// A scored action candidate returned by the planner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedAction {
    pub technique_id: String,
    pub action_class_id: Option<String>,
    pub target: String,
    pub score: f64,
    pub impact: f64,
    pub risk: f64,
    pub stealth: f64,
    pub reason: String,
}

/// Ranks action candidates using technique effects.
#[derive(Debug)]
pub struct Planner {
    registry: Arc<EffectRegistry>,
    weights: TechniqueScoreWeights,
}

impl Planner {
    pub fn new(registry: Arc<EffectRegistry>, weights: TechniqueScoreWeights) -> Self {
        Self { registry, weights }
    }

    /// Returns sorted candidates for a target. When the query carries no
    /// allow-list every known technique is scored.
    pub fn ranked_actions(&self, query: &PlannerQuery) -> Vec<RankedAction> {
        let candidates = if query.allowed_techniques.is_empty() {
            self.registry.known_techniques()
        } else {
            query.allowed_techniques.clone()
        };

        let mut out = Vec::with_capacity(candidates.len());
        for id in candidates {
            let Some(effect) = self.registry.effect(&id) else {
                continue;
            };
            let score = score_technique(&effect, self.weights);
            out.push(RankedAction {
                technique_id: effect.technique_id.clone(),
                action_class_id: effect.action_class_id.clone(),
                target: query.target.clone(),
                score,
                impact: effect.impact,
                risk: effect.risk,
                stealth: effect.stealth,
                reason: format!(
                    "impact={:.2} risk={:.2} stealth={:.2}",
                    effect.impact, effect.risk, effect.stealth
                ),
            });
        }

        sort_ranked(&mut out);
        if query.top_n > 0 && out.len() > query.top_n {
            out.truncate(query.top_n);
        }
        out
    }
}

/// Descending score, ascending technique id on ties.
pub fn sort_ranked(ranked: &mut [RankedAction]) {
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.technique_id.cmp(&b.technique_id))
    });
}
