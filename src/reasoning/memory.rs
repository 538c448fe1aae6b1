// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Multi-cycle adaptation: campaign traces and ranking adjustments driven
//! by accumulated action memory.

use serde::{Deserialize, Serialize};

use crate::governance::phase::Phase;
use crate::governance::state::{CampaignState, CampaignStatus};
use crate::reasoning::planner::RankedAction;

/// Per-cycle record emitted by planner-only simulation runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CampaignTrace {
    pub state_progression: Vec<CampaignStatus>,
    pub phase_transitions: Vec<Phase>,
    pub confidence_evolution: Vec<f64>,
}

/// Adjusts ranked scores from accumulated campaign memory: repeated
/// failures penalize an action class, accumulated exposure knowledge
/// rewards it.
pub fn apply_state_memory_adjustments(ranked: &mut [RankedAction], state: &CampaignState) {
    let knowledge = state.exposure_knowledge();
    for action in ranked.iter_mut() {
        let Some(ac_id) = action.action_class_id.as_deref() else {
            continue;
        };
        let fails = state.failed_attempts(ac_id);
        if fails > 0 {
            action.score -= f64::from(fails) * 0.2;
        }
        if let Some(k) = knowledge.get(ac_id) {
            action.score += k * 0.1;
        }
    }
}
