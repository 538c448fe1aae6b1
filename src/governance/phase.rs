// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Operation phase lattice.
//!
//! Phases order the campaign lifecycle from reconnaissance to exfiltration.
//! Transitions are forward-only; [`Phase::next`] is the sole permitted
//! transition and [`PhaseMachine`] is its only stateful wrapper.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{CoreError, CoreResult};

/// Currently active offensive lifecycle phase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Recon,
    InitialAccess,
    Persistence,
    PrivEsc,
    LateralMovement,
    C2,
    Objective,
    Exfil,
}

/// Lifecycle order. Transitions MUST move forward only.
const PHASE_ORDER: [Phase; 8] = [
    Phase::Recon,
    Phase::InitialAccess,
    Phase::Persistence,
    Phase::PrivEsc,
    Phase::LateralMovement,
    Phase::C2,
    Phase::Objective,
    Phase::Exfil,
];

impl Phase {
    /// Returns the next legal phase in the lifecycle, or `None` when already
    /// at the final phase.
    pub fn next(self) -> Option<Phase> {
        let idx = PHASE_ORDER.iter().position(|p| *p == self)?;
        PHASE_ORDER.get(idx + 1).copied()
    }

    /// All phases in lifecycle order.
    pub fn all() -> &'static [Phase] {
        &PHASE_ORDER
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Recon => "RECON",
            Phase::InitialAccess => "INITIAL_ACCESS",
            Phase::Persistence => "PERSISTENCE",
            Phase::PrivEsc => "PRIV_ESC",
            Phase::LateralMovement => "LATERAL_MOVEMENT",
            Phase::C2 => "C2",
            Phase::Objective => "OBJECTIVE",
            Phase::Exfil => "EXFIL",
        };
        f.write_str(s)
    }
}

/// Returns true when `candidate` may be chained after `current`: the same
/// phase, or the immediate next one.
pub fn phase_allowed(current: Phase, candidate: Phase) -> bool {
    if current == candidate {
        return true;
    }
    current.next() == Some(candidate)
}

/// Controls legal phase transitions for a single operation.
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    phase: Phase,
}

impl PhaseMachine {
    pub fn new(initial: Phase) -> CoreResult<Self> {
        if !PHASE_ORDER.contains(&initial) {
            return Err(CoreError::InvalidArgument(format!(
                "invalid operation phase: {initial}"
            )));
        }
        Ok(Self { phase: initial })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advances to the next phase. Returns false at the final phase.
    pub fn advance(&mut self) -> bool {
        match self.phase.next() {
            Some(next) => {
                self.phase = next;
                true
            }
            None => false,
        }
    }
}
