// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Rules of Engagement Enforcer
 * Authoritative policy gate
 *
 * ROE is enforced as INTERSECTION, not override. Execution is permitted
 * only when both the injected ROE allow-list and the declared intent allow
 * it. Absence of permission = denial.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;

use crate::errors::{CoreError, CoreResult};
use crate::governance::intent::IntentContract;

/// Policy gate intersecting an injected technique allow-list with declared
/// intent. Deterministic, side-effect free, fail-closed.
#[derive(Debug, Clone)]
pub struct RoeEnforcer {
    allowed_techniques: HashSet<String>,
}

impl RoeEnforcer {
    /// Builds an enforcer from the injected policy allow-list.
    pub fn new<I, S>(allowed_techniques: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_techniques: allowed_techniques.into_iter().map(Into::into).collect(),
        }
    }

    /// Validates whether a technique execution is permitted under both the
    /// policy allow-list and the declared intent, at the current UTC time.
    pub fn enforce(
        &self,
        contract: &IntentContract,
        technique_id: &str,
        target: &str,
    ) -> CoreResult<()> {
        self.enforce_at(contract, technique_id, target, Utc::now())
    }

    /// Clock-injected variant of [`enforce`](Self::enforce).
    pub fn enforce_at(
        &self,
        contract: &IntentContract,
        technique_id: &str,
        target: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        if technique_id.is_empty() {
            return Err(CoreError::MissingField {
                field: "technique_id",
            });
        }
        if target.is_empty() {
            return Err(CoreError::MissingField { field: "target" });
        }

        if !self.allowed_techniques.contains(technique_id) {
            return Err(CoreError::PolicyDenied(format!(
                "technique {technique_id} not permitted by policy"
            )));
        }

        if !contract
            .allowed_techniques
            .iter()
            .any(|t| t == technique_id)
        {
            return Err(CoreError::PolicyDenied(format!(
                "technique {technique_id} not declared in intent"
            )));
        }

        if !contract.targets.iter().any(|t| t == target) {
            return Err(CoreError::PolicyDenied(format!(
                "target {target} not declared in intent"
            )));
        }

        let (not_before, not_after) = match (contract.not_before, contract.not_after) {
            (Some(b), Some(a)) => (b, a),
            _ => {
                return Err(CoreError::PolicyDenied(
                    "intent contract missing time window".into(),
                ))
            }
        };
        if now < not_before || now > not_after {
            return Err(CoreError::OutOfWindow {
                not_before: not_before.to_rfc3339(),
                not_after: not_after.to_rfc3339(),
            });
        }

        debug!(technique_id, target, "ROE check passed");
        Ok(())
    }
}
