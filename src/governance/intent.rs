// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Intent Contract
 * Declared operator intent (security critical)
 *
 * Intent is declarative, explicit, and binding. No execution may occur
 * without a validated intent contract. Validation is fail-fast and
 * fail-closed: nothing is implied, no defaults are assumed, and a contract
 * that fails validation must not be used.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::IntentError;

/// Validated declaration of operator intent.
///
/// A contract is loaded before execution and used to gate ROE, scope
/// execution, and anchor audit trails. Once validated it is read-only for
/// the lifetime of the campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentContract {
    /// Uniquely identifies the engagement. Appears in evidence and reports;
    /// must be stable for the lifetime of the campaign.
    pub campaign_id: String,

    /// High-level goal of the campaign. Not used for execution logic; it
    /// exists for human review, legal context, and reporting.
    pub objective: String,

    /// Explicit allow list of techniques the operator may execute.
    /// Techniques not listed here are forbidden. Intersected with ROE at
    /// runtime.
    pub allowed_techniques: Vec<String>,

    /// Explicit scope of execution. Each entry is a single,
    /// executor-validated target; wildcards and ranges are not supported.
    pub targets: Vec<String>,

    /// Earliest permitted execution time (UTC).
    pub not_before: Option<DateTime<Utc>>,

    /// Latest permitted execution time (UTC).
    pub not_after: Option<DateTime<Utc>>,
}

impl IntentContract {
    /// Strict validation against the current UTC clock. Must be called
    /// immediately after loading a contract and before any execution logic.
    pub fn validate(&self) -> Result<(), IntentError> {
        self.validate_at(Utc::now())
    }

    /// Clock-injected variant of [`validate`](Self::validate).
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), IntentError> {
        if self.campaign_id.is_empty() {
            return Err(IntentError::MissingCampaignId);
        }
        if self.objective.is_empty() {
            return Err(IntentError::MissingObjective);
        }

        if self.allowed_techniques.is_empty()
            || self.allowed_techniques.iter().any(|t| t.is_empty())
        {
            return Err(IntentError::EmptyAllowedTechniques);
        }

        if self.targets.is_empty() || self.targets.iter().any(|t| t.is_empty()) {
            return Err(IntentError::EmptyTargets);
        }

        let (not_before, not_after) = match (self.not_before, self.not_after) {
            (Some(b), Some(a)) => (b, a),
            _ => return Err(IntentError::MissingWindow),
        };
        if not_after <= not_before {
            return Err(IntentError::InvalidWindow);
        }
        if now < not_before || now > not_after {
            return Err(IntentError::OutsideWindow {
                not_before: not_before.to_rfc3339(),
                not_after: not_after.to_rfc3339(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_contract() -> IntentContract {
        let now = Utc::now();
        IntentContract {
            campaign_id: "camp-intent".into(),
            objective: "Validate exposure of development network services".into(),
            allowed_techniques: vec!["T1595".into()],
            targets: vec!["10.10.0.5".into()],
            not_before: Some(now - Duration::hours(1)),
            not_after: Some(now + Duration::hours(1)),
        }
    }

    #[test]
    fn test_valid_contract_passes() {
        assert!(valid_contract().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_fail_closed() {
        let mut c = valid_contract();
        c.campaign_id.clear();
        assert_eq!(c.validate(), Err(IntentError::MissingCampaignId));

        let mut c = valid_contract();
        c.objective.clear();
        assert_eq!(c.validate(), Err(IntentError::MissingObjective));

        let mut c = valid_contract();
        c.allowed_techniques.clear();
        assert_eq!(c.validate(), Err(IntentError::EmptyAllowedTechniques));

        let mut c = valid_contract();
        c.allowed_techniques = vec![String::new()];
        assert_eq!(c.validate(), Err(IntentError::EmptyAllowedTechniques));

        let mut c = valid_contract();
        c.targets.clear();
        assert_eq!(c.validate(), Err(IntentError::EmptyTargets));
    }

    #[test]
    fn test_window_validation() {
        let mut c = valid_contract();
        c.not_before = None;
        assert_eq!(c.validate(), Err(IntentError::MissingWindow));

        let mut c = valid_contract();
        c.not_after = c.not_before;
        assert_eq!(c.validate(), Err(IntentError::InvalidWindow));

        let c = valid_contract();
        let late = Utc::now() + Duration::hours(2);
        assert!(matches!(
            c.validate_at(late),
            Err(IntentError::OutsideWindow { .. })
        ));
        let early = Utc::now() - Duration::hours(2);
        assert!(matches!(
            c.validate_at(early),
            Err(IntentError::OutsideWindow { .. })
        ));
    }
}
