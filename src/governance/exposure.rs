// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Exposure Accounting
 * Detection-risk governance: conservative, monotonic, fail-closed
 *
 * Exposure represents the accumulated likelihood that an adversary action
 * has been detected or could reasonably be detected. It is not stealth
 * scoring or alert simulation; it is a halting signal. Exposure can only
 * increase, and a breach of the ceiling mandates a halt.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::errors::{CoreError, CoreResult};

/// Qualitative exposure state. Thresholds are intentionally coarse and
/// conservative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ExposureLevel {
    /// Minimal observable activity.
    Low,
    /// Noticeable activity that could plausibly trigger monitoring.
    Medium,
    /// Activity very likely to be detected by defensive systems.
    High,
    /// Exposure beyond acceptable limits. Execution MUST halt.
    Critical,
}

impl fmt::Display for ExposureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExposureLevel::Low => "low",
            ExposureLevel::Medium => "medium",
            ExposureLevel::High => "high",
            ExposureLevel::Critical => "critical",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
struct TrackerInner {
    score: u64,
    last_updated: Option<DateTime<Utc>>,
    halted: bool,
}

/// Cumulative exposure for a campaign.
///
/// The score is monotone non-negative with a fixed ceiling; reaching the
/// ceiling latches `halted` and refuses every further addition.
#[derive(Debug)]
pub struct ExposureTracker {
    max_score: u64,
    inner: RwLock<TrackerInner>,
}

impl ExposureTracker {
    /// Creates a tracker with the given ceiling. `max_score` must be > 0.
    pub fn new(max_score: u64) -> CoreResult<Self> {
        if max_score == 0 {
            return Err(CoreError::InvalidArgument(
                "exposure tracker requires max_score > 0".into(),
            ));
        }
        Ok(Self {
            max_score,
            inner: RwLock::new(TrackerInner {
                score: 0,
                last_updated: None,
                halted: false,
            }),
        })
    }

    /// Increments exposure by `delta`. The delta must be > 0; once halted,
    /// further updates are rejected.
    pub fn add(&self, delta: u64) -> CoreResult<()> {
        if delta == 0 {
            return Err(CoreError::InvalidArgument(
                "exposure delta must be > 0".into(),
            ));
        }
        let mut inner = self.inner.write();
        if inner.halted {
            return Err(CoreError::ExposureExceeded);
        }
        inner.score += delta;
        inner.last_updated = Some(Utc::now());
        if inner.score >= self.max_score {
            inner.halted = true;
            warn!(
                score = inner.score,
                max_score = self.max_score,
                "exposure ceiling reached; latching halt"
            );
        }
        Ok(())
    }

    pub fn score(&self) -> u64 {
        self.inner.read().score
    }

    pub fn level(&self) -> ExposureLevel {
        let score = self.inner.read().score;
        self.level_for(score)
    }

    fn level_for(&self, score: u64) -> ExposureLevel {
        if score >= self.max_score {
            ExposureLevel::Critical
        } else if score >= self.max_score * 3 / 4 {
            ExposureLevel::High
        } else if score >= self.max_score / 2 {
            ExposureLevel::Medium
        } else {
            ExposureLevel::Low
        }
    }

    pub fn halted(&self) -> bool {
        self.inner.read().halted
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.inner.read().last_updated
    }

    /// Returns a stable view of exposure state for reporting, evidence
    /// generation, and audit output.
    pub fn snapshot(&self) -> ExposureSnapshot {
        let inner = self.inner.read();
        ExposureSnapshot {
            score: inner.score,
            max_score: self.max_score,
            level: self.level_for(inner.score),
            halted: inner.halted,
            last_updated: inner.last_updated,
        }
    }
}

/// Immutable exposure state view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExposureSnapshot {
    pub score: u64,
    pub max_score: u64,
    pub level: ExposureLevel,
    pub halted: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl fmt::Display for ExposureSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exposure={}/{} level={} halted={}",
            self.score, self.max_score, self.level, self.halted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ceiling_rejected() {
        assert!(matches!(
            ExposureTracker::new(0),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_monotone_score_and_levels() {
        let tracker = ExposureTracker::new(100).unwrap();
        assert_eq!(tracker.level(), ExposureLevel::Low);

        tracker.add(49).unwrap();
        assert_eq!(tracker.level(), ExposureLevel::Low);

        tracker.add(1).unwrap();
        assert_eq!(tracker.score(), 50);
        assert_eq!(tracker.level(), ExposureLevel::Medium);

        tracker.add(25).unwrap();
        assert_eq!(tracker.level(), ExposureLevel::High);

        tracker.add(25).unwrap();
        assert_eq!(tracker.level(), ExposureLevel::Critical);
        assert!(tracker.halted());
    }

    #[test]
    fn test_halt_latches_and_refuses_additions() {
        let tracker = ExposureTracker::new(20).unwrap();
        tracker.add(10).unwrap();
        assert!(!tracker.halted());
        tracker.add(10).unwrap();
        assert!(tracker.halted());

        assert_eq!(tracker.add(1), Err(CoreError::ExposureExceeded));
        assert_eq!(tracker.score(), 20);
        assert!(tracker.halted());
    }

    #[test]
    fn test_zero_delta_rejected() {
        let tracker = ExposureTracker::new(10).unwrap();
        assert!(matches!(
            tracker.add(0),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let tracker = ExposureTracker::new(40).unwrap();
        tracker.add(10).unwrap();
        let snap = tracker.snapshot();
        assert_eq!(snap.score, 10);
        assert_eq!(snap.max_score, 40);
        assert_eq!(snap.level, ExposureLevel::Low);
        assert!(!snap.halted);
        assert!(snap.last_updated.is_some());
        assert_eq!(snap.to_string(), "exposure=10/40 level=low halted=false");
    }
}
