// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Campaign State
 * Execution governance: lifecycle tracking and fail-closed halting
 *
 * Campaign state exists to:
 * - Enforce halting conditions
 * - Track execution progress
 * - Prevent uncontrolled or runaway operations
 *
 * One campaign == one state object. Once halted, execution must not resume.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};

use crate::errors::{CoreError, CoreResult};

/// Lifecycle phase of a campaign. Transitions MUST move forward only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    /// State created, no execution has occurred.
    Initialized,
    /// At least one technique has been executed or attempted.
    Running,
    /// Execution forcibly stopped due to policy, error, or operator action.
    Halted,
    /// All intended execution finished without violation.
    Completed,
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CampaignStatus::Initialized => "initialized",
            CampaignStatus::Running => "running",
            CampaignStatus::Halted => "halted",
            CampaignStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
struct StateInner {
    status: CampaignStatus,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    executions: u64,
    previous_actions: Vec<String>,
    exposure_knowledge: HashMap<String, f64>,
    failed_attempts: HashMap<String, u32>,
}

/// Authoritative execution state for a single campaign.
///
/// Thread-safe; immutable in identity, mutable only in execution facts.
/// The state performs no execution, logging of evidence, or side effects of
/// its own.
#[derive(Debug)]
pub struct CampaignState {
    campaign_id: String,
    inner: RwLock<StateInner>,
}

impl CampaignState {
    /// Creates a new campaign state in `Initialized`. Must be called exactly
    /// once per campaign.
    pub fn new(campaign_id: impl Into<String>) -> CoreResult<Self> {
        let campaign_id = campaign_id.into();
        if campaign_id.is_empty() {
            return Err(CoreError::MissingField {
                field: "campaign_id",
            });
        }
        Ok(Self {
            campaign_id,
            inner: RwLock::new(StateInner {
                status: CampaignStatus::Initialized,
                started_at: None,
                finished_at: None,
                executions: 0,
                previous_actions: Vec::new(),
                exposure_knowledge: HashMap::new(),
                failed_attempts: HashMap::new(),
            }),
        })
    }

    /// Transitions the campaign into `Running`. Must be called immediately
    /// before the first execution.
    pub fn start(&self) -> CoreResult<()> {
        let mut inner = self.inner.write();
        if inner.status != CampaignStatus::Initialized {
            return Err(CoreError::CampaignNotRunnable {
                status: inner.status.to_string(),
            });
        }
        inner.status = CampaignStatus::Running;
        inner.started_at = Some(Utc::now());
        info!(campaign_id = %self.campaign_id, "campaign started");
        Ok(())
    }

    /// Increments the execution counter. Called once per technique
    /// execution attempt, regardless of success or failure.
    pub fn record_execution(&self) -> CoreResult<()> {
        let mut inner = self.inner.write();
        if inner.status != CampaignStatus::Running {
            return Err(CoreError::CampaignNotRunnable {
                status: inner.status.to_string(),
            });
        }
        inner.executions += 1;
        Ok(())
    }

    /// Forcibly stops the campaign. Idempotent; once halted the campaign
    /// cannot be resumed.
    pub fn halt(&self, reason: &str) -> CoreResult<()> {
        let mut inner = self.inner.write();
        match inner.status {
            CampaignStatus::Completed => Err(CoreError::CampaignNotRunnable {
                status: inner.status.to_string(),
            }),
            CampaignStatus::Halted => Ok(()),
            _ => {
                inner.status = CampaignStatus::Halted;
                inner.finished_at = Some(Utc::now());
                warn!(campaign_id = %self.campaign_id, reason, "campaign halted");
                Ok(())
            }
        }
    }

    /// Marks the campaign as successfully finished. Only legal from
    /// `Running`.
    pub fn complete(&self) -> CoreResult<()> {
        let mut inner = self.inner.write();
        if inner.status != CampaignStatus::Running {
            return Err(CoreError::CampaignNotRunnable {
                status: inner.status.to_string(),
            });
        }
        inner.status = CampaignStatus::Completed;
        inner.finished_at = Some(Utc::now());
        info!(campaign_id = %self.campaign_id, "campaign completed");
        Ok(())
    }

    pub fn status(&self) -> CampaignStatus {
        self.inner.read().status
    }

    /// Number of execution attempts so far.
    pub fn executions(&self) -> u64 {
        self.inner.read().executions
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().started_at
    }

    /// `None` indicates the campaign has not finished.
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().finished_at
    }

    /// Immutable campaign identifier binding state to intent.
    pub fn campaign_id(&self) -> &str {
        &self.campaign_id
    }

    /// Tracks action outcomes across cycles for multi-cycle adaptation.
    /// Failures accrue per-action penalty counts; recon actions accrue
    /// exposure knowledge.
    pub fn record_action_memory(&self, action_id: &str, success: bool, recon: bool) {
        if action_id.is_empty() {
            return;
        }
        let mut inner = self.inner.write();
        inner.previous_actions.push(action_id.to_string());
        if !success {
            *inner.failed_attempts.entry(action_id.to_string()).or_insert(0) += 1;
        }
        if recon {
            *inner
                .exposure_knowledge
                .entry(action_id.to_string())
                .or_insert(0.0) += 0.1;
        }
    }

    pub fn previous_actions(&self) -> Vec<String> {
        self.inner.read().previous_actions.clone()
    }

    pub fn failed_attempts(&self, action_id: &str) -> u32 {
        self.inner
            .read()
            .failed_attempts
            .get(action_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn exposure_knowledge(&self) -> HashMap<String, f64> {
        self.inner.read().exposure_knowledge.clone()
    }
}
