// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Evidence Artifact
 * Factual execution record
 *
 * An artifact is a single, immutable fact produced by execution: a
 * timestamped record bound to intent, technique, and target, and
 * cryptographically verifiable. Artifacts record what happened, not what it
 * means, and any mutation after signing invalidates integrity.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CoreError, CoreResult};

/// A single unit of evidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceArtifact {
    /// Uniquely identifies this evidence unit. Generated once, never reused.
    pub artifact_id: String,

    /// Binds evidence to a declared intent.
    pub campaign_id: String,

    /// Technique that was executed.
    pub technique_id: String,

    /// Execution target.
    pub target: String,

    /// When execution completed (UTC).
    pub executed_at: DateTime<Utc>,

    /// Whether the technique completed successfully.
    pub success: bool,

    /// Raw, uninterpreted execution output. No analysis, summaries, or
    /// inferred impact.
    pub output: String,

    /// Exposure score at time of execution.
    pub exposure_score: u64,

    /// Hex SHA-256 over the canonical view of all other fields. Empty until
    /// signed.
    pub integrity: String,
}

impl EvidenceArtifact {
    /// Builds an unsigned artifact with a fresh id and the current UTC
    /// execution timestamp.
    pub fn new(
        campaign_id: impl Into<String>,
        technique_id: impl Into<String>,
        target: impl Into<String>,
        success: bool,
        output: impl Into<String>,
        exposure_score: u64,
    ) -> Self {
        Self {
            artifact_id: Uuid::new_v4().to_string(),
            campaign_id: campaign_id.into(),
            technique_id: technique_id.into(),
            target: target.into(),
            executed_at: Utc::now(),
            success,
            output: output.into(),
            exposure_score,
            integrity: String::new(),
        }
    }

    /// Structural validation prior to signing.
    pub fn validate(&self) -> CoreResult<()> {
        if self.artifact_id.is_empty() {
            return Err(CoreError::MissingField {
                field: "artifact_id",
            });
        }
        if self.campaign_id.is_empty() {
            return Err(CoreError::MissingField {
                field: "campaign_id",
            });
        }
        if self.technique_id.is_empty() {
            return Err(CoreError::MissingField {
                field: "technique_id",
            });
        }
        if self.target.is_empty() {
            return Err(CoreError::MissingField { field: "target" });
        }
        Ok(())
    }

    /// Whether the integrity signature has been applied.
    pub fn is_signed(&self) -> bool {
        !self.integrity.is_empty()
    }
}
