// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Evidence Integrity
 * Tamper protection via deterministic hashing
 *
 * Integrity provides tamper detection, chain-of-custody confidence, and
 * audit defensibility. Evidence is meant to be read, not altered: it is
 * never encrypted, hidden, or obfuscated.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::{CoreError, CoreResult};
use crate::evidence::artifact::EvidenceArtifact;

/// Deterministic byte representation of an artifact excluding the
/// `integrity` field. Field order is fixed by declaration order.
#[derive(Serialize)]
struct SignedView<'a> {
    artifact_id: &'a str,
    campaign_id: &'a str,
    technique_id: &'a str,
    target: &'a str,
    executed_at: &'a DateTime<Utc>,
    success: bool,
    output: &'a str,
    exposure_score: u64,
}

fn canonical_payload(artifact: &EvidenceArtifact) -> CoreResult<Vec<u8>> {
    let view = SignedView {
        artifact_id: &artifact.artifact_id,
        campaign_id: &artifact.campaign_id,
        technique_id: &artifact.technique_id,
        target: &artifact.target,
        executed_at: &artifact.executed_at,
        success: artifact.success,
        output: &artifact.output,
        exposure_score: artifact.exposure_score,
    };
    serde_json::to_vec(&view)
        .map_err(|e| CoreError::InvalidArgument(format!("canonical payload: {e}")))
}

impl EvidenceArtifact {
    /// Calculates and applies the integrity signature over the artifact's
    /// immutable fields. Fails if the artifact is structurally incomplete
    /// or already signed.
    pub fn sign(&mut self) -> CoreResult<()> {
        self.validate()?;
        if self.is_signed() {
            return Err(CoreError::InvalidArgument("artifact already signed".into()));
        }
        let payload = canonical_payload(self)?;
        let hash = Sha256::digest(&payload);
        self.integrity = hex::encode(hash);
        Ok(())
    }

    /// Checks whether the artifact's integrity matches its contents.
    pub fn verify(&self) -> CoreResult<bool> {
        if !self.is_signed() {
            return Err(CoreError::InvalidArgument("artifact not signed".into()));
        }
        let payload = canonical_payload(self)?;
        let expected = hex::encode(Sha256::digest(&payload));
        Ok(self.integrity == expected)
    }
}
