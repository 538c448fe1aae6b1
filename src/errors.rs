// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Error Taxonomy
 * Closed error set shared by the reasoning core and governance surface
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use thiserror::Error;

/// Closed error taxonomy for the reasoning core.
///
/// Every fallible operation in the crate maps into exactly one of these
/// variants. `AdvisoryFailed` is the only variant the engine recovers from
/// locally; everything else is surfaced to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A required input field is empty.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// An argument is out of its permitted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An edge references a node that does not exist.
    #[error("unknown edge endpoint: {id}")]
    UnknownEndpoint { id: String },

    /// The requested technique id is absent from the registry.
    #[error("technique not registered: {id}")]
    NotRegistered { id: String },

    /// The same technique id was registered twice. This is a programmer
    /// error; init code is expected to panic on it.
    #[error("duplicate technique registration: {id}")]
    DuplicateRegistration { id: String },

    /// The ROE / intent intersection rejected the request.
    #[error("policy denied: {0}")]
    PolicyDenied(String),

    /// The current UTC time is outside the declared intent window.
    #[error("execution outside intent window ({not_before} - {not_after})")]
    OutOfWindow {
        not_before: String,
        not_after: String,
    },

    /// A cycle was requested while the campaign is halted or completed.
    #[error("campaign is not runnable: {status}")]
    CampaignNotRunnable { status: String },

    /// The exposure tracker latched halted; further additions are refused.
    #[error("exposure limit exceeded; execution halted")]
    ExposureExceeded,

    /// The advisory expander failed. Always suppressed by the engine.
    #[error("advisory expander failed: {0}")]
    AdvisoryFailed(String),

    /// The executor returned an error or missed its deadline. Surfaced
    /// together with the decision and evidence artifact.
    #[error("technique executor failed: {0}")]
    ExecutorFailed(String),

    /// Planning produced an empty ranking.
    #[error("no ranked actions available")]
    NoCandidates,
}

/// Validation errors for the intent contract.
///
/// Kept separate from [`CoreError`] so governance callers can match on the
/// precise field that failed; a contract that fails validation must not
/// enable any execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    #[error("intent contract missing campaign_id")]
    MissingCampaignId,

    #[error("intent contract missing objective")]
    MissingObjective,

    #[error("intent contract defines no allowed techniques")]
    EmptyAllowedTechniques,

    #[error("intent contract defines no targets")]
    EmptyTargets,

    #[error("intent contract missing time window")]
    MissingWindow,

    #[error("intent contract has invalid time window (not_after <= not_before)")]
    InvalidWindow,

    #[error("intent contract not currently valid (valid UTC {not_before} - {not_after})")]
    OutsideWindow {
        not_before: String,
        not_after: String,
    },
}

/// Convenience alias used throughout the crate.
pub type CoreResult<T> = Result<T, CoreError>;
