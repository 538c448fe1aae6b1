// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Governance surface: declared intent, ROE enforcement, exposure
//! accounting, and the campaign lifecycle state machine. Every cycle is
//! gated here before any planning or execution happens.

pub mod exposure;
pub mod intent;
pub mod phase;
pub mod roe;
pub mod state;

pub use exposure::{ExposureLevel, ExposureSnapshot, ExposureTracker};
pub use intent::IntentContract;
pub use phase::{phase_allowed, Phase, PhaseMachine};
pub use roe::RoeEnforcer;
pub use state::{CampaignState, CampaignStatus};
