// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Evidence artifacts: immutable execution facts with SHA-256 integrity.

pub mod artifact;
pub mod signature;

pub use artifact::EvidenceArtifact;
