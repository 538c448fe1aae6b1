// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Typed operational graph: store, structural patterns, counting snapshot,
//! and synthetic seeding.

pub mod pattern;
pub mod seed;
pub mod snapshot;
pub mod store;

pub use pattern::{matches_graph, GraphPattern};
pub use seed::{seed_synthetic_environment, SeedScenario};
pub use snapshot::GraphSnapshot;
pub use store::{Edge, EdgeKind, Graph, Node, NodeKind};
