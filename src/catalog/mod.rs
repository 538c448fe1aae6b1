// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Action-class catalogue: the immutable rule set driving planning, and the
//! YAML loader that builds it from the normalized corpus.

pub mod action_class;
pub mod loader;

pub use action_class::{ActionCatalog, ActionClass};
pub use loader::load_action_classes_from_dir;
