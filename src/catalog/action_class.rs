// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Action Class Catalogue
 * Canonical adversarial action classes and their atomic registry
 *
 * An action class is a structural rule relating graph preconditions to
 * graph productions. The catalogue is the closed world of planning: it is
 * bound once, replaced atomically, and read everywhere.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::governance::phase::Phase;
use crate::graph::pattern::GraphPattern;
use crate::graph::store::{EdgeKind, NodeKind};

/// A canonical adversarial action class that can produce graph changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionClass {
    /// Canonical identifier, e.g. `AC-01`.
    pub id: String,
    pub name: String,
    pub phase: Phase,
    /// AND-joined structural preconditions.
    #[serde(default)]
    pub preconditions: Vec<GraphPattern>,
    #[serde(default)]
    pub produces_nodes: Vec<NodeKind>,
    #[serde(default)]
    pub produces_edges: Vec<EdgeKind>,
    pub risk_weight: f64,
    pub impact_weight: f64,
    pub confidence_boost: f64,
}

/// Atomic registry of bound action classes.
///
/// `bind` replaces the whole set; lookups and enumeration never observe a
/// partially-replaced catalogue.
#[derive(Debug, Default)]
pub struct ActionCatalog {
    classes: RwLock<HashMap<String, ActionClass>>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replaces the bound catalogue. Classes with empty ids are
    /// skipped; within one call a later duplicate id wins.
    pub fn bind(&self, classes: Vec<ActionClass>) {
        let mut map = HashMap::with_capacity(classes.len());
        for class in classes {
            if class.id.is_empty() {
                continue;
            }
            map.insert(class.id.clone(), class);
        }
        *self.classes.write() = map;
    }

    /// All bound classes, sorted ascending by id.
    pub fn classes(&self) -> Vec<ActionClass> {
        let mut out: Vec<ActionClass> = self.classes.read().values().cloned().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    pub fn by_id(&self, id: &str) -> Option<ActionClass> {
        self.classes.read().get(id).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }
}
