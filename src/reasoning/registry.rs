// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Technique Effect Registry
 * Closed-world effect metadata owned by the engine
 *
 * Only effects explicitly registered exist. Duplicate registration is a
 * programmer error surfaced as an explicit error variant so init code can
 * fail fast; runtime callers that legitimately replace metadata use
 * `upsert`.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::catalog::action_class::ActionCatalog;
use crate::errors::{CoreError, CoreResult};
use crate::reasoning::planner::TechniqueEffect;

/// Stores technique effects used during planning.
#[derive(Debug, Default)]
pub struct EffectRegistry {
    effects: RwLock<HashMap<String, TechniqueEffect>>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new effect. Registering the same technique id twice is a
    /// hard failure; allowing overrides would enable technique shadowing.
    pub fn register(&self, effect: TechniqueEffect) -> CoreResult<()> {
        if effect.technique_id.is_empty() {
            return Err(CoreError::MissingField {
                field: "technique_id",
            });
        }
        let mut effects = self.effects.write();
        if effects.contains_key(&effect.technique_id) {
            return Err(CoreError::DuplicateRegistration {
                id: effect.technique_id,
            });
        }
        effects.insert(effect.technique_id.clone(), effect);
        Ok(())
    }

    /// Registers or replaces effect metadata. Effects with empty ids are
    /// ignored.
    pub fn upsert(&self, effect: TechniqueEffect) {
        if effect.technique_id.is_empty() {
            return;
        }
        self.effects
            .write()
            .insert(effect.technique_id.clone(), effect);
    }

    pub fn effect(&self, technique_id: &str) -> Option<TechniqueEffect> {
        self.effects.read().get(technique_id).cloned()
    }

    /// Strict lookup used by the engine surface.
    pub fn effect_for(&self, technique_id: &str) -> CoreResult<TechniqueEffect> {
        self.effect(technique_id)
            .ok_or_else(|| CoreError::NotRegistered {
                id: technique_id.to_string(),
            })
    }

    /// All known technique ids, sorted ascending.
    pub fn known_techniques(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.effects.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Configurable coverage invariant: every catalogue class must be
    /// referenced by at least `min_techniques_per_class` registered effects.
    pub fn verify_catalog_coverage(
        &self,
        catalog: &ActionCatalog,
        min_techniques_per_class: usize,
    ) -> CoreResult<()> {
        let effects = self.effects.read();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for effect in effects.values() {
            if let Some(ac_id) = effect.action_class_id.as_deref() {
                *counts.entry(ac_id).or_insert(0) += 1;
            }
        }
        for class in catalog.classes() {
            let covered = counts.get(class.id.as_str()).copied().unwrap_or(0);
            if covered < min_techniques_per_class {
                return Err(CoreError::InvalidArgument(format!(
                    "action class {} covered by {covered} technique(s), expected >= {min_techniques_per_class}",
                    class.id
                )));
            }
        }
        Ok(())
    }
}
