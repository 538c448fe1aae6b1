// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Action Class Loader
 * YAML ingestion for the normalized action-class corpus
 *
 * One file per action class, named `AC-NN-<Title>.yaml`. The filename
 * prefix must equal the file's `id:` scalar. README and underscore-prefixed
 * entries are skipped, as is anything that is not a YAML file. Unknown keys
 * are ignored.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

use crate::catalog::action_class::ActionClass;
use crate::governance::phase::Phase;
use crate::graph::pattern::GraphPattern;
use crate::graph::store::{EdgeKind, NodeKind};

/// Raw file shape. Unknown keys are ignored by serde defaults.
#[derive(Debug, Deserialize)]
struct ActionClassFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    intent_domains: Vec<String>,
    #[serde(default)]
    preconditions: Vec<String>,
}

/// Loads all YAML action-class definitions from a directory.
pub fn load_action_classes_from_dir(dir: impl AsRef<Path>) -> Result<Vec<ActionClass>> {
    let dir = dir.as_ref();
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read action class directory: {dir:?}"))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("failed to enumerate action class directory: {dir:?}"))?;
    entries.sort_by_key(|e| e.file_name());

    let mut classes = Vec::with_capacity(entries.len());
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        if !file_name.ends_with(".yaml") && !file_name.ends_with(".yml") {
            continue;
        }
        if file_name.starts_with("README") || file_name.starts_with('_') {
            continue;
        }
        classes.push(load_action_class_file(&path)?);
    }
    debug!(count = classes.len(), dir = ?dir, "loaded action classes");
    Ok(classes)
}

fn load_action_class_file(path: &Path) -> Result<ActionClass> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read action class file: {path:?}"))?;
    let raw: ActionClassFile = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse action class YAML: {path:?}"))?;

    if raw.id.is_empty() {
        anyhow::bail!("action class {path:?} missing id");
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if !file_name.starts_with(&raw.id) {
        anyhow::bail!(
            "action class file {file_name} does not match declared id {}",
            raw.id
        );
    }

    let phase = infer_phase(&raw.intent_domains);
    let mut patterns = Vec::with_capacity(raw.preconditions.len());
    for precondition in &raw.preconditions {
        match precondition_pattern(precondition) {
            Some(pattern) => patterns.push(pattern),
            None => {
                warn!(precondition = %precondition, file = %file_name, "unknown precondition; skipping")
            }
        }
    }

    Ok(ActionClass {
        id: raw.id,
        name: raw.name,
        phase,
        preconditions: patterns,
        produces_nodes: vec![NodeKind::Evidence, NodeKind::Hypothesis],
        produces_edges: vec![EdgeKind::Supports],
        risk_weight: 0.4,
        impact_weight: 0.6,
        confidence_boost: 0.1,
    })
}

fn infer_phase(domains: &[String]) -> Phase {
    for domain in domains {
        match domain.to_lowercase().as_str() {
            "discovery" | "enumeration" => return Phase::Recon,
            "access" => return Phase::InitialAccess,
            "validation" => return Phase::LateralMovement,
            "impact" => return Phase::Objective,
            _ => {}
        }
    }
    Phase::Recon
}

/// Fixed precondition vocabulary mapping to structural patterns.
fn precondition_pattern(precondition: &str) -> Option<GraphPattern> {
    match precondition.to_lowercase().as_str() {
        "network_reachability" => Some(GraphPattern::nodes(vec![NodeKind::Evidence])),
        "credential_material_present" => Some(GraphPattern::nodes(vec![
            NodeKind::Evidence,
            NodeKind::Technique,
        ])),
        "access_established" => Some(GraphPattern::nodes(vec![
            NodeKind::Evidence,
            NodeKind::Hypothesis,
        ])),
        "execution_environment" => Some(GraphPattern::edges(vec![EdgeKind::Enables])),
        "user_interaction" => Some(GraphPattern::edges(vec![EdgeKind::Supports])),
        _ => None,
    }
}
