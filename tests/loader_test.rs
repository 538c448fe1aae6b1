// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Action Class Loader Tests
 * YAML corpus ingestion contract
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use std::fs;
use std::path::Path;

use juoni_core::{load_action_classes_from_dir, EdgeKind, NodeKind, Phase};

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_loads_corpus_and_skips_non_class_files() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "AC-01-Passive-Observation.yaml",
        "id: AC-01\nname: Passive Observation\nintent_domains: [discovery]\npreconditions: [network_reachability]\n",
    );
    write(
        dir.path(),
        "AC-02-Active-Surface-Discovery.yaml",
        "id: AC-02\nname: Active Surface Discovery\nintent_domains: [enumeration]\npreconditions: [network_reachability]\nunknown_key: ignored\n",
    );
    write(dir.path(), "README.yaml", "id: nope\n");
    write(dir.path(), "_template.yaml", "id: nope\n");
    write(dir.path(), "notes.txt", "not yaml");

    let classes = load_action_classes_from_dir(dir.path()).unwrap();
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0].id, "AC-01");
    assert_eq!(classes[0].name, "Passive Observation");
    assert_eq!(classes[0].phase, Phase::Recon);
    assert_eq!(classes[1].id, "AC-02");
}

#[test]
fn test_loaded_defaults_and_precondition_mapping() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "AC-09-Access-Establishment.yaml",
        "id: AC-09\nname: Access Establishment\nintent_domains: [access]\npreconditions: [credential_material_present, execution_environment, made_up]\n",
    );

    let classes = load_action_classes_from_dir(dir.path()).unwrap();
    assert_eq!(classes.len(), 1);
    let ac = &classes[0];
    assert_eq!(ac.phase, Phase::InitialAccess);

    // unknown vocabulary entries are dropped, known ones mapped
    assert_eq!(ac.preconditions.len(), 2);
    assert_eq!(
        ac.preconditions[0].required_node_kinds,
        vec![NodeKind::Evidence, NodeKind::Technique]
    );
    assert_eq!(
        ac.preconditions[1].required_edge_kinds,
        vec![EdgeKind::Enables]
    );

    // loader defaults
    assert_eq!(
        ac.produces_nodes,
        vec![NodeKind::Evidence, NodeKind::Hypothesis]
    );
    assert_eq!(ac.produces_edges, vec![EdgeKind::Supports]);
    assert!((ac.risk_weight - 0.4).abs() < 1e-9);
    assert!((ac.impact_weight - 0.6).abs() < 1e-9);
    assert!((ac.confidence_boost - 0.1).abs() < 1e-9);
}

#[test]
fn test_phase_inference_from_intent_domains() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "AC-11-Lateral-Reachability.yaml",
        "id: AC-11\nname: Lateral Reachability\nintent_domains: [validation]\npreconditions: []\n",
    );
    write(
        dir.path(),
        "AC-13-Data-Exposure.yaml",
        "id: AC-13\nname: Data Exposure\nintent_domains: [impact]\npreconditions: []\n",
    );
    write(
        dir.path(),
        "AC-14-Impact-Feasibility.yaml",
        "id: AC-14\nname: Impact Feasibility\npreconditions: []\n",
    );

    let classes = load_action_classes_from_dir(dir.path()).unwrap();
    assert_eq!(classes[0].phase, Phase::LateralMovement);
    assert_eq!(classes[1].phase, Phase::Objective);
    assert_eq!(classes[2].phase, Phase::Recon, "default phase is Recon");
}

#[test]
fn test_filename_must_match_declared_id() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "AC-03-Reachability-Validation.yaml",
        "id: AC-04\nname: Mismatched\n",
    );
    let err = load_action_classes_from_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("does not match declared id"));
}

#[test]
fn test_missing_id_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "AC-05-No-Id.yaml", "name: No Id\n");
    assert!(load_action_classes_from_dir(dir.path()).is_err());
}

#[test]
fn test_loaded_ids_are_unique_after_bind() {
    let dir = tempfile::tempdir().unwrap();
    for i in 1..=6 {
        write(
            dir.path(),
            &format!("AC-{i:02}-Class.yaml"),
            &format!("id: AC-{i:02}\nname: Class {i}\nintent_domains: [discovery]\n"),
        );
    }
    let classes = load_action_classes_from_dir(dir.path()).unwrap();
    let catalog = juoni_core::ActionCatalog::new();
    catalog.bind(classes);
    assert_eq!(catalog.len(), 6);
    let ids: Vec<String> = catalog.classes().into_iter().map(|c| c.id).collect();
    let mut deduped = ids.clone();
    deduped.dedup();
    assert_eq!(ids, deduped, "catalogue ids must be unique and sorted");
}
