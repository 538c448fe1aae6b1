// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Simulation Scenario Tests
 * Seeded environment profiles exercised end to end through expansion
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use juoni_core::{
    ActionClass, AttackPath, AttackPathConfig, CampaignState, Edge, EdgeKind, Engine,
    GraphPattern, Node, NodeKind, Phase,
};

struct Scenario {
    name: &'static str,
    max_depth: usize,
    nodes: Vec<(&'static str, NodeKind, &'static str)>,
    edges: Vec<(&'static str, &'static str, EdgeKind)>,
    classes: Vec<ActionClass>,
}

fn class(
    id: &str,
    phase: Phase,
    pattern: GraphPattern,
    produces: Vec<NodeKind>,
    produces_edges: Vec<EdgeKind>,
    risk: f64,
    impact: f64,
    boost: f64,
) -> ActionClass {
    ActionClass {
        id: id.into(),
        name: id.to_lowercase(),
        phase,
        preconditions: vec![pattern],
        produces_nodes: produces,
        produces_edges,
        risk_weight: risk,
        impact_weight: impact,
        confidence_boost: boost,
    }
}

fn run_scenario(scenario: Scenario) -> Vec<AttackPath> {
    let engine = Engine::new(None);
    engine.bind_action_classes(scenario.classes);
    for (id, kind, label) in &scenario.nodes {
        engine.graph().upsert_node(Node::new(*id, *kind, *label));
    }
    for (src, dst, kind) in &scenario.edges {
        engine
            .graph()
            .add_edge(Edge::new(*src, *dst, *kind, 1.0))
            .unwrap();
    }
    engine.configure_attack_paths(AttackPathConfig {
        max_depth: scenario.max_depth,
        risk_threshold: 3.0,
        start_node_kinds: vec![
            NodeKind::Evidence,
            NodeKind::Hypothesis,
            NodeKind::Technique,
        ],
        objective_node_kinds: vec![NodeKind::AttackPath],
        ..Default::default()
    });
    let state = CampaignState::new(scenario.name).unwrap();
    engine.expand_attack_paths(&state)
}

fn has_action_class(paths: &[AttackPath], id: &str) -> bool {
    paths.iter().any(|p| {
        p.steps
            .iter()
            .any(|s| s.action_class_id.as_deref() == Some(id))
    })
}

#[test]
fn test_minimal_exposure_scenario() {
    let paths = run_scenario(Scenario {
        name: "minimal-exposure",
        max_depth: 3,
        nodes: vec![
            ("min-ev", NodeKind::Evidence, "external footprint"),
            ("min-hyp", NodeKind::Hypothesis, "surface hypothesis"),
        ],
        edges: vec![("min-ev", "min-hyp", EdgeKind::Supports)],
        classes: vec![
            class(
                "AC-01",
                Phase::Recon,
                GraphPattern::nodes(vec![NodeKind::Evidence]),
                vec![NodeKind::Hypothesis],
                vec![],
                0.2,
                0.4,
                0.1,
            ),
            class(
                "AC-02",
                Phase::InitialAccess,
                GraphPattern::nodes(vec![NodeKind::Hypothesis]),
                vec![NodeKind::AttackPath],
                vec![],
                0.3,
                0.7,
                0.2,
            ),
        ],
    });
    assert!(!paths.is_empty(), "expected non-empty paths for minimal exposure");
    assert!(!has_action_class(&paths, "AC-13"));
    assert!(!has_action_class(&paths, "AC-15"));
    for path in &paths {
        assert!(path.steps.len() <= 3);
    }
}

#[test]
fn test_credential_leak_scenario() {
    let paths = run_scenario(Scenario {
        name: "credential-leak",
        max_depth: 5,
        nodes: vec![
            ("cred-ev", NodeKind::Evidence, "credential residue"),
            ("cred-tech", NodeKind::Technique, "legacy auth"),
            ("cred-hyp", NodeKind::Hypothesis, "credential hypothesis"),
        ],
        edges: vec![
            ("cred-ev", "cred-hyp", EdgeKind::Supports),
            ("cred-hyp", "cred-tech", EdgeKind::Enables),
        ],
        classes: vec![
            class(
                "AC-03",
                Phase::Recon,
                GraphPattern::nodes(vec![NodeKind::Evidence]),
                vec![NodeKind::Evidence],
                vec![],
                0.2,
                0.2,
                0.05,
            ),
            class(
                "AC-04",
                Phase::Recon,
                GraphPattern::nodes(vec![NodeKind::Evidence]),
                vec![NodeKind::Hypothesis],
                vec![EdgeKind::Supports],
                0.3,
                0.3,
                0.1,
            ),
            class(
                "AC-05",
                Phase::InitialAccess,
                GraphPattern::nodes(vec![NodeKind::Hypothesis]),
                vec![NodeKind::Technique],
                vec![EdgeKind::Enables],
                0.4,
                0.4,
                0.1,
            ),
            class(
                "AC-08",
                Phase::InitialAccess,
                GraphPattern {
                    required_node_kinds: vec![
                        NodeKind::Evidence,
                        NodeKind::Hypothesis,
                        NodeKind::Technique,
                    ],
                    required_edge_kinds: vec![EdgeKind::Supports, EdgeKind::Enables],
                },
                vec![NodeKind::AttackPath],
                vec![],
                0.8,
                0.9,
                0.2,
            ),
            class(
                "AC-09",
                Phase::InitialAccess,
                GraphPattern::nodes(vec![
                    NodeKind::Evidence,
                    NodeKind::Hypothesis,
                    NodeKind::Technique,
                ]),
                vec![NodeKind::AttackPath],
                vec![],
                0.7,
                0.85,
                0.2,
            ),
        ],
    });
    assert!(!paths.is_empty(), "expected non-empty paths for credential leak");
    assert!(
        has_action_class(&paths, "AC-08") || has_action_class(&paths, "AC-09"),
        "expected a credential abuse path"
    );
}

#[test]
fn test_internal_access_scenario() {
    let paths = run_scenario(Scenario {
        name: "internal-access",
        max_depth: 4,
        nodes: vec![
            ("int-ev", NodeKind::Evidence, "internal network map"),
            ("int-hyp", NodeKind::Hypothesis, "pivot candidate"),
        ],
        edges: vec![("int-ev", "int-hyp", EdgeKind::Supports)],
        classes: vec![
            class(
                "AC-10",
                Phase::Recon,
                GraphPattern::nodes(vec![NodeKind::Evidence]),
                vec![NodeKind::Technique],
                vec![],
                0.3,
                0.5,
                0.1,
            ),
            class(
                "AC-11",
                Phase::InitialAccess,
                GraphPattern::nodes(vec![NodeKind::Evidence, NodeKind::Technique]),
                vec![NodeKind::AttackPath],
                vec![],
                0.6,
                0.8,
                0.15,
            ),
        ],
    });
    assert!(!paths.is_empty(), "expected non-empty paths for internal access");
    assert!(has_action_class(&paths, "AC-11"));
}

#[test]
fn test_high_value_asset_scenario() {
    let paths = run_scenario(Scenario {
        name: "high-value-asset",
        max_depth: 5,
        nodes: vec![
            ("hva-ev", NodeKind::Evidence, "critical asset telemetry"),
            ("hva-hyp", NodeKind::Hypothesis, "high value exposure"),
            ("hva-tech", NodeKind::Technique, "sensitive control plane"),
        ],
        edges: vec![("hva-ev", "hva-hyp", EdgeKind::Supports)],
        classes: vec![
            class(
                "AC-12",
                Phase::Recon,
                GraphPattern::nodes(vec![NodeKind::Evidence, NodeKind::Hypothesis]),
                vec![NodeKind::Technique],
                vec![],
                0.4,
                0.7,
                0.1,
            ),
            class(
                "AC-13",
                Phase::InitialAccess,
                GraphPattern::nodes(vec![NodeKind::Evidence, NodeKind::Technique]),
                vec![NodeKind::AttackPath],
                vec![],
                0.9,
                1.0,
                0.25,
            ),
            class(
                "AC-14",
                Phase::Recon,
                GraphPattern::nodes(vec![NodeKind::Evidence]),
                vec![NodeKind::Hypothesis],
                vec![],
                0.5,
                0.6,
                0.1,
            ),
            class(
                "AC-15",
                Phase::InitialAccess,
                GraphPattern::nodes(vec![NodeKind::Hypothesis, NodeKind::Technique]),
                vec![NodeKind::AttackPath],
                vec![],
                1.0,
                1.2,
                0.3,
            ),
        ],
    });
    assert!(!paths.is_empty(), "expected non-empty paths for high value asset");
    assert!(
        has_action_class(&paths, "AC-13") || has_action_class(&paths, "AC-15"),
        "expected an impact-class path"
    );
}
