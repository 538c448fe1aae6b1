// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Campaign Planning Tests
 * Objective termination, bounds, ordering, and beam behavior
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use juoni_core::{
    CampaignOptions, CampaignState, Engine, GraphPattern, Node, NodeKind, Phase,
};

fn class(
    id: &str,
    pre: Vec<NodeKind>,
    produces: Vec<NodeKind>,
    risk: f64,
    boost: f64,
) -> juoni_core::ActionClass {
    juoni_core::ActionClass {
        id: id.into(),
        name: id.to_lowercase(),
        phase: Phase::Recon,
        preconditions: vec![GraphPattern::nodes(pre)],
        produces_nodes: produces,
        produces_edges: vec![],
        risk_weight: risk,
        impact_weight: 0.5,
        confidence_boost: boost,
    }
}

fn engine_with_objective_classes() -> Engine {
    let engine = Engine::new(None);
    engine.bind_action_classes(vec![
        class("AC-R", vec![NodeKind::Evidence], vec![NodeKind::Hypothesis], 0.1, 0.2),
        class("AC-D", vec![NodeKind::Hypothesis], vec![NodeKind::DataExposure], 0.2, 0.3),
        class("AC-P", vec![NodeKind::Hypothesis], vec![NodeKind::PrivEsc], 0.25, 0.25),
    ]);
    engine
        .graph()
        .upsert_node(Node::new("seed", NodeKind::Evidence, "seed"));
    engine
}

#[test]
fn test_campaigns_reach_objective_with_descending_scores() {
    let engine = engine_with_objective_classes();
    let state = CampaignState::new("camp-objective").unwrap();

    let campaigns = engine
        .plan_campaign(
            Some(NodeKind::DataExposure),
            CampaignOptions {
                max_depth: 4,
                risk_tolerance: 1.0,
                confidence_threshold: 0.4,
                beam_width: 6,
                top_n: 5,
                objective_bias_weight: 0.35,
            },
            &state,
        )
        .unwrap();

    assert!(!campaigns.is_empty(), "expected campaigns");
    for (i, campaign) in campaigns.iter().enumerate() {
        assert_eq!(campaign.objective, NodeKind::DataExposure);
        let last = campaign.steps.last().unwrap();
        assert_eq!(last.action_class_id, "AC-D", "campaign must end at the objective");
        if i > 0 {
            assert!(
                campaigns[i - 1].score >= campaign.score,
                "scores are not descending"
            );
        }
    }
}

#[test]
fn test_missing_objective_is_invalid_argument() {
    let engine = engine_with_objective_classes();
    let state = CampaignState::new("camp-noobj").unwrap();
    assert!(matches!(
        engine.plan_campaign(None, CampaignOptions::default(), &state),
        Err(juoni_core::CoreError::InvalidArgument(_))
    ));
}

#[test]
fn test_risk_tolerance_and_confidence_threshold_bound_results() {
    let engine = engine_with_objective_classes();
    let state = CampaignState::new("camp-bounds").unwrap();

    let campaigns = engine
        .plan_campaign(
            Some(NodeKind::DataExposure),
            CampaignOptions {
                max_depth: 5,
                risk_tolerance: 0.35,
                confidence_threshold: 0.7,
                beam_width: 10,
                top_n: 10,
                objective_bias_weight: 0.35,
            },
            &state,
        )
        .unwrap();

    for campaign in &campaigns {
        assert!(campaign.risk <= 0.35 + 1e-9, "risk bound violated");
        assert!(campaign.confidence >= 0.7 - 1e-9, "confidence bound violated");
    }
}

#[test]
fn test_beam_pruning_no_explosion() {
    let engine = Engine::new(None);
    let mut classes: Vec<juoni_core::ActionClass> = (0..12)
        .map(|i| {
            class(
                &format!("AC-PRE-{}", (b'A' + i as u8) as char),
                vec![NodeKind::Evidence],
                vec![NodeKind::Hypothesis],
                0.05,
                0.15,
            )
        })
        .collect();
    classes.push(class(
        "AC-OBJ",
        vec![NodeKind::Hypothesis],
        vec![NodeKind::DataExposure],
        0.05,
        0.3,
    ));
    engine.bind_action_classes(classes);
    engine
        .graph()
        .upsert_node(Node::new("seed", NodeKind::Evidence, "seed"));
    let state = CampaignState::new("camp-beam").unwrap();

    let narrow = engine
        .plan_campaign(
            Some(NodeKind::DataExposure),
            CampaignOptions {
                max_depth: 5,
                beam_width: 2,
                risk_tolerance: 3.0,
                confidence_threshold: 0.2,
                top_n: 100,
                objective_bias_weight: 0.35,
            },
            &state,
        )
        .unwrap();
    let wide = engine
        .plan_campaign(
            Some(NodeKind::DataExposure),
            CampaignOptions {
                max_depth: 5,
                beam_width: 8,
                risk_tolerance: 3.0,
                confidence_threshold: 0.2,
                top_n: 100,
                objective_bias_weight: 0.35,
            },
            &state,
        )
        .unwrap();

    assert!(
        narrow.len() <= wide.len(),
        "beam pruning broken narrow={} wide={}",
        narrow.len(),
        wide.len()
    );
    assert!(wide.len() <= 100, "unexpected campaign explosion: {}", wide.len());
}

#[test]
fn test_phase_ordering_holds_in_campaign_steps() {
    let engine = Engine::new(None);
    engine.bind_action_classes(vec![
        class("AC-R", vec![NodeKind::Evidence], vec![NodeKind::Hypothesis], 0.05, 0.2),
        juoni_core::ActionClass {
            phase: Phase::InitialAccess,
            ..class("AC-IA", vec![NodeKind::Hypothesis], vec![NodeKind::DataExposure], 0.1, 0.3)
        },
    ]);
    engine
        .graph()
        .upsert_node(Node::new("seed", NodeKind::Evidence, "seed"));
    let state = CampaignState::new("camp-phase").unwrap();

    let campaigns = engine
        .plan_campaign(
            Some(NodeKind::DataExposure),
            CampaignOptions {
                confidence_threshold: 0.4,
                ..Default::default()
            },
            &state,
        )
        .unwrap();

    assert!(!campaigns.is_empty());
    for campaign in &campaigns {
        let mut previous = Phase::Recon;
        for step in &campaign.steps {
            assert!(
                juoni_core::phase_allowed(previous, step.phase),
                "step phase {} violates ordering from {}",
                step.phase,
                previous
            );
            previous = step.phase;
        }
    }
}

#[test]
fn test_campaign_planning_is_deterministic() {
    let engine = engine_with_objective_classes();
    let state = CampaignState::new("camp-det").unwrap();
    let opts = CampaignOptions {
        confidence_threshold: 0.4,
        ..Default::default()
    };
    let a = engine
        .plan_campaign(Some(NodeKind::DataExposure), opts, &state)
        .unwrap();
    let b = engine
        .plan_campaign(Some(NodeKind::DataExposure), opts, &state)
        .unwrap();
    assert_eq!(a, b);
    assert!(!a.is_empty());
}
