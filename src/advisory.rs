// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Juoni Core - Advisory Expansion Boundary
 * Optional hypothesis expanders and the canonical-vocabulary freeze guard
 *
 * Advisory output has NO authority: it must be ignorable, it must not block
 * planning, and it may only reference the frozen action-class vocabulary.
 * The engine swallows every expander failure.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */
use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::warn;

use crate::errors::CoreResult;
use crate::governance::state::CampaignState;
use crate::graph::store::Graph;
use crate::reasoning::hypothesis::Hypothesis;

/// Optional advisory source of additional hypotheses.
///
/// Implementations may consult remote advisory services; the core only sees
/// this interface and ignores every error it returns.
pub trait HypothesisExpander: Send + Sync {
    fn expand(&self, graph: &Graph, state: &CampaignState) -> CoreResult<Vec<Hypothesis>>;
}

/// The frozen set of action-class ids advisory output may reference.
/// Any deviation indicates drift and causes the suggestion to be dropped.
pub static CANONICAL_ACTION_CLASS_IDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "AC-01", "AC-02", "AC-03", "AC-04", "AC-05", "AC-06", "AC-07", "AC-08", "AC-09", "AC-10",
        "AC-11", "AC-12", "AC-13", "AC-14", "AC-15",
    ]
    .into_iter()
    .collect()
});

/// Returns true when every referenced id is canonical.
pub fn is_canonical_action_class(id: &str) -> bool {
    CANONICAL_ACTION_CLASS_IDS.contains(id)
}

/// Decorator enforcing the frozen vocabulary on any expander.
///
/// Hypotheses anchored to a non-canonical action class are dropped before
/// the engine sees them; unanchored hypotheses pass through untouched.
pub struct ValidatedExpander<E> {
    inner: E,
}

impl<E> ValidatedExpander<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

impl<E: HypothesisExpander> HypothesisExpander for ValidatedExpander<E> {
    fn expand(&self, graph: &Graph, state: &CampaignState) -> CoreResult<Vec<Hypothesis>> {
        let hypotheses = self.inner.expand(graph, state)?;
        let mut out = Vec::with_capacity(hypotheses.len());
        for hypothesis in hypotheses {
            if let Some(id) = hypothesis.action_class_id.as_deref() {
                if !is_canonical_action_class(id) {
                    warn!(
                        hypothesis_id = %hypothesis.id,
                        action_class = id,
                        "advisory referenced non-canonical action class; dropping"
                    );
                    continue;
                }
            }
            out.push(hypothesis);
        }
        Ok(out)
    }
}
