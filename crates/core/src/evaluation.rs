// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write evaluation: guard simulation over a proposed write
//!
//! Simulation is a pure function over the guard registry and the proposed
//! value. It never touches the version store, the WAL, or the clock.

use crate::guard::{Alternative, Guard, GuardOutcome};
use crate::policy::DecisionPolicy;
use serde::{Deserialize, Serialize};

/// Final verdict on a proposed write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Accept,
    Reject,
    CounterOffer,
}

/// Immutable record of a write proposal's evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteEvaluation {
    pub key: String,
    pub proposed_value: String,
    pub verdict: Verdict,
    pub reason: String,
    pub alternatives: Vec<Alternative>,
    /// Names of guards that rejected or counter-offered, in registration order
    pub triggered_guards: Vec<String>,
    pub applied_policy: DecisionPolicy,
    pub policy_reasoning: String,
}

/// Simulate a proposed write against the guard registry.
///
/// Rules:
/// - only enabled guards whose pattern matches the key participate,
///   in registration order;
/// - the first `Reject` short-circuits: its reason wins, no alternatives,
///   no later guards are consulted;
/// - counter-offer reasons are joined with `"; "` and alternatives are
///   de-duplicated by value, first occurrence winning across guards;
/// - any counter-offer makes the combined verdict `CounterOffer`,
///   otherwise everything accepted.
pub fn simulate(guards: &[Guard], key: &str, value: &str) -> WriteEvaluation {
    let mut evaluation = WriteEvaluation {
        key: key.to_string(),
        proposed_value: value.to_string(),
        verdict: Verdict::Accept,
        reason: String::new(),
        alternatives: Vec::new(),
        triggered_guards: Vec::new(),
        applied_policy: DecisionPolicy::default(),
        policy_reasoning: String::new(),
    };

    let applicable: Vec<&Guard> = guards
        .iter()
        .filter(|guard| guard.enabled && guard.applies_to(key))
        .collect();

    if applicable.is_empty() {
        evaluation.reason = "No guards defined for this key".to_string();
        return evaluation;
    }

    let mut all_accepted = true;
    let mut collected: Vec<Alternative> = Vec::new();

    for guard in applicable {
        match guard.evaluate(value) {
            GuardOutcome::Reject { reason } => {
                evaluation.verdict = Verdict::Reject;
                evaluation.triggered_guards.push(guard.name.clone());
                evaluation.reason = reason;
                return evaluation;
            }
            GuardOutcome::CounterOffer {
                reason,
                alternatives,
            } => {
                all_accepted = false;
                evaluation.triggered_guards.push(guard.name.clone());
                for alternative in alternatives {
                    if !collected.iter().any(|existing| existing.value == alternative.value) {
                        collected.push(alternative);
                    }
                }
                if evaluation.reason.is_empty() {
                    evaluation.reason = reason;
                } else {
                    evaluation.reason.push_str("; ");
                    evaluation.reason.push_str(&reason);
                }
            }
            GuardOutcome::Accept { .. } => {}
        }
    }

    if all_accepted {
        evaluation.reason = "All guards passed".to_string();
    } else {
        evaluation.verdict = Verdict::CounterOffer;
        evaluation.alternatives = collected;
    }

    evaluation
}

#[cfg(test)]
#[path = "evaluation_tests.rs"]
mod tests;
