// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decision policies that turn raw guard outcomes into final verdicts

use crate::evaluation::{Verdict, WriteEvaluation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Process-wide rule for resolving guard violations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionPolicy {
    /// Always negotiate when possible; never strengthens a counter-offer
    DevFriendly,
    /// Negotiate when safe alternatives exist, reject otherwise
    #[default]
    SafeDefault,
    /// Reject every guard violation outright
    Strict,
}

impl DecisionPolicy {
    /// Wire name used by the WAL and snapshot formats
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionPolicy::DevFriendly => "DEV_FRIENDLY",
            DecisionPolicy::SafeDefault => "SAFE_DEFAULT",
            DecisionPolicy::Strict => "STRICT",
        }
    }

    /// Parse a wire name; None for anything unknown
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "DEV_FRIENDLY" => Some(DecisionPolicy::DevFriendly),
            "SAFE_DEFAULT" => Some(DecisionPolicy::SafeDefault),
            "STRICT" => Some(DecisionPolicy::Strict),
            _ => None,
        }
    }

    /// Rewrite a simulation result into the final verdict under this policy.
    ///
    /// The reasoning text always contains the policy wire name literally so
    /// downstream interfaces and tests can match on it.
    pub fn apply(&self, evaluation: &mut WriteEvaluation) {
        evaluation.applied_policy = *self;

        if evaluation.verdict == Verdict::Accept {
            evaluation.policy_reasoning = "No policy applied - all guards passed".to_string();
            return;
        }

        match self {
            DecisionPolicy::Strict => {
                evaluation.verdict = Verdict::Reject;
                evaluation.alternatives.clear();
                evaluation.policy_reasoning =
                    "Rejected under STRICT policy due to guard violation".to_string();
            }
            DecisionPolicy::DevFriendly => {
                if evaluation.verdict == Verdict::Reject {
                    evaluation.alternatives.clear();
                    evaluation.policy_reasoning =
                        "Rejected under DEV_FRIENDLY policy - value cannot be salvaged".to_string();
                } else {
                    evaluation.policy_reasoning =
                        "Counter-offer under DEV_FRIENDLY policy - showing alternatives"
                            .to_string();
                }
            }
            DecisionPolicy::SafeDefault => {
                if evaluation.verdict == Verdict::Reject {
                    evaluation.alternatives.clear();
                    evaluation.policy_reasoning =
                        "Rejected under SAFE_DEFAULT policy - critical violation".to_string();
                } else if evaluation.alternatives.is_empty() {
                    evaluation.verdict = Verdict::Reject;
                    evaluation.policy_reasoning =
                        "Rejected under SAFE_DEFAULT policy - no safe alternatives available"
                            .to_string();
                } else {
                    evaluation.policy_reasoning =
                        "Counter-offer under SAFE_DEFAULT policy - safe alternatives available"
                            .to_string();
                }
            }
        }
    }
}

impl fmt::Display for DecisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
