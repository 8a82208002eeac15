// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative write guards
//!
//! A guard is a named constraint matched to keys by pattern. Evaluating a
//! guard is a pure, total function from the proposed value to an outcome,
//! optionally carrying safe alternative values for negotiation.

use serde::{Deserialize, Serialize};

/// A safe alternative value offered alongside a counter-offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub value: String,
    pub explanation: String,
}

impl Alternative {
    pub fn new(value: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            explanation: explanation.into(),
        }
    }
}

/// Outcome of evaluating a single guard against a proposed value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Value satisfies the constraint
    Accept { reason: String },
    /// Value violates the constraint but safe alternatives may exist
    CounterOffer {
        reason: String,
        alternatives: Vec<Alternative>,
    },
    /// Value is structurally unusable for this constraint
    Reject { reason: String },
}

/// Constraint variants with their evaluation data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GuardRule {
    /// Accept integer values within [min, max]
    RangeInt { min: i64, max: i64 },
    /// Accept values present in the allowed set (case-sensitive)
    Enum { allowed: Vec<String> },
    /// Accept values whose character length is within [min, max]
    Length { min: usize, max: usize },
}

/// A named constraint applied to keys matching a pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guard {
    pub name: String,
    /// Exact key, trailing-`*` prefix wildcard, or lone `*` for all keys
    pub pattern: String,
    pub enabled: bool,
    pub rule: GuardRule,
}

impl Guard {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, rule: GuardRule) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            enabled: true,
            rule,
        }
    }

    pub fn range_int(
        name: impl Into<String>,
        pattern: impl Into<String>,
        min: i64,
        max: i64,
    ) -> Self {
        Self::new(name, pattern, GuardRule::RangeInt { min, max })
    }

    pub fn enum_values(
        name: impl Into<String>,
        pattern: impl Into<String>,
        allowed: Vec<String>,
    ) -> Self {
        Self::new(name, pattern, GuardRule::Enum { allowed })
    }

    pub fn length(
        name: impl Into<String>,
        pattern: impl Into<String>,
        min: usize,
        max: usize,
    ) -> Self {
        Self::new(name, pattern, GuardRule::Length { min, max })
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check whether this guard applies to the given key
    pub fn applies_to(&self, key: &str) -> bool {
        if self.pattern == "*" || self.pattern == key {
            return true;
        }
        if let Some(prefix) = self.pattern.strip_suffix('*') {
            return key.starts_with(prefix);
        }
        false
    }

    /// Evaluate the proposed value. Total: every input yields one outcome.
    pub fn evaluate(&self, proposed: &str) -> GuardOutcome {
        match &self.rule {
            GuardRule::RangeInt { min, max } => evaluate_range(proposed, *min, *max),
            GuardRule::Enum { allowed } => evaluate_enum(proposed, allowed),
            GuardRule::Length { min, max } => evaluate_length(proposed, *min, *max),
        }
    }

    /// Human-readable description of the constraint
    pub fn describe(&self) -> String {
        match &self.rule {
            GuardRule::RangeInt { min, max } => format!("Integer range: [{}, {}]", min, max),
            GuardRule::Enum { allowed } => format!("Allowed values: {}", format_allowed(allowed)),
            GuardRule::Length { min, max } => {
                format!("String length: [{}, {}] characters", min, max)
            }
        }
    }
}

fn evaluate_range(proposed: &str, min: i64, max: i64) -> GuardOutcome {
    let Ok(value) = proposed.parse::<i64>() else {
        return GuardOutcome::Reject {
            reason: "Value is not a valid integer".to_string(),
        };
    };

    if value >= min && value <= max {
        return GuardOutcome::Accept {
            reason: format!("Value within acceptable range [{}, {}]", min, max),
        };
    }

    let mut alternatives = Vec::new();
    if value < min {
        alternatives.push(Alternative::new(
            min.to_string(),
            format!("Minimum allowed value (proposed {} is too low)", value),
        ));
        if max > min {
            let conservative = min + (max - min) / 4;
            alternatives.push(Alternative::new(
                conservative.to_string(),
                "Conservative value within range",
            ));
        }
    } else {
        alternatives.push(Alternative::new(
            max.to_string(),
            format!("Maximum allowed value (proposed {} is too high)", value),
        ));
        if max > min {
            let conservative = max - (max - min) / 4;
            alternatives.push(Alternative::new(
                conservative.to_string(),
                "Conservative value within range",
            ));
        }
    }

    GuardOutcome::CounterOffer {
        reason: format!(
            "Value {} outside acceptable range [{}, {}]",
            value, min, max
        ),
        alternatives,
    }
}

fn evaluate_enum(proposed: &str, allowed: &[String]) -> GuardOutcome {
    if allowed.iter().any(|candidate| candidate == proposed) {
        return GuardOutcome::Accept {
            reason: "Value is in allowed set".to_string(),
        };
    }

    let proposed_lower = proposed.to_lowercase();
    let mut alternatives: Vec<Alternative> = Vec::new();

    // Case-insensitive exact matches first
    for candidate in allowed {
        if candidate.to_lowercase() == proposed_lower {
            alternatives.push(Alternative::new(
                candidate.clone(),
                "Case-corrected version of proposed value",
            ));
        }
    }

    // Then substring matches in either direction
    for candidate in allowed {
        let candidate_lower = candidate.to_lowercase();
        if candidate_lower.contains(&proposed_lower) || proposed_lower.contains(&candidate_lower) {
            if !alternatives.iter().any(|alt| alt.value == *candidate) {
                alternatives.push(Alternative::new(
                    candidate.clone(),
                    "Similar to proposed value",
                ));
            }
        }
    }

    // Nothing resembling the proposal: suggest the first few allowed values
    if alternatives.is_empty() {
        for candidate in allowed.iter().take(3) {
            alternatives.push(Alternative::new(candidate.clone(), "Allowed value"));
        }
    }

    GuardOutcome::CounterOffer {
        reason: format!(
            "Value '{}' not in allowed set: {}",
            proposed,
            format_allowed(allowed)
        ),
        alternatives,
    }
}

fn evaluate_length(proposed: &str, min: usize, max: usize) -> GuardOutcome {
    let len = proposed.chars().count();

    if len >= min && len <= max {
        return GuardOutcome::Accept {
            reason: format!("Length {} within acceptable range [{}, {}]", len, min, max),
        };
    }

    let mut alternatives = Vec::new();
    if len < min {
        let padded = format!("{}{}", proposed, "*".repeat(min - len));
        alternatives.push(Alternative::new(
            padded,
            format!("Padded to minimum length {}", min),
        ));
    } else {
        // Truncation counts characters, not bytes
        let truncated: String = proposed.chars().take(max).collect();
        alternatives.push(Alternative::new(
            truncated,
            format!("Truncated to maximum length {}", max),
        ));
        if max > 5 {
            let shorter_len = max * 4 / 5;
            let shorter: String = proposed.chars().take(shorter_len).collect();
            alternatives.push(Alternative::new(
                shorter,
                format!("Truncated to {} characters (safer margin)", shorter_len),
            ));
        }
    }

    GuardOutcome::CounterOffer {
        reason: format!("Length {} outside acceptable range [{}, {}]", len, min, max),
        alternatives,
    }
}

fn format_allowed(allowed: &[String]) -> String {
    let quoted: Vec<String> = allowed.iter().map(|v| format!("'{}'", v)).collect();
    format!("{{{}}}", quoted.join(", "))
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
