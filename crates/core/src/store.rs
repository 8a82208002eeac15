// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multi-version in-memory state with point-in-time lookup
//!
//! Each key maps to an insertion-ordered list of versions whose timestamps
//! are non-strictly non-decreasing (ties within one millisecond resolve by
//! insertion order). A lookup at instant T selects the last version with
//! `timestamp <= T`.

use crate::retention::RetentionPolicy;
use crate::version::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Deterministic reconstruction of an at-time lookup decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainResult {
    pub found: bool,
    pub key: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub query_timestamp: DateTime<Utc>,
    pub selected_version: Option<Version>,
    pub reasoning: String,
    /// Older versions that were valid at the query time but superseded
    pub skipped_versions: Vec<Version>,
    pub total_versions: usize,
}

/// Ordered per-key version lists
#[derive(Debug, Default)]
pub struct TemporalStore {
    histories: BTreeMap<String, Vec<Version>>,
}

impl TemporalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a version to a key's history, creating it if absent.
    ///
    /// The caller is responsible for the non-decreasing timestamp invariant;
    /// the engine guarantees it by stamping with a monotonic-enough clock.
    pub fn append(&mut self, key: &str, version: Version) {
        self.histories.entry(key.to_string()).or_default().push(version);
    }

    /// Latest value for a key
    pub fn latest(&self, key: &str) -> Option<&str> {
        self.histories.get(key)?.last().map(|v| v.value.as_str())
    }

    /// Value of the latest version at or before the given instant
    pub fn at(&self, key: &str, instant: DateTime<Utc>) -> Option<&str> {
        let versions = self.histories.get(key)?;
        let mut result = None;
        for version in versions {
            if version.timestamp <= instant {
                result = Some(version.value.as_str());
            } else {
                break; // versions are in chronological order
            }
        }
        result
    }

    /// Remove all versions of a key. Returns false if the key was absent.
    pub fn remove(&mut self, key: &str) -> bool {
        self.histories.remove(key).is_some()
    }

    /// Full history for a key, oldest first; empty if absent
    pub fn history(&self, key: &str) -> &[Version] {
        self.histories.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the key has a history entry (possibly pruned to empty)
    pub fn contains_key(&self, key: &str) -> bool {
        self.histories.contains_key(key)
    }

    pub fn key_count(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    /// Latest value per key, for snapshot creation. Keys pruned to an empty
    /// history are skipped.
    pub fn latest_entries(&self) -> Vec<(String, String)> {
        self.histories
            .iter()
            .filter_map(|(key, versions)| {
                versions.last().map(|v| (key.clone(), v.value.clone()))
            })
            .collect()
    }

    /// Apply the retention policy to one key's history
    pub fn prune(&mut self, key: &str, policy: &RetentionPolicy, now: DateTime<Utc>) {
        if let Some(versions) = self.histories.get_mut(key) {
            policy.apply(versions, now);
        }
    }

    /// Apply the retention policy to every key (runs on policy change)
    pub fn prune_all(&mut self, policy: &RetentionPolicy, now: DateTime<Utc>) {
        for versions in self.histories.values_mut() {
            policy.apply(versions, now);
        }
    }

    /// Explain which version an at-time lookup selects and why
    pub fn explain_at(&self, key: &str, instant: DateTime<Utc>) -> ExplainResult {
        let mut result = ExplainResult {
            found: false,
            key: key.to_string(),
            query_timestamp: instant,
            selected_version: None,
            reasoning: String::new(),
            skipped_versions: Vec::new(),
            total_versions: 0,
        };

        let versions = match self.histories.get(key) {
            Some(versions) if !versions.is_empty() => versions,
            _ => {
                result.reasoning = "Key not found in store".to_string();
                return result;
            }
        };
        result.total_versions = versions.len();

        let mut selected: Option<usize> = None;
        for (index, version) in versions.iter().enumerate() {
            if version.timestamp > instant {
                break; // versions after the query time are not part of the explanation
            }
            if let Some(previous) = selected {
                result.skipped_versions.push(versions[previous].clone());
            }
            selected = Some(index);
        }

        match selected {
            Some(index) => {
                result.found = true;
                result.selected_version = Some(versions[index].clone());

                let mut reasoning = format!(
                    "Selected version at index {} (0-based) out of {} total versions. \
                     This is the most recent version at or before the query timestamp.",
                    index, result.total_versions
                );
                if !result.skipped_versions.is_empty() {
                    reasoning.push_str(&format!(
                        " Skipped {} older version(s) that were also valid but superseded.",
                        result.skipped_versions.len()
                    ));
                }
                let after = result.total_versions - index - 1;
                if after > 0 {
                    reasoning.push_str(&format!(
                        " Excluded {} version(s) that occurred after the query timestamp.",
                        after
                    ));
                }
                result.reasoning = reasoning;
            }
            None => {
                result.reasoning = format!(
                    "No version found at or before the query timestamp. \
                     All {} version(s) occurred after the query time.",
                    result.total_versions
                );
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
