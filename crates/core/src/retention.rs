// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retention policies for per-key version histories
//!
//! Retention runs after every successful append and eagerly over every key
//! when the policy changes. It never reorders versions and never touches the
//! WAL; pruned entries remain in the log and are re-pruned on replay.

use crate::version::Version;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Process-wide rule for pruning per-key history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Keep every version
    Full,
    /// Keep only the most recent `count` versions
    LastN { count: usize },
    /// Keep only versions written within the trailing window
    LastT { seconds: u64 },
}

impl RetentionPolicy {
    pub fn last_n(count: usize) -> Self {
        RetentionPolicy::LastN { count }
    }

    pub fn last_t(seconds: u64) -> Self {
        RetentionPolicy::LastT { seconds }
    }

    /// Prune a version list in place.
    ///
    /// Surviving versions keep their order. `LastT` may empty the list
    /// entirely when every version is older than the cutoff.
    pub fn apply(&self, versions: &mut Vec<Version>, now: DateTime<Utc>) {
        match self {
            RetentionPolicy::Full => {}
            RetentionPolicy::LastN { count } => {
                if *count > 0 && versions.len() > *count {
                    let excess = versions.len() - count;
                    versions.drain(..excess);
                }
            }
            RetentionPolicy::LastT { seconds } => {
                if *seconds == 0 {
                    return;
                }
                let cutoff = now - Duration::seconds(*seconds as i64);
                let keep_from = versions
                    .iter()
                    .position(|v| v.timestamp >= cutoff)
                    .unwrap_or(versions.len());
                versions.drain(..keep_from);
            }
        }
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionPolicy::Full => write!(f, "FULL"),
            RetentionPolicy::LastN { count } => write!(f, "LAST {}", count),
            RetentionPolicy::LastT { seconds } => write!(f, "LAST {}s", seconds),
        }
    }
}

#[cfg(test)]
#[path = "retention_tests.rs"]
mod tests;
