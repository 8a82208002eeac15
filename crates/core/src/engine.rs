// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine facade: the public entry point to the store
//!
//! The engine owns the temporal store, the guard registry, the decision and
//! retention policies, and the WAL. External drivers borrow the engine; all
//! mutators take `&mut self`, which enforces the mutual-exclusion contract
//! statically. Every durable mutation follows WAL-ahead discipline: the
//! record is appended before the in-memory change commits.

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::evaluation::{self, WriteEvaluation};
use crate::guard::Guard;
use crate::policy::DecisionPolicy;
use crate::retention::RetentionPolicy;
use crate::storage::recovery;
use crate::storage::wal::record::WalRecord;
use crate::storage::wal::snapshot::{self, SnapshotError};
use crate::storage::wal::writer::{WalError, WalWriter};
use crate::store::{ExplainResult, TemporalStore};
use crate::version::{self, Version};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("key not found: {0}")]
    KeyNotFound(String),
    #[error("invalid key '{0}': keys must be non-empty and contain no whitespace")]
    InvalidKey(String),
    #[error("invalid value '{0}': values must be non-empty and contain no whitespace")]
    InvalidValue(String),
    #[error("WAL is disabled; snapshot requires a working WAL")]
    WalDisabled,
    #[error("WAL error: {0}")]
    Wal(#[from] WalError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// The embedded temporal store with write negotiation and durability
pub struct Engine<C: Clock = SystemClock> {
    store: TemporalStore,
    guards: Vec<Guard>,
    decision_policy: DecisionPolicy,
    retention: RetentionPolicy,
    wal: Option<WalWriter>,
    snapshot_path: PathBuf,
    /// Replay suppression toggle for external drivers; true in normal operation
    wal_logging: bool,
    clock: C,
}

impl Engine<SystemClock> {
    /// Open an engine backed by the WAL at the given path, running recovery.
    ///
    /// If the WAL cannot be opened the engine continues in volatile mode
    /// with a warning; data will not persist.
    pub fn open(wal_path: impl AsRef<Path>) -> Self {
        Self::open_with_clock(wal_path, SystemClock)
    }

    /// Open from a configuration (derived paths + initial retention policy)
    pub fn with_config(config: &EngineConfig) -> Self {
        Self::with_config_and_clock(config, SystemClock)
    }

    /// Volatile engine with no durability
    pub fn in_memory() -> Self {
        Self::in_memory_with_clock(SystemClock)
    }

    /// Engine in a unique temporary directory (for testing)
    pub fn open_temp() -> Self {
        let dir = std::env::temp_dir().join(format!("sentinel-{}", uuid::Uuid::new_v4()));
        Self::open(dir.join("wal.log"))
    }
}

impl<C: Clock> Engine<C> {
    pub fn open_with_clock(wal_path: impl AsRef<Path>, clock: C) -> Self {
        Self::build(wal_path.as_ref(), RetentionPolicy::Full, clock)
    }

    pub fn with_config_and_clock(config: &EngineConfig, clock: C) -> Self {
        Self::build(&config.wal_path(), config.retention, clock)
    }

    pub fn in_memory_with_clock(clock: C) -> Self {
        Self {
            store: TemporalStore::new(),
            guards: Vec::new(),
            decision_policy: DecisionPolicy::default(),
            retention: RetentionPolicy::Full,
            wal: None,
            snapshot_path: PathBuf::from(snapshot::SNAPSHOT_FILE_NAME),
            wal_logging: true,
            clock,
        }
    }

    fn build(wal_path: &Path, retention: RetentionPolicy, clock: C) -> Self {
        let snapshot_path = snapshot::snapshot_path(wal_path);

        let wal = match WalWriter::open(wal_path) {
            Ok(writer) => Some(writer),
            Err(e) => {
                tracing::warn!(path = %wal_path.display(), ?e, "failed to open WAL; continuing in volatile mode");
                None
            }
        };

        let mut engine = Self {
            store: TemporalStore::new(),
            guards: Vec::new(),
            decision_policy: DecisionPolicy::default(),
            retention,
            wal,
            snapshot_path,
            wal_logging: true,
            clock,
        };

        if engine.wal.is_some() {
            engine.recover_from_disk(wal_path);
        }
        engine
    }

    fn recover_from_disk(&mut self, wal_path: &Path) {
        let report = recovery::recover(
            wal_path,
            &self.snapshot_path,
            &mut self.store,
            &self.retention,
            &self.clock,
        );
        if let Some(policy) = report.policy {
            self.decision_policy = policy;
        }
        tracing::info!(
            keys = self.store.key_count(),
            snapshot_keys = report.snapshot_keys,
            replayed = report.replayed_records,
            skipped = report.skipped_lines,
            policy = %self.decision_policy,
            "recovery complete"
        );
    }

    // === Temporal store operations ===

    /// Commit a versioned write stamped with the current time
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), EngineError> {
        validate_key(key)?;
        validate_value(value)?;

        let now = version::truncate_to_millis(self.clock.now());
        self.log_record(WalRecord::set(key, value, now));
        self.store.append(key, Version::new(now, value));
        self.store.prune(key, &self.retention, self.clock.now());
        Ok(())
    }

    /// Append a version with a caller-supplied timestamp, bypassing the WAL.
    ///
    /// This is the replay entry point; it does not validate or consult
    /// guards. Callers own the non-decreasing timestamp invariant.
    pub fn set_at(&mut self, key: &str, value: &str, timestamp: DateTime<Utc>) {
        self.store.append(key, Version::new(timestamp, value));
        self.store.prune(key, &self.retention, self.clock.now());
    }

    /// Latest value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.store.latest(key)
    }

    /// Value of the latest version at or before the given instant
    pub fn get_at(&self, key: &str, instant: DateTime<Utc>) -> Option<&str> {
        self.store.at(key, instant)
    }

    /// Full version history for a key, oldest first
    pub fn history(&self, key: &str) -> &[Version] {
        self.store.history(key)
    }

    /// Explain which version an at-time lookup selects and why
    pub fn explain_get_at(&self, key: &str, instant: DateTime<Utc>) -> ExplainResult {
        self.store.explain_at(key, instant)
    }

    /// Remove every version of a key
    pub fn del(&mut self, key: &str) -> Result<(), EngineError> {
        if !self.store.contains_key(key) {
            return Err(EngineError::KeyNotFound(key.to_string()));
        }
        self.log_record(WalRecord::del(key));
        self.store.remove(key);
        Ok(())
    }

    pub fn exists(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// Number of live keys
    pub fn key_count(&self) -> usize {
        self.store.key_count()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // === Write negotiation ===

    /// Evaluate a proposed write without mutating any state.
    ///
    /// Runs guard simulation, then the active decision policy transform.
    pub fn propose(&self, key: &str, value: &str) -> WriteEvaluation {
        let mut evaluation = evaluation::simulate(&self.guards, key, value);
        self.decision_policy.apply(&mut evaluation);
        evaluation
    }

    /// Guard-bypassing write, for accepted proposals and forced overrides
    pub fn commit(&mut self, key: &str, value: &str) -> Result<(), EngineError> {
        self.set(key, value)
    }

    // === Guard registry ===

    /// Register a guard. Duplicate names are permitted; evaluation order is
    /// registration order.
    pub fn add_guard(&mut self, guard: Guard) {
        self.guards.push(guard);
    }

    pub fn has_guard(&self, name: &str) -> bool {
        self.guards.iter().any(|g| g.name == name)
    }

    /// Remove the first guard with the given name
    pub fn remove_guard(&mut self, name: &str) -> bool {
        match self.guards.iter().position(|g| g.name == name) {
            Some(index) => {
                self.guards.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    /// Enabled guards whose pattern matches the key, in registration order
    pub fn guards_for_key(&self, key: &str) -> Vec<&Guard> {
        self.guards
            .iter()
            .filter(|g| g.enabled && g.applies_to(key))
            .collect()
    }

    // === Policies ===

    /// Change the decision policy. Each call appends a WAL record even when
    /// the policy is unchanged.
    pub fn set_decision_policy(&mut self, policy: DecisionPolicy) {
        self.log_record(WalRecord::policy(policy));
        self.decision_policy = policy;
    }

    pub fn decision_policy(&self) -> DecisionPolicy {
        self.decision_policy
    }

    /// Change the retention policy and eagerly prune every key
    pub fn set_retention_policy(&mut self, policy: RetentionPolicy) {
        self.retention = policy;
        self.store.prune_all(&policy, self.clock.now());
    }

    pub fn retention_policy(&self) -> RetentionPolicy {
        self.retention
    }

    // === Durability ===

    /// Materialize the full state into the snapshot file, then truncate the
    /// WAL. Snapshot write failure aborts and preserves the WAL.
    pub fn snapshot(&mut self) -> Result<(), EngineError> {
        if !self.is_durable() {
            return Err(EngineError::WalDisabled);
        }

        let entries = self.store.latest_entries();
        snapshot::write_snapshot(&self.snapshot_path, self.decision_policy, &entries)?;

        if let Some(wal) = self.wal.as_mut() {
            wal.reset()?;
        }

        tracing::info!(
            keys = entries.len(),
            path = %self.snapshot_path.display(),
            "snapshot created; WAL truncated"
        );
        Ok(())
    }

    /// Toggle WAL logging. External drivers replaying into the engine must
    /// disable logging and restore it afterwards.
    pub fn set_wal_enabled(&mut self, enabled: bool) {
        self.wal_logging = enabled;
    }

    /// Whether mutations are currently being made durable
    pub fn is_durable(&self) -> bool {
        self.wal.as_ref().is_some_and(WalWriter::is_enabled)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Append a record if logging is active. Failures disable the writer
    /// and warn; the in-memory mutation proceeds regardless.
    fn log_record(&mut self, record: WalRecord) {
        if !self.wal_logging {
            return;
        }
        if let Some(wal) = self.wal.as_mut() {
            let _ = wal.append(&record);
        }
    }
}

fn validate_key(key: &str) -> Result<(), EngineError> {
    if key.is_empty() || key.chars().any(char::is_whitespace) {
        return Err(EngineError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn validate_value(value: &str) -> Result<(), EngineError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(EngineError::InvalidValue(value.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
