// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-Ahead Log (WAL) module
//!
//! Append-only, line-oriented logging for all durable mutations. State is
//! reconstructed at startup by replaying the snapshot and then the log.
//!
//! ```text
//! mutation → WalRecord → WalWriter → disk (wal.log)
//!                                        ↓
//!                       WalReader → recovery → TemporalStore + policy
//! ```
//!
//! A snapshot (sibling `snapshot.db`) captures the latest value per key and
//! allows the log to be truncated.

pub mod reader;
pub mod record;
pub mod snapshot;
pub mod writer;

pub use reader::{WalReadError, WalReader, WalRecordIter};
pub use record::{RecordError, WalRecord};
pub use snapshot::{SnapshotData, SnapshotError, SNAPSHOT_FILE_NAME};
pub use writer::{WalError, WalWriter};
