// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durability layer: WAL, snapshots, and startup recovery

pub mod recovery;
pub mod wal;

pub use recovery::{recover, RecoveryReport};
