// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL record codec
//!
//! Records are single text lines, fields separated by single spaces:
//!
//! ```text
//! SET <key> <value> <epochMillis>
//! DEL <key>
//! POLICY SET <name>
//! ```
//!
//! The framing forbids whitespace inside keys and values; the engine
//! validates this at its write boundaries. Snapshot files reuse the same
//! grammar with timestampless `SET` lines.

use crate::policy::DecisionPolicy;
use crate::version;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors from parsing a single record line
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("empty record")]
    Empty,
    #[error("unknown record kind '{0}'")]
    UnknownKind(String),
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("unknown policy name '{0}'")]
    UnknownPolicy(String),
    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}

/// One durable mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalRecord {
    /// Versioned write. The timestamp is absent in snapshot lines and in
    /// legacy log files; replay substitutes the recovery time.
    Set {
        key: String,
        value: String,
        timestamp: Option<DateTime<Utc>>,
    },
    /// Removal of every version of a key
    Del { key: String },
    /// Decision policy change
    PolicySet { policy: DecisionPolicy },
}

impl WalRecord {
    pub fn set(
        key: impl Into<String>,
        value: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        WalRecord::Set {
            key: key.into(),
            value: value.into(),
            timestamp: Some(timestamp),
        }
    }

    pub fn del(key: impl Into<String>) -> Self {
        WalRecord::Del { key: key.into() }
    }

    pub fn policy(policy: DecisionPolicy) -> Self {
        WalRecord::PolicySet { policy }
    }

    /// Serialize to a single line (no trailing newline)
    pub fn to_line(&self) -> String {
        match self {
            WalRecord::Set {
                key,
                value,
                timestamp,
            } => match timestamp {
                Some(ts) => format!("SET {} {} {}", key, value, ts.timestamp_millis()),
                None => format!("SET {} {}", key, value),
            },
            WalRecord::Del { key } => format!("DEL {}", key),
            WalRecord::PolicySet { policy } => format!("POLICY SET {}", policy.as_str()),
        }
    }

    /// Parse one line.
    ///
    /// A `SET` timestamp field that is present but not an integer is treated
    /// as absent, matching legacy files written without timestamps. Fields
    /// beyond a record's arity are ignored.
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let mut fields = line.split_whitespace();
        let kind = fields.next().ok_or(RecordError::Empty)?;

        match kind {
            "SET" => {
                let key = fields.next().ok_or(RecordError::MissingField("key"))?;
                let value = fields.next().ok_or(RecordError::MissingField("value"))?;
                let timestamp = match fields.next() {
                    Some(raw) => match raw.parse::<i64>() {
                        Ok(millis) => Some(
                            version::from_millis(millis)
                                .ok_or(RecordError::TimestampOutOfRange(millis))?,
                        ),
                        Err(_) => None,
                    },
                    None => None,
                };
                Ok(WalRecord::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                    timestamp,
                })
            }
            "DEL" => {
                let key = fields.next().ok_or(RecordError::MissingField("key"))?;
                Ok(WalRecord::Del {
                    key: key.to_string(),
                })
            }
            "POLICY" => {
                if fields.next() != Some("SET") {
                    return Err(RecordError::MissingField("SET"));
                }
                let name = fields
                    .next()
                    .ok_or(RecordError::MissingField("policy name"))?;
                let policy = DecisionPolicy::parse(name)
                    .ok_or_else(|| RecordError::UnknownPolicy(name.to_string()))?;
                Ok(WalRecord::PolicySet { policy })
            }
            other => Err(RecordError::UnknownKind(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
