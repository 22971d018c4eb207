//! Audit log entry model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One recorded command in the bank's append-only operation log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub id: Uuid,

    /// Command text as the operator typed it
    pub details: String,

    /// Account holder or employee tag that issued the command
    pub actor: String,

    /// Simulated bank year when the command ran
    pub year: u32,

    /// Wall-clock time the entry was appended
    pub recorded_at: DateTime<Utc>,
}

impl Operation {
    pub fn new(details: &str, actor: &str, year: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            details: details.to_string(),
            actor: actor.to_string(),
            year,
            recorded_at: Utc::now(),
        }
    }
}
