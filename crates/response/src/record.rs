//! Auditable outcome of one response

use serde::{Deserialize, Serialize};
use uavguard_core::ThreatLevel;

use crate::action::{ActionFailure, ResponseAction};

/// Record handed back to the caller for audit and persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Vehicle the response ran against
    pub vehicle_id: String,
    /// Level that was responded to
    pub threat_level: ThreatLevel,
    /// Steps in execution order, failed steps as failure markers
    pub actions_taken: Vec<ResponseAction>,
    /// Human-readable summary
    pub summary: String,
    /// True only when every command and notification succeeded
    pub success: bool,
    /// True only when the operator notification was delivered
    pub operator_notified: bool,
    /// Completion time in milliseconds since the Unix epoch
    pub timestamp_ms: u64,
    /// Detail of each failed step
    pub failures: Vec<ActionFailure>,
    /// Sequence number of the incident entry written for this response
    pub incident_sequence: Option<u64>,
}

impl ResponseRecord {
    /// Whether an action appears in the list
    pub fn contains(&self, action: ResponseAction) -> bool {
        self.actions_taken.contains(&action)
    }

    /// Index of the first occurrence of an action
    pub fn position(&self, action: ResponseAction) -> Option<usize> {
        self.actions_taken.iter().position(|a| *a == action)
    }
}

/// Summary text for a level and outcome
pub(crate) fn summarize(level: ThreatLevel, failed: usize) -> String {
    if failed == 0 {
        level.response_summary().to_string()
    } else {
        format!(
            "{} (degraded: {} countermeasure(s) failed)",
            level.response_summary(),
            failed
        )
    }
}
