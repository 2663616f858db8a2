//! Hash-chained incident log
//!
//! Every response appends one entry, whatever its outcome. Each entry
//! carries the BLAKE3 hash of its predecessor, so a retained window can be
//! checked for tampering or gaps with [`IncidentLog::verify_chain`].

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uavguard_core::{AttackContext, ThreatLevel};
use uavguard_flight::DroneState;

use crate::action::ResponseAction;

/// Hash used as `prev_hash` of the first entry
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// One logged response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentEntry {
    /// Position in the vehicle's chain, starting at 0
    pub sequence: u64,
    /// Vehicle the response ran against
    pub vehicle_id: String,
    /// Level responded to
    pub threat_level: ThreatLevel,
    /// Full action list, failure markers included
    pub actions: Vec<ResponseAction>,
    /// Attack context as received
    pub attack_context: AttackContext,
    /// Vehicle state after the response
    pub drone_state: DroneState,
    /// Overall outcome
    pub success: bool,
    /// Completion time in milliseconds since the Unix epoch
    pub timestamp_ms: u64,
    /// Hex BLAKE3 hash of the previous entry
    pub prev_hash: String,
    /// Hex BLAKE3 hash of this entry
    pub entry_hash: String,
}

impl IncidentEntry {
    /// Compute BLAKE3 hash of this entry's content and `prev_hash`
    pub fn compute_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.prev_hash.as_bytes());
        hasher.update(&self.sequence.to_le_bytes());
        hasher.update(self.vehicle_id.as_bytes());
        hasher.update(&[self.threat_level.value()]);
        for action in &self.actions {
            hasher.update(action.as_str().as_bytes());
            hasher.update(b"\n");
        }
        hasher.update(&serde_json::to_vec(&self.attack_context).unwrap_or_default());
        hasher.update(&serde_json::to_vec(&self.drone_state).unwrap_or_default());
        hasher.update(&[u8::from(self.success)]);
        hasher.update(&self.timestamp_ms.to_le_bytes());
        hex::encode(hasher.finalize().as_bytes())
    }
}

/// Content of an entry before it is chained
#[derive(Debug, Clone)]
pub struct IncidentDraft {
    /// Vehicle the response ran against
    pub vehicle_id: String,
    /// Level responded to
    pub threat_level: ThreatLevel,
    /// Full action list
    pub actions: Vec<ResponseAction>,
    /// Attack context as received
    pub attack_context: AttackContext,
    /// Vehicle state after the response
    pub drone_state: DroneState,
    /// Overall outcome
    pub success: bool,
    /// Completion time
    pub timestamp_ms: u64,
}

/// Chain verification failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainFault {
    /// Entry content no longer matches its hash
    HashMismatch {
        /// Offending entry
        sequence: u64,
    },
    /// Entry does not point at its predecessor
    BrokenLink {
        /// Offending entry
        sequence: u64,
    },
}

/// Bounded, append-only incident log for one vehicle
#[derive(Debug, Clone)]
pub struct IncidentLog {
    entries: VecDeque<IncidentEntry>,
    capacity: usize,
    next_sequence: u64,
    head_hash: String,
}

impl IncidentLog {
    /// Log retaining at most `capacity` entries (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_sequence: 0,
            head_hash: GENESIS_HASH.to_string(),
        }
    }

    /// Chain a draft onto the log, evicting the oldest entry when full
    pub fn append(&mut self, draft: IncidentDraft) -> &IncidentEntry {
        let mut entry = IncidentEntry {
            sequence: self.next_sequence,
            vehicle_id: draft.vehicle_id,
            threat_level: draft.threat_level,
            actions: draft.actions,
            attack_context: draft.attack_context,
            drone_state: draft.drone_state,
            success: draft.success,
            timestamp_ms: draft.timestamp_ms,
            prev_hash: self.head_hash.clone(),
            entry_hash: String::new(),
        };
        entry.entry_hash = entry.compute_hash();

        self.head_hash = entry.entry_hash.clone();
        self.next_sequence += 1;

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Retained entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &IncidentEntry> {
        self.entries.iter()
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been logged or everything was evicted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ever appended, evicted ones included
    pub fn total_appended(&self) -> u64 {
        self.next_sequence
    }

    /// Check every retained entry's hash and its link to the previous one.
    ///
    /// The oldest retained entry is the anchor; its `prev_hash` refers to
    /// an evicted entry once the log has wrapped.
    pub fn verify_chain(&self) -> Result<(), ChainFault> {
        let mut previous: Option<&IncidentEntry> = None;

        for entry in &self.entries {
            if entry.compute_hash() != entry.entry_hash {
                return Err(ChainFault::HashMismatch {
                    sequence: entry.sequence,
                });
            }
            if let Some(prev) = previous {
                if entry.prev_hash != prev.entry_hash || entry.sequence != prev.sequence + 1 {
                    return Err(ChainFault::BrokenLink {
                        sequence: entry.sequence,
                    });
                }
            }
            previous = Some(entry);
        }
        Ok(())
    }
}
