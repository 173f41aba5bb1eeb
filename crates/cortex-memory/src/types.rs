// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types for the two-tier memory system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cortex_core::types::Role;

/// A single conversational turn held in the short-term buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortTermItem {
    /// Unique identifier for this item.
    pub id: String,
    /// Who authored the turn.
    pub role: Role,
    /// The turn's text content.
    pub content: String,
    /// Embedding vector, if one has already been computed.
    pub embedding: Option<Vec<f32>>,
    /// When the turn happened.
    pub timestamp: DateTime<Utc>,
    /// Model confidence (0.0-1.0) for assistant turns, absent for user turns.
    pub confidence: Option<f64>,
}

impl ShortTermItem {
    /// Create an item with a fresh id and the current timestamp.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            embedding: None,
            timestamp: Utc::now(),
            confidence: None,
        }
    }

    /// Attach a confidence score.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Effective importance for consolidation: confidence, or 0.5 if absent.
    pub fn importance(&self) -> f64 {
        self.confidence.unwrap_or(0.5)
    }
}

/// A consolidated entry in the long-term store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTermEntry {
    /// Unique identifier, carried over from the originating short-term item.
    pub id: String,
    /// The remembered content.
    pub content: String,
    /// Embedding vector for semantic retrieval.
    pub embedding: Vec<f32>,
    /// When the originating turn happened.
    pub timestamp: DateTime<Utc>,
    /// Absolute expiry; the entry is treated as absent once passed.
    pub expires_at: DateTime<Utc>,
    /// Importance score (0.0-1.0) inherited from consolidation.
    pub importance: f64,
    /// Retrieval hit counter. Incremented on every search hit, never decremented.
    pub access_count: u64,
}

impl LongTermEntry {
    /// Whether the entry has passed its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Read-only snapshot of memory occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStats {
    /// Items currently in the short-term buffer.
    pub short_term_count: usize,
    /// Entries currently in the long-term store.
    pub long_term_count: usize,
    /// Sum of the two tiers.
    pub total_count: usize,
    /// Timestamp of the oldest item across both tiers, if any.
    pub oldest_timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn importance_defaults_to_half_without_confidence() {
        let item = ShortTermItem::new(Role::User, "hello");
        assert_eq!(item.importance(), 0.5);
        let scored = ShortTermItem::new(Role::Assistant, "hi").with_confidence(0.9);
        assert_eq!(scored.importance(), 0.9);
    }

    #[test]
    fn fresh_items_get_distinct_ids() {
        let a = ShortTermItem::new(Role::User, "x");
        let b = ShortTermItem::new(Role::User, "x");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn expiry_is_strictly_after_deadline() {
        let now = Utc::now();
        let entry = LongTermEntry {
            id: "e1".to_string(),
            content: "fact".to_string(),
            embedding: vec![1.0],
            timestamp: now,
            expires_at: now + Duration::seconds(10),
            importance: 0.7,
            access_count: 0,
        };
        assert!(!entry.is_expired(now + Duration::seconds(9)));
        assert!(!entry.is_expired(now + Duration::seconds(10)));
        assert!(entry.is_expired(now + Duration::seconds(11)));
    }
}
