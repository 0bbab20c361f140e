//! Slot status machine and slot input validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Lifecycle status of a calendar slot.
///
/// Stored as the Postgres enum `slot_status`. `SwapPending` acts as a lock:
/// a slot in that state is committed to exactly one pending swap request and
/// may not be edited, deleted, or offered in another negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "slot_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Busy,
    Swappable,
    SwapPending,
}

impl SlotStatus {
    /// Wire/database spelling of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            SlotStatus::Busy => "BUSY",
            SlotStatus::Swappable => "SWAPPABLE",
            SlotStatus::SwapPending => "SWAP_PENDING",
        }
    }

    /// Whether a slot owner may set this status directly.
    ///
    /// `SwapPending` is reserved for the negotiation engine; owners only
    /// toggle between `Busy` and `Swappable`.
    pub fn owner_settable(self) -> bool {
        !matches!(self, SlotStatus::SwapPending)
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated input for creating or updating a slot.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SlotDraft {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

impl SlotDraft {
    /// Check the `starts_at < ends_at` invariant.
    ///
    /// The database enforces the same rule with a CHECK constraint; this
    /// front-line check turns it into a friendly validation error.
    pub fn check_time_range(&self) -> Result<(), CoreError> {
        if self.starts_at >= self.ends_at {
            return Err(CoreError::Validation(
                "Slot end time must be after its start time".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn draft(title: &str, offset_mins: i64) -> SlotDraft {
        let starts_at = Utc::now();
        SlotDraft {
            title: title.to_string(),
            starts_at,
            ends_at: starts_at + Duration::minutes(offset_mins),
        }
    }

    #[test]
    fn status_wire_spelling_is_screaming_snake() {
        assert_eq!(SlotStatus::Busy.as_str(), "BUSY");
        assert_eq!(SlotStatus::Swappable.as_str(), "SWAPPABLE");
        assert_eq!(SlotStatus::SwapPending.as_str(), "SWAP_PENDING");

        let json = serde_json::to_string(&SlotStatus::SwapPending).unwrap();
        assert_eq!(json, "\"SWAP_PENDING\"");
        let back: SlotStatus = serde_json::from_str("\"SWAPPABLE\"").unwrap();
        assert_eq!(back, SlotStatus::Swappable);
    }

    #[test]
    fn swap_pending_is_not_owner_settable() {
        assert!(SlotStatus::Busy.owner_settable());
        assert!(SlotStatus::Swappable.owner_settable());
        assert!(!SlotStatus::SwapPending.owner_settable());
    }

    #[test]
    fn end_must_be_after_start() {
        assert!(draft("Standup", 30).check_time_range().is_ok());
        assert!(draft("Standup", 0).check_time_range().is_err());
        assert!(draft("Standup", -30).check_time_range().is_err());
    }

    #[test]
    fn title_length_is_validated() {
        use validator::Validate;
        assert!(draft("Team sync", 60).validate().is_ok());
        assert!(draft("", 60).validate().is_err());
    }
}
