//! # Session payloads delivered by the orchestrator.
//!
//! - [`SessionDescriptor`] — the opaque session payload attached to a
//!   placement. The bridge forwards it verbatim and never interprets its
//!   content; only the application gives it meaning.
//! - [`UpdateReason`] — why an in-progress session was updated, parsed from
//!   the orchestrator's wire code.
//! - [`SessionUpdate`] — a descriptor paired with its update reason.

use std::fmt;
use std::sync::Arc;

use crate::error::BridgeError;

/// Opaque session payload assigned to this process by the orchestrator.
///
/// Cheap to clone (`Arc`-backed). The raw content typically carries game
/// properties, matchmaker data, and connection hints in an
/// orchestrator-defined encoding; decoding it is the application's business.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionDescriptor {
    raw: Arc<str>,
}

impl SessionDescriptor {
    /// Wraps a raw session payload.
    pub fn new(raw: impl Into<Arc<str>>) -> Self {
        Self { raw: raw.into() }
    }

    /// Returns the payload exactly as the orchestrator delivered it.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for SessionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Why the orchestrator updated an in-progress session.
///
/// `Unknown` is itself a recognized wire code (`UNKNOWN`); a code outside
/// this set fails to parse with
/// [`BridgeError::UnrecognizedUpdateReason`] and the update is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateReason {
    /// The matchmaker data attached to the session changed.
    MatchmakingDataUpdated,
    /// A backfill request for additional players failed.
    BackfillFailed,
    /// A backfill request timed out before completing.
    BackfillTimedOut,
    /// A backfill request was cancelled.
    BackfillCancelled,
    /// The orchestrator did not report a specific reason.
    Unknown,
}

impl UpdateReason {
    /// Parses an orchestrator wire code.
    ///
    /// # Example
    /// ```
    /// use fleetvisor::UpdateReason;
    ///
    /// let reason = UpdateReason::from_wire("BACKFILL_TIMED_OUT").unwrap();
    /// assert_eq!(reason, UpdateReason::BackfillTimedOut);
    /// assert!(UpdateReason::from_wire("REBALANCE").is_err());
    /// ```
    pub fn from_wire(code: &str) -> Result<Self, BridgeError> {
        match code {
            "MATCHMAKING_DATA_UPDATED" => Ok(UpdateReason::MatchmakingDataUpdated),
            "BACKFILL_FAILED" => Ok(UpdateReason::BackfillFailed),
            "BACKFILL_TIMED_OUT" => Ok(UpdateReason::BackfillTimedOut),
            "BACKFILL_CANCELLED" => Ok(UpdateReason::BackfillCancelled),
            "UNKNOWN" => Ok(UpdateReason::Unknown),
            other => Err(BridgeError::UnrecognizedUpdateReason {
                code: other.to_string(),
            }),
        }
    }

    /// Returns the wire code for this reason.
    pub fn as_wire(&self) -> &'static str {
        match self {
            UpdateReason::MatchmakingDataUpdated => "MATCHMAKING_DATA_UPDATED",
            UpdateReason::BackfillFailed => "BACKFILL_FAILED",
            UpdateReason::BackfillTimedOut => "BACKFILL_TIMED_OUT",
            UpdateReason::BackfillCancelled => "BACKFILL_CANCELLED",
            UpdateReason::Unknown => "UNKNOWN",
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            UpdateReason::MatchmakingDataUpdated => "matchmaking_data_updated",
            UpdateReason::BackfillFailed => "backfill_failed",
            UpdateReason::BackfillTimedOut => "backfill_timed_out",
            UpdateReason::BackfillCancelled => "backfill_cancelled",
            UpdateReason::Unknown => "unknown",
        }
    }
}

/// A session update: the (possibly refreshed) descriptor plus the reason the
/// orchestrator sent it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUpdate {
    /// The updated session payload, forwarded verbatim.
    pub session: SessionDescriptor,
    /// Why the update was sent.
    pub reason: UpdateReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_wire_code_round_trips() {
        for reason in [
            UpdateReason::MatchmakingDataUpdated,
            UpdateReason::BackfillFailed,
            UpdateReason::BackfillTimedOut,
            UpdateReason::BackfillCancelled,
            UpdateReason::Unknown,
        ] {
            assert_eq!(UpdateReason::from_wire(reason.as_wire()).unwrap(), reason);
        }
    }

    #[test]
    fn test_unrecognized_code_is_an_error() {
        let err = UpdateReason::from_wire("BACKFILL_PAUSED").unwrap_err();
        match err {
            BridgeError::UnrecognizedUpdateReason { code } => {
                assert_eq!(code, "BACKFILL_PAUSED");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_codes_are_case_sensitive() {
        assert!(UpdateReason::from_wire("backfill_failed").is_err());
    }

    #[test]
    fn test_descriptor_is_forwarded_verbatim() {
        let descriptor = SessionDescriptor::new(r#"{"sessionId":"s-1","maxPlayers":8}"#);
        assert_eq!(descriptor.raw(), r#"{"sessionId":"s-1","maxPlayers":8}"#);
        assert_eq!(descriptor.clone(), descriptor);
    }
}
