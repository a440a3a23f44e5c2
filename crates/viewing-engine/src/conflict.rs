//! Pre-submission conflict detection.
//!
//! An agent can only be at one viewing at a time, so a new or edited
//! appointment must not strictly overlap any other active appointment.
//! Back-to-back viewings sharing a boundary instant are allowed.
//!
//! This check runs against a snapshot and is inherently racy against
//! concurrent writers. Callers should re-run it on a fresh snapshot just
//! before writing, and the store should enforce non-overlap on its own.

use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::appointment::Booked;
use crate::interval::TimeInterval;
use crate::temporal::format_local_range;

/// Outcome of [`check_conflict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictCheck {
    /// No active booking overlaps the candidate.
    Clear,
    /// The candidate's end is not after its start.
    InvalidInterval,
    /// The first overlapping booking, in the order supplied.
    Overlap { id: String, interval: TimeInterval },
}

impl ConflictCheck {
    /// Whether the candidate must be rejected.
    pub fn has_conflict(&self) -> bool {
        !matches!(self, ConflictCheck::Clear)
    }

    /// The interval the candidate collides with. `None` for invalid intervals.
    pub fn conflicting_with(&self) -> Option<&TimeInterval> {
        match self {
            ConflictCheck::Overlap { interval, .. } => Some(interval),
            _ => None,
        }
    }

    pub fn conflicting_id(&self) -> Option<&str> {
        match self {
            ConflictCheck::Overlap { id, .. } => Some(id),
            _ => None,
        }
    }

    /// User-facing explanation, rendered in `tz`. `None` when clear.
    pub fn message(&self, tz: &Tz) -> Option<String> {
        match self {
            ConflictCheck::Clear => None,
            ConflictCheck::InvalidInterval => {
                Some("End time must be after start time".to_string())
            }
            ConflictCheck::Overlap { interval, .. } => Some(format!(
                "Conflicts with an existing appointment: {}, please adjust the time",
                format_local_range(interval, tz)
            )),
        }
    }

    pub fn report(&self, tz: &Tz) -> ConflictReport {
        ConflictReport {
            has_conflict: self.has_conflict(),
            conflicting_with: self.conflicting_with().copied(),
            conflicting_id: self.conflicting_id().map(str::to_string),
            message: self.message(tz),
        }
    }
}

/// Serializable form of a [`ConflictCheck`] for integrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    pub has_conflict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_with: Option<TimeInterval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Check `candidate` against `existing`.
///
/// 1. A degenerate candidate (`end <= start`) is always a conflict.
/// 2. The booking whose id equals `exclude_id` is skipped, so an edit is never
///    checked against itself. Inactive bookings are skipped too.
/// 3. The first remaining booking that strictly overlaps wins.
///
/// # Examples
///
/// ```
/// use viewing_engine::{check_conflict, Booking, TimeInterval};
///
/// let existing = vec![Booking::new(
///     "a1",
///     TimeInterval::parse("2026-03-16T10:00:00Z", "2026-03-16T10:30:00Z").unwrap(),
/// )];
/// let next = TimeInterval::parse("2026-03-16T10:30:00Z", "2026-03-16T11:00:00Z").unwrap();
/// assert!(!check_conflict(&next, &existing, None).has_conflict());
/// ```
pub fn check_conflict<B: Booked>(
    candidate: &TimeInterval,
    existing: &[B],
    exclude_id: Option<&str>,
) -> ConflictCheck {
    if candidate.is_degenerate() {
        debug!(start = %candidate.start, end = %candidate.end, "candidate interval is degenerate");
        return ConflictCheck::InvalidInterval;
    }

    let hit = existing
        .iter()
        .filter(|b| exclude_id != Some(b.booking_id()))
        .filter(|b| b.is_active())
        .find(|b| candidate.overlaps(&b.booked_interval()));

    match hit {
        Some(b) => {
            debug!(conflicting_id = b.booking_id(), "candidate overlaps existing booking");
            ConflictCheck::Overlap {
                id: b.booking_id().to_string(),
                interval: b.booked_interval(),
            }
        }
        None => ConflictCheck::Clear,
    }
}
