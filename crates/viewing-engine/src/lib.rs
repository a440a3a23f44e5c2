//! # viewing-engine
//!
//! Deterministic computation for property-viewing appointments.
//!
//! Agents book viewings for customer groups; before a booking is written the
//! candidate window is checked against the agent's existing appointments, and
//! the agent-facing schedule folds each customer's consecutive viewings into
//! one session with the idle time between different customers called out.
//! Everything here is pure: the caller supplies the appointment snapshot and
//! owns storage, clocks, and rendering.
//!
//! ## Modules
//!
//! - [`interval`] — Half-open time intervals and the overlap test
//! - [`appointment`] — Appointment records, party keys, display labels
//! - [`conflict`] — Pre-submission overlap validation
//! - [`schedule`] — Block merging, same-party collapsing, free-slot insertion
//! - [`temporal`] — Timestamp/timezone parsing and human-readable formatting
//! - [`error`] — Error types

pub mod appointment;
pub mod conflict;
pub mod error;
pub mod interval;
pub mod schedule;
pub mod temporal;

pub use appointment::{
    parse_appointments, Appointment, AppointmentStatus, Booked, Booking, PartyKey, PartyRole,
};
pub use conflict::{check_conflict, ConflictCheck, ConflictReport};
pub use error::ViewingError;
pub use interval::TimeInterval;
pub use schedule::{
    build_schedule, insert_free_slots, merge_consecutive_same_party, merge_into_blocks,
    ScheduleBlock, ScheduleOptions, TimelineItem, MERGE_GAP_MINUTES,
};
pub use temporal::{
    format_local_range, format_minutes, local_day, parse_gap, parse_rfc3339, parse_timezone,
};
