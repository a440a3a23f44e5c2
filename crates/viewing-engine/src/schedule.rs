//! Agent-facing schedule composition.
//!
//! A customer usually views several properties in one outing. Listing each
//! fifteen-minute viewing separately hides that, so the schedule is built in
//! three passes over a snapshot:
//!
//! 1. [`merge_into_blocks`] groups a party's viewings on one local day into
//!    blocks, joining neighbours separated by at most `merge_gap`.
//! 2. [`merge_consecutive_same_party`] collapses adjacent blocks of the same
//!    party regardless of the gap between them, so travel or a lunch break
//!    with the same client never reads as free time.
//! 3. [`insert_free_slots`] interleaves free slots between blocks of
//!    different parties.
//!
//! [`build_schedule`] runs all three and keys the result by local date. The
//! compositor is presentational only: it does not re-validate intervals and
//! will happily lay out overlapping input.

use std::collections::BTreeMap;
use std::mem;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::appointment::{Appointment, PartyKey, PartyRole};
use crate::interval::TimeInterval;
use crate::temporal::local_day;

/// Default largest gap, in minutes, between two viewings of the same party
/// that still joins them into one block.
pub const MERGE_GAP_MINUTES: i64 = 30;

/// Options for [`build_schedule`] and its stages.
#[derive(Debug, Clone)]
pub struct ScheduleOptions {
    /// Largest gap that still joins two same-party viewings in stage 1.
    pub merge_gap: Duration,
    /// Timezone whose calendar days partition the schedule.
    pub timezone: Tz,
    /// Lay out completed and cancelled appointments too.
    pub include_inactive: bool,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            merge_gap: Duration::minutes(MERGE_GAP_MINUTES),
            timezone: Tz::UTC,
            include_inactive: false,
        }
    }
}

/// One continuous session with a single party.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleBlock {
    pub party_key: PartyKey,
    pub display_name: String,
    pub party_role: PartyRole,
    /// Earliest member start to latest member end.
    pub interval: TimeInterval,
    /// Merged appointments in chronological order.
    pub members: Vec<Appointment>,
    pub property_count: usize,
}

impl ScheduleBlock {
    fn seed(appt: &Appointment) -> Self {
        Self {
            party_key: appt.party_key(),
            display_name: appt.display_name(),
            party_role: appt.party_role,
            interval: appt.interval,
            members: vec![appt.clone()],
            property_count: 1,
        }
    }

    fn absorb(&mut self, appt: &Appointment) {
        self.interval.end = self.interval.end.max(appt.interval.end);
        self.members.push(appt.clone());
        self.property_count = self.members.len();
    }

    fn absorb_block(&mut self, other: ScheduleBlock) {
        self.interval.end = self.interval.end.max(other.interval.end);
        self.members.extend(other.members);
        self.members.sort_by_key(|a| a.interval.start);
        self.property_count = self.members.len();
    }

    /// The local date the block starts on.
    pub fn day(&self, tz: &Tz) -> NaiveDate {
        local_day(self.interval.start, tz)
    }
}

/// An entry in a day's timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineItem {
    Appointment {
        block: ScheduleBlock,
    },
    Free {
        interval: TimeInterval,
        duration_minutes: i64,
    },
}

impl TimelineItem {
    pub fn is_free(&self) -> bool {
        matches!(self, TimelineItem::Free { .. })
    }

    pub fn interval(&self) -> &TimeInterval {
        match self {
            TimelineItem::Appointment { block } => &block.interval,
            TimelineItem::Free { interval, .. } => interval,
        }
    }
}

// ── Stage 1: per-party blocks ───────────────────────────────────────────────

/// Group appointments into blocks per `(local start day, party key)`.
///
/// Within a partition, appointments are walked in start order. Each one
/// starting no later than `block end + merge_gap` extends the running block;
/// any other starts a new block. An appointment crossing midnight belongs to
/// the day it starts on. Blocks are returned sorted by start.
pub fn merge_into_blocks<'a, I>(appointments: I, options: &ScheduleOptions) -> Vec<ScheduleBlock>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    let tz = &options.timezone;
    let mut partitions: BTreeMap<(NaiveDate, PartyKey), Vec<&Appointment>> = BTreeMap::new();
    for appt in appointments {
        partitions
            .entry((local_day(appt.interval.start, tz), appt.party_key()))
            .or_default()
            .push(appt);
    }

    let mut blocks = Vec::new();
    for mut members in partitions.into_values() {
        members.sort_by_key(|a| a.interval.start);
        let mut iter = members.into_iter();
        let Some(first) = iter.next() else {
            continue;
        };

        let mut current = ScheduleBlock::seed(first);
        for appt in iter {
            // A reach past the representable range covers every later start.
            let within_gap = current
                .interval
                .end
                .checked_add_signed(options.merge_gap)
                .is_none_or(|reach| appt.interval.start <= reach);
            if within_gap {
                current.absorb(appt);
            } else {
                blocks.push(mem::replace(&mut current, ScheduleBlock::seed(appt)));
            }
        }
        blocks.push(current);
    }

    blocks.sort_by_key(|b| b.interval.start);
    blocks
}

// ── Stage 2: same-party collapse ────────────────────────────────────────────

/// Collapse runs of consecutive blocks that share a party key and local day.
///
/// Expects blocks sorted by start. The gap between merged blocks is ignored
/// entirely. Blocks of different parties are never merged, even when they
/// touch or overlap.
pub fn merge_consecutive_same_party(
    blocks: Vec<ScheduleBlock>,
    options: &ScheduleOptions,
) -> Vec<ScheduleBlock> {
    let tz = &options.timezone;
    let mut merged: Vec<ScheduleBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match merged.last_mut() {
            Some(current)
                if current.party_key == block.party_key && current.day(tz) == block.day(tz) =>
            {
                current.absorb_block(block);
            }
            _ => merged.push(block),
        }
    }
    merged
}

// ── Stage 3: free slots ─────────────────────────────────────────────────────

/// Interleave free slots between consecutive blocks.
///
/// A free slot is emitted only between blocks of different parties on the
/// same local day whose rounded gap is at least one minute.
pub fn insert_free_slots(blocks: Vec<ScheduleBlock>, options: &ScheduleOptions) -> Vec<TimelineItem> {
    let tz = &options.timezone;
    let mut items = Vec::with_capacity(blocks.len() * 2);
    let mut iter = blocks.into_iter().peekable();

    while let Some(block) = iter.next() {
        let free = iter.peek().and_then(|next| free_slot_between(&block, next, tz));
        items.push(TimelineItem::Appointment { block });
        if let Some(free) = free {
            items.push(free);
        }
    }
    items
}

fn free_slot_between(current: &ScheduleBlock, next: &ScheduleBlock, tz: &Tz) -> Option<TimelineItem> {
    if current.party_key == next.party_key || current.day(tz) != next.day(tz) {
        return None;
    }
    let duration_minutes = current.interval.minutes_until(&next.interval);
    if duration_minutes <= 0 {
        return None;
    }
    Some(TimelineItem::Free {
        interval: TimeInterval::new(current.interval.end, next.interval.start),
        duration_minutes,
    })
}

// ── build_schedule ──────────────────────────────────────────────────────────

/// Build the day-keyed timeline for a snapshot of appointments.
///
/// Only scheduled appointments are laid out unless
/// [`ScheduleOptions::include_inactive`] is set.
///
/// # Examples
///
/// ```
/// use viewing_engine::{build_schedule, Appointment, ScheduleOptions, TimeInterval};
///
/// let at = |s: &str, e: &str| TimeInterval::parse(s, e).unwrap();
/// let appts = vec![
///     Appointment::new("a", "p1", at("2026-03-16T10:00:00Z", "2026-03-16T10:15:00Z"))
///         .with_group("x", "Chan family"),
///     Appointment::new("b", "p2", at("2026-03-16T10:20:00Z", "2026-03-16T10:35:00Z"))
///         .with_group("x", "Chan family"),
/// ];
/// let schedule = build_schedule(&appts, &ScheduleOptions::default());
/// let day = schedule.values().next().unwrap();
/// assert_eq!(day.len(), 1);
/// ```
pub fn build_schedule(
    appointments: &[Appointment],
    options: &ScheduleOptions,
) -> BTreeMap<NaiveDate, Vec<TimelineItem>> {
    let active = appointments
        .iter()
        .filter(|a| options.include_inactive || a.is_scheduled());
    let blocks = merge_into_blocks(active, options);
    let block_count = blocks.len();

    let mut by_day: BTreeMap<NaiveDate, Vec<ScheduleBlock>> = BTreeMap::new();
    for block in blocks {
        by_day
            .entry(block.day(&options.timezone))
            .or_default()
            .push(block);
    }

    let schedule: BTreeMap<NaiveDate, Vec<TimelineItem>> = by_day
        .into_iter()
        .map(|(day, blocks)| {
            let merged = merge_consecutive_same_party(blocks, options);
            (day, insert_free_slots(merged, options))
        })
        .collect();

    debug!(
        appointments = appointments.len(),
        blocks = block_count,
        days = schedule.len(),
        "built schedule"
    );
    schedule
}
