//! Plain-text schedule rendering.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;
use chrono_tz::Tz;
use viewing_engine::{format_minutes, TimeInterval, TimelineItem};

/// One heading per day, one line per timeline item.
///
/// ```text
/// 2026-03-16
///   10:00-10:35  Chan family (2 properties)
///   10:35-14:00  free, 3 hours, 25 minutes
/// ```
pub fn schedule_text(schedule: &BTreeMap<NaiveDate, Vec<TimelineItem>>, tz: &Tz) -> String {
    let mut out = String::new();
    for (day, items) in schedule {
        let _ = writeln!(out, "{day}");
        for item in items {
            let span = clock_span(item.interval(), tz);
            match item {
                TimelineItem::Appointment { block } => {
                    let noun = if block.property_count == 1 { "property" } else { "properties" };
                    let _ = writeln!(
                        out,
                        "  {span}  {} ({} {noun})",
                        block.display_name, block.property_count
                    );
                }
                TimelineItem::Free {
                    duration_minutes, ..
                } => {
                    let _ = writeln!(out, "  {span}  free, {}", format_minutes(*duration_minutes));
                }
            }
        }
    }
    out
}

fn clock_span(interval: &TimeInterval, tz: &Tz) -> String {
    format!(
        "{}-{}",
        interval.start.with_timezone(tz).format("%H:%M"),
        interval.end.with_timezone(tz).format("%H:%M")
    )
}
