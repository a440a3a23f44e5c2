use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use viewing_engine::{build_schedule, check_conflict, Appointment, ScheduleOptions, TimeInterval};

/// A busy agent's week: seven days, eight customer groups, 40 viewings a day.
fn busy_week() -> Vec<Appointment> {
    let monday = Utc.with_ymd_and_hms(2026, 3, 16, 8, 0, 0).unwrap();
    (0..7)
        .flat_map(|day| (0..40).map(move |slot| (day, slot)))
        .map(|(day, slot)| {
            let start = monday + Duration::days(day) + Duration::minutes(slot * 20);
            let interval = TimeInterval::new(start, start + Duration::minutes(15));
            let group = (slot / 5) % 8;
            Appointment::new(format!("d{day}s{slot}"), format!("p{slot}"), interval)
                .with_group(format!("g{group}"), format!("Group {group}"))
        })
        .collect()
}

fn bench_build_schedule(c: &mut Criterion) {
    let appts = busy_week();
    let options = ScheduleOptions::default();
    c.bench_function("build_schedule/week_280", |b| {
        b.iter(|| build_schedule(black_box(&appts), black_box(&options)))
    });
}

fn bench_check_conflict(c: &mut Criterion) {
    let appts = busy_week();
    let sunday_night = Utc.with_ymd_and_hms(2026, 3, 22, 23, 0, 0).unwrap();
    let candidate = TimeInterval::new(sunday_night, sunday_night + Duration::minutes(30));
    c.bench_function("check_conflict/week_280_clear", |b| {
        b.iter(|| check_conflict(black_box(&candidate), black_box(&appts), None))
    });
}

criterion_group!(benches, bench_build_schedule, bench_check_conflict);
criterion_main!(benches);
