//! Benchmarks for the Reverie analysis pipeline
//!
//! Run with: cargo bench

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use reverie::{add_event, analyze_patterns, quick_analyze, Event, EventKind, Memory};

const HOUR: i64 = 3600 * 1000;

/// Build a memory with `count` events spread over the last 7 days,
/// cycling through the event kinds the analyzer cares about
fn create_test_memory(count: usize) -> Memory {
    let now = Utc::now().timestamp_millis();
    let mut memory = Memory::default();

    for i in 0..count {
        let ts = now - (i as i64 % (7 * 24)) * HOUR;
        let kind = match i % 5 {
            0 => EventKind::TaskCompleted {
                id: format!("t{i}"),
                title: "task".into(),
                duration_minutes: Some(30),
            },
            1 => EventKind::MoodSet {
                mood: 4.0 + (i % 6) as f64,
            },
            2 => EventKind::TaskCreated {
                id: format!("t{i}"),
                title: "task".into(),
                category: "work".into(),
                priority: "medium".into(),
            },
            3 => EventKind::HabitChecked {
                habit_id: format!("h{}", i % 4),
                name: "habit".into(),
            },
            _ => EventKind::PomodoroCompleted {
                task_id: None,
                planned_minutes: Some(25),
                actual_minutes: Some(20 + (i % 15) as u32),
            },
        };
        memory = add_event(&memory, Event::with_timestamp(kind, ts));
    }

    memory
}

fn bench_analyze_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_patterns");

    for size in [50, 200, 500] {
        let memory = create_test_memory(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("events_{}", size), |b| {
            b.iter(|| analyze_patterns(black_box(&memory)))
        });
    }

    group.finish();
}

fn bench_quick_analyze(c: &mut Criterion) {
    let memory = create_test_memory(500);

    c.bench_function("quick_analyze_500", |b| {
        b.iter(|| quick_analyze(black_box(&memory)))
    });
}

fn bench_add_event(c: &mut Criterion) {
    let memory = create_test_memory(500);
    let now = Utc::now().timestamp_millis();

    c.bench_function("add_event_at_capacity", |b| {
        b.iter(|| {
            add_event(
                black_box(&memory),
                Event::with_timestamp(EventKind::MoodSet { mood: 7.0 }, now),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_analyze_patterns,
    bench_quick_analyze,
    bench_add_event
);
criterion_main!(benches);
