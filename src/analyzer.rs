//! Pattern analysis over the event log
//!
//! Everything here is a pure reduction over `Memory::recent_events`:
//! - `analyze_patterns`: the full derivation of [`UserPatterns`], gated on a
//!   minimum sample size
//! - `quick_analyze`: cheap same-day stats for dashboard display, always
//!   available
//!
//! Each pillar tolerates the complete absence of its event types and falls
//! back to a documented default; no input can make the analysis return NaN.

use crate::event::{Event, EventKind, DEFAULT_FOCUS_MINUTES};
use crate::memory::{today_events, Memory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Below this many retained events, analysis keeps the previous snapshot
pub const MIN_EVENTS_FOR_ANALYSIS: usize = 10;

/// Minimum distinct days with both a mood sample and a completed task before
/// a mood/productivity correlation is reported
pub const MIN_CORRELATION_DAYS: usize = 5;

/// Mood reported when no samples exist yet (middle of the 1-10 scale,
/// slightly optimistic)
pub const DEFAULT_MOOD: f64 = 6.0;

/// Derived statistical summary of recent behavior
///
/// Fully recomputable from the event log at any time; never authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPatterns {
    /// Tasks completed per distinct observed day, 1 decimal
    pub avg_tasks_per_day: f64,
    /// Mean completed focus-session length in minutes
    pub avg_focus_duration: f64,
    /// Completed / created tasks, 0-1, 2 decimals
    pub task_completion_rate: f64,
    /// Mean mood across mood ratings and journal moods, 1-10 scale
    pub avg_mood: f64,
    /// Distinct days with a journal entry in the window, capped at 7.
    /// An entry counts whether or not it recorded a mood; whether mood-less
    /// entries should count is an open product question, this matches the
    /// shipped behavior.
    pub journal_frequency: u32,
    /// Checked / (checked + unchecked) habit events, 0-1, 2 decimals
    pub habit_completion_rate: f64,
    /// Cross-signal relationships
    pub correlations: Correlations,
}

impl Default for UserPatterns {
    fn default() -> Self {
        Self {
            avg_tasks_per_day: 0.0,
            avg_focus_duration: DEFAULT_FOCUS_MINUTES as f64,
            task_completion_rate: 0.0,
            avg_mood: DEFAULT_MOOD,
            journal_frequency: 0,
            habit_completion_rate: 0.0,
            correlations: Correlations::default(),
        }
    }
}

/// Correlations discovered between daily signals
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Correlations {
    /// Pearson r between daily mean mood and daily completed-task count,
    /// -1 to 1, 2 decimals; 0 until enough overlapping days exist
    pub mood_productivity: f64,
}

/// Cheap same-day summary, no minimum-sample gate
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuickStats {
    /// Tasks completed today
    pub today_task_count: usize,
    /// Most recent mood sample ever recorded, if any
    pub last_mood: Option<f64>,
    /// Minutes of completed focus sessions today
    pub focus_minutes: u32,
}

/// Derive [`UserPatterns`] from the retained event log
///
/// With fewer than [`MIN_EVENTS_FOR_ANALYSIS`] events the previous snapshot
/// is returned unchanged: tiny samples produce more noise than signal. Given
/// the same `recent_events`, the result is always identical.
pub fn analyze_patterns(memory: &Memory) -> UserPatterns {
    let events = &memory.recent_events;

    if events.len() < MIN_EVENTS_FOR_ANALYSIS {
        return memory.patterns.patterns.clone();
    }

    let (avg_tasks_per_day, avg_focus_duration, task_completion_rate) = productivity_pillar(events);
    let (avg_mood, journal_frequency) = mental_pillar(events);
    let habit_completion_rate = habit_pillar(events);

    UserPatterns {
        avg_tasks_per_day,
        avg_focus_duration,
        task_completion_rate,
        avg_mood,
        journal_frequency,
        habit_completion_rate,
        correlations: correlation_pillar(events),
    }
}

/// Tasks per day, focus duration, completion rate
fn productivity_pillar(events: &[Event]) -> (f64, f64, f64) {
    let completed = events.iter().filter(|e| e.kind.is_task_completed()).count();
    let created = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::TaskCreated { .. }))
        .count();

    // Every observed event marks a day as active, not just task events
    let distinct_days: HashSet<NaiveDate> = events.iter().map(|e| e.local_day()).collect();
    let avg_tasks_per_day = if distinct_days.is_empty() {
        0.0
    } else {
        round1(completed as f64 / distinct_days.len() as f64)
    };

    let focus_sessions: Vec<u32> = events.iter().filter_map(|e| e.kind.focus_minutes()).collect();
    let avg_focus_duration = if focus_sessions.is_empty() {
        DEFAULT_FOCUS_MINUTES as f64
    } else {
        (focus_sessions.iter().sum::<u32>() as f64 / focus_sessions.len() as f64).round()
    };

    let task_completion_rate = if created == 0 {
        0.0
    } else {
        round2(completed as f64 / created as f64)
    };

    (avg_tasks_per_day, avg_focus_duration, task_completion_rate)
}

/// Average mood and journal frequency
fn mental_pillar(events: &[Event]) -> (f64, u32) {
    let moods: Vec<f64> = events.iter().filter_map(|e| e.kind.mood_sample()).collect();
    let avg_mood = if moods.is_empty() {
        DEFAULT_MOOD
    } else {
        round1(moods.iter().sum::<f64>() / moods.len() as f64)
    };

    let journal_days: HashSet<NaiveDate> = events
        .iter()
        .filter(|e| e.kind.is_journal())
        .map(|e| e.local_day())
        .collect();
    let journal_frequency = (journal_days.len() as u32).min(7);

    (avg_mood, journal_frequency)
}

/// Habit check/uncheck ratio
fn habit_pillar(events: &[Event]) -> f64 {
    let checked = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::HabitChecked { .. }))
        .count();
    let unchecked = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::HabitUnchecked { .. }))
        .count();

    let total = checked + unchecked;
    if total == 0 {
        0.0
    } else {
        round2(checked as f64 / total as f64)
    }
}

#[derive(Default)]
struct DayBucket {
    moods: Vec<f64>,
    tasks: u32,
}

/// Mood/productivity correlation over per-day buckets
fn correlation_pillar(events: &[Event]) -> Correlations {
    let mut days: HashMap<NaiveDate, DayBucket> = HashMap::new();

    for event in events {
        let bucket = days.entry(event.local_day()).or_default();
        if let Some(mood) = event.kind.mood_sample() {
            bucket.moods.push(mood);
        }
        if event.kind.is_task_completed() {
            bucket.tasks += 1;
        }
    }

    // Only days carrying both signals contribute
    let both: Vec<(f64, f64)> = days
        .values()
        .filter(|d| !d.moods.is_empty() && d.tasks > 0)
        .map(|d| {
            let mean_mood = d.moods.iter().sum::<f64>() / d.moods.len() as f64;
            (mean_mood, d.tasks as f64)
        })
        .collect();

    let mood_productivity = if both.len() < MIN_CORRELATION_DAYS {
        0.0
    } else {
        let moods: Vec<f64> = both.iter().map(|(m, _)| *m).collect();
        let tasks: Vec<f64> = both.iter().map(|(_, t)| *t).collect();
        round2(pearson_correlation(&moods, &tasks))
    };

    Correlations { mood_productivity }
}

/// Cheap same-day summary for dashboard display
pub fn quick_analyze(memory: &Memory) -> QuickStats {
    let today = today_events(memory);

    let today_task_count = today.iter().filter(|e| e.kind.is_task_completed()).count();

    let last_mood = memory
        .recent_events
        .iter()
        .rev()
        .find_map(|e| e.kind.mood_sample());

    let focus_minutes = today.iter().filter_map(|e| e.kind.focus_minutes()).sum();

    QuickStats {
        today_task_count,
        last_mood,
        focus_minutes,
    }
}

/// Pearson correlation coefficient between two equal-length series
///
/// Returns 0.0 for mismatched lengths, empty input, or zero variance in
/// either series; never NaN or infinite.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        numerator += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
