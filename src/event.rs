//! Core event types for the Reverie insight engine
//!
//! This module defines the fundamental types shared across the crate:
//! - `Event`: one immutable, timestamped record of a user action
//! - `EventKind`: the closed enumeration of observable actions, each variant
//!   carrying its own typed payload
//! - `EventContext`: hour/weekday captured at observation time

use chrono::{Datelike, Local, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Fallback focus-session length in minutes, used whenever a completed
/// pomodoro carries neither an actual nor a planned duration.
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;

/// An immutable record of something the user did
///
/// Events are append-only: once observed they are never edited or removed
/// individually, only evicted in bulk when the log reaches capacity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Unix timestamp in milliseconds, assigned at observation time
    pub timestamp: i64,
    /// What happened, with its typed payload
    #[serde(flatten)]
    pub kind: EventKind,
    /// Local hour and weekday at observation time
    #[serde(default)]
    pub context: EventContext,
}

impl Event {
    /// Create an event stamped with the current time
    pub fn now(kind: EventKind) -> Self {
        Self::with_timestamp(kind, Utc::now().timestamp_millis())
    }

    /// Create an event with a specific timestamp (context derived from it)
    pub fn with_timestamp(kind: EventKind, timestamp: i64) -> Self {
        Self {
            timestamp,
            kind,
            context: EventContext::at(timestamp),
        }
    }

    /// The local calendar date this event falls on
    pub fn local_day(&self) -> NaiveDate {
        local_day(self.timestamp)
    }
}

/// Convert a millisecond timestamp to its local calendar date
///
/// Day-bucketed metrics (tasks per day, journal frequency, correlation
/// buckets) all group by this key.
pub fn local_day(timestamp_millis: i64) -> NaiveDate {
    match Utc.timestamp_millis_opt(timestamp_millis) {
        chrono::LocalResult::Single(dt) => dt.with_timezone(&Local).date_naive(),
        _ => Local::now().date_naive(),
    }
}

/// Local time-of-day context captured alongside each event
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventContext {
    /// Local hour of day, 0-23
    pub hour: u32,
    /// Day of week, 0 = Sunday .. 6 = Saturday
    pub weekday: u8,
}

impl EventContext {
    /// Derive the context for a given millisecond timestamp
    pub fn at(timestamp_millis: i64) -> Self {
        match Utc.timestamp_millis_opt(timestamp_millis) {
            chrono::LocalResult::Single(dt) => {
                let local = dt.with_timezone(&Local);
                Self {
                    hour: local.hour(),
                    weekday: local.weekday().num_days_from_sunday() as u8,
                }
            }
            _ => Self::default(),
        }
    }
}

/// The closed enumeration of observable user actions
///
/// One variant per action, each with its own payload. Serialized with the
/// action name under `type` and the payload under `data`, e.g.
/// `{"type":"mood:set","data":{"mood":7.0}}`. Optional payload fields stay
/// optional on the wire; consumers apply their documented defaults instead of
/// failing on absence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum EventKind {
    // Tasks
    #[serde(rename = "task:created")]
    TaskCreated {
        id: String,
        title: String,
        category: String,
        priority: String,
    },
    #[serde(rename = "task:completed")]
    TaskCompleted {
        id: String,
        title: String,
        duration_minutes: Option<u32>,
    },
    #[serde(rename = "task:deleted")]
    TaskDeleted { id: String },
    #[serde(rename = "task:updated")]
    TaskUpdated { id: String },
    #[serde(rename = "task:moved")]
    TaskMoved { id: String, from: String, to: String },

    // Focus sessions
    #[serde(rename = "pomodoro:started")]
    PomodoroStarted {
        task_id: Option<String>,
        planned_minutes: u32,
    },
    #[serde(rename = "pomodoro:completed")]
    PomodoroCompleted {
        task_id: Option<String>,
        planned_minutes: Option<u32>,
        actual_minutes: Option<u32>,
    },
    #[serde(rename = "pomodoro:interrupted")]
    PomodoroInterrupted {
        task_id: Option<String>,
        after_minutes: u32,
    },

    // Health
    #[serde(rename = "weight:added")]
    WeightAdded { kilograms: f64 },
    #[serde(rename = "meal:added")]
    MealAdded { calories: u32, meal: String },
    #[serde(rename = "water:added")]
    WaterAdded { milliliters: u32 },

    // Journal & mood
    #[serde(rename = "journal:written")]
    JournalWritten { mood: Option<f64>, has_content: bool },
    #[serde(rename = "mood:set")]
    MoodSet { mood: f64 },

    // Habits
    #[serde(rename = "habit:created")]
    HabitCreated { habit_id: String, name: String },
    #[serde(rename = "habit:checked")]
    HabitChecked { habit_id: String, name: String },
    #[serde(rename = "habit:unchecked")]
    HabitUnchecked { habit_id: String },

    // Reading
    #[serde(rename = "book:started")]
    BookStarted { book_id: String, title: String },
    #[serde(rename = "book:finished")]
    BookFinished { book_id: String, title: String },
    #[serde(rename = "reading:session")]
    ReadingSession { book_id: String, minutes: u32 },

    // Learning
    #[serde(rename = "course:started")]
    CourseStarted { course_id: String, name: String },
    #[serde(rename = "course:message")]
    CourseMessage { course_id: String, from_user: bool },
    #[serde(rename = "flashcard:reviewed")]
    FlashcardReviewed { course_id: String, correct: bool },

    // App lifecycle & navigation
    #[serde(rename = "view:changed")]
    ViewChanged { from: String, to: String },
    #[serde(rename = "app:opened")]
    AppOpened,
    #[serde(rename = "app:closed")]
    AppClosed,
}

impl EventKind {
    /// The wire name of this event kind (e.g. `"task:completed"`)
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::TaskCreated { .. } => "task:created",
            EventKind::TaskCompleted { .. } => "task:completed",
            EventKind::TaskDeleted { .. } => "task:deleted",
            EventKind::TaskUpdated { .. } => "task:updated",
            EventKind::TaskMoved { .. } => "task:moved",
            EventKind::PomodoroStarted { .. } => "pomodoro:started",
            EventKind::PomodoroCompleted { .. } => "pomodoro:completed",
            EventKind::PomodoroInterrupted { .. } => "pomodoro:interrupted",
            EventKind::WeightAdded { .. } => "weight:added",
            EventKind::MealAdded { .. } => "meal:added",
            EventKind::WaterAdded { .. } => "water:added",
            EventKind::JournalWritten { .. } => "journal:written",
            EventKind::MoodSet { .. } => "mood:set",
            EventKind::HabitCreated { .. } => "habit:created",
            EventKind::HabitChecked { .. } => "habit:checked",
            EventKind::HabitUnchecked { .. } => "habit:unchecked",
            EventKind::BookStarted { .. } => "book:started",
            EventKind::BookFinished { .. } => "book:finished",
            EventKind::ReadingSession { .. } => "reading:session",
            EventKind::CourseStarted { .. } => "course:started",
            EventKind::CourseMessage { .. } => "course:message",
            EventKind::FlashcardReviewed { .. } => "flashcard:reviewed",
            EventKind::ViewChanged { .. } => "view:changed",
            EventKind::AppOpened => "app:opened",
            EventKind::AppClosed => "app:closed",
        }
    }

    /// Numeric mood sample carried by this event, if any
    ///
    /// Mood ratings come from explicit `mood:set` events and from journal
    /// entries that recorded a mood alongside the text.
    pub fn mood_sample(&self) -> Option<f64> {
        match self {
            EventKind::MoodSet { mood } => Some(*mood),
            EventKind::JournalWritten { mood, .. } => *mood,
            _ => None,
        }
    }

    /// Minutes of focused work represented by this event, if any
    ///
    /// Prefers the actually elapsed duration over the planned one; falls
    /// back to [`DEFAULT_FOCUS_MINUTES`] when neither was recorded.
    pub fn focus_minutes(&self) -> Option<u32> {
        match self {
            EventKind::PomodoroCompleted {
                planned_minutes,
                actual_minutes,
                ..
            } => Some(
                actual_minutes
                    .or(*planned_minutes)
                    .unwrap_or(DEFAULT_FOCUS_MINUTES),
            ),
            _ => None,
        }
    }

    /// Whether this event records a completed task
    pub fn is_task_completed(&self) -> bool {
        matches!(self, EventKind::TaskCompleted { .. })
    }

    /// Whether this event records a journal entry
    pub fn is_journal(&self) -> bool {
        matches!(self, EventKind::JournalWritten { .. })
    }
}
