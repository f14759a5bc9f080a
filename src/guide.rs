//! Gentle, rule-based suggestions
//!
//! Turns the current memory and patterns into short, supportive nudges:
//! never guilt-tripping, never blocking, celebrating small wins. Suggestion
//! ids are deterministic so a dismissal keeps the same suggestion away when
//! it is regenerated.

use crate::analyzer::UserPatterns;
use crate::config::Thresholds;
use crate::event::EventKind;
use crate::memory::{today_events, Memory};
use chrono::{DateTime, Local, Timelike};
use serde::Serialize;

/// Emotional register of a suggestion
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Encouraging,
    Gentle,
    Celebratory,
    Supportive,
}

/// Display priority; higher priorities surface first
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// What area of life a suggestion belongs to
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Productivity,
    Health,
    Mental,
    Habit,
    Celebration,
}

/// An action the UI can offer alongside a suggestion
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SuggestedAction {
    /// Button label
    pub label: String,
    /// Opaque action identifier, e.g. `"navigate:journal"`
    pub target: String,
}

/// A single suggestion
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Suggestion {
    /// Stable id; dismissing it suppresses regeneration
    pub id: String,
    pub message: String,
    pub tone: Tone,
    pub priority: Priority,
    pub category: SuggestionCategory,
    pub action: Option<SuggestedAction>,
}

/// Suggestions grouped for display
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ContextualSuggestions {
    /// The one suggestion to show right now, if any
    pub now: Option<Suggestion>,
    /// Up to three more, in priority order
    pub upcoming: Vec<Suggestion>,
    /// Up to three recent celebrations
    pub achievements: Vec<Suggestion>,
}

/// Generate suggestions for the current moment
pub fn generate_suggestions(
    memory: &Memory,
    patterns: &UserPatterns,
    thresholds: &Thresholds,
) -> ContextualSuggestions {
    generate_suggestions_at(memory, patterns, thresholds, Local::now())
}

/// Generate suggestions as of a given local time
pub fn generate_suggestions_at(
    memory: &Memory,
    patterns: &UserPatterns,
    thresholds: &Thresholds,
    now: DateTime<Local>,
) -> ContextualSuggestions {
    let hour = now.hour();

    let mut all = Vec::new();
    all.extend(health_suggestions(memory, hour));
    all.extend(mental_suggestions(memory, patterns, thresholds, hour));
    all.extend(celebrations(memory, patterns, thresholds));

    all.retain(|s| !memory.dismissed_suggestions.iter().any(|id| *id == s.id));
    all.sort_by_key(|s| s.priority);

    let (achievements, others): (Vec<_>, Vec<_>) = all
        .into_iter()
        .partition(|s| s.category == SuggestionCategory::Celebration);

    let mut others = others.into_iter();
    ContextualSuggestions {
        now: others.next(),
        upcoming: others.take(3).collect(),
        achievements: achievements.into_iter().take(3).collect(),
    }
}

fn health_suggestions(memory: &Memory, hour: u32) -> Vec<Suggestion> {
    let today = today_events(memory);
    let mut suggestions = Vec::new();

    let has_meal = today
        .iter()
        .any(|e| matches!(e.kind, EventKind::MealAdded { .. }));
    if !has_meal && hour >= 11 {
        let meal = match hour {
            11..=14 => "lunch",
            15..=19 => "snack",
            _ => "dinner",
        };
        suggestions.push(Suggestion {
            id: format!("meal-reminder-{hour}"),
            message: format!("Nothing logged yet today - a {meal} would do you good."),
            tone: Tone::Gentle,
            priority: Priority::Medium,
            category: SuggestionCategory::Health,
            action: Some(SuggestedAction {
                label: "Log a meal".into(),
                target: "navigate:health".into(),
            }),
        });
    }

    let has_water = today
        .iter()
        .any(|e| matches!(e.kind, EventKind::WaterAdded { .. }));
    if !has_water && hour >= 14 {
        suggestions.push(Suggestion {
            id: format!("water-reminder-{hour}"),
            message: "Don't forget to drink some water.".into(),
            tone: Tone::Gentle,
            priority: Priority::Low,
            category: SuggestionCategory::Health,
            action: None,
        });
    }

    suggestions
}

fn mental_suggestions(
    memory: &Memory,
    patterns: &UserPatterns,
    thresholds: &Thresholds,
    hour: u32,
) -> Vec<Suggestion> {
    let today = today_events(memory);
    let mut suggestions = Vec::new();

    let last_mood_today = today.iter().rev().find_map(|e| e.kind.mood_sample());
    if let Some(mood) = last_mood_today {
        if mood <= thresholds.low_mood {
            suggestions.push(Suggestion {
                id: "low-mood-support".into(),
                message: "Tough day? That's okay, it happens. Take care of yourself.".into(),
                tone: Tone::Supportive,
                priority: Priority::High,
                category: SuggestionCategory::Mental,
                action: None,
            });
        }
    }

    let has_journal_today = today.iter().any(|e| e.kind.is_journal());
    if !has_journal_today && hour >= 20 {
        suggestions.push(Suggestion {
            id: "journal-evening".into(),
            message: "A quiet moment for yourself? Writing a few lines can help unwind.".into(),
            tone: Tone::Gentle,
            priority: Priority::Low,
            category: SuggestionCategory::Mental,
            action: Some(SuggestedAction {
                label: "Open the journal".into(),
                target: "navigate:journal".into(),
            }),
        });
    }

    let has_habit_events = memory
        .recent_events
        .iter()
        .any(|e| matches!(e.kind, EventKind::HabitChecked { .. } | EventKind::HabitUnchecked { .. }));
    if has_habit_events && patterns.habit_completion_rate < 0.5 {
        suggestions.push(Suggestion {
            id: "habit-forgiveness".into(),
            message: "Habits are hard. Every small step counts, even an imperfect one.".into(),
            tone: Tone::Supportive,
            priority: Priority::Low,
            category: SuggestionCategory::Habit,
            action: None,
        });
    }

    suggestions
}

fn celebrations(
    memory: &Memory,
    patterns: &UserPatterns,
    thresholds: &Thresholds,
) -> Vec<Suggestion> {
    let today = today_events(memory);
    let mut celebrations = Vec::new();

    let today_tasks = today.iter().filter(|e| e.kind.is_task_completed()).count();
    if today_tasks >= thresholds.celebrate_after_tasks {
        celebrations.push(celebration(
            format!("celebrate-tasks-{today_tasks}"),
            format!("{today_tasks} tasks done today - you're on a roll!"),
        ));
    }

    if patterns.avg_tasks_per_day > 0.0 && today_tasks as f64 >= patterns.avg_tasks_per_day {
        celebrations.push(celebration(
            "daily-goal-reached".into(),
            "Daily goal reached - be proud of that.".into(),
        ));
    }

    let habits_checked = today
        .iter()
        .filter(|e| matches!(e.kind, EventKind::HabitChecked { .. }))
        .count();
    if habits_checked >= 3 {
        celebrations.push(celebration(
            "habits-done".into(),
            "All your habits checked off. Nice work!".into(),
        ));
    }

    if patterns.correlations.mood_productivity > 0.5 {
        celebrations.push(celebration(
            "mood-productivity-link".into(),
            "When you feel good you get a lot done - keep taking care of yourself.".into(),
        ));
    }

    if patterns.journal_frequency >= 5 {
        celebrations.push(celebration(
            "journal-streak".into(),
            "You've been journaling regularly. Great habit to keep.".into(),
        ));
    }

    celebrations
}

fn celebration(id: String, message: String) -> Suggestion {
    Suggestion {
        id,
        message,
        tone: Tone::Celebratory,
        priority: Priority::Low,
        category: SuggestionCategory::Celebration,
        action: None,
    }
}

/// A short greeting for app startup, personalized from the patterns
pub fn welcome_message(patterns: &UserPatterns, now: DateTime<Local>) -> String {
    let greeting = match now.hour() {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    };

    let personal = if patterns.avg_mood >= 7.0 {
        "You've been in good shape lately."
    } else if patterns.journal_frequency >= 5 {
        "Your journaling streak is going strong."
    } else {
        "Ready for a new day?"
    };

    format!("{greeting}! {personal}")
}

/// A short end-of-day recap
pub fn evening_message(memory: &Memory, patterns: &UserPatterns) -> String {
    let today = today_events(memory);
    let tasks = today.iter().filter(|e| e.kind.is_task_completed()).count();
    let focus_minutes: u32 = today.iter().filter_map(|e| e.kind.focus_minutes()).sum();

    if patterns.avg_tasks_per_day > 0.0 && tasks as f64 >= patterns.avg_tasks_per_day {
        return format!("Great day! {tasks} tasks done. Rest well.");
    }
    if tasks > 0 {
        let plural = if tasks > 1 { "s" } else { "" };
        return format!("{tasks} task{plural} today. Every step counts. Good evening!");
    }
    if focus_minutes > 0 {
        return format!("{focus_minutes} minutes of focus today. That's something! Good night.");
    }

    "Quiet day? That's fine - tomorrow is a new one. Rest well.".to_string()
}
