//! Wellbeing composite score
//!
//! Folds the pattern analysis and today's activity into a single 0-100
//! number with a four-pillar breakdown (productivity, health, mental,
//! consistency, 0-25 each) and a trend against the previous week of
//! recorded scores. Deterministic given the same memory and patterns.

use crate::analyzer::UserPatterns;
use crate::event::EventKind;
use crate::memory::{today_events, Memory};
use serde::Serialize;

/// Daily focus target in minutes; reaching it maxes the focus component
const FOCUS_TARGET_MINUTES: f64 = 120.0;

/// Score movement (in points) needed before the trend leaves "stable"
const TREND_THRESHOLD: f64 = 5.0;

/// The composite wellbeing assessment
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WellbeingScore {
    /// Overall score, 0-100; always the sum of the breakdown components
    pub overall: u32,
    /// Per-pillar contributions, 0-25 each
    pub breakdown: ScoreBreakdown,
    /// Direction of recent change
    pub trend: Trend,
    /// Magnitude of the change as a percentage of the prior week's mean
    pub trend_percent: u32,
}

/// Per-pillar score contributions
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub productivity: u32,
    pub health: u32,
    pub mental: u32,
    pub consistency: u32,
}

/// Direction of the wellbeing trend
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Stable => write!(f, "stable"),
            Trend::Declining => write!(f, "declining"),
        }
    }
}

/// Compute the wellbeing score for the current day
pub fn wellbeing_score(memory: &Memory, patterns: &UserPatterns) -> WellbeingScore {
    let breakdown = ScoreBreakdown {
        productivity: productivity_score(memory, patterns),
        health: health_score(memory),
        mental: mental_score(memory, patterns),
        consistency: consistency_score(memory, patterns),
    };

    let overall =
        (breakdown.productivity + breakdown.health + breakdown.mental + breakdown.consistency)
            .min(100);

    let (trend, trend_percent) = score_trend(memory);

    WellbeingScore {
        overall,
        breakdown,
        trend,
        trend_percent,
    }
}

/// Productivity pillar: tasks done vs the personal average (0-10), focus
/// time vs a 2h target (0-10), overall completion rate (0-5)
fn productivity_score(memory: &Memory, patterns: &UserPatterns) -> u32 {
    let today = today_events(memory);
    let today_tasks = today.iter().filter(|e| e.kind.is_task_completed()).count();

    let mut score = 0.0;

    if patterns.avg_tasks_per_day > 0.0 {
        let ratio = (today_tasks as f64 / patterns.avg_tasks_per_day).min(1.0);
        score += ratio * 10.0;
    } else if today_tasks > 0 {
        score += 5.0;
    }

    let focus_minutes: u32 = today.iter().filter_map(|e| e.kind.focus_minutes()).sum();
    let focus_ratio = (focus_minutes as f64 / FOCUS_TARGET_MINUTES).min(1.0);
    score += focus_ratio * 10.0;

    score += patterns.task_completion_rate * 5.0;

    (score.round() as u32).min(25)
}

/// Health pillar: meals logged (0-10), hydration (0-5), a weight
/// measurement today (0-5), and a balanced-day bonus (0-5)
fn health_score(memory: &Memory) -> u32 {
    let today = today_events(memory);

    let meals = today
        .iter()
        .filter(|e| matches!(e.kind, EventKind::MealAdded { .. }))
        .count();
    let mut score = match meals {
        0 => 0,
        1 => 4,
        2 => 7,
        _ => 10,
    };

    let water = today
        .iter()
        .filter(|e| matches!(e.kind, EventKind::WaterAdded { .. }))
        .count();
    score += match water {
        0 => 0,
        1 => 1,
        2 | 3 => 3,
        _ => 5,
    };

    let weighed_in = today
        .iter()
        .any(|e| matches!(e.kind, EventKind::WeightAdded { .. }));
    if weighed_in {
        score += 5;
    }

    if meals >= 2 {
        score += 5;
    }

    score.min(25)
}

/// Mental pillar: today's mood (0-10), journaling today (0-5), the recent
/// mood average (0-5), and a positive mood/productivity link (0-5)
fn mental_score(memory: &Memory, patterns: &UserPatterns) -> u32 {
    let today = today_events(memory);

    let last_mood_today = today.iter().rev().find_map(|e| e.kind.mood_sample());
    let mood_component = last_mood_today.unwrap_or(patterns.avg_mood).clamp(0.0, 10.0);
    let mut score = mood_component.round() as u32;

    if today.iter().any(|e| e.kind.is_journal()) {
        score += 5;
    }

    score += if patterns.avg_mood >= 7.0 {
        5
    } else if patterns.avg_mood >= 5.0 {
        3
    } else {
        1
    };

    let link = patterns.correlations.mood_productivity;
    if link > 0.3 {
        score += 5;
    } else if link > 0.0 {
        score += 2;
    }

    score.min(25)
}

/// Consistency pillar: habits checked today (0-10), the overall habit
/// completion rate (0-10), and journaling regularity (0-5)
fn consistency_score(memory: &Memory, patterns: &UserPatterns) -> u32 {
    let today = today_events(memory);

    let habits_checked = today
        .iter()
        .filter(|e| matches!(e.kind, EventKind::HabitChecked { .. }))
        .count();
    let mut score = match habits_checked {
        0 => 0,
        1 => 4,
        2 => 7,
        _ => 10,
    };

    score += (patterns.habit_completion_rate * 10.0).round() as u32;

    score += match patterns.journal_frequency {
        0 => 0,
        1 | 2 => 1,
        3 | 4 => 3,
        _ => 5,
    };

    score.min(25)
}

/// Trend of the recorded daily scores: last 7 entries vs the 7 before
fn score_trend(memory: &Memory) -> (Trend, u32) {
    let history = &memory.score_history;
    if history.len() < 3 {
        return (Trend::Stable, 0);
    }

    let split = history.len().saturating_sub(7);
    let recent = &history[split..];
    let older_start = split.saturating_sub(7);
    let older = &history[older_start..split];

    if recent.is_empty() || older.is_empty() {
        return (Trend::Stable, 0);
    }

    let recent_avg = recent.iter().map(|s| s.score as f64).sum::<f64>() / recent.len() as f64;
    let older_avg = older.iter().map(|s| s.score as f64).sum::<f64>() / older.len() as f64;

    let diff = recent_avg - older_avg;
    let percent = if older_avg > 0.0 {
        ((diff / older_avg) * 100.0).round().abs() as u32
    } else {
        0
    };

    let trend = if diff > TREND_THRESHOLD {
        Trend::Improving
    } else if diff < -TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    };

    (trend, percent)
}

/// One-line description of an overall score
pub fn score_description(overall: u32) -> &'static str {
    match overall {
        80..=u32::MAX => "Excellent - everything is clicking",
        60..=79 => "Good - keep it up",
        40..=59 => "Fair - a few small adjustments could help",
        20..=39 => "Rough patch - be kind to yourself",
        _ => "Hard day - tomorrow is a fresh start",
    }
}
