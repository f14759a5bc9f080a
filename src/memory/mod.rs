//! Durable behavioral memory
//!
//! The memory aggregate holds everything the engine retains between sessions:
//! - `recent_events`: capacity-bounded, append-only event log (oldest first)
//! - `patterns`: the last computed pattern snapshot, explicitly a cache
//! - `score_history`: one wellbeing score per day, last 30 days
//! - `dismissed_suggestions`: suggestion ids the user asked not to see again
//!
//! All mutation happens through pure functions that return a new value;
//! persistence is best-effort and never fails across this module's boundary.

mod store;

pub use store::{FileStore, InMemoryStore, MemoryStore, StoreError, StoreResult};

use crate::analyzer::UserPatterns;
use crate::event::Event;
use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Fixed key the aggregate is persisted under
pub const MEMORY_KEY: &str = "reverie-memory";

/// Maximum number of retained events; oldest entries are evicted first
pub const MAX_RECENT_EVENTS: usize = 500;

/// Events older than this are dropped when memory is loaded
pub const RETENTION_DAYS: i64 = 7;

/// Maximum retained daily wellbeing scores
pub const SCORE_HISTORY_DAYS: usize = 30;

/// Maximum retained dismissed-suggestion ids
pub const MAX_DISMISSED: usize = 50;

/// Persisted format version; a mismatch keeps the events and resets the rest
pub const MEMORY_VERSION: u32 = 1;

/// The last computed pattern analysis, cached with its input size
///
/// Staleness is observable: the snapshot is exact for a log of
/// `computed_at_event_count` events and an approximation for anything newer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatternsSnapshot {
    /// The derived patterns
    pub patterns: UserPatterns,
    /// How many events were in the log when this was computed
    #[serde(default)]
    pub computed_at_event_count: usize,
}

/// One day's recorded wellbeing score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntry {
    /// Local calendar date the score belongs to
    pub date: NaiveDate,
    /// Overall wellbeing score, 0-100
    pub score: u32,
}

/// The persisted behavioral memory aggregate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Memory {
    /// Retained events, oldest first, bounded by [`MAX_RECENT_EVENTS`]
    pub recent_events: Vec<Event>,
    /// Last computed patterns; stale between analyses
    pub patterns: PatternsSnapshot,
    /// Daily wellbeing scores, oldest first, bounded by [`SCORE_HISTORY_DAYS`]
    #[serde(default)]
    pub score_history: Vec<ScoreEntry>,
    /// Suggestion ids the user dismissed, bounded by [`MAX_DISMISSED`]
    #[serde(default)]
    pub dismissed_suggestions: Vec<String>,
    /// Millisecond timestamp of the last full analysis, 0 if never
    #[serde(default)]
    pub last_full_analysis: i64,
    /// Persisted format version
    pub version: u32,
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            recent_events: Vec::new(),
            patterns: PatternsSnapshot::default(),
            score_history: Vec::new(),
            dismissed_suggestions: Vec::new(),
            last_full_analysis: 0,
            version: MEMORY_VERSION,
        }
    }
}

/// Append an event, evicting the oldest entries past capacity
///
/// Pure: returns a new aggregate, `memory` is untouched and `patterns`
/// carries over unchanged.
pub fn add_event(memory: &Memory, event: Event) -> Memory {
    let mut events = memory.recent_events.clone();
    events.push(event);
    if events.len() > MAX_RECENT_EVENTS {
        let excess = events.len() - MAX_RECENT_EVENTS;
        events.drain(..excess);
    }

    Memory {
        recent_events: events,
        ..memory.clone()
    }
}

/// Events whose timestamp falls on the current local calendar day
pub fn today_events(memory: &Memory) -> Vec<&Event> {
    let today = Local::now().date_naive();
    memory
        .recent_events
        .iter()
        .filter(|e| e.local_day() == today)
        .collect()
}

/// Events of a given wire name (e.g. `"task:completed"`)
pub fn events_of_type<'a>(memory: &'a Memory, name: &str) -> Vec<&'a Event> {
    memory
        .recent_events
        .iter()
        .filter(|e| e.kind.name() == name)
        .collect()
}

/// Events observed within the last `hours` hours
pub fn events_within_hours(memory: &Memory, hours: i64) -> Vec<&Event> {
    let cutoff = Utc::now().timestamp_millis() - hours * 3600 * 1000;
    memory
        .recent_events
        .iter()
        .filter(|e| e.timestamp > cutoff)
        .collect()
}

/// Replace the cached pattern snapshot with a freshly computed one
pub fn update_patterns(memory: &Memory, patterns: UserPatterns) -> Memory {
    Memory {
        patterns: PatternsSnapshot {
            patterns,
            computed_at_event_count: memory.recent_events.len(),
        },
        last_full_analysis: Utc::now().timestamp_millis(),
        ..memory.clone()
    }
}

/// Record today's wellbeing score, replacing any earlier entry for today
///
/// Keeps at most [`SCORE_HISTORY_DAYS`] entries.
pub fn record_score(memory: &Memory, score: u32) -> Memory {
    let today = Local::now().date_naive();
    let mut history: Vec<ScoreEntry> = memory
        .score_history
        .iter()
        .filter(|s| s.date != today)
        .copied()
        .collect();
    history.push(ScoreEntry { date: today, score });
    if history.len() > SCORE_HISTORY_DAYS {
        let excess = history.len() - SCORE_HISTORY_DAYS;
        history.drain(..excess);
    }

    Memory {
        score_history: history,
        ..memory.clone()
    }
}

/// Remember that the user dismissed a suggestion
///
/// Idempotent; keeps at most [`MAX_DISMISSED`] ids.
pub fn dismiss_suggestion(memory: &Memory, suggestion_id: &str) -> Memory {
    if memory
        .dismissed_suggestions
        .iter()
        .any(|id| id == suggestion_id)
    {
        return memory.clone();
    }

    let mut dismissed = memory.dismissed_suggestions.clone();
    dismissed.push(suggestion_id.to_string());
    if dismissed.len() > MAX_DISMISSED {
        let excess = dismissed.len() - MAX_DISMISSED;
        dismissed.drain(..excess);
    }

    Memory {
        dismissed_suggestions: dismissed,
        ..memory.clone()
    }
}

/// Load the aggregate from a store
///
/// Missing key, unparseable payload, and version mismatches all degrade to a
/// usable value instead of an error: worst case the insights start fresh this
/// session. Freshly loaded memory is pruned to [`RETENTION_DAYS`] and clamped
/// to capacity.
pub fn load_memory(store: &dyn MemoryStore) -> Memory {
    let Some(raw) = store.get(MEMORY_KEY) else {
        return Memory::default();
    };

    let mut memory: Memory = match serde_json::from_str(&raw) {
        Ok(memory) => memory,
        Err(e) => {
            tracing::warn!(error = %e, "Stored memory is unreadable, starting fresh");
            return Memory::default();
        }
    };

    if memory.version != MEMORY_VERSION {
        tracing::warn!(
            stored = memory.version,
            current = MEMORY_VERSION,
            "Memory format version changed, keeping events and resetting derived state"
        );
        memory = Memory {
            recent_events: memory.recent_events,
            ..Memory::default()
        };
    }

    let cutoff = Utc::now().timestamp_millis() - RETENTION_DAYS * 24 * 3600 * 1000;
    memory.recent_events.retain(|e| e.timestamp > cutoff);
    if memory.recent_events.len() > MAX_RECENT_EVENTS {
        let excess = memory.recent_events.len() - MAX_RECENT_EVENTS;
        memory.recent_events.drain(..excess);
    }

    memory
}

/// Persist the aggregate to a store, best-effort
///
/// Serialization or write failures are logged and swallowed: persistence is a
/// side concern and must never take the engine down with it.
pub fn save_memory(store: &dyn MemoryStore, memory: &Memory) {
    let payload = match serde_json::to_string(memory) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize memory, skipping save");
            return;
        }
    };

    if let Err(e) = store.set(MEMORY_KEY, &payload) {
        tracing::warn!(error = %e, "Failed to persist memory, continuing in-memory only");
    }
}

/// Reset persisted state to an empty aggregate and return it
pub fn reset_memory(store: &dyn MemoryStore) -> Memory {
    let fresh = Memory::default();
    save_memory(store, &fresh);
    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    fn mood_event(ts: i64, mood: f64) -> Event {
        Event::with_timestamp(EventKind::MoodSet { mood }, ts)
    }

    #[test]
    fn test_add_event_appends_in_order() {
        let mut memory = Memory::default();
        for i in 0..5 {
            memory = add_event(&memory, mood_event(1000 + i, 5.0));
        }

        assert_eq!(memory.recent_events.len(), 5);
        let timestamps: Vec<i64> = memory.recent_events.iter().map(|e| e.timestamp).collect();
        assert_eq!(timestamps, vec![1000, 1001, 1002, 1003, 1004]);
    }

    #[test]
    fn test_add_event_evicts_oldest_past_capacity() {
        let mut memory = Memory::default();
        let total = MAX_RECENT_EVENTS + 23;
        for i in 0..total {
            memory = add_event(&memory, mood_event(i as i64, 5.0));
        }

        assert_eq!(memory.recent_events.len(), MAX_RECENT_EVENTS);
        // The survivors are exactly the most recent ones, still in order
        assert_eq!(memory.recent_events[0].timestamp, 23);
        assert_eq!(
            memory.recent_events.last().map(|e| e.timestamp),
            Some(total as i64 - 1)
        );
    }

    #[test]
    fn test_add_event_does_not_mutate_input() {
        let mut base = Memory::default();
        for i in 0..3 {
            base = add_event(&base, mood_event(i, 5.0));
        }
        let before = base.clone();

        let updated = add_event(&base, mood_event(99, 7.0));

        assert_eq!(base, before);
        assert_eq!(updated.recent_events.len(), 4);
        assert_eq!(updated.patterns, base.patterns);
    }

    #[test]
    fn test_today_events_filters_by_local_day() {
        let now = Utc::now().timestamp_millis();
        let mut memory = Memory::default();
        memory = add_event(&memory, mood_event(now - 48 * 3600 * 1000, 4.0));
        memory = add_event(&memory, mood_event(now, 8.0));

        let today = today_events(&memory);
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].timestamp, now);
    }

    #[test]
    fn test_events_of_type() {
        let now = Utc::now().timestamp_millis();
        let mut memory = Memory::default();
        memory = add_event(&memory, mood_event(now, 6.0));
        memory = add_event(
            &memory,
            Event::with_timestamp(EventKind::AppOpened, now + 1),
        );

        assert_eq!(events_of_type(&memory, "mood:set").len(), 1);
        assert_eq!(events_of_type(&memory, "app:opened").len(), 1);
        assert_eq!(events_of_type(&memory, "task:completed").len(), 0);
    }

    #[test]
    fn test_events_within_hours() {
        let now = Utc::now().timestamp_millis();
        let mut memory = Memory::default();
        memory = add_event(&memory, mood_event(now - 5 * 3600 * 1000, 4.0));
        memory = add_event(&memory, mood_event(now - 30 * 60 * 1000, 8.0));

        assert_eq!(events_within_hours(&memory, 1).len(), 1);
        assert_eq!(events_within_hours(&memory, 6).len(), 2);
    }

    #[test]
    fn test_record_score_dedupes_today_and_caps_history() {
        let mut memory = Memory::default();
        memory = record_score(&memory, 40);
        memory = record_score(&memory, 55);

        assert_eq!(memory.score_history.len(), 1);
        assert_eq!(memory.score_history[0].score, 55);

        // Backfill synthetic history well past the cap
        let today = Local::now().date_naive();
        memory.score_history = (1..=40i64)
            .map(|i| ScoreEntry {
                date: today - chrono::Duration::days(41 - i),
                score: 50,
            })
            .collect();
        let memory = record_score(&memory, 70);

        assert_eq!(memory.score_history.len(), SCORE_HISTORY_DAYS);
        assert_eq!(memory.score_history.last().map(|s| s.score), Some(70));
    }

    #[test]
    fn test_dismiss_suggestion_is_idempotent() {
        let memory = Memory::default();
        let memory = dismiss_suggestion(&memory, "journal-evening");
        let memory = dismiss_suggestion(&memory, "journal-evening");

        assert_eq!(memory.dismissed_suggestions, vec!["journal-evening"]);
    }

    #[test]
    fn test_load_missing_key_returns_default() {
        let store = InMemoryStore::new();
        let memory = load_memory(&store);
        assert_eq!(memory, Memory::default());
    }

    #[test]
    fn test_load_corrupt_payload_returns_default() {
        let store = InMemoryStore::new();
        store.set(MEMORY_KEY, "not json at all {{{").unwrap();

        let memory = load_memory(&store);
        assert_eq!(memory, Memory::default());
    }

    #[test]
    fn test_load_version_mismatch_keeps_events() {
        let store = InMemoryStore::new();
        let now = Utc::now().timestamp_millis();
        let mut stale = add_event(&Memory::default(), mood_event(now, 6.0));
        stale = record_score(&stale, 80);
        stale.version = MEMORY_VERSION + 1;
        save_memory(&store, &stale);

        let loaded = load_memory(&store);
        assert_eq!(loaded.version, MEMORY_VERSION);
        assert_eq!(loaded.recent_events.len(), 1);
        assert!(loaded.score_history.is_empty());
    }

    #[test]
    fn test_load_prunes_expired_events() {
        let store = InMemoryStore::new();
        let now = Utc::now().timestamp_millis();
        let mut memory = Memory::default();
        memory = add_event(&memory, mood_event(now - 8 * 24 * 3600 * 1000, 3.0));
        memory = add_event(&memory, mood_event(now - 3600 * 1000, 7.0));
        save_memory(&store, &memory);

        let loaded = load_memory(&store);
        assert_eq!(loaded.recent_events.len(), 1);
        assert_eq!(loaded.recent_events[0].kind.mood_sample(), Some(7.0));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let store = InMemoryStore::new();
        let now = Utc::now().timestamp_millis();
        let mut memory = Memory::default();
        memory = add_event(
            &memory,
            Event::with_timestamp(
                EventKind::TaskCompleted {
                    id: "t1".into(),
                    title: "write report".into(),
                    duration_minutes: Some(40),
                },
                now,
            ),
        );
        memory = dismiss_suggestion(&memory, "habit-forgiveness");
        save_memory(&store, &memory);

        let loaded = load_memory(&store);
        assert_eq!(loaded.recent_events, memory.recent_events);
        assert_eq!(loaded.dismissed_suggestions, memory.dismissed_suggestions);
    }

    #[test]
    fn test_reset_memory_clears_store() {
        let store = InMemoryStore::new();
        let memory = add_event(
            &Memory::default(),
            mood_event(Utc::now().timestamp_millis(), 5.0),
        );
        save_memory(&store, &memory);

        let fresh = reset_memory(&store);
        assert!(fresh.recent_events.is_empty());
        assert_eq!(load_memory(&store), Memory::default());
    }
}
