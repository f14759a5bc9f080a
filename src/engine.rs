//! Insight engine orchestration
//!
//! Ties the pieces together around one shared [`Observer`]:
//! - `analyze` runs the full pipeline: derive patterns, refresh the cached
//!   snapshot, score wellbeing, record today's score, persist
//! - `start_background_analysis` repeats that on a timer
//! - read accessors serve the latest patterns, wellbeing, quick stats and
//!   suggestions to whoever displays them (pull-based; the engine pushes
//!   nothing)

use crate::analyzer::{self, QuickStats, UserPatterns};
use crate::config::{EngineConfig, Thresholds};
use crate::guide::{self, ContextualSuggestions};
use crate::memory::{self, Memory};
use crate::observer::Observer;
use crate::wellbeing::{wellbeing_score, WellbeingScore};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// The top-level insight engine
pub struct InsightEngine {
    observer: Arc<Observer>,
    engine_config: EngineConfig,
    thresholds: Thresholds,
}

impl InsightEngine {
    /// Build an engine around an existing observer
    pub fn new(observer: Arc<Observer>, engine_config: EngineConfig, thresholds: Thresholds) -> Self {
        Self {
            observer,
            engine_config,
            thresholds,
        }
    }

    /// The shared observer; hand this to whatever emits events
    pub fn observer(&self) -> Arc<Observer> {
        Arc::clone(&self.observer)
    }

    /// Current snapshot of the memory aggregate
    pub fn memory(&self) -> Memory {
        self.observer.memory()
    }

    /// Latest patterns, recomputing only when the cached snapshot is stale
    pub fn patterns(&self) -> UserPatterns {
        let snapshot = self.observer.memory();
        let cache_ms = self.engine_config.patterns_cache_secs as i64 * 1000;
        let age = Utc::now().timestamp_millis() - snapshot.last_full_analysis;

        if snapshot.last_full_analysis > 0 && age < cache_ms {
            return snapshot.patterns.patterns.clone();
        }
        analyzer::analyze_patterns(&snapshot)
    }

    /// Current wellbeing assessment
    pub fn wellbeing(&self) -> WellbeingScore {
        let snapshot = self.observer.memory();
        let patterns = self.patterns();
        wellbeing_score(&snapshot, &patterns)
    }

    /// Cheap same-day stats
    pub fn quick_stats(&self) -> QuickStats {
        analyzer::quick_analyze(&self.observer.memory())
    }

    /// Suggestions for the current moment
    pub fn suggestions(&self) -> ContextualSuggestions {
        let snapshot = self.observer.memory();
        let patterns = self.patterns();
        guide::generate_suggestions(&snapshot, &patterns, &self.thresholds)
    }

    /// Mark a suggestion as dismissed and persist the choice
    pub fn dismiss_suggestion(&self, suggestion_id: &str) {
        self.observer
            .apply(|m| memory::dismiss_suggestion(m, suggestion_id));
        self.observer.flush();
    }

    /// Run a full analysis pass and persist the result
    ///
    /// Recomputes patterns from the log, refreshes the cached snapshot,
    /// scores the day and records it in the history.
    pub fn analyze(&self) -> WellbeingScore {
        let snapshot = self.observer.memory();
        let patterns = analyzer::analyze_patterns(&snapshot);
        let score = wellbeing_score(&snapshot, &patterns);

        self.observer.apply(|m| {
            let updated = memory::update_patterns(m, patterns.clone());
            memory::record_score(&updated, score.overall)
        });
        self.observer.flush();

        tracing::info!(
            overall = score.overall,
            trend = %score.trend,
            events = snapshot.recent_events.len(),
            "Analysis complete"
        );

        score
    }

    /// Spawn the periodic analysis task
    ///
    /// Runs [`InsightEngine::analyze`] every `analyze_interval_secs`. The
    /// first immediate tick is skipped; abort the returned handle to stop.
    pub fn start_background_analysis(self: Arc<Self>) -> JoinHandle<()> {
        let engine = self;
        let interval = Duration::from_secs(engine.engine_config.analyze_interval_secs);

        tracing::info!(
            interval_secs = engine.engine_config.analyze_interval_secs,
            "Starting background analysis"
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            // Skip the first immediate tick
            ticker.tick().await;

            loop {
                ticker.tick().await;
                tracing::debug!("Running scheduled analysis");
                engine.analyze();
            }
        })
    }

    /// Record the app closing and persist everything still pending
    pub fn shutdown(&self) {
        self.observer.app_closed();
        self.observer.flush();
        tracing::info!("Insight engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EventKind};
    use crate::memory::{add_event, save_memory, InMemoryStore};

    const HOUR: i64 = 3600 * 1000;
    const DAY: i64 = 24 * HOUR;

    fn engine_with_memory(memory: &Memory) -> (Arc<InsightEngine>, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        save_memory(store.as_ref(), memory);
        let observer = Arc::new(Observer::new(store.clone() as Arc<dyn memory::MemoryStore>));
        let engine = Arc::new(InsightEngine::new(
            observer,
            EngineConfig::default(),
            Thresholds::default(),
        ));
        (engine, store)
    }

    /// Millisecond timestamp of noon (local time) today; anchoring synthetic
    /// days here keeps hour-offset events inside one calendar day
    fn local_noon_today() -> i64 {
        use chrono::{Local, TimeZone};
        let naive = Local::now()
            .date_naive()
            .and_hms_opt(12, 0, 0)
            .expect("noon is a valid time");
        Local
            .from_local_datetime(&naive)
            .earliest()
            .expect("noon resolves in every timezone")
            .timestamp_millis()
    }

    /// Five days of rising mood with a matching rise in completed tasks
    fn trending_memory() -> Memory {
        let noon = local_noon_today();
        let mut memory = Memory::default();
        for day in 0..5i64 {
            let base = noon - (4 - day) * DAY;
            let mood = 4.0 + day as f64 * 1.25;
            memory = add_event(
                &memory,
                Event::with_timestamp(EventKind::MoodSet { mood }, base),
            );
            memory = add_event(
                &memory,
                Event::with_timestamp(EventKind::MoodSet { mood: mood + 0.25 }, base + HOUR),
            );
            for t in 0..=day {
                memory = add_event(
                    &memory,
                    Event::with_timestamp(
                        EventKind::TaskCompleted {
                            id: format!("d{day}t{t}"),
                            title: "task".into(),
                            duration_minutes: Some(30),
                        },
                        base + 2 * HOUR + t,
                    ),
                );
            }
        }
        memory
    }

    #[tokio::test]
    async fn test_analyze_pipeline_end_to_end() {
        let (engine, _store) = engine_with_memory(&trending_memory());

        let score = engine.analyze();
        let memory = engine.memory();

        // Patterns were derived and cached with their input size
        let patterns = &memory.patterns.patterns;
        assert_eq!(
            memory.patterns.computed_at_event_count,
            memory.recent_events.len()
        );
        // 15 completions across 5 observed days
        assert_eq!(patterns.avg_tasks_per_day, 3.0);
        // Mood mean of 4.0..9.25 in 0.625 steps, rounded to 1 decimal
        assert_eq!(patterns.avg_mood, 6.6);
        // Mood and task count rise together
        assert!(
            patterns.correlations.mood_productivity > 0.9,
            "expected strong positive correlation, got {}",
            patterns.correlations.mood_productivity
        );

        // The day's score landed in the history
        assert_eq!(memory.score_history.len(), 1);
        assert_eq!(memory.score_history[0].score, score.overall);
        assert!(score.overall <= 100);
    }

    #[tokio::test]
    async fn test_analyze_persists_through_the_store() {
        let (engine, store) = engine_with_memory(&trending_memory());
        engine.analyze();

        // A fresh observer over the same store sees the derived state
        let reloaded = Observer::new(store as Arc<dyn memory::MemoryStore>);
        let memory = reloaded.memory();
        assert!(!memory.score_history.is_empty());
        assert!(memory.patterns.computed_at_event_count > 0);
    }

    #[tokio::test]
    async fn test_patterns_cache_is_respected() {
        let (engine, _store) = engine_with_memory(&trending_memory());
        engine.analyze();

        // Add events that would change the derivation; within the cache
        // window the snapshot still wins
        let observer = engine.observer();
        for _ in 0..5 {
            observer.mood_set(1.0);
        }

        let cached = engine.patterns();
        assert_eq!(cached, engine.memory().patterns.patterns);
    }

    #[tokio::test]
    async fn test_cold_start_analysis_keeps_defaults() {
        let (engine, _store) = engine_with_memory(&Memory::default());

        let observer = engine.observer();
        observer.app_opened();
        observer.mood_set(9.0);

        // Two events: below the gate, patterns stay at their defaults
        engine.analyze();
        assert_eq!(engine.memory().patterns.patterns, UserPatterns::default());
    }

    #[tokio::test]
    async fn test_dismiss_suggestion_round_trips() {
        let (engine, store) = engine_with_memory(&Memory::default());
        engine.dismiss_suggestion("journal-evening");

        let reloaded = Observer::new(store as Arc<dyn memory::MemoryStore>);
        assert_eq!(
            reloaded.memory().dismissed_suggestions,
            vec!["journal-evening"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_analysis_runs_on_interval() {
        let (engine, _store) = engine_with_memory(&trending_memory());
        let handle = engine.clone().start_background_analysis();

        tokio::time::sleep(Duration::from_secs(301)).await;
        handle.abort();

        let memory = engine.memory();
        assert!(
            memory.patterns.computed_at_event_count > 0,
            "scheduled analysis should have refreshed the snapshot"
        );
    }
}
