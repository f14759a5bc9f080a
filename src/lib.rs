//! # Reverie
//!
//! Behavioral insight engine - observes what the user does, remembers it in a
//! bounded event log, and derives patterns and a daily wellbeing score from
//! the log.
//!
//! ## Features
//!
//! - **Append-only memory**: capacity-bounded event log with best-effort
//!   persistence that never takes the app down
//! - **Debounced writes**: bursts of activity collapse into a single save
//! - **Pure analysis**: patterns are recomputable from the log at any time
//! - **Wellbeing score**: a 0-100 composite with a weekly trend
//! - **Gentle guidance**: rule-based, dismissible suggestions
//!
//! ## Modules
//!
//! - [`event`]: event types and day bucketing
//! - [`memory`]: the durable aggregate and its persistence
//! - [`observer`]: the write-side API
//! - [`analyzer`]: pattern derivation
//! - [`wellbeing`]: the composite score
//! - [`guide`]: suggestions
//! - [`engine`]: orchestration and the periodic analysis loop
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reverie::{Config, FileStore, InsightEngine, Observer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load_default();
//!     let store = Arc::new(FileStore::new(&config.memory.data_dir));
//!     let observer = Arc::new(Observer::new(store));
//!     let engine = Arc::new(InsightEngine::new(
//!         observer.clone(),
//!         config.engine,
//!         config.thresholds,
//!     ));
//!
//!     observer.app_opened();
//!     observer.task_completed("t1", "write the weekly review", Some(25));
//!     observer.mood_set(7.5);
//!
//!     let stats = engine.quick_stats();
//!     println!("{} tasks done today", stats.today_task_count);
//!
//!     engine.shutdown();
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod engine;
pub mod event;
pub mod guide;
pub mod memory;
pub mod observer;
pub mod wellbeing;

// Re-export top-level types for convenience
pub use event::{local_day, Event, EventContext, EventKind, DEFAULT_FOCUS_MINUTES};

pub use memory::{
    add_event, dismiss_suggestion, load_memory, record_score, reset_memory, save_memory,
    today_events, update_patterns, FileStore, InMemoryStore, Memory, MemoryStore,
    PatternsSnapshot, ScoreEntry, StoreError, MAX_RECENT_EVENTS, MEMORY_KEY,
};

pub use observer::Observer;

pub use analyzer::{
    analyze_patterns, pearson_correlation, quick_analyze, Correlations, QuickStats, UserPatterns,
    MIN_CORRELATION_DAYS, MIN_EVENTS_FOR_ANALYSIS,
};

pub use wellbeing::{score_description, wellbeing_score, ScoreBreakdown, Trend, WellbeingScore};

pub use guide::{
    evening_message, generate_suggestions, welcome_message, ContextualSuggestions, Suggestion,
    SuggestionCategory, Tone,
};

pub use engine::InsightEngine;

pub use config::{Config, ConfigError, EngineConfig, LoggingConfig, MemoryConfig, Thresholds};
