//! Reverie demo runner
//!
//! Seeds a few days of sample activity, runs a full analysis, and logs the
//! derived patterns, wellbeing score and suggestions.

use reverie::{Config, FileStore, InsightEngine, Observer};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "reverie=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Reverie Insight Engine v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load_default();
    tracing::info!("Data directory: {}", config.memory.data_dir);

    let store = Arc::new(FileStore::new(&config.memory.data_dir));
    let observer = Arc::new(Observer::with_debounce(
        store,
        std::time::Duration::from_millis(config.memory.debounce_ms),
    ));
    let engine = Arc::new(InsightEngine::new(
        observer.clone(),
        config.engine,
        config.thresholds,
    ));

    observer.app_opened();
    tracing::info!(
        "{}",
        reverie::welcome_message(&engine.patterns(), chrono::Local::now())
    );

    // Demo: record a plausible day of activity
    demo_observe(&observer);

    // Demo: derive and report
    demo_report(&engine);

    let analysis_handle = engine.clone().start_background_analysis();

    // Run until interrupted
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down...");
    analysis_handle.abort();
    engine.shutdown();

    Ok(())
}

/// Record a demo day: tasks, focus sessions, mood, habits, meals
fn demo_observe(observer: &Observer) {
    tracing::info!("Recording demo activity...");

    observer.task_created("t1", "Plan the week", "work", "high");
    observer.task_created("t2", "Reply to email backlog", "work", "low");
    observer.task_completed("t1", "Plan the week", Some(20));

    observer.pomodoro_started(Some("t2"), 25);
    observer.pomodoro_completed(Some("t2"), Some(25), Some(27));
    observer.task_completed("t2", "Reply to email backlog", Some(27));

    // Mood drifts through the day
    for hour in 0..4 {
        let mood = 5.5 + 1.5 * ((hour as f64) * std::f64::consts::PI / 6.0).sin() + rand_simple();
        observer.mood_set(mood.clamp(1.0, 10.0));
    }

    observer.meal_added(520, "lunch");
    observer.water_added(250);
    observer.habit_checked("h1", "morning stretch");
    observer.habit_checked("h2", "read 20 pages");
    observer.journal_written(Some(7.0), true);

    observer.flush();
    tracing::info!("Demo activity recorded");
}

/// Derive patterns and log the resulting insight
fn demo_report(engine: &InsightEngine) {
    let score = engine.analyze();
    let patterns = engine.patterns();
    let stats = engine.quick_stats();

    tracing::info!(
        tasks_per_day = patterns.avg_tasks_per_day,
        focus_minutes = patterns.avg_focus_duration,
        completion_rate = patterns.task_completion_rate,
        avg_mood = patterns.avg_mood,
        "Derived patterns"
    );

    tracing::info!(
        overall = score.overall,
        productivity = score.breakdown.productivity,
        health = score.breakdown.health,
        mental = score.breakdown.mental,
        consistency = score.breakdown.consistency,
        trend = %score.trend,
        "Wellbeing: {}",
        reverie::score_description(score.overall)
    );

    tracing::info!(
        today_tasks = stats.today_task_count,
        focus_minutes = stats.focus_minutes,
        last_mood = ?stats.last_mood,
        "Today so far"
    );

    let suggestions = engine.suggestions();
    if let Some(suggestion) = &suggestions.now {
        tracing::info!(id = %suggestion.id, "Suggestion: {}", suggestion.message);
    }
    for achievement in &suggestions.achievements {
        tracing::info!(id = %achievement.id, "Achievement: {}", achievement.message);
    }
}

/// Simple random number generator (0.0 to 1.0)
fn rand_simple() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    (nanos % 1000) as f64 / 1000.0
}
