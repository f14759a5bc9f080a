//! Reverie CLI
//!
//! Command-line interface over the locally stored behavioral memory:
//! - Inspect today's stats and the wellbeing score
//! - Force a full analysis
//! - List recent events
//! - Reset the memory
//! - Generate a default config file

use chrono::{Local, TimeZone, Utc};
use clap::{Parser, Subcommand};
use reverie::{
    analyze_patterns, load_memory, quick_analyze, reset_memory, save_memory, score_description,
    update_patterns, wellbeing_score, Config, FileStore,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reverie")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Behavioral insight engine for personal activity tracking")]
#[command(
    long_about = "Reverie observes what you do, remembers it in a bounded event log,\nand derives behavioral patterns and a daily wellbeing score."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: from config)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show today's stats and the current wellbeing score
    Status,

    /// Run a full pattern analysis and persist the result
    Analyze,

    /// List recent events
    Events {
        /// Maximum number of events to show (most recent first)
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Erase the stored memory and start fresh
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Generate a default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load_default();
    let data_dir = cli.data_dir.unwrap_or(config.memory.data_dir);
    let store = FileStore::new(&data_dir);

    match cli.command {
        Commands::Status => {
            let memory = load_memory(&store);
            let stats = quick_analyze(&memory);
            let patterns = analyze_patterns(&memory);
            let score = wellbeing_score(&memory, &patterns);

            println!("Today");
            println!("  tasks completed : {}", stats.today_task_count);
            println!("  focus minutes   : {}", stats.focus_minutes);
            match stats.last_mood {
                Some(mood) => println!("  last mood       : {mood:.1}"),
                None => println!("  last mood       : -"),
            }

            println!("\nPatterns ({} events retained)", memory.recent_events.len());
            println!("  tasks/day       : {:.1}", patterns.avg_tasks_per_day);
            println!("  focus duration  : {:.0} min", patterns.avg_focus_duration);
            println!("  completion rate : {:.0}%", patterns.task_completion_rate * 100.0);
            println!("  avg mood        : {:.1}", patterns.avg_mood);
            println!("  journal days    : {}/7", patterns.journal_frequency);
            println!(
                "  habit rate      : {:.0}%",
                patterns.habit_completion_rate * 100.0
            );
            println!(
                "  mood <-> tasks  : {:+.2}",
                patterns.correlations.mood_productivity
            );

            println!(
                "\nWellbeing: {}/100 ({}, {}%)",
                score.overall, score.trend, score.trend_percent
            );
            println!(
                "  productivity {}  health {}  mental {}  consistency {}",
                score.breakdown.productivity,
                score.breakdown.health,
                score.breakdown.mental,
                score.breakdown.consistency
            );
            println!("  {}", score_description(score.overall));
        }

        Commands::Analyze => {
            let memory = load_memory(&store);
            let patterns = analyze_patterns(&memory);
            let score = wellbeing_score(&memory, &patterns);
            let updated = update_patterns(&memory, patterns);
            let updated = reverie::record_score(&updated, score.overall);
            save_memory(&store, &updated);

            println!(
                "Analyzed {} events: wellbeing {}/100 ({})",
                updated.recent_events.len(),
                score.overall,
                score.trend
            );
        }

        Commands::Events { limit } => {
            let memory = load_memory(&store);
            if memory.recent_events.is_empty() {
                println!("No events recorded yet.");
                return Ok(());
            }

            for event in memory.recent_events.iter().rev().take(limit) {
                let when = Utc
                    .timestamp_millis_opt(event.timestamp)
                    .single()
                    .map(|dt| {
                        dt.with_timezone(&Local)
                            .format("%Y-%m-%d %H:%M:%S")
                            .to_string()
                    })
                    .unwrap_or_else(|| format!("@{}", event.timestamp));
                println!("{when}  {}", event.kind.name());
            }
        }

        Commands::Reset { yes } => {
            if !yes {
                println!("This erases the stored behavioral memory. Re-run with --yes to confirm.");
                return Ok(());
            }
            reset_memory(&store);
            println!("Memory reset.");
        }

        Commands::Config { output } => {
            let content = reverie::config::generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Wrote default config to {}", path.display());
                }
                None => print!("{content}"),
            }
        }
    }

    Ok(())
}
