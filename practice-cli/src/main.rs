use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use practice_cli::drill::run_drill;
use practice_cli::{JsonFileStore, PracticeOptions};
use practice_engine::{DailySimulation, MemoryStore, SeededLearner, Session, SessionEvent};

/// Vocabulary practice with spaced repetition
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Practice interactively, saving progress back to the records file
    Practice {
        /// JSON file holding word and verb records
        store: PathBuf,

        #[command(flatten)]
        options: PracticeOptions,
    },
    /// Simulate days of practice without touching the records file
    Simulate {
        /// JSON file holding word and verb records
        store: PathBuf,

        #[command(flatten)]
        options: PracticeOptions,

        /// Number of days to simulate
        #[arg(long, default_value_t = 14)]
        days: u32,

        /// Answers per simulated day
        #[arg(long, default_value_t = 20)]
        per_day: u32,

        /// Seed for item selection and the simulated learner
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    match args.command {
        Command::Practice { store, options } => practice(store, options).await,
        Command::Simulate {
            store,
            options,
            days,
            per_day,
            seed,
        } => simulate(store, options, days, per_day, seed).await,
    }
}

async fn practice(path: PathBuf, options: PracticeOptions) -> Result<()> {
    let rules = options.load_rules().await?;
    let mut session = Session::new(JsonFileStore::new(&path)).with_rules(rules);
    session.start(options.filters()).await;

    for event in session.drain_events() {
        if let SessionEvent::FetchFailed { error } = event {
            anyhow::bail!("Could not load {}: {error}", path.display());
        }
    }
    println!("{} items to practice", session.total_items());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_drill(&mut session, stdin, &mut stdout).await?;

    let unsaved = session.flush_pending().await;
    if !unsaved.is_empty() {
        eprintln!(
            "Warning: progress for {} items could not be saved to {}",
            unsaved.len(),
            path.display()
        );
    }
    Ok(())
}

async fn simulate(
    path: PathBuf,
    options: PracticeOptions,
    days: u32,
    per_day: u32,
    seed: u64,
) -> Result<()> {
    let rules = options.load_rules().await?;
    let records = JsonFileStore::new(&path)
        .load()
        .await
        .with_context(|| format!("Failed to load {}", path.display()))?;
    println!("Simulating {days} days of {per_day} answers over {} records", records.len());

    let mut sim = DailySimulation::new(
        MemoryStore::new(records),
        rules,
        SeededLearner::new(seed),
        Utc::now(),
        seed,
        per_day,
    );
    let filters = options.filters();

    println!("day  answered  accuracy  L0  L1  L2  L3  L4");
    for _ in 0..days {
        let day = sim.next_day(&filters).await;
        let [l0, l1, l2, l3, l4] = day.level_counts;
        println!(
            "{:>3}  {:>8}  {:>7}%  {l0:>2}  {l1:>2}  {l2:>2}  {l3:>2}  {l4:>2}",
            day.day,
            day.answered,
            day.accuracy_percent()
        );
    }
    Ok(())
}
