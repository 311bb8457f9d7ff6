use std::path::PathBuf;

use clap::Parser;

use trix_bench::config::BenchmarkConfig;
use trix_bench::logging::open_decision_log;
use trix_bench::runner::MatchRunner;

/// Plays seeded Trix matches between heuristic bots and summarises the results.
#[derive(Debug, Parser)]
#[command(name = "trix-bench", version)]
struct Cli {
    /// YAML run description.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Replace `run_id`, which also renames the run directory.
    #[arg(long)]
    run_id: Option<String>,

    /// Replace `schedule.matches`.
    #[arg(long)]
    matches: Option<usize>,

    /// Replace `schedule.seed`.
    #[arg(long)]
    seed: Option<u64>,

    /// Replace `schedule.seat_orders`.
    #[arg(long)]
    seat_orders: Option<usize>,

    /// Validate and print the lineup without playing.
    #[arg(long)]
    check: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut BenchmarkConfig) {
        if let Some(run_id) = &self.run_id {
            config.run_id = run_id.clone();
        }
        if let Some(matches) = self.matches {
            config.schedule.matches = matches;
        }
        if let Some(seed) = self.seed {
            config.schedule.seed = seed;
        }
        if let Some(seat_orders) = self.seat_orders {
            config.schedule.seat_orders = seat_orders;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let lineup: Vec<String> = config
        .lineup
        .iter()
        .map(|entry| format!("{} ({})", entry.name, entry.tier))
        .collect();
    println!(
        "Run '{}': {:?} mode, {} matches x {} seat orders, baseline {}",
        config.run_id,
        config.game.mode,
        config.schedule.matches,
        config.schedule.seat_orders,
        config.baseline(),
    );
    println!("Lineup: {}", lineup.join(", "));

    if cli.check {
        println!("Check passed; nothing played.");
        return Ok(());
    }

    let decision_log = open_decision_log(&config.decision_log, &config.run_paths())?;
    let summary = MatchRunner::new(config)?.run()?;

    println!(
        "Wrote {} rows for {} matches x {} seat orders to {}",
        summary.rows_written,
        summary.matches_played,
        summary.seat_orders,
        summary.jsonl_path.display()
    );
    println!("Summary: {}", summary.summary_path.display());
    if let Some(log) = &decision_log {
        println!("Decisions: {}", log.path.display());
    }

    Ok(())
}
