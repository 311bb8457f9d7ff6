use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::{DecisionLogConfig, RunPaths};

/// Crates whose events belong in the decision log.
const LOGGED_TARGETS: [&str; 3] = ["trix_bench", "trix_bot", "trix_core"];

/// Flushes the decision log when dropped; hold it until the run finishes.
pub struct DecisionLog {
    pub path: PathBuf,
    _flush: WorkerGuard,
}

/// Routes bench, bot and engine events into `decisions.jsonl` as JSON lines.
/// `RUST_LOG` wins over the configured level when set.
pub fn open_decision_log(
    config: &DecisionLogConfig,
    paths: &RunPaths,
) -> Result<Option<DecisionLog>> {
    if !config.enabled {
        return Ok(None);
    }

    fs::create_dir_all(&paths.dir)
        .with_context(|| format!("creating run directory {}", paths.dir.display()))?;
    let file = File::create(&paths.decisions)
        .with_context(|| format!("creating decision log {}", paths.decisions.display()))?;
    let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config));
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // Only the first run in a process gets to install the subscriber.
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!(target: "trix_bench::logging", "subscriber already installed");
    }

    Ok(Some(DecisionLog {
        path: paths.decisions.clone(),
        _flush: guard,
    }))
}

/// Everything outside the trix crates stays quiet.
fn default_filter(config: &DecisionLogConfig) -> EnvFilter {
    EnvFilter::new(filter_directives(config))
}

fn filter_directives(config: &DecisionLogConfig) -> String {
    let level = config.level().as_str().to_ascii_lowercase();
    let mut directives = vec!["off".to_string()];
    directives.extend(LOGGED_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}
