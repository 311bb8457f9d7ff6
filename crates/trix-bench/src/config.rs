use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;
use trix_bot::BotDifficulty;
use trix_core::game::MatchConfig;
use trix_core::model::seat::Seat;

use crate::runner::SeatOrders;

/// A whole match is 4 kingdoms of 5 deals; a few thousand actions is generous.
const DEFAULT_ACTION_BUDGET: usize = 5_000;

/// A bench run: which bots sit down, how many kingdoms-long matches they play,
/// and where the results go.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    /// Names the run directory under `output_dir`.
    pub run_id: String,
    pub schedule: Schedule,
    #[serde(default)]
    pub game: MatchConfig,
    /// North, East, South, West under the first seat order.
    pub lineup: [BotEntry; 4],
    /// Lineup name the other bots are compared against; the North bot if unset.
    #[serde(default)]
    pub baseline: Option<String>,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub decision_log: DecisionLogConfig,
}

impl BenchmarkConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: BenchmarkConfig =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Syntax {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// Checks everything serde cannot. Safe to call again after CLI overrides.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if !is_single_dir_name(&self.run_id) {
            return Err(ValidationError::RunId(self.run_id.clone()));
        }
        self.schedule.validate()?;

        let mut names = HashSet::new();
        for (seat, entry) in Seat::LOOP.into_iter().zip(&mut self.lineup) {
            entry.name = entry.name.trim().to_string();
            if entry.name.is_empty() {
                return Err(ValidationError::UnnamedBot { seat: seat.label() });
            }
            if !names.insert(entry.name.clone()) {
                return Err(ValidationError::DuplicateBot(entry.name.clone()));
            }
        }
        if let Some(baseline) = &self.baseline {
            if !names.contains(baseline) {
                return Err(ValidationError::UnknownBaseline(baseline.clone()));
            }
        }

        self.decision_log.validate()
    }

    pub fn baseline(&self) -> &str {
        self.baseline
            .as_deref()
            .unwrap_or(self.lineup[0].name.as_str())
    }

    pub fn run_paths(&self) -> RunPaths {
        RunPaths::new(&self.output_dir, &self.run_id)
    }
}

fn is_single_dir_name(raw: &str) -> bool {
    let mut parts = Path::new(raw).components();
    matches!(
        (parts.next(), parts.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// How many matches to play and under how many seat orders.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Schedule {
    /// Seeds the per-match deal generator; 0 when unset.
    #[serde(default)]
    pub seed: u64,
    pub matches: usize,
    #[serde(default = "one")]
    pub seat_orders: usize,
    #[serde(default = "default_action_budget")]
    pub max_actions: usize,
}

impl Schedule {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.matches == 0 {
            return Err(ValidationError::NoMatches);
        }
        if !(1..=SeatOrders::MAX).contains(&self.seat_orders) {
            return Err(ValidationError::SeatOrders {
                requested: self.seat_orders,
                max: SeatOrders::MAX,
            });
        }
        if self.max_actions == 0 {
            return Err(ValidationError::NoActionBudget);
        }
        Ok(())
    }
}

fn one() -> usize {
    1
}

fn default_action_budget() -> usize {
    DEFAULT_ACTION_BUDGET
}

/// One bot in the lineup.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BotEntry {
    pub name: String,
    #[serde(deserialize_with = "tier_from_str")]
    pub tier: BotDifficulty,
}

fn tier_from_str<'de, D>(deserializer: D) -> Result<BotDifficulty, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

/// JSON decision log written next to the match rows. Off unless enabled.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecisionLogConfig {
    pub enabled: bool,
    pub level: String,
}

impl Default for DecisionLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

impl DecisionLogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        Level::from_str(self.level.trim())
            .map(|_| ())
            .map_err(|_| ValidationError::LogLevel(self.level.clone()))
    }

    pub fn level(&self) -> Level {
        Level::from_str(self.level.trim()).unwrap_or(Level::INFO)
    }
}

/// Files one run produces, all inside `<output_dir>/<run_id>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub dir: PathBuf,
    pub matches: PathBuf,
    pub summary: PathBuf,
    pub decisions: PathBuf,
}

impl RunPaths {
    pub fn new(output_dir: &Path, run_id: &str) -> Self {
        let dir = output_dir.join(run_id);
        Self {
            matches: dir.join("matches.jsonl"),
            summary: dir.join("summary.md"),
            decisions: dir.join("decisions.jsonl"),
            dir,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot open bench config {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bench config {} is malformed: {source}", .path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("bench config {} rejected: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("run_id '{0}' must be a single directory name")]
    RunId(String),
    #[error("schedule.matches must be at least 1")]
    NoMatches,
    #[error("schedule.seat_orders must be between 1 and {max}, got {requested}")]
    SeatOrders { requested: usize, max: usize },
    #[error("schedule.max_actions must be at least 1")]
    NoActionBudget,
    #[error("lineup bot for {seat} has no name")]
    UnnamedBot { seat: &'static str },
    #[error("lineup name '{0}' is used twice")]
    DuplicateBot(String),
    #[error("baseline '{0}' is not in the lineup")]
    UnknownBaseline(String),
    #[error("decision_log.level '{0}' is not a tracing level")]
    LogLevel(String),
}
