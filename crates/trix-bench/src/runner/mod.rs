mod seating;

pub use seating::SeatOrders;

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use trix_bot::{BotDifficulty, HeuristicPolicy, Policy};
use trix_core::game::{Action, Event, MatchState, apply};
use trix_core::model::card::Card;
use trix_core::model::seat::Seat;

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{BenchmarkConfig, BotEntry, RunPaths};

/// Plays seeded matches between configured bots and records the results.
pub struct MatchRunner {
    config: BenchmarkConfig,
    paths: RunPaths,
    seat_orders: SeatOrders,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub matches_played: usize,
    pub seat_orders: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

impl MatchRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig) -> Result<Self, RunnerError> {
        let requested = config.schedule.seat_orders;
        if requested > SeatOrders::MAX {
            return Err(RunnerError::SeatOrderLimit {
                requested,
                max: SeatOrders::MAX,
            });
        }

        Ok(Self {
            seat_orders: SeatOrders::new(requested),
            logging_enabled: config.decision_log.enabled,
            paths: config.run_paths(),
            config,
        })
    }

    /// Play every match, streaming JSONL rows to disk, then write the summary.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        fs::create_dir_all(&self.paths.dir)?;
        let mut writer = BufWriter::new(File::create(&self.paths.matches)?);
        let orders = self.seat_orders.as_slice();
        let mut rng = StdRng::seed_from_u64(self.config.schedule.seed);
        let mut rows_written = 0usize;
        let mut analytics = AnalyticsCollector::new(&self.config)?;

        for match_index in 0..self.config.schedule.matches {
            let match_seed = rng.next_u64();

            for (order_index, order) in orders.iter().enumerate() {
                let outcome = self.play_match(match_index, order_index, match_seed, order)?;
                analytics.record_match(&outcome)?;
                rows_written += write_match_rows(&mut writer, &self.config, &outcome)?;
            }
        }

        writer.flush()?;

        let summary = analytics.finalize();
        summary.write_markdown(&self.paths.summary)?;

        Ok(RunSummary {
            matches_played: self.config.schedule.matches,
            seat_orders: orders.len(),
            rows_written,
            jsonl_path: self.paths.matches.clone(),
            summary_path: self.paths.summary.clone(),
        })
    }

    fn play_match(
        &self,
        match_index: usize,
        order_index: usize,
        match_seed: u64,
        order: &[usize; 4],
    ) -> Result<MatchOutcome, RunnerError> {
        let mut seats = build_seat_states(order, &self.config.lineup, match_seed)?;
        let mut deal_rng = StdRng::seed_from_u64(match_seed);
        let cap = self.config.schedule.max_actions;

        let mut state = apply(
            &MatchState::new(self.config.game),
            &Action::StartMatch,
            &mut deal_rng,
        )
        .state;
        let mut actions = 0usize;

        while let Some(seat) = state.acting_seat() {
            if actions >= cap {
                return Err(RunnerError::Stalled {
                    match_index,
                    actions,
                });
            }

            let view = state.view_for(seat);
            let seat_state = &mut seats[seat.index()];
            let start = Instant::now();
            let action = seat_state
                .policy
                .decide(&view)
                .ok_or_else(|| RunnerError::NoDecision {
                    seat: seat.label(),
                    phase: format!("{:?}", view.phase()),
                })?;
            let elapsed_ms = seat_state.metrics.record(start.elapsed());

            if self.logging_enabled && tracing::enabled!(Level::DEBUG) {
                event!(
                    target: "trix_bench::action",
                    Level::DEBUG,
                    run_id = %self.config.run_id,
                    match_index = match_index as u32,
                    order_index = order_index as u32,
                    seat = seat.label(),
                    action = ?action,
                    elapsed_ms
                );
            }

            let transition = apply(&state, &action, &mut deal_rng);
            if let Some(message) = transition.events.iter().find_map(|event| match event {
                Event::Error { message } => Some(message.clone()),
                _ => None,
            }) {
                return Err(RunnerError::Engine { message });
            }
            if transition.events.is_empty() {
                return Err(RunnerError::Rejected {
                    seat: seat.label(),
                    action: format!("{action:?}"),
                });
            }
            if cfg!(debug_assertions) {
                check_conservation(&transition.state)?;
            }

            state = transition.state;
            actions += 1;
        }

        let winners = winning_seats(&state);
        let partnership = state.config().mode.is_partnership();
        let seat_results = seats
            .into_iter()
            .map(|seat_state| {
                let seat = seat_state.seat;
                SeatResult {
                    agent_name: seat_state.agent_name,
                    difficulty: seat_state.difficulty,
                    seat,
                    score: state.scores().score(seat),
                    team_score: partnership.then(|| state.team_score(seat.team())),
                    won: winners.contains(&seat),
                    metrics: seat_state.metrics.finalize(),
                }
            })
            .collect();

        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            event!(
                target: "trix_bench::match",
                Level::INFO,
                run_id = %self.config.run_id,
                match_index = match_index as u32,
                order_index = order_index as u32,
                winners = ?winners,
                actions = actions as u32,
                scores = ?state.scores().standings(),
            );
        }

        Ok(MatchOutcome {
            match_index,
            order_index,
            match_seed,
            deals: state.deal_log().len(),
            actions,
            seat_results,
        })
    }
}

fn check_conservation(state: &MatchState) -> Result<(), RunnerError> {
    if state.is_over() {
        return Ok(());
    }
    let cards = state.accounted_cards();
    let distinct: HashSet<Card> = cards.iter().copied().collect();
    if cards.len() != 52 || distinct.len() != 52 {
        return Err(RunnerError::CardAccounting {
            counted: cards.len(),
            distinct: distinct.len(),
        });
    }
    Ok(())
}

/// The top seat, or both members of the top team in partnership mode.
fn winning_seats(state: &MatchState) -> Vec<Seat> {
    let scores = state.scores();
    if state.config().mode.is_partnership() {
        scores.leading_team().members().to_vec()
    } else {
        vec![scores.leading_seat()]
    }
}

fn build_seat_states(
    order: &[usize; 4],
    lineup: &[BotEntry],
    match_seed: u64,
) -> Result<Vec<SeatState>, RunnerError> {
    let mut seats = Vec::with_capacity(4);
    for (seat, entry_index) in Seat::LOOP.into_iter().zip(order.iter()) {
        let entry = lineup.get(*entry_index).ok_or(RunnerError::InvalidSeatOrder {
            seat: seat.label(),
            entry_index: *entry_index,
        })?;
        seats.push(SeatState::new(seat, entry, policy_seed(match_seed, seat)));
    }
    Ok(seats)
}

/// Per-seat generator seed so bots never share a random stream.
fn policy_seed(match_seed: u64, seat: Seat) -> u64 {
    match_seed ^ (seat.index() as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn write_match_rows(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    outcome: &MatchOutcome,
) -> Result<usize, RunnerError> {
    let match_id = format!("M{:05}_P{:02}", outcome.match_index, outcome.order_index);

    let mut rows_written = 0usize;
    for seat_result in &outcome.seat_results {
        let row = MatchLogRow {
            run_id: config.run_id.clone(),
            match_id: match_id.clone(),
            match_index: outcome.match_index,
            seat_order: outcome.order_index,
            match_seed: outcome.match_seed,
            seat: seat_result.seat.label(),
            agent: seat_result.agent_name.clone(),
            difficulty: seat_result.difficulty.as_str(),
            score: seat_result.score,
            team_score: seat_result.team_score,
            won: seat_result.won,
            deals: outcome.deals,
            actions: outcome.actions,
            decisions: seat_result.metrics.decisions,
            speed_ms_decision: seat_result.metrics.avg_ms_per_decision,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

struct SeatState {
    seat: Seat,
    agent_name: String,
    difficulty: BotDifficulty,
    policy: Box<dyn Policy>,
    metrics: DecisionMetrics,
}

impl SeatState {
    fn new(seat: Seat, entry: &BotEntry, seed: u64) -> Self {
        let difficulty = entry.tier;
        Self {
            seat,
            agent_name: entry.name.clone(),
            difficulty,
            policy: Box::new(HeuristicPolicy::new(difficulty, seed)),
            metrics: DecisionMetrics::default(),
        }
    }
}

/// Final standing of one complete match.
pub struct MatchOutcome {
    pub match_index: usize,
    pub order_index: usize,
    pub match_seed: u64,
    pub deals: usize,
    pub actions: usize,
    pub seat_results: Vec<SeatResult>,
}

pub struct SeatResult {
    pub agent_name: String,
    pub difficulty: BotDifficulty,
    pub seat: Seat,
    pub score: i32,
    pub team_score: Option<i32>,
    pub won: bool,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) -> f64 {
        self.total += duration;
        self.decisions += 1;
        duration.as_secs_f64() * 1000.0
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
}

#[derive(Serialize)]
struct MatchLogRow {
    run_id: String,
    match_id: String,
    match_index: usize,
    seat_order: usize,
    match_seed: u64,
    seat: &'static str,
    agent: String,
    difficulty: &'static str,
    score: i32,
    team_score: Option<i32>,
    won: bool,
    deals: usize,
    actions: usize,
    decisions: u32,
    speed_ms_decision: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("match {match_index} stalled after {actions} actions")]
    Stalled { match_index: usize, actions: usize },
    #[error("{seat} produced no action in phase {phase}")]
    NoDecision { seat: &'static str, phase: String },
    #[error("engine ignored {action} from {seat}")]
    Rejected { seat: &'static str, action: String },
    #[error("engine reported an internal failure: {message}")]
    Engine { message: String },
    #[error("card accounting broken: {counted} cards tracked, {distinct} distinct")]
    CardAccounting { counted: usize, distinct: usize },
    #[error("{requested} seat orders requested but only {max} exist")]
    SeatOrderLimit { requested: usize, max: usize },
    #[error("seat order puts lineup entry {entry_index} at {seat}, which does not exist")]
    InvalidSeatOrder {
        seat: &'static str,
        entry_index: usize,
    },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use trix_core::game::MatchConfig;

    fn lineup() -> [BotEntry; 4] {
        let tiers = [
            BotDifficulty::Easy,
            BotDifficulty::Moderate,
            BotDifficulty::Hard,
            BotDifficulty::Moderate,
        ];
        std::array::from_fn(|idx| BotEntry {
            name: format!("bot_{idx}"),
            tier: tiers[idx],
        })
    }

    #[test]
    fn seat_states_follow_the_order() {
        let seats = build_seat_states(&[3, 2, 1, 0], &lineup(), 7).unwrap();
        assert_eq!(seats[0].agent_name, "bot_3");
        assert_eq!(seats[0].seat, Seat::North);
        assert_eq!(seats[3].agent_name, "bot_0");
        assert_eq!(seats[3].difficulty, BotDifficulty::Easy);
    }

    #[test]
    fn seat_order_past_the_lineup_is_rejected() {
        let err = build_seat_states(&[0, 1, 2, 9], &lineup(), 7).err().unwrap();
        assert!(matches!(
            err,
            RunnerError::InvalidSeatOrder {
                seat: "west",
                entry_index: 9
            }
        ));
    }

    #[test]
    fn policy_seeds_differ_per_seat() {
        let seeds: HashSet<u64> = Seat::LOOP.iter().map(|s| policy_seed(42, *s)).collect();
        assert_eq!(seeds.len(), 4);
    }

    #[test]
    fn partnership_win_goes_to_both_partners() {
        let mut rng = StdRng::seed_from_u64(4);
        let solo = apply(
            &MatchState::new(MatchConfig::default()),
            &Action::StartMatch,
            &mut rng,
        )
        .state;
        assert_eq!(winning_seats(&solo), vec![Seat::North]);

        let paired = apply(
            &MatchState::new(MatchConfig::partnership()),
            &Action::StartMatch,
            &mut rng,
        )
        .state;
        assert_eq!(winning_seats(&paired), vec![Seat::North, Seat::South]);
    }

    #[test]
    fn conservation_check_flags_missing_cards() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = apply(
            &MatchState::new(MatchConfig::default()),
            &Action::StartMatch,
            &mut rng,
        )
        .state;
        assert!(check_conservation(&state).is_ok());
        assert!(check_conservation(&MatchState::new(MatchConfig::default())).is_err());
    }
}
