use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::BenchmarkConfig;
use crate::runner::MatchOutcome;

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("agent '{0}' defined in results but missing from configuration")]
    UnknownAgent(String),
    #[error("baseline '{0}' missing from match {1}")]
    MissingBaselineMatch(String, String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates per-agent final scores across every played match.
pub struct AnalyticsCollector {
    baseline: String,
    agents: HashMap<String, AgentAccumulator>,
    comparisons: HashMap<String, Vec<f64>>,
    agent_order: Vec<String>,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Result<Self, AnalyticsError> {
        let baseline = config.baseline().to_string();
        let mut agents = HashMap::new();
        let mut order = Vec::new();
        for entry in &config.lineup {
            agents.insert(
                entry.name.clone(),
                AgentAccumulator::new(entry.name.clone(), entry.tier.to_string()),
            );
            order.push(entry.name.clone());
        }

        if !agents.contains_key(&baseline) {
            return Err(AnalyticsError::UnknownAgent(baseline));
        }

        Ok(Self {
            baseline,
            agents,
            comparisons: HashMap::new(),
            agent_order: order,
        })
    }

    pub fn record_match(&mut self, outcome: &MatchOutcome) -> Result<(), AnalyticsError> {
        let match_id = format!("M{:05}_P{:02}", outcome.match_index, outcome.order_index);
        let baseline_score = outcome
            .seat_results
            .iter()
            .find(|seat| seat.agent_name == self.baseline)
            .map(|seat| f64::from(seat.score))
            .ok_or_else(|| AnalyticsError::MissingBaselineMatch(self.baseline.clone(), match_id))?;

        for seat in &outcome.seat_results {
            let acc = self
                .agents
                .get_mut(&seat.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(seat.agent_name.clone()))?;
            acc.record(
                f64::from(seat.score),
                seat.won,
                seat.metrics.avg_ms_per_decision,
            );

            if seat.agent_name != self.baseline {
                self.comparisons
                    .entry(seat.agent_name.clone())
                    .or_default()
                    .push(f64::from(seat.score) - baseline_score);
            }
        }
        Ok(())
    }

    pub fn finalize(mut self) -> AnalyticsSummary {
        let mut reports = Vec::new();
        for name in &self.agent_order {
            if let Some(acc) = self.agents.remove(name) {
                reports.push(acc.into_report());
            }
        }

        let baseline_mean = reports
            .iter()
            .find(|report| report.name == self.baseline)
            .map(|report| report.mean_score)
            .unwrap_or(0.0);
        for report in &mut reports {
            report.delta_vs_baseline = report.mean_score - baseline_mean;
            report.p_value = self
                .comparisons
                .remove(&report.name)
                .map(wilcoxon_signed_rank)
                .unwrap_or(1.0);
        }

        AnalyticsSummary {
            baseline: self.baseline,
            agents: reports,
        }
    }
}

struct AgentAccumulator {
    name: String,
    difficulty: String,
    scores: Vec<f64>,
    wins: usize,
    latency_sum_ms: f64,
}

impl AgentAccumulator {
    fn new(name: String, difficulty: String) -> Self {
        Self {
            name,
            difficulty,
            scores: Vec::new(),
            wins: 0,
            latency_sum_ms: 0.0,
        }
    }

    fn record(&mut self, score: f64, won: bool, avg_ms: f64) {
        self.scores.push(score);
        if won {
            self.wins += 1;
        }
        self.latency_sum_ms += avg_ms;
    }

    fn into_report(self) -> AgentReport {
        let matches = self.scores.len();
        let mean_score = mean(&self.scores);
        let ci95 = confidence_interval(&self.scores);
        let average_ms_per_decision = if matches == 0 {
            0.0
        } else {
            self.latency_sum_ms / matches as f64
        };

        AgentReport {
            name: self.name,
            difficulty: self.difficulty,
            matches,
            mean_score,
            ci95,
            wins: self.wins,
            average_ms_per_decision,
            delta_vs_baseline: 0.0,
            p_value: 1.0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub baseline: String,
    pub agents: Vec<AgentReport>,
}

impl AnalyticsSummary {
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Match Summary\n\n");
        let _ = writeln!(out, "Baseline: {}\n", self.baseline);
        out.push_str("| Agent | Tier | Matches | Mean score | Δ vs baseline | 95% CI | Win % | Avg ms/decision | p-value |\n");
        out.push_str("|-------|------|---------|------------|---------------|--------|-------|-----------------|---------|\n");

        for agent in &self.agents {
            let win_rate = if agent.matches == 0 {
                0.0
            } else {
                agent.wins as f64 / agent.matches as f64
            };
            let _ = writeln!(
                out,
                "| {name} | {tier} | {matches} | {mean:.1} | {delta:+.1} | [{low:.1}, {high:.1}] | {win:.1}% | {latency:.3} | {pval:.3} |",
                name = agent.name,
                tier = agent.difficulty,
                matches = agent.matches,
                mean = agent.mean_score,
                delta = agent.delta_vs_baseline,
                low = agent.ci95.0,
                high = agent.ci95.1,
                win = win_rate * 100.0,
                latency = agent.average_ms_per_decision,
                pval = agent.p_value,
            );
        }
        out
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.to_markdown()).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub difficulty: String,
    pub matches: usize,
    pub mean_score: f64,
    pub ci95: (f64, f64),
    pub wins: usize,
    pub average_ms_per_decision: f64,
    pub delta_vs_baseline: f64,
    pub p_value: f64,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn standard_normal() -> Option<Normal> {
    Normal::new(0.0, 1.0).ok()
}

/// Normal-approximation interval around the mean.
pub fn confidence_interval(values: &[f64]) -> (f64, f64) {
    let centre = mean(values);
    if values.len() < 2 {
        return (centre, centre);
    }
    let Some(normal) = standard_normal() else {
        return (centre, centre);
    };
    let variance = values
        .iter()
        .map(|value| (value - centre).powi(2))
        .sum::<f64>()
        / (values.len() as f64 - 1.0);
    let std_error = (variance / values.len() as f64).sqrt();
    let z = normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0);
    (centre - z * std_error, centre + z * std_error)
}

/// Two-sided p-value for paired differences against the baseline.
fn wilcoxon_signed_rank(diffs: Vec<f64>) -> f64 {
    let mut paired: Vec<(f64, f64)> = diffs
        .into_iter()
        .filter(|d| d.abs() > f64::EPSILON)
        .map(|d| (d.abs(), d.signum()))
        .collect();
    let n = paired.len();
    if n == 0 {
        return 1.0;
    }
    paired.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut w_plus = 0.0_f64;
    let mut tie_adjustment = 0.0_f64;
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && (paired[j + 1].0 - paired[i].0).abs() < 1e-12 {
            j += 1;
        }
        let rank = (i + j + 2) as f64 / 2.0;
        w_plus += paired[i..=j]
            .iter()
            .filter(|(_, sign)| *sign > 0.0)
            .count() as f64
            * rank;
        let ties = (j - i + 1) as f64;
        if ties > 1.0 {
            tie_adjustment += (ties.powi(3) - ties) / 48.0;
        }
        i = j + 1;
    }

    let n_f = n as f64;
    let mean_w = n_f * (n_f + 1.0) / 4.0;
    let variance_w = n_f * (n_f + 1.0) * (2.0 * n_f + 1.0) / 24.0 - tie_adjustment;
    let Some(normal) = standard_normal().filter(|_| variance_w > 0.0) else {
        return 1.0;
    };
    let z = ((w_plus - mean_w).abs() - 0.5_f64).max(0.0) / variance_w.sqrt();
    (2.0 * (1.0 - normal.cdf(z))).clamp(0.0, 1.0)
}
