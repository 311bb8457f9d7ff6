use super::Policy;
use crate::bot::{
    BotContext, BotDifficulty, BotParams, ContractPlanner, DoublingPlanner, LayoutPlanner,
    PlayPlanner,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use trix_core::game::PlayerView;
use trix_core::model::card::Card;
use trix_core::rules::ContractId;
use tracing::{Level, event};

/// Adapter that drives the planners behind the [`Policy`] trait. Each policy
/// owns its generator so seeded runs replay exactly.
pub struct HeuristicPolicy {
    difficulty: BotDifficulty,
    params: BotParams,
    rng: StdRng,
}

impl HeuristicPolicy {
    pub fn new(difficulty: BotDifficulty, seed: u64) -> Self {
        Self {
            difficulty,
            params: BotParams::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn easy(seed: u64) -> Self {
        Self::new(BotDifficulty::Easy, seed)
    }

    pub fn moderate(seed: u64) -> Self {
        Self::new(BotDifficulty::Moderate, seed)
    }

    pub fn hard(seed: u64) -> Self {
        Self::new(BotDifficulty::Hard, seed)
    }

    /// Difficulty taken from `TRIX_BOT_DIFFICULTY`.
    pub fn from_env(seed: u64) -> Self {
        Self::new(BotDifficulty::from_env(), seed)
    }

    pub fn with_params(mut self, params: BotParams) -> Self {
        self.params = params;
        self
    }

    pub fn difficulty(&self) -> BotDifficulty {
        self.difficulty
    }
}

impl Policy for HeuristicPolicy {
    fn choose_contract(&mut self, view: &PlayerView) -> Option<ContractId> {
        let ctx = BotContext::new(view, self.difficulty, &self.params);
        let chosen = ContractPlanner::choose(&ctx, &mut self.rng);
        log_contract_decision(view, self.difficulty, chosen);
        chosen
    }

    fn choose_play(&mut self, view: &PlayerView) -> Option<Card> {
        let legal = view.legal_plays();
        let ctx = BotContext::new(view, self.difficulty, &self.params);
        let chosen = PlayPlanner::choose(&legal, &ctx, &mut self.rng);
        log_play_decision(view, self.difficulty, &legal, chosen, "trick");
        chosen
    }

    fn choose_layout(&mut self, view: &PlayerView) -> Option<Card> {
        let legal = view.legal_plays();
        let ctx = BotContext::new(view, self.difficulty, &self.params);
        let chosen = LayoutPlanner::choose(&legal, &ctx, &mut self.rng);
        log_play_decision(view, self.difficulty, &legal, chosen, "layout");
        chosen
    }

    fn choose_doubles(&mut self, view: &PlayerView) -> Vec<Card> {
        let ctx = BotContext::new(view, self.difficulty, &self.params);
        DoublingPlanner::choose(&ctx)
    }
}

fn log_contract_decision(view: &PlayerView, difficulty: BotDifficulty, chosen: Option<ContractId>) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let pool = view
        .remaining_contracts()
        .iter()
        .map(|contract| contract.as_str())
        .collect::<Vec<_>>()
        .join(",");

    event!(
        target: "trix_bot::contract",
        Level::INFO,
        seat = %view.seat(),
        difficulty = %difficulty,
        pool = %pool,
        chosen = ?chosen,
    );
}

fn log_play_decision(
    view: &PlayerView,
    difficulty: BotDifficulty,
    legal: &[Card],
    chosen: Option<Card>,
    reason: &str,
) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let choice = chosen.map_or_else(|| "pass".to_string(), |card| card.to_string());
    let legal_preview = if legal.len() <= 6 {
        legal
            .iter()
            .map(Card::to_string)
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} moves", legal.len())
    };

    event!(
        target: "trix_bot::play",
        Level::INFO,
        seat = %view.seat(),
        difficulty = %difficulty,
        contract = ?view.contract(),
        legal_count = legal.len(),
        legal_moves = %legal_preview,
        chosen = %choice,
        trick_cards = view.current_trick().plays().len(),
        reason,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use trix_core::game::{Action, MatchConfig, MatchState, Phase, apply};
    use trix_core::model::seat::Seat;

    /// Every seat, the human one included, driven by `make`.
    fn play_match<F>(config: MatchConfig, seed: u64, make: F) -> MatchState
    where
        F: Fn(u64) -> HeuristicPolicy,
    {
        let mut policies: Vec<HeuristicPolicy> =
            (0..4).map(|idx| make(seed + idx as u64)).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = apply(&MatchState::new(config), &Action::StartMatch, &mut rng).state;
        for _ in 0..5_000 {
            let Some(seat) = state.acting_seat() else {
                break;
            };
            let view = state.view_for(seat);
            let action = policies[seat.index()].decide(&view).unwrap();
            assert!(
                state.legal_actions(seat).contains(&action),
                "{seat} chose illegal {action:?}"
            );
            state = apply(&state, &action, &mut rng).state;
        }
        state
    }

    #[test]
    fn every_tier_finishes_a_match_with_legal_moves() {
        for (seed, make) in [
            (1, HeuristicPolicy::easy as fn(u64) -> HeuristicPolicy),
            (2, HeuristicPolicy::moderate),
            (3, HeuristicPolicy::hard),
        ] {
            let state = play_match(MatchConfig::default(), seed, make);
            assert_eq!(state.phase(), Phase::GameEnd);
        }
    }

    #[test]
    fn partnership_match_finishes() {
        let state = play_match(MatchConfig::partnership(), 9, HeuristicPolicy::hard);
        assert_eq!(state.phase(), Phase::GameEnd);
        assert_eq!(state.deal_log().len(), 20);
    }

    #[test]
    fn same_seed_same_choices() {
        let a = play_match(MatchConfig::default(), 21, HeuristicPolicy::easy);
        let b = play_match(MatchConfig::default(), 21, HeuristicPolicy::easy);
        assert_eq!(a.scores(), b.scores());
    }

    #[test]
    fn custom_params_still_play_legally() {
        let params = BotParams {
            play_capture_penalty_mult: 0,
            contract_king_holder_risk: 0,
            ..BotParams::default()
        };
        let state = play_match(MatchConfig::default(), 5, |seed| {
            HeuristicPolicy::hard(seed).with_params(params.clone())
        });
        assert_eq!(state.phase(), Phase::GameEnd);
    }

    #[test]
    fn decide_is_none_outside_play() {
        let state = MatchState::new(MatchConfig::default());
        let mut policy = HeuristicPolicy::moderate(0);
        assert_eq!(policy.decide(&state.view_for(Seat::North)), None);
    }
}
