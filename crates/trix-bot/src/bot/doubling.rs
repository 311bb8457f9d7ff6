use super::BotContext;
use trix_core::model::card::Card;
use trix_core::rules::doubling::holder_wants_double;

/// Doubling decision for a seat prompted by the engine. Applies the same hand
/// test the engine uses for the seats it decides itself.
pub struct DoublingPlanner;

impl DoublingPlanner {
    pub fn choose(ctx: &BotContext<'_>) -> Vec<Card> {
        ctx.view
            .doubling_choices()
            .iter()
            .copied()
            .filter(|card| holder_wants_double(ctx.hand(), *card))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::{BotDifficulty, BotParams};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use trix_core::game::{Action, MatchConfig, MatchState, Phase, apply};
    use trix_core::rules::ContractId;

    #[test]
    fn prompted_seat_doubles_only_guarded_cards() {
        let config = MatchConfig::default();
        for seed in 0..60 {
            let mut rng = StdRng::seed_from_u64(seed);
            let state = apply(&MatchState::new(config), &Action::StartMatch, &mut rng).state;
            let picked = apply(
                &state,
                &Action::PickContract {
                    seat: state.kingdom_owner(),
                    contract: ContractId::Queens,
                },
                &mut rng,
            )
            .state;
            if picked.phase() != Phase::DoublingDecision {
                continue;
            }
            let view = picked.view_for(config.human_seat);
            let params = BotParams::default();
            let ctx = BotContext::new(&view, BotDifficulty::Moderate, &params);
            let chosen = DoublingPlanner::choose(&ctx);
            assert!(!view.doubling_choices().is_empty());
            for card in &chosen {
                assert!(view.doubling_choices().contains(card));
                assert!(holder_wants_double(view.hand(), *card));
            }
            return;
        }
        panic!("no seed prompted the human seat");
    }
}
