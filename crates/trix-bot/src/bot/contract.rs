use super::{BotContext, BotDifficulty, BotParams, count_cards_in_suit};
use rand::Rng;
use rand::seq::SliceRandom;
use trix_core::model::card::Card;
use trix_core::model::hand::Hand;
use trix_core::model::rank::Rank;
use trix_core::model::suit::Suit;
use trix_core::rules::ContractId;

/// Contract selection for a bot kingdom owner.
pub struct ContractPlanner;

impl ContractPlanner {
    pub fn choose<R>(ctx: &BotContext<'_>, rng: &mut R) -> Option<ContractId>
    where
        R: Rng + ?Sized,
    {
        let remaining = ctx.view.remaining_contracts();
        if ctx.difficulty == BotDifficulty::Easy {
            return remaining.choose(rng).copied();
        }
        remaining
            .iter()
            .copied()
            .min_by_key(|contract| (risk(*contract, ctx.hand(), ctx.params), contract.catalog_index()))
    }
}

/// Lower is better: roughly how badly `hand` fares under `contract`.
pub fn risk(contract: ContractId, hand: &Hand, params: &BotParams) -> i32 {
    match contract {
        ContractId::King => {
            if hand.contains(Card::KING_OF_HEARTS) {
                let guards = hand
                    .iter()
                    .filter(|card| card.suit == Suit::Hearts && card.rank < Rank::King)
                    .count()
                    .min(3) as i32;
                params.contract_king_holder_risk - guards * 10
            } else {
                let ace = hand.contains(Card::new(Rank::Ace, Suit::Hearts));
                10 + if ace { 15 } else { 0 }
            }
        }
        ContractId::Queens => {
            let queens = hand.iter().filter(|card| card.is_queen()).count() as i32;
            let exposed_honours = hand
                .iter()
                .filter(|card| card.rank > Rank::Queen)
                .filter(|card| !hand.contains(Card::new(Rank::Queen, card.suit)))
                .count() as i32;
            queens * params.contract_queen_risk + exposed_honours * 4
        }
        ContractId::Diamonds => {
            let diamonds = count_cards_in_suit(hand, Suit::Diamonds) as i32;
            let high = hand
                .iter()
                .filter(|card| card.suit == Suit::Diamonds && card.rank >= Rank::Jack)
                .count() as i32;
            diamonds * 3 + high * 6
        }
        ContractId::Ltoosh => {
            let high = hand.iter().filter(|card| card.rank >= Rank::Jack).count() as i32;
            high * 5
        }
        ContractId::Trix => {
            let jacks = hand.iter().filter(|card| card.is_jack()).count() as i32;
            20 + jacks * params.contract_jack_risk
        }
    }
}
