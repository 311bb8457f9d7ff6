//! Which cards may be doubled, and the hand test used to decide whether a
//! holder doubles.

use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::rules::contract::ContractId;

/// Lower cards of the same suit a holder wants before doubling.
pub const DOUBLE_MIN_GUARDS: usize = 3;

pub fn supports_doubling(contract: ContractId, queen_doubling: bool) -> bool {
    match contract {
        ContractId::King => true,
        ContractId::Queens => queen_doubling,
        _ => false,
    }
}

pub fn is_doubling_card(contract: ContractId, card: Card, queen_doubling: bool) -> bool {
    match contract {
        ContractId::King => card.is_king_of_hearts(),
        ContractId::Queens => queen_doubling && card.is_queen(),
        _ => false,
    }
}

pub fn doubling_candidates(contract: ContractId, hand: &Hand, queen_doubling: bool) -> Vec<Card> {
    hand.iter()
        .copied()
        .filter(|card| is_doubling_card(contract, *card, queen_doubling))
        .collect()
}

/// A holder doubles when the card is guarded by enough lower cards of its suit
/// to duck under leads of that suit.
pub fn holder_wants_double(hand: &Hand, card: Card) -> bool {
    let guards = hand
        .iter()
        .filter(|other| other.suit == card.suit && other.rank < card.rank)
        .count();
    guards >= DOUBLE_MIN_GUARDS
}
