use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::seat::Seat;
use crate::rules::contract::ContractId;
use crate::rules::doubling::{doubling_candidates, holder_wants_double, supports_doubling};
use serde::{Deserialize, Serialize};
use std::array;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubledCard {
    pub card: Card,
    pub holder: Seat,
}

/// Pre-play doubling sub-phase of a king or queens deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoublingState {
    pending: bool,
    closed: bool,
    eligible: [Vec<Card>; 4],
    doubled: Vec<DoubledCard>,
}

impl DoublingState {
    /// Builds the sub-phase for `contract`, or `None` when nothing can be doubled.
    pub fn open(
        contract: ContractId,
        hands: &[Hand; 4],
        queen_doubling: bool,
        closed: bool,
    ) -> Option<Self> {
        if !supports_doubling(contract, queen_doubling) {
            return None;
        }
        let eligible = array::from_fn(|idx| doubling_candidates(contract, &hands[idx], queen_doubling));
        Some(Self {
            pending: true,
            closed,
            eligible,
            doubled: Vec::new(),
        })
    }

    /// Records every non-human holder's decision from their own hand.
    pub fn decide_for_bots(&mut self, hands: &[Hand; 4], human: Seat) {
        for seat in Seat::LOOP {
            if seat == human {
                continue;
            }
            let hand = &hands[seat.index()];
            let wanted: Vec<Card> = self.eligible[seat.index()]
                .iter()
                .copied()
                .filter(|card| holder_wants_double(hand, *card))
                .collect();
            self.accept(seat, &wanted);
        }
    }

    /// Doubles the subset of `cards` that `seat` is eligible for. Returns how many
    /// new doubles were recorded.
    pub fn accept(&mut self, seat: Seat, cards: &[Card]) -> usize {
        let mut added = 0;
        for card in cards {
            let eligible = self.eligible[seat.index()].contains(card);
            let already = self.doubled.iter().any(|d| d.card == *card);
            if eligible && !already {
                self.doubled.push(DoubledCard {
                    card: *card,
                    holder: seat,
                });
                added += 1;
            }
        }
        added
    }

    pub fn close(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn eligible(&self, seat: Seat) -> &[Card] {
        &self.eligible[seat.index()]
    }

    pub fn doubled(&self) -> &[DoubledCard] {
        &self.doubled
    }

    pub fn holder_of(&self, card: Card) -> Option<Seat> {
        self.doubled
            .iter()
            .find(|d| d.card == card)
            .map(|d| d.holder)
    }
}
