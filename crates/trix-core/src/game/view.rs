use crate::game::config::GameMode;
use crate::game::doubling::DoubledCard;
use crate::game::match_state::{CompletedTrick, MatchState, Phase};
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::model::trick::{Play, Trick};
use crate::rules::contract::ContractId;
use crate::rules::layout::LayoutBoard;
use crate::rules::legal::legal_trick_plays;

/// What one seat may legitimately see. Other seats' hands are reduced to
/// their sizes, plus any 2s made public by the partnership layout reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    seat: Seat,
    phase: Phase,
    mode: GameMode,
    partner: Option<Seat>,
    contract: Option<ContractId>,
    kingdom_owner: Seat,
    remaining_contracts: Vec<ContractId>,
    hand: Hand,
    hand_sizes: [usize; 4],
    current_trick: Trick,
    completed_tricks: Vec<CompletedTrick>,
    layout: LayoutBoard,
    finish_order: Vec<Seat>,
    revealed: Vec<Play>,
    public_doubles: Vec<DoubledCard>,
    doubling_choices: Vec<Card>,
    scores: [i32; 4],
}

impl MatchState {
    pub fn view_for(&self, seat: Seat) -> PlayerView {
        let public_doubles = self
            .doubling()
            .filter(|d| !d.is_closed())
            .map(|d| d.doubled().to_vec())
            .unwrap_or_default();
        let doubling_choices = self
            .doubling()
            .filter(|d| d.is_pending())
            .map(|d| d.eligible(seat).to_vec())
            .unwrap_or_default();
        PlayerView {
            seat,
            phase: self.phase(),
            mode: self.config().mode,
            partner: self.config().partner_of(seat),
            contract: self.contract(),
            kingdom_owner: self.kingdom_owner(),
            remaining_contracts: self.contracts_remaining(seat).to_vec(),
            hand: self.hand(seat).clone(),
            hand_sizes: std::array::from_fn(|idx| self.hands[idx].len()),
            current_trick: self.current_trick().clone(),
            completed_tricks: self.trick_history().to_vec(),
            layout: *self.layout(),
            finish_order: self.finish_order().to_vec(),
            revealed: self
                .revealed_cards()
                .into_iter()
                .filter(|play| play.seat != seat)
                .collect(),
            public_doubles,
            doubling_choices,
            scores: *self.scores().standings(),
        }
    }
}

impl PlayerView {
    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn partner(&self) -> Option<Seat> {
        self.partner
    }

    pub fn contract(&self) -> Option<ContractId> {
        self.contract
    }

    pub fn kingdom_owner(&self) -> Seat {
        self.kingdom_owner
    }

    pub fn remaining_contracts(&self) -> &[ContractId] {
        &self.remaining_contracts
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn hand_size(&self, seat: Seat) -> usize {
        self.hand_sizes[seat.index()]
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn led_suit(&self) -> Option<Suit> {
        self.current_trick.lead_suit()
    }

    pub fn completed_tricks(&self) -> &[CompletedTrick] {
        &self.completed_tricks
    }

    pub fn layout(&self) -> &LayoutBoard {
        &self.layout
    }

    pub fn finish_order(&self) -> &[Seat] {
        &self.finish_order
    }

    /// Other seats' 2s, once revealed.
    pub fn revealed(&self) -> &[Play] {
        &self.revealed
    }

    /// Doubled cards, only populated when doubling is played open.
    pub fn public_doubles(&self) -> &[DoubledCard] {
        &self.public_doubles
    }

    /// Own cards that may still be doubled while the decision is open.
    pub fn doubling_choices(&self) -> &[Card] {
        &self.doubling_choices
    }

    pub fn scores(&self) -> &[i32; 4] {
        &self.scores
    }

    /// Every card seen face up this deal: completed tricks and the open trick.
    pub fn played_cards(&self) -> Vec<Card> {
        self.completed_tricks
            .iter()
            .flat_map(|done| done.trick.cards())
            .chain(self.current_trick.cards())
            .collect()
    }

    pub fn legal_plays(&self) -> Vec<Card> {
        match self.phase {
            Phase::TrickPlay => legal_trick_plays(&self.hand, self.led_suit()),
            Phase::TrixLayoutPlay => self.layout.legal_plays(&self.hand),
            _ => Vec::new(),
        }
    }

    pub fn is_partner(&self, seat: Seat) -> bool {
        self.partner == Some(seat)
    }

    /// Whether the partner currently holds the open trick.
    pub fn partner_winning(&self) -> bool {
        self.current_trick
            .current_winner()
            .is_some_and(|play| self.is_partner(play.seat))
    }
}
