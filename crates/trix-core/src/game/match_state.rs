use crate::game::action::Action;
use crate::game::config::MatchConfig;
use crate::game::doubling::DoublingState;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::score::ScoreBoard;
use crate::model::seat::{Seat, Team};
use crate::model::trick::{Play, Trick};
use crate::rules::contract::ContractId;
use crate::rules::layout::LayoutBoard;
use crate::rules::legal::legal_trick_plays;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::array;

pub const KINGDOM_COUNT: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    KingdomPickContract,
    DoublingDecision,
    TrickPlay,
    TrixLayoutPlay,
    GameEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTrick {
    pub trick: Trick,
    pub winner: Seat,
}

/// One finished deal, folded into the running totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    pub kingdom: u8,
    pub owner: Seat,
    pub contract: ContractId,
    pub deltas: [i32; 4],
}

/// Aggregate root threaded through every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    pub(crate) config: MatchConfig,
    pub(crate) phase: Phase,
    pub(crate) kingdom_number: u8,
    pub(crate) kingdom_owner: Seat,
    pub(crate) contracts_remaining: [Vec<ContractId>; 4],
    pub(crate) contract: Option<ContractId>,
    pub(crate) hands: [Hand; 4],
    pub(crate) current_trick: Trick,
    pub(crate) trick_history: Vec<CompletedTrick>,
    pub(crate) taken: [Vec<Card>; 4],
    pub(crate) turn: Seat,
    pub(crate) layout: LayoutBoard,
    pub(crate) layout_log: Vec<Play>,
    pub(crate) finish_order: Vec<Seat>,
    pub(crate) layout_turns: u32,
    pub(crate) twos_revealed: bool,
    pub(crate) doubling: Option<DoublingState>,
    pub(crate) scores: ScoreBoard,
    pub(crate) deal_deltas: [i32; 4],
    pub(crate) deal_log: Vec<DealRecord>,
    pub(crate) message: Option<String>,
}

impl MatchState {
    /// Match in the setup phase: no hands, zero scores, full pools.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            phase: Phase::Setup,
            kingdom_number: 1,
            kingdom_owner: Seat::North,
            contracts_remaining: array::from_fn(|_| ContractId::CATALOG.to_vec()),
            contract: None,
            hands: Default::default(),
            current_trick: Trick::new(Seat::North),
            trick_history: Vec::new(),
            taken: Default::default(),
            turn: Seat::North,
            layout: LayoutBoard::new(),
            layout_log: Vec::new(),
            finish_order: Vec::new(),
            layout_turns: 0,
            twos_revealed: false,
            doubling: None,
            scores: ScoreBoard::new(),
            deal_deltas: [0; 4],
            deal_log: Vec::new(),
            message: None,
        }
    }

    /// Fresh match with the first deal dealt. Kingdom 1 goes to whoever holds
    /// the seven of hearts.
    pub(crate) fn started<R: RngCore + ?Sized>(config: MatchConfig, rng: &mut R) -> Self {
        let mut state = Self::new(config);
        state.deal_new_hands(rng);
        state.kingdom_owner = state
            .holder_of(Card::SEVEN_OF_HEARTS)
            .unwrap_or(Seat::North);
        state.turn = state.kingdom_owner;
        state.current_trick = Trick::new(state.kingdom_owner);
        state.phase = Phase::KingdomPickContract;
        state
    }

    /// Shuffles and deals 13 cards per seat, clearing all per-deal tracking.
    pub(crate) fn deal_new_hands<R: RngCore + ?Sized>(&mut self, rng: &mut R) {
        let deck = Deck::shuffled(rng);
        self.hands = deck.deal();
        self.contract = None;
        self.current_trick = Trick::new(self.kingdom_owner);
        self.trick_history.clear();
        self.taken = Default::default();
        self.turn = self.kingdom_owner;
        self.layout = LayoutBoard::new();
        self.layout_log.clear();
        self.finish_order.clear();
        self.layout_turns = 0;
        self.twos_revealed = false;
        self.doubling = None;
        self.deal_deltas = [0; 4];
    }

    pub(crate) fn award(&mut self, seat: Seat, points: i32) {
        self.scores.add(seat, points);
        self.deal_deltas[seat.index()] += points;
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn kingdom_number(&self) -> u8 {
        self.kingdom_number
    }

    pub fn kingdom_owner(&self) -> Seat {
        self.kingdom_owner
    }

    pub fn contracts_remaining(&self, seat: Seat) -> &[ContractId] {
        &self.contracts_remaining[seat.index()]
    }

    pub fn contract(&self) -> Option<ContractId> {
        self.contract
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn trick_history(&self) -> &[CompletedTrick] {
        &self.trick_history
    }

    pub fn taken(&self, seat: Seat) -> &[Card] {
        &self.taken[seat.index()]
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn layout(&self) -> &LayoutBoard {
        &self.layout
    }

    pub fn layout_log(&self) -> &[Play] {
        &self.layout_log
    }

    pub fn finish_order(&self) -> &[Seat] {
        &self.finish_order
    }

    pub fn layout_turns(&self) -> u32 {
        self.layout_turns
    }

    pub fn twos_revealed(&self) -> bool {
        self.twos_revealed
    }

    pub fn doubling(&self) -> Option<&DoublingState> {
        self.doubling.as_ref()
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn team_score(&self, team: Team) -> i32 {
        self.scores.team_score(team)
    }

    pub fn deal_deltas(&self) -> [i32; 4] {
        self.deal_deltas
    }

    pub fn deal_log(&self) -> &[DealRecord] {
        &self.deal_log
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameEnd)
    }

    pub fn holder_of(&self, card: Card) -> Option<Seat> {
        Seat::LOOP
            .iter()
            .copied()
            .find(|seat| self.hands[seat.index()].contains(card))
    }

    pub fn all_hands_empty(&self) -> bool {
        self.hands.iter().all(Hand::is_empty)
    }

    /// Seat the engine is waiting on, if any.
    pub fn acting_seat(&self) -> Option<Seat> {
        match self.phase {
            Phase::KingdomPickContract => Some(self.kingdom_owner),
            Phase::DoublingDecision => Some(self.config.human_seat),
            Phase::TrickPlay | Phase::TrixLayoutPlay => Some(self.turn),
            Phase::Setup | Phase::GameEnd => None,
        }
    }

    /// Every dealt card's current location: hands, the open trick, taken piles
    /// and the layout board. A consistent deal lists 52 distinct cards.
    pub fn accounted_cards(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = self.hands.iter().flat_map(|h| h.iter().copied()).collect();
        cards.extend(self.current_trick.cards());
        cards.extend(self.taken.iter().flatten().copied());
        cards.extend(self.layout.laid_cards());
        cards
    }

    /// Seats' 2s once the partnership layout reveal has fired.
    pub fn revealed_cards(&self) -> Vec<Play> {
        if !self.twos_revealed {
            return Vec::new();
        }
        Seat::LOOP
            .iter()
            .flat_map(|seat| {
                self.hands[seat.index()]
                    .iter()
                    .filter(|card| card.rank == Rank::Two)
                    .map(|card| Play {
                        seat: *seat,
                        card: *card,
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// All actions `seat` could submit right now that the engine would accept.
    pub fn legal_actions(&self, seat: Seat) -> Vec<Action> {
        match self.phase {
            Phase::Setup | Phase::GameEnd => Vec::new(),
            Phase::KingdomPickContract => {
                if seat != self.kingdom_owner {
                    return Vec::new();
                }
                self.contracts_remaining(seat)
                    .iter()
                    .map(|contract| Action::PickContract {
                        seat,
                        contract: *contract,
                    })
                    .collect()
            }
            Phase::DoublingDecision => {
                if !self.config.is_human(seat) {
                    return Vec::new();
                }
                let eligible = self
                    .doubling
                    .as_ref()
                    .map(|d| d.eligible(seat).to_vec())
                    .unwrap_or_default();
                subsets(&eligible)
                    .into_iter()
                    .map(|cards| Action::SetDoubles { cards })
                    .collect()
            }
            Phase::TrickPlay => {
                if seat != self.turn {
                    return Vec::new();
                }
                legal_trick_plays(self.hand(seat), self.current_trick.lead_suit())
                    .into_iter()
                    .map(|card| Action::PlayCard { seat, card })
                    .collect()
            }
            Phase::TrixLayoutPlay => {
                let hand = self.hand(seat);
                if seat != self.turn || hand.is_empty() {
                    return Vec::new();
                }
                let plays = self.layout.legal_plays(hand);
                if plays.is_empty() {
                    vec![Action::LayoutPass { seat }]
                } else {
                    plays
                        .into_iter()
                        .map(|card| Action::LayoutPlay { seat, card })
                        .collect()
                }
            }
        }
    }
}

fn subsets(cards: &[Card]) -> Vec<Vec<Card>> {
    (0..(1usize << cards.len()))
        .map(|mask| {
            cards
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << *bit) != 0)
                .map(|(_, card)| *card)
                .collect()
        })
        .collect()
}
