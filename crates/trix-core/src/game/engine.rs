//! The transition function. `apply` never touches its input: every action is
//! worked out on a scratch copy that is only returned once the whole step has
//! succeeded.

use crate::game::action::{Action, Event};
use crate::game::doubling::DoublingState;
use crate::game::match_state::{CompletedTrick, DealRecord, KINGDOM_COUNT, MatchState, Phase};
use crate::model::card::Card;
use crate::model::seat::Seat;
use crate::model::trick::{Play, Trick, TrickError};
use crate::rules::contract::{ContractId, LAYOUT_AWARDS};
use crate::rules::legal::is_legal_trick_play;
use rand::RngCore;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// Turns of layout play after which partnership seats see everyone's 2s.
pub const REVEAL_AFTER_TURNS: u32 = 4;

/// Result of one call to [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: MatchState,
    pub events: Vec<Event>,
}

impl Transition {
    fn unchanged(state: &MatchState) -> Self {
        Self {
            state: state.clone(),
            events: Vec::new(),
        }
    }
}

/// Internal inconsistencies. Illegal actions are not errors; they are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    NoContract,
    NoWinner,
    Trick(TrickError),
    CardAccounting { counted: usize, distinct: usize },
    MissingFinisher,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NoContract => write!(f, "no contract is active for this deal"),
            EngineError::NoWinner => write!(f, "completed trick has no winner"),
            EngineError::Trick(err) => write!(f, "trick rejected play: {err}"),
            EngineError::CardAccounting { counted, distinct } => write!(
                f,
                "card accounting broken: {counted} cards tracked, {distinct} distinct"
            ),
            EngineError::MissingFinisher => write!(f, "layout finished without a full order"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<TrickError> for EngineError {
    fn from(err: TrickError) -> Self {
        EngineError::Trick(err)
    }
}

/// Applies `action` to `state`.
///
/// Illegal actions (wrong phase, wrong seat, card not held or not playable)
/// return the state unchanged with no events. If an internal failure occurs
/// the prior state is returned with only its message set, together with a
/// single [`Event::Error`].
pub fn apply<R>(state: &MatchState, action: &Action, rng: &mut R) -> Transition
where
    R: RngCore + ?Sized,
{
    let mut scratch = state.clone();
    match step(&mut scratch, action, rng) {
        Ok(Some(events)) => {
            scratch.message = None;
            Transition {
                state: scratch,
                events,
            }
        }
        Ok(None) => Transition::unchanged(state),
        Err(err) => {
            let message = err.to_string();
            warn!(target: "trix_core::engine", ?action, error = %message, "transition failed");
            let mut kept = state.clone();
            kept.message = Some(message.clone());
            Transition {
                state: kept,
                events: vec![Event::Error { message }],
            }
        }
    }
}

type StepResult = Result<Option<Vec<Event>>, EngineError>;

fn step<R>(next: &mut MatchState, action: &Action, rng: &mut R) -> StepResult
where
    R: RngCore + ?Sized,
{
    let events = match action {
        Action::StartMatch => {
            *next = MatchState::started(next.config, rng);
            Some(vec![Event::MatchStart])
        }
        Action::ResetMatch => {
            *next = MatchState::started(next.config, rng);
            Some(vec![Event::MatchReset])
        }
        Action::PickContract { seat, contract } => pick_contract(next, *seat, *contract)?,
        Action::SetDoubles { cards } => set_doubles(next, cards)?,
        Action::PlayCard { seat, card } => play_card(next, *seat, *card, rng)?,
        Action::LayoutPlay { seat, card } => layout_play(next, *seat, *card, rng)?,
        Action::LayoutPass { seat } => layout_pass(next, *seat)?,
    };
    if events.is_some() {
        verify_cards(next)?;
    }
    Ok(events)
}

fn pick_contract(next: &mut MatchState, seat: Seat, contract: ContractId) -> StepResult {
    if next.phase != Phase::KingdomPickContract
        || seat != next.kingdom_owner
        || !next.contracts_remaining(seat).contains(&contract)
    {
        return Ok(None);
    }

    let owner = next.kingdom_owner;
    next.contract = Some(contract);
    next.turn = owner;
    next.current_trick = Trick::new(owner);
    debug!(
        target: "trix_core::engine",
        kingdom = next.kingdom_number,
        owner = %owner,
        contract = %contract,
        "deal started"
    );
    let mut events = vec![Event::DealStart {
        kingdom: next.kingdom_number,
        owner,
        contract,
    }];

    if contract.is_layout() {
        next.phase = Phase::TrixLayoutPlay;
        return Ok(Some(events));
    }

    let rules = next.config.rules;
    let human = next.config.human_seat;
    let Some(mut doubling) =
        DoublingState::open(contract, &next.hands, rules.queen_doubling, rules.closed_doubling)
    else {
        next.phase = Phase::TrickPlay;
        return Ok(Some(events));
    };

    doubling.decide_for_bots(&next.hands, human);
    let human_eligible = doubling.eligible(human).to_vec();
    if human_eligible.is_empty() {
        doubling.close();
        events.push(Event::DoublingSet {
            count: doubling.doubled().len(),
        });
        next.phase = Phase::TrickPlay;
    } else {
        events.push(Event::DoublingPrompt {
            seat: human,
            eligible: human_eligible,
        });
        next.phase = Phase::DoublingDecision;
    }
    next.doubling = Some(doubling);
    Ok(Some(events))
}

fn set_doubles(next: &mut MatchState, cards: &[Card]) -> StepResult {
    if next.phase != Phase::DoublingDecision {
        return Ok(None);
    }
    let human = next.config.human_seat;
    let Some(doubling) = next.doubling.as_mut() else {
        return Ok(None);
    };
    doubling.accept(human, cards);
    doubling.close();
    let count = doubling.doubled().len();
    next.phase = Phase::TrickPlay;
    Ok(Some(vec![Event::DoublingSet { count }]))
}

fn play_card<R>(next: &mut MatchState, seat: Seat, card: Card, rng: &mut R) -> StepResult
where
    R: RngCore + ?Sized,
{
    if next.phase != Phase::TrickPlay || seat != next.turn {
        return Ok(None);
    }
    let led = next.current_trick.lead_suit();
    if !is_legal_trick_play(next.hand(seat), led, card) {
        return Ok(None);
    }

    next.hands[seat.index()].remove(card);
    next.current_trick.play(seat, card)?;
    let mut events = vec![Event::CardPlayed { seat, card }];

    if !next.current_trick.is_complete() {
        next.turn = next.current_trick.expected_seat();
        return Ok(Some(events));
    }

    let contract = next.contract.ok_or(EngineError::NoContract)?;
    let winner = next.current_trick.winner().ok_or(EngineError::NoWinner)?;
    let finished = std::mem::replace(&mut next.current_trick, Trick::new(winner));
    let deltas = score_trick(contract, &finished, winner, next.doubling.as_ref());
    for seat in Seat::LOOP {
        if deltas[seat.index()] != 0 {
            next.award(seat, deltas[seat.index()]);
        }
    }
    next.taken[winner.index()].extend(finished.cards());
    events.push(Event::TrickWon {
        winner,
        trick: finished.plays().to_vec(),
        points: deltas[winner.index()],
    });
    next.trick_history.push(CompletedTrick {
        trick: finished,
        winner,
    });
    next.turn = winner;

    if next.all_hands_empty() {
        finish_deal(next, contract, &mut events, rng);
    }
    Ok(Some(events))
}

/// Per-seat deltas for one captured trick. Doubled cards cost the capturer
/// their penalty a second time and pay it to the doubling holder, unless the
/// holder captured their own card.
pub fn score_trick(
    contract: ContractId,
    trick: &Trick,
    winner: Seat,
    doubling: Option<&DoublingState>,
) -> [i32; 4] {
    let mut deltas = [0; 4];
    deltas[winner.index()] += contract.trick_penalty(trick.cards());

    if let Some(doubling) = doubling {
        for card in trick.cards() {
            let Some(holder) = doubling.holder_of(card) else {
                continue;
            };
            let penalty = contract.card_penalty(card);
            deltas[winner.index()] += penalty;
            if holder != winner {
                deltas[holder.index()] -= penalty;
            }
        }
    }
    deltas
}

fn layout_play<R>(next: &mut MatchState, seat: Seat, card: Card, rng: &mut R) -> StepResult
where
    R: RngCore + ?Sized,
{
    if next.phase != Phase::TrixLayoutPlay || seat != next.turn || !next.hand(seat).contains(card)
    {
        return Ok(None);
    }
    let Some(board) = next.layout.with_card(card) else {
        return Ok(None);
    };

    next.hands[seat.index()].remove(card);
    next.layout = board;
    next.layout_log.push(Play { seat, card });
    next.layout_turns += 1;
    let mut events = vec![Event::LayoutPlayed { seat, card }];

    if next.hand(seat).is_empty() && !next.finish_order.contains(&seat) {
        next.finish_order.push(seat);
        events.push(Event::LayoutOut {
            seat,
            place: next.finish_order.len() as u8,
        });
    }
    reveal_twos_if_due(next, &mut events);

    if next.all_hands_empty() {
        award_placements(next)?;
        finish_deal(next, ContractId::Trix, &mut events, rng);
    } else {
        next.turn = next_seat_with_cards(next, seat);
    }
    Ok(Some(events))
}

fn layout_pass(next: &mut MatchState, seat: Seat) -> StepResult {
    if next.phase != Phase::TrixLayoutPlay || seat != next.turn {
        return Ok(None);
    }
    let hand = next.hand(seat);
    if hand.is_empty() || next.layout.has_legal_play(hand) {
        return Ok(None);
    }
    next.layout_turns += 1;
    let mut events = vec![Event::LayoutPass { seat }];
    reveal_twos_if_due(next, &mut events);
    next.turn = next_seat_with_cards(next, seat);
    Ok(Some(events))
}

fn reveal_twos_if_due(next: &mut MatchState, events: &mut Vec<Event>) {
    if next.config.mode.is_partnership()
        && !next.twos_revealed
        && next.layout_turns >= REVEAL_AFTER_TURNS
    {
        next.twos_revealed = true;
        events.push(Event::TwosRevealed);
    }
}

fn next_seat_with_cards(state: &MatchState, from: Seat) -> Seat {
    let mut seat = from.next();
    for _ in 0..Seat::LOOP.len() {
        if !state.hand(seat).is_empty() {
            return seat;
        }
        seat = seat.next();
    }
    from
}

fn award_placements(next: &mut MatchState) -> Result<(), EngineError> {
    if next.finish_order.len() != Seat::LOOP.len() {
        return Err(EngineError::MissingFinisher);
    }
    let order = next.finish_order.clone();
    for (place, seat) in order.into_iter().enumerate() {
        next.award(seat, LAYOUT_AWARDS[place]);
    }
    Ok(())
}

/// Folds the deal into the log, shrinks the owner's pool and moves on to the
/// next deal, the next kingdom, or the end of the match.
fn finish_deal<R>(next: &mut MatchState, contract: ContractId, events: &mut Vec<Event>, rng: &mut R)
where
    R: RngCore + ?Sized,
{
    let owner = next.kingdom_owner;
    let deltas = next.deal_deltas;
    next.deal_log.push(DealRecord {
        kingdom: next.kingdom_number,
        owner,
        contract,
        deltas,
    });
    next.contracts_remaining[owner.index()].retain(|c| *c != contract);
    events.push(Event::DealEnd { contract, deltas });
    debug!(
        target: "trix_core::engine",
        kingdom = next.kingdom_number,
        owner = %owner,
        contract = %contract,
        ?deltas,
        "deal finished"
    );

    if next.contracts_remaining(owner).is_empty() {
        if next.kingdom_number >= KINGDOM_COUNT {
            next.phase = Phase::GameEnd;
            next.contract = None;
            next.doubling = None;
            events.push(Event::GameEnd {
                scores: *next.scores.standings(),
            });
            return;
        }
        next.kingdom_number += 1;
        next.kingdom_owner = owner.next();
    }
    next.deal_new_hands(rng);
    next.phase = Phase::KingdomPickContract;
}

fn verify_cards(state: &MatchState) -> Result<(), EngineError> {
    if matches!(state.phase, Phase::Setup | Phase::GameEnd) {
        return Ok(());
    }
    let cards = state.accounted_cards();
    let distinct: HashSet<Card> = cards.iter().copied().collect();
    if cards.len() != 52 || distinct.len() != 52 {
        return Err(EngineError::CardAccounting {
            counted: cards.len(),
            distinct: distinct.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::{GameMode, MatchConfig};
    use crate::game::random::seeded_source;
    use crate::model::hand::Hand;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::rules::legal::legal_trick_plays;

    fn started(seed: u64, config: MatchConfig) -> MatchState {
        let mut rng = seeded_source(seed);
        apply(&MatchState::new(config), &Action::StartMatch, &mut rng).state
    }

    fn pick(state: &MatchState, contract: ContractId) -> Transition {
        let mut rng = seeded_source(0);
        apply(
            state,
            &Action::PickContract {
                seat: state.kingdom_owner(),
                contract,
            },
            &mut rng,
        )
    }

    fn first_legal(state: &MatchState) -> Action {
        let seat = state.turn();
        let card = legal_trick_plays(state.hand(seat), state.current_trick().lead_suit())[0];
        Action::PlayCard { seat, card }
    }

    #[test]
    fn start_match_deals_and_emits_start() {
        let mut rng = seeded_source(1);
        let t = apply(
            &MatchState::new(MatchConfig::default()),
            &Action::StartMatch,
            &mut rng,
        );
        assert_eq!(t.events, vec![Event::MatchStart]);
        assert_eq!(t.state.phase(), Phase::KingdomPickContract);
        assert_eq!(t.state.accounted_cards().len(), 52);
    }

    #[test]
    fn reset_emits_reset_and_clears_scores() {
        let mut state = started(2, MatchConfig::default());
        state.scores.add(Seat::East, -75);
        let mut rng = seeded_source(9);
        let t = apply(&state, &Action::ResetMatch, &mut rng);
        assert_eq!(t.events, vec![Event::MatchReset]);
        assert_eq!(t.state.scores().score(Seat::East), 0);
    }

    #[test]
    fn non_owner_pick_is_ignored() {
        let state = started(3, MatchConfig::default());
        let mut rng = seeded_source(0);
        let t = apply(
            &state,
            &Action::PickContract {
                seat: state.kingdom_owner().next(),
                contract: ContractId::Ltoosh,
            },
            &mut rng,
        );
        assert_eq!(t.state, state);
        assert!(t.events.is_empty());
    }

    #[test]
    fn out_of_turn_play_leaves_state_deep_equal() {
        let state = pick(&started(4, MatchConfig::default()), ContractId::Ltoosh).state;
        let wrong = state.turn().next();
        let card = state.hand(wrong).cards()[0];
        let mut rng = seeded_source(0);
        let t = apply(&state, &Action::PlayCard { seat: wrong, card }, &mut rng);
        assert_eq!(t.state, state);
        assert!(t.events.is_empty());
    }

    #[test]
    fn card_not_following_suit_is_ignored() {
        let mut state = pick(&started(5, MatchConfig::default()), ContractId::Diamonds).state;
        let mut rng = seeded_source(0);
        let lead = first_legal(&state);
        state = apply(&state, &lead, &mut rng).state;
        let seat = state.turn();
        let led = state.current_trick().lead_suit().unwrap();
        if state.hand(seat).has_suit(led) {
            if let Some(off) = state.hand(seat).iter().find(|c| c.suit != led).copied() {
                let t = apply(&state, &Action::PlayCard { seat, card: off }, &mut rng);
                assert_eq!(t.state, state);
                assert!(t.events.is_empty());
            }
        }
    }

    #[test]
    fn ltoosh_charges_fifteen_per_trick() {
        let mut state = pick(&started(6, MatchConfig::default()), ContractId::Ltoosh).state;
        let mut rng = seeded_source(0);
        for _ in 0..4 {
            let action = first_legal(&state);
            let t = apply(&state, &action, &mut rng);
            state = t.state;
        }
        let total: i32 = state.scores().standings().iter().sum();
        assert_eq!(total, -15);
        assert_eq!(state.trick_history().len(), 1);
        let winner = state.trick_history()[0].winner;
        assert_eq!(state.turn(), winner);
        assert_eq!(state.taken(winner).len(), 4);
    }

    #[test]
    fn score_trick_diamonds_counts_only_trick_contents() {
        let mut trick = Trick::new(Seat::North);
        trick.play(Seat::North, Card::new(Rank::Five, Suit::Clubs)).unwrap();
        trick.play(Seat::East, Card::new(Rank::Two, Suit::Diamonds)).unwrap();
        trick.play(Seat::South, Card::new(Rank::Nine, Suit::Clubs)).unwrap();
        trick.play(Seat::West, Card::new(Rank::Ace, Suit::Diamonds)).unwrap();
        let deltas = score_trick(ContractId::Diamonds, &trick, Seat::South, None);
        assert_eq!(deltas, [0, 0, -20, 0]);
    }

    #[test]
    fn doubled_king_moves_points_to_holder() {
        let mut hands: [Hand; 4] = Default::default();
        hands[Seat::West.index()] = Hand::with_cards(vec![Card::KING_OF_HEARTS]);
        let mut doubling = DoublingState::open(ContractId::King, &hands, true, false).unwrap();
        doubling.accept(Seat::West, &[Card::KING_OF_HEARTS]);

        let mut trick = Trick::new(Seat::North);
        trick.play(Seat::North, Card::new(Rank::Ace, Suit::Hearts)).unwrap();
        trick.play(Seat::East, Card::new(Rank::Two, Suit::Hearts)).unwrap();
        trick.play(Seat::South, Card::new(Rank::Three, Suit::Hearts)).unwrap();
        trick.play(Seat::West, Card::KING_OF_HEARTS).unwrap();

        let deltas = score_trick(ContractId::King, &trick, Seat::North, Some(&doubling));
        assert_eq!(deltas, [-150, 0, 0, 75]);
    }

    #[test]
    fn self_captured_double_pays_nothing_back() {
        let mut hands: [Hand; 4] = Default::default();
        let queen = Card::new(Rank::Queen, Suit::Spades);
        hands[Seat::North.index()] = Hand::with_cards(vec![queen]);
        let mut doubling = DoublingState::open(ContractId::Queens, &hands, true, false).unwrap();
        doubling.accept(Seat::North, &[queen]);

        let mut trick = Trick::new(Seat::North);
        trick.play(Seat::North, queen).unwrap();
        trick.play(Seat::East, Card::new(Rank::Two, Suit::Spades)).unwrap();
        trick.play(Seat::South, Card::new(Rank::Three, Suit::Spades)).unwrap();
        trick.play(Seat::West, Card::new(Rank::Four, Suit::Clubs)).unwrap();

        let deltas = score_trick(ContractId::Queens, &trick, Seat::North, Some(&doubling));
        assert_eq!(deltas, [-50, 0, 0, 0]);
    }

    #[test]
    fn human_holding_king_gets_prompted() {
        for seed in 0..40 {
            let state = started(seed, MatchConfig::default());
            if state.holder_of(Card::KING_OF_HEARTS) != Some(Seat::South) {
                continue;
            }
            let t = pick(&state, ContractId::King);
            assert_eq!(t.state.phase(), Phase::DoublingDecision);
            assert!(t.events.iter().any(|e| matches!(
                e,
                Event::DoublingPrompt { seat: Seat::South, eligible } if eligible == &vec![Card::KING_OF_HEARTS]
            )));

            let mut rng = seeded_source(0);
            let done = apply(
                &t.state,
                &Action::SetDoubles {
                    cards: vec![Card::KING_OF_HEARTS],
                },
                &mut rng,
            );
            assert_eq!(done.events, vec![Event::DoublingSet { count: 1 }]);
            assert_eq!(done.state.phase(), Phase::TrickPlay);
            return;
        }
        panic!("no seed dealt the king of hearts to south");
    }

    #[test]
    fn king_with_bot_holder_skips_prompt() {
        for seed in 0..40 {
            let state = started(seed, MatchConfig::default());
            if state.holder_of(Card::KING_OF_HEARTS) == Some(Seat::South) {
                continue;
            }
            let t = pick(&state, ContractId::King);
            assert_eq!(t.state.phase(), Phase::TrickPlay);
            assert!(t.events.iter().any(|e| matches!(e, Event::DoublingSet { .. })));
            assert!(!t.state.doubling().unwrap().is_pending());
            return;
        }
        panic!("every seed dealt the king of hearts to south");
    }

    #[test]
    fn set_doubles_outside_doubling_is_ignored() {
        let state = started(8, MatchConfig::default());
        let mut rng = seeded_source(0);
        let t = apply(
            &state,
            &Action::SetDoubles {
                cards: vec![Card::KING_OF_HEARTS],
            },
            &mut rng,
        );
        assert_eq!(t.state, state);
        assert!(t.events.is_empty());
    }

    #[test]
    fn layout_pass_requires_no_legal_move() {
        let state = pick(&started(10, MatchConfig::default()), ContractId::Trix).state;
        let seat = state.turn();
        let mut rng = seeded_source(0);
        let t = apply(&state, &Action::LayoutPass { seat }, &mut rng);
        if state.layout().has_legal_play(state.hand(seat)) {
            assert_eq!(t.state, state);
            assert!(t.events.is_empty());
        } else {
            assert_eq!(t.events, vec![Event::LayoutPass { seat }]);
            assert_ne!(t.state.turn(), seat);
        }
    }

    #[test]
    fn partnership_reveals_twos_after_four_turns() {
        let config = MatchConfig {
            mode: GameMode::Partnership,
            ..MatchConfig::default()
        };
        let mut state = pick(&started(12, config), ContractId::Trix).state;
        let mut rng = seeded_source(0);
        let mut turns = 0;
        while turns < 4 {
            assert!(!state.twos_revealed());
            let seat = state.turn();
            let action = state.legal_actions(seat).remove(0);
            let t = apply(&state, &action, &mut rng);
            turns += 1;
            if turns == 4 {
                assert!(t.events.contains(&Event::TwosRevealed));
            }
            state = t.state;
        }
        assert!(state.twos_revealed());
        let twos_held = state
            .hands
            .iter()
            .flat_map(|h| h.iter())
            .filter(|c| c.rank == Rank::Two)
            .count();
        assert_eq!(state.revealed_cards().len(), twos_held);
    }

    #[test]
    fn internal_failure_keeps_prior_state_and_reports() {
        let mut state = pick(&started(14, MatchConfig::default()), ContractId::Diamonds).state;
        let mut rng = seeded_source(0);
        for _ in 0..3 {
            let action = first_legal(&state);
            state = apply(&state, &action, &mut rng).state;
        }
        state.contract = None;
        let action = first_legal(&state);
        let Action::PlayCard { seat, card } = action.clone() else {
            unreachable!()
        };

        let t = apply(&state, &action, &mut rng);
        assert_eq!(t.events.len(), 1);
        assert!(matches!(&t.events[0], Event::Error { message } if message.contains("no contract")));
        assert!(t.state.hand(seat).contains(card));
        assert_eq!(t.state.current_trick(), state.current_trick());
        assert_eq!(t.state.message(), Some("no contract is active for this deal"));

        let mut expected = state.clone();
        expected.message = t.state.message.clone();
        assert_eq!(t.state, expected);
    }

    #[test]
    fn corrupted_card_accounting_is_reported() {
        let mut state = pick(&started(15, MatchConfig::default()), ContractId::Ltoosh).state;
        let seat = state.turn();
        let stolen = state.hand(seat.next()).cards()[0];
        state.hands[seat.next().index()].remove(stolen);
        let mut rng = seeded_source(0);
        let action = first_legal(&state);
        let t = apply(&state, &action, &mut rng);
        assert!(matches!(t.events.as_slice(), [Event::Error { .. }]));
        assert_eq!(t.state.hand(seat), state.hand(seat));
    }
}
