use super::{BotContext, BotDifficulty, best_by_score, count_cards_in_suit};
use rand::Rng;
use rand::seq::SliceRandom;
use trix_core::model::card::Card;
use trix_core::model::rank::Rank;
use trix_core::model::seat::Seat;
use trix_core::model::suit::Suit;
use trix_core::rules::ContractId;

/// Card choice for the four trick-taking contracts.
pub struct PlayPlanner;

impl PlayPlanner {
    pub fn choose<R>(legal: &[Card], ctx: &BotContext<'_>, rng: &mut R) -> Option<Card>
    where
        R: Rng + ?Sized,
    {
        if legal.len() <= 1 {
            return legal.first().copied();
        }
        let Some(contract) = ctx.contract() else {
            return legal.first().copied();
        };

        match ctx.difficulty {
            BotDifficulty::Easy => easy_pick(legal, ctx, rng),
            BotDifficulty::Moderate | BotDifficulty::Hard => {
                best_by_score(legal, |card| score_candidate(card, contract, ctx))
            }
        }
    }
}

fn easy_pick<R>(legal: &[Card], ctx: &BotContext<'_>, rng: &mut R) -> Option<Card>
where
    R: Rng + ?Sized,
{
    let following = ctx
        .view
        .led_suit()
        .is_some_and(|lead| legal.iter().all(|card| card.suit == lead));
    if following && rng.gen_range(0..100) < ctx.params.easy_low_bias_pct {
        let mut ordered = legal.to_vec();
        ordered.sort_by_key(|card| card.rank);
        let idx = rng
            .gen_range(0..ordered.len())
            .min(rng.gen_range(0..ordered.len()));
        return Some(ordered[idx]);
    }
    legal.choose(rng).copied()
}

pub(crate) fn score_candidate(card: Card, contract: ContractId, ctx: &BotContext<'_>) -> i32 {
    match ctx.view.led_suit() {
        None => lead_score(card, contract, ctx),
        Some(lead) if card.suit == lead => follow_score(card, contract, ctx),
        Some(_) => discard_score(card, contract, ctx),
    }
}

fn lead_score(card: Card, contract: ContractId, ctx: &BotContext<'_>) -> i32 {
    let params = ctx.params;
    let mut score = card.rank.value() as i32 * params.play_lead_rank_mult;

    if contract.is_penalty_card(card) {
        score += params.play_lead_penalty_suit * 2;
    }

    match contract {
        ContractId::Diamonds if card.suit == Suit::Diamonds => {
            score += params.play_lead_penalty_suit;
        }
        ContractId::King if card.suit == Suit::Hearts && !king_is_gone(ctx) => {
            score += params.play_lead_penalty_suit;
        }
        ContractId::Queens if card.rank > Rank::Queen && queen_is_out(ctx, card.suit) => {
            score += params.play_lead_exposed_honour;
        }
        _ => {}
    }

    if ctx.difficulty == BotDifficulty::Hard {
        let voids = ctx.tracker().void_count(ctx.opponents(), card.suit) as i32;
        score += voids * params.play_lead_void_bonus;
    }
    score
}

fn follow_score(card: Card, contract: ContractId, ctx: &BotContext<'_>) -> i32 {
    let params = ctx.params;
    let trick = ctx.view.current_trick();
    let rank = card.rank.value() as i32;
    let Some(winning) = trick.current_winner() else {
        return 0;
    };

    if card.rank < winning.card.rank {
        let mut score = 50 + rank * params.play_duck_rank_mult;
        let penalty = -contract.card_penalty(card);
        if penalty > 0 {
            score += if ctx.view.is_partner(winning.seat) {
                params.play_partner_dump_penalty
            } else {
                penalty * params.play_dump_penalty_mult
            };
        }
        return score;
    }

    let cost = -(contract.trick_penalty(trick.cards()) + contract.card_penalty(card));
    let mut score = -cost * params.play_capture_penalty_mult;
    if effectively_last(ctx) {
        score += rank;
    } else {
        score -= rank * params.play_duck_rank_mult;
    }
    score
}

fn discard_score(card: Card, contract: ContractId, ctx: &BotContext<'_>) -> i32 {
    let params = ctx.params;
    let mut score = 20 + card.rank.value() as i32;
    let penalty = -contract.card_penalty(card);
    if penalty > 0 {
        score += if ctx.view.partner_winning() {
            params.play_partner_dump_penalty
        } else {
            penalty * params.play_dump_penalty_mult
        };
    }
    if ctx.difficulty == BotDifficulty::Hard && count_cards_in_suit(ctx.hand(), card.suit) == 1 {
        score += params.play_lead_void_bonus / 2;
    }
    score
}

/// True when nobody still to act can take the trick off us: we are fourth, or
/// the hard tier knows every remaining seat is void in the led suit.
fn effectively_last(ctx: &BotContext<'_>) -> bool {
    let trick = ctx.view.current_trick();
    if trick.plays().len() == 3 {
        return true;
    }
    if ctx.difficulty != BotDifficulty::Hard {
        return false;
    }
    let Some(lead) = trick.lead_suit() else {
        return false;
    };
    let still_to_act = 3 - trick.plays().len();
    let mut seat: Seat = ctx.seat().next();
    for _ in 0..still_to_act {
        if !ctx.tracker().is_void(seat, lead) {
            return false;
        }
        seat = seat.next();
    }
    true
}

fn king_is_gone(ctx: &BotContext<'_>) -> bool {
    ctx.view.played_cards().contains(&Card::KING_OF_HEARTS)
}

/// The queen of `suit` is neither ours nor played yet.
fn queen_is_out(ctx: &BotContext<'_>, suit: Suit) -> bool {
    let queen = Card::new(Rank::Queen, suit);
    !ctx.hand().contains(queen) && !ctx.view.played_cards().contains(&queen)
}
