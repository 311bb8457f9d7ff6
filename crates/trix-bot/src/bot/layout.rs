use super::{BotContext, BotDifficulty, best_by_score, count_cards_in_suit};
use rand::Rng;
use rand::seq::SliceRandom;
use trix_core::model::card::Card;
use trix_core::model::rank::Rank;
use trix_core::rules::LayoutBoard;

/// Card choice for the layout contract. `None` means pass, which only
/// happens when nothing fits the board.
pub struct LayoutPlanner;

impl LayoutPlanner {
    pub fn choose<R>(legal: &[Card], ctx: &BotContext<'_>, rng: &mut R) -> Option<Card>
    where
        R: Rng + ?Sized,
    {
        if legal.len() <= 1 {
            return legal.first().copied();
        }
        match ctx.difficulty {
            BotDifficulty::Easy => legal.choose(rng).copied(),
            BotDifficulty::Moderate => best_by_score(legal, |card| {
                count_cards_in_suit(ctx.hand(), card.suit) as i32
                    * ctx.params.layout_long_suit_weight
            }),
            BotDifficulty::Hard => best_by_score(legal, |card| hard_score(card, ctx)),
        }
    }
}

fn hard_score(card: Card, ctx: &BotContext<'_>) -> i32 {
    let params = ctx.params;
    let board = ctx.view.layout();
    let mut score = unlocked_by(card, board, ctx) as i32 * params.layout_unlock_weight;
    if card.rank == Rank::Jack {
        score += params.layout_jack_bonus;
    }
    score
}

/// How many of our other cards become playable once `card` is laid.
pub(crate) fn unlocked_by(card: Card, board: &LayoutBoard, ctx: &BotContext<'_>) -> usize {
    let Some(next) = board.with_card(card) else {
        return 0;
    };
    ctx.hand()
        .iter()
        .filter(|other| **other != card)
        .filter(|other| next.is_legal(**other) && !board.is_legal(**other))
        .count()
}
