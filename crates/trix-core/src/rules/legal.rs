use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::model::trick::Trick;

/// Follow suit if possible, otherwise anything goes. With nothing led the whole
/// hand is playable.
pub fn legal_trick_plays(hand: &Hand, led_suit: Option<Suit>) -> Vec<Card> {
    match led_suit {
        Some(suit) if hand.has_suit(suit) => hand
            .iter()
            .copied()
            .filter(|card| card.suit == suit)
            .collect(),
        _ => hand.cards().to_vec(),
    }
}

pub fn is_legal_trick_play(hand: &Hand, led_suit: Option<Suit>, card: Card) -> bool {
    if !hand.contains(card) {
        return false;
    }
    match led_suit {
        Some(suit) => card.suit == suit || !hand.has_suit(suit),
        None => true,
    }
}

/// Rank used when comparing cards inside a trick: Ace is 14.
pub fn comparison_rank(card: Card) -> u8 {
    card.rank.value()
}

/// Winner of a complete trick. Off-suit discards never win; there are no trumps.
pub fn trick_winner(trick: &Trick) -> Option<Seat> {
    trick.winner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rank::Rank;

    fn hand(cards: &[(Rank, Suit)]) -> Hand {
        Hand::with_cards(cards.iter().map(|(r, s)| Card::new(*r, *s)).collect())
    }

    #[test]
    fn leading_allows_whole_hand() {
        let h = hand(&[(Rank::Two, Suit::Clubs), (Rank::King, Suit::Hearts)]);
        assert_eq!(legal_trick_plays(&h, None).len(), 2);
    }

    #[test]
    fn must_follow_led_suit_when_possible() {
        let h = hand(&[
            (Rank::Two, Suit::Clubs),
            (Rank::Nine, Suit::Clubs),
            (Rank::King, Suit::Hearts),
        ]);
        let legal = legal_trick_plays(&h, Some(Suit::Clubs));
        assert_eq!(legal.len(), 2);
        assert!(legal.iter().all(|c| c.suit == Suit::Clubs));
        assert!(!is_legal_trick_play(&h, Some(Suit::Clubs), Card::KING_OF_HEARTS));
    }

    #[test]
    fn void_hand_may_discard_anything() {
        let h = hand(&[(Rank::Two, Suit::Clubs), (Rank::King, Suit::Hearts)]);
        let legal = legal_trick_plays(&h, Some(Suit::Diamonds));
        assert_eq!(legal, h.cards().to_vec());
        assert!(is_legal_trick_play(&h, Some(Suit::Diamonds), Card::KING_OF_HEARTS));
    }

    #[test]
    fn comparison_rank_puts_ace_on_top() {
        assert_eq!(comparison_rank(Card::new(Rank::Ace, Suit::Clubs)), 14);
        assert!(
            comparison_rank(Card::new(Rank::Ace, Suit::Clubs))
                > comparison_rank(Card::new(Rank::King, Suit::Clubs))
        );
    }

    #[test]
    fn not_held_card_is_never_legal() {
        let h = hand(&[(Rank::Two, Suit::Clubs)]);
        assert!(!is_legal_trick_play(&h, None, Card::KING_OF_HEARTS));
    }
}
