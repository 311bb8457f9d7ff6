use crate::model::card::Card;
use crate::model::suit::Suit;
use std::cmp::Ordering;
use std::vec::Vec;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

/// Display order: suit first, then comparison rank ascending (Ace high).
pub fn display_order(a: &Card, b: &Card) -> Ordering {
    a.suit.cmp(&b.suit).then(a.rank.cmp(&b.rank))
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|card| card.suit == suit)
    }

    pub fn count_suit(&self, suit: Suit) -> usize {
        self.cards.iter().filter(|card| card.suit == suit).count()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn sort(&mut self) {
        self.cards.sort_by(display_order);
    }
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn add_and_remove_cards() {
        let mut hand = Hand::new();
        let card = Card::new(Rank::Three, Suit::Clubs);
        hand.add(card);
        assert!(hand.contains(card));
        assert!(hand.remove(card));
        assert!(!hand.contains(card));
        assert!(!hand.remove(card));
    }

    #[test]
    fn cards_are_sorted_by_suit_then_comparison_rank() {
        let mut hand = Hand::new();
        hand.add(Card::new(Rank::King, Suit::Clubs));
        hand.add(Card::new(Rank::Two, Suit::Spades));
        hand.add(Card::new(Rank::Ace, Suit::Spades));
        hand.add(Card::new(Rank::Ten, Suit::Hearts));
        let ordered: Vec<_> = hand.iter().copied().collect();
        assert_eq!(
            ordered,
            vec![
                Card::new(Rank::Two, Suit::Spades),
                Card::new(Rank::Ace, Suit::Spades),
                Card::new(Rank::Ten, Suit::Hearts),
                Card::new(Rank::King, Suit::Clubs),
            ]
        );
    }

    #[test]
    fn suit_queries() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Two, Suit::Diamonds),
            Card::new(Rank::Nine, Suit::Diamonds),
            Card::new(Rank::Ace, Suit::Clubs),
        ]);
        assert!(hand.has_suit(Suit::Diamonds));
        assert!(!hand.has_suit(Suit::Hearts));
        assert_eq!(hand.count_suit(Suit::Diamonds), 2);
    }
}
