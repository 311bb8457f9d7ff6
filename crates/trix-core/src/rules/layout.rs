//! Layout (trix) progression. Each suit is opened with its Jack and grows
//! downward to the 2 and upward through Q, K to the Ace.

use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

const JACK_FACE: u8 = 11;

/// Progress of one suit, tracked in face values (Ace = 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitProgress {
    pub started: bool,
    pub low: u8,
    pub high: u8,
}

impl Default for SuitProgress {
    fn default() -> Self {
        Self {
            started: false,
            low: JACK_FACE,
            high: JACK_FACE,
        }
    }
}

impl SuitProgress {
    /// Next rank on the downward side, `None` once the 2 is down.
    pub fn next_low(&self) -> Option<u8> {
        (self.started && self.low > 2).then(|| self.low - 1)
    }

    /// Next rank on the upward side: K is followed by A, A closes the side.
    pub fn next_high(&self) -> Option<u8> {
        if !self.started {
            return None;
        }
        match self.high {
            13 => Some(1),
            1 => None,
            other => Some(other + 1),
        }
    }

    pub fn accepts(&self, rank: Rank) -> bool {
        let face = rank.face();
        if !self.started {
            return face == JACK_FACE;
        }
        self.next_low() == Some(face) || self.next_high() == Some(face)
    }

    pub fn is_complete(&self) -> bool {
        self.started && self.low == 2 && self.high == 1
    }

    /// Returns the progressed value, or `None` if the rank is not playable.
    pub fn advanced(self, rank: Rank) -> Option<SuitProgress> {
        let face = rank.face();
        if !self.started {
            return (face == JACK_FACE).then_some(SuitProgress {
                started: true,
                low: JACK_FACE,
                high: JACK_FACE,
            });
        }
        if self.next_low() == Some(face) {
            Some(SuitProgress { low: face, ..self })
        } else if self.next_high() == Some(face) {
            Some(SuitProgress { high: face, ..self })
        } else {
            None
        }
    }

    /// Cards already laid down in this suit.
    pub fn laid_cards(&self, suit: Suit) -> Vec<Card> {
        if !self.started {
            return Vec::new();
        }
        let mut faces: Vec<u8> = (self.low..=JACK_FACE).collect();
        let mut upper = JACK_FACE;
        while upper != self.high {
            upper = if upper == 13 { 1 } else { upper + 1 };
            faces.push(upper);
        }
        faces
            .into_iter()
            .filter_map(Rank::from_face)
            .map(|rank| Card::new(rank, suit))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutBoard {
    suits: [SuitProgress; 4],
}

impl LayoutBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self, suit: Suit) -> SuitProgress {
        self.suits[suit.index()]
    }

    pub fn is_legal(&self, card: Card) -> bool {
        self.progress(card.suit).accepts(card.rank)
    }

    pub fn legal_plays(&self, hand: &Hand) -> Vec<Card> {
        hand.iter().copied().filter(|c| self.is_legal(*c)).collect()
    }

    pub fn has_legal_play(&self, hand: &Hand) -> bool {
        hand.iter().any(|card| self.is_legal(*card))
    }

    /// Board after laying `card`, or `None` if the card does not fit.
    pub fn with_card(&self, card: Card) -> Option<LayoutBoard> {
        let advanced = self.progress(card.suit).advanced(card.rank)?;
        let mut suits = self.suits;
        suits[card.suit.index()] = advanced;
        Some(LayoutBoard { suits })
    }

    pub fn is_complete(&self) -> bool {
        self.suits.iter().all(SuitProgress::is_complete)
    }

    pub fn laid_cards(&self) -> Vec<Card> {
        Suit::ALL
            .iter()
            .flat_map(|suit| self.progress(*suit).laid_cards(*suit))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn only_jack_opens_a_suit() {
        let board = LayoutBoard::new();
        assert!(board.is_legal(card(Rank::Jack, Suit::Hearts)));
        assert!(!board.is_legal(card(Rank::Ten, Suit::Hearts)));
        assert!(!board.is_legal(card(Rank::Queen, Suit::Hearts)));
    }

    #[test]
    fn started_suit_accepts_both_neighbours() {
        let board = LayoutBoard::new()
            .with_card(card(Rank::Jack, Suit::Spades))
            .unwrap();
        assert!(board.is_legal(card(Rank::Ten, Suit::Spades)));
        assert!(board.is_legal(card(Rank::Queen, Suit::Spades)));
        assert!(!board.is_legal(card(Rank::Jack, Suit::Spades)));
        assert!(!board.is_legal(card(Rank::Nine, Suit::Spades)));
        assert!(!board.is_legal(card(Rank::King, Suit::Spades)));
    }

    #[test]
    fn king_is_followed_by_ace_and_ace_closes() {
        let mut board = LayoutBoard::new();
        for rank in [Rank::Jack, Rank::Queen, Rank::King] {
            board = board.with_card(card(rank, Suit::Clubs)).unwrap();
        }
        assert!(board.is_legal(card(Rank::Ace, Suit::Clubs)));
        board = board.with_card(card(Rank::Ace, Suit::Clubs)).unwrap();
        assert_eq!(board.progress(Suit::Clubs).next_high(), None);
        assert!(board.is_legal(card(Rank::Ten, Suit::Clubs)));
        assert!(!board.is_legal(card(Rank::Two, Suit::Clubs)));
    }

    #[test]
    fn downward_side_closes_at_two() {
        let mut board = LayoutBoard::new()
            .with_card(card(Rank::Jack, Suit::Diamonds))
            .unwrap();
        for face in (2..=10).rev() {
            let rank = Rank::from_face(face).unwrap();
            board = board.with_card(card(rank, Suit::Diamonds)).unwrap();
        }
        let progress = board.progress(Suit::Diamonds);
        assert_eq!(progress.low, 2);
        assert_eq!(progress.next_low(), None);
        assert!(!progress.is_complete());
    }

    #[test]
    fn full_suit_completes_and_lists_all_cards() {
        let mut board = LayoutBoard::new();
        let order = [11, 10, 12, 9, 13, 8, 1, 7, 6, 5, 4, 3, 2];
        for face in order {
            let rank = Rank::from_face(face).unwrap();
            board = board.with_card(card(rank, Suit::Hearts)).unwrap();
        }
        assert!(board.progress(Suit::Hearts).is_complete());
        assert_eq!(board.laid_cards().len(), 13);
        assert!(!board.is_complete());
    }

    #[test]
    fn illegal_card_leaves_board_unchanged() {
        let board = LayoutBoard::new();
        assert_eq!(board.with_card(card(Rank::Two, Suit::Spades)), None);
        assert_eq!(board, LayoutBoard::new());
    }
}
