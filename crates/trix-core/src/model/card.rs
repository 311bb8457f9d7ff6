use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const KING_OF_HEARTS: Card = Card::new(Rank::King, Suit::Hearts);
    pub const SEVEN_OF_HEARTS: Card = Card::new(Rank::Seven, Suit::Hearts);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn is_king_of_hearts(self) -> bool {
        matches!(self.rank, Rank::King) && matches!(self.suit, Suit::Hearts)
    }

    pub const fn is_queen(self) -> bool {
        matches!(self.rank, Rank::Queen)
    }

    pub const fn is_jack(self) -> bool {
        matches!(self.rank, Rank::Jack)
    }

    /// Short key such as `KH` or `10D`.
    pub fn key(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardParseError(String);

impl fmt::Display for CardParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid card key '{}'", self.0)
    }
}

impl std::error::Error for CardParseError {}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();
        let err = || CardParseError(raw.to_string());
        let suit_char = text.chars().last().ok_or_else(err)?;
        let suit = Suit::from_symbol(suit_char).ok_or_else(err)?;
        let rank_text = &text[..text.len() - suit_char.len_utf8()];
        let rank = match rank_text.to_ascii_uppercase().as_str() {
            "A" | "1" => Rank::Ace,
            "K" => Rank::King,
            "Q" => Rank::Queen,
            "J" => Rank::Jack,
            "T" => Rank::Ten,
            digits => digits
                .parse::<u8>()
                .ok()
                .and_then(Rank::from_value)
                .ok_or_else(err)?,
        };
        Ok(Card::new(rank, suit))
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, Rank, Suit};

    #[test]
    fn king_of_hearts_identified() {
        assert!(Card::KING_OF_HEARTS.is_king_of_hearts());
        assert!(!Card::new(Rank::King, Suit::Spades).is_king_of_hearts());
        assert!(!Card::new(Rank::Queen, Suit::Hearts).is_king_of_hearts());
    }

    #[test]
    fn keys_parse_back() {
        for key in ["KH", "10D", "AS", "2C", "JH"] {
            let card: Card = key.parse().unwrap();
            assert_eq!(card.key(), key);
        }
        assert_eq!("td".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Diamonds));
    }

    #[test]
    fn malformed_keys_are_rejected() {
        for key in ["", "H", "1X", "15S", "ZZ"] {
            assert!(key.parse::<Card>().is_err(), "{key} should not parse");
        }
    }
}
