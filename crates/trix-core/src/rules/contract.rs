use crate::model::card::Card;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    Trick,
    Layout,
}

/// The fixed contract catalog, declared in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractId {
    King,
    Queens,
    Diamonds,
    Ltoosh,
    Trix,
}

pub const KING_PENALTY: i32 = -75;
pub const QUEEN_PENALTY: i32 = -25;
pub const DIAMOND_PENALTY: i32 = -10;
pub const LTOOSH_PENALTY: i32 = -15;
pub const LAYOUT_AWARDS: [i32; 4] = [200, 150, 100, 50];

impl ContractId {
    pub const CATALOG: [ContractId; 5] = [
        ContractId::King,
        ContractId::Queens,
        ContractId::Diamonds,
        ContractId::Ltoosh,
        ContractId::Trix,
    ];

    pub const fn kind(self) -> ContractKind {
        match self {
            ContractId::Trix => ContractKind::Layout,
            _ => ContractKind::Trick,
        }
    }

    pub const fn is_layout(self) -> bool {
        matches!(self.kind(), ContractKind::Layout)
    }

    pub const fn catalog_index(self) -> usize {
        match self {
            ContractId::King => 0,
            ContractId::Queens => 1,
            ContractId::Diamonds => 2,
            ContractId::Ltoosh => 3,
            ContractId::Trix => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ContractId::King => "king",
            ContractId::Queens => "queens",
            ContractId::Diamonds => "diamonds",
            ContractId::Ltoosh => "ltoosh",
            ContractId::Trix => "trix",
        }
    }

    /// Penalty a single captured card carries before any doubling.
    pub fn card_penalty(self, card: Card) -> i32 {
        match self {
            ContractId::King if card.is_king_of_hearts() => KING_PENALTY,
            ContractId::Queens if card.is_queen() => QUEEN_PENALTY,
            ContractId::Diamonds if card.suit == Suit::Diamonds => DIAMOND_PENALTY,
            _ => 0,
        }
    }

    /// Whether `card` is one the contract punishes its capturer for.
    pub fn is_penalty_card(self, card: Card) -> bool {
        self.card_penalty(card) != 0
    }

    /// Base penalty of a trick captured under this contract.
    pub fn trick_penalty<I>(self, cards: I) -> i32
    where
        I: IntoIterator<Item = Card>,
    {
        match self {
            ContractId::Ltoosh => LTOOSH_PENALTY,
            ContractId::Trix => 0,
            _ => cards.into_iter().map(|card| self.card_penalty(card)).sum(),
        }
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "king" | "king_of_hearts" => Ok(ContractId::King),
            "queens" => Ok(ContractId::Queens),
            "diamonds" => Ok(ContractId::Diamonds),
            "ltoosh" | "tricks" => Ok(ContractId::Ltoosh),
            "trix" | "layout" => Ok(ContractId::Trix),
            other => Err(format!("unknown contract '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rank::Rank;

    #[test]
    fn catalog_order_matches_index() {
        for (index, contract) in ContractId::CATALOG.iter().enumerate() {
            assert_eq!(contract.catalog_index(), index);
        }
        let mut sorted = ContractId::CATALOG;
        sorted.sort();
        assert_eq!(sorted, ContractId::CATALOG);
    }

    #[test]
    fn only_trix_is_layout() {
        let layouts: Vec<_> = ContractId::CATALOG
            .iter()
            .filter(|c| c.is_layout())
            .collect();
        assert_eq!(layouts, vec![&ContractId::Trix]);
    }

    #[test]
    fn diamonds_penalty_counts_diamonds_only() {
        let cards = [
            Card::new(Rank::Two, Suit::Diamonds),
            Card::new(Rank::Ace, Suit::Diamonds),
            Card::new(Rank::Queen, Suit::Spades),
            Card::KING_OF_HEARTS,
        ];
        assert_eq!(ContractId::Diamonds.trick_penalty(cards), -20);
        assert_eq!(ContractId::Queens.trick_penalty(cards), -25);
        assert_eq!(ContractId::King.trick_penalty(cards), -75);
        assert_eq!(ContractId::Ltoosh.trick_penalty(cards), -15);
        assert_eq!(ContractId::Trix.trick_penalty(cards), 0);
    }

    #[test]
    fn ltoosh_is_flat_even_for_empty_tricks() {
        assert_eq!(ContractId::Ltoosh.trick_penalty(std::iter::empty()), -15);
    }

    #[test]
    fn parses_names() {
        for contract in ContractId::CATALOG {
            assert_eq!(contract.as_str().parse::<ContractId>(), Ok(contract));
        }
        assert!("hearts".parse::<ContractId>().is_err());
    }
}
