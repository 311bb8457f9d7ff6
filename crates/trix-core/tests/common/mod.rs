//! Shared proptest configuration and card generators for the integration suites.

#![allow(dead_code)]

use proptest::prelude::*;
use trix_core::model::card::Card;
use trix_core::model::deck::Deck;
use trix_core::model::hand::Hand;
use trix_core::model::seat::Seat;
use trix_core::model::suit::Suit;

/// Case count comes from `PROPTEST_CASES` (default 32); failures are not persisted.
pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(32)
        .max(1);
    ProptestConfig {
        cases,
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

/// Same knobs, but capped for properties that play whole matches.
pub fn match_config() -> ProptestConfig {
    let base = proptest_config();
    ProptestConfig {
        cases: base.cases.min(6),
        ..base
    }
}

pub fn seat() -> impl Strategy<Value = Seat> {
    prop_oneof![
        Just(Seat::North),
        Just(Seat::East),
        Just(Seat::South),
        Just(Seat::West),
    ]
}

pub fn suit() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Spades),
        Just(Suit::Hearts),
        Just(Suit::Diamonds),
        Just(Suit::Clubs),
    ]
}

/// `count` distinct cards in random order.
pub fn distinct_cards(count: usize) -> impl Strategy<Value = Vec<Card>> {
    proptest::sample::subsequence(Deck::standard().cards().to_vec(), count).prop_shuffle()
}

/// Up to thirteen distinct cards, possibly empty.
pub fn hand() -> impl Strategy<Value = Hand> {
    (0usize..=13)
        .prop_flat_map(distinct_cards)
        .prop_map(Hand::with_cards)
}

/// A leader and the four cards played from that seat clockwise.
pub fn full_trick() -> impl Strategy<Value = (Seat, Vec<Card>)> {
    (seat(), distinct_cards(4))
}

/// The whole deck in random order.
pub fn shuffled_deck() -> impl Strategy<Value = Vec<Card>> {
    Just(Deck::standard().cards().to_vec()).prop_shuffle()
}
