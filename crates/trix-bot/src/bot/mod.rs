mod contract;
mod doubling;
mod layout;
mod params;
mod play;
mod tracker;

pub use contract::ContractPlanner;
pub use doubling::DoublingPlanner;
pub use layout::LayoutPlanner;
pub use params::BotParams;
pub use play::PlayPlanner;
pub use tracker::VoidTracker;

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use trix_core::game::PlayerView;
use trix_core::model::card::Card;
use trix_core::model::hand::Hand;
use trix_core::model::seat::Seat;
use trix_core::model::suit::Suit;
use trix_core::rules::ContractId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BotDifficulty {
    Easy,
    #[default]
    Moderate,
    Hard,
}

impl BotDifficulty {
    pub const ALL: [BotDifficulty; 3] = [
        BotDifficulty::Easy,
        BotDifficulty::Moderate,
        BotDifficulty::Hard,
    ];

    /// Reads `TRIX_BOT_DIFFICULTY` once per process. Unknown values fall back
    /// to the default tier.
    pub fn from_env() -> Self {
        static CACHED: OnceLock<BotDifficulty> = OnceLock::new();
        *CACHED.get_or_init(|| {
            std::env::var("TRIX_BOT_DIFFICULTY")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default()
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BotDifficulty::Easy => "easy",
            BotDifficulty::Moderate => "moderate",
            BotDifficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown bot difficulty '{}'", self.0)
    }
}

impl std::error::Error for UnknownDifficulty {}

impl FromStr for BotDifficulty {
    type Err = UnknownDifficulty;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(BotDifficulty::Easy),
            "moderate" | "normal" | "default" => Ok(BotDifficulty::Moderate),
            "hard" => Ok(BotDifficulty::Hard),
            other => Err(UnknownDifficulty(other.to_string())),
        }
    }
}

/// Everything a planner may consult for one decision.
#[derive(Debug, Clone)]
pub struct BotContext<'a> {
    pub view: &'a PlayerView,
    pub difficulty: BotDifficulty,
    pub params: &'a BotParams,
    tracker: VoidTracker,
}

impl<'a> BotContext<'a> {
    pub fn new(view: &'a PlayerView, difficulty: BotDifficulty, params: &'a BotParams) -> Self {
        let tracker = VoidTracker::from_view(view);
        Self {
            view,
            difficulty,
            params,
            tracker,
        }
    }

    pub fn seat(&self) -> Seat {
        self.view.seat()
    }

    pub fn hand(&self) -> &'a Hand {
        self.view.hand()
    }

    pub fn contract(&self) -> Option<ContractId> {
        self.view.contract()
    }

    pub fn tracker(&self) -> &VoidTracker {
        &self.tracker
    }

    /// Seats playing against us: everyone but ourselves and our partner.
    pub fn opponents(&self) -> impl Iterator<Item = Seat> + '_ {
        Seat::LOOP
            .into_iter()
            .filter(move |seat| *seat != self.seat() && !self.view.is_partner(*seat))
    }
}

pub(crate) fn count_cards_in_suit(hand: &Hand, suit: Suit) -> usize {
    hand.iter().filter(|card| card.suit == suit).count()
}

pub(crate) fn card_sort_key(card: Card) -> (u8, u8) {
    (card.suit.index() as u8, card.rank.value())
}

/// Picks the highest-scoring card; ties go to the lower sort key so repeated
/// runs choose identically.
pub(crate) fn best_by_score<F>(cards: &[Card], mut score: F) -> Option<Card>
where
    F: FnMut(Card) -> i32,
{
    let mut best: Option<(Card, i32)> = None;
    for &card in cards {
        let value = score(card);
        match best {
            Some((best_card, best_value))
                if value < best_value
                    || (value == best_value && card_sort_key(card) >= card_sort_key(best_card)) => {}
            _ => best = Some((card, value)),
        }
    }
    best.map(|(card, _)| card)
}
