use crate::model::seat::Seat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Solo,
    Partnership,
}

impl GameMode {
    pub const fn is_partnership(self) -> bool {
        matches!(self, GameMode::Partnership)
    }
}

/// Optional house rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleProfile {
    /// Queens may be doubled in the queens contract.
    pub queen_doubling: bool,
    /// Doubling choices are hidden from the other seats.
    pub closed_doubling: bool,
}

impl Default for RuleProfile {
    fn default() -> Self {
        Self {
            queen_doubling: true,
            closed_doubling: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub mode: GameMode,
    pub human_seat: Seat,
    pub rules: RuleProfile,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Solo,
            human_seat: Seat::South,
            rules: RuleProfile::default(),
        }
    }
}

impl MatchConfig {
    pub fn partnership() -> Self {
        Self {
            mode: GameMode::Partnership,
            ..Self::default()
        }
    }

    pub fn is_human(&self, seat: Seat) -> bool {
        self.human_seat == seat
    }

    pub fn partner_of(&self, seat: Seat) -> Option<Seat> {
        self.mode.is_partnership().then(|| seat.partner())
    }
}
