//! Action and event vocabulary exchanged with the orchestrator.

use crate::model::card::Card;
use crate::model::seat::Seat;
use crate::model::trick::Play;
use crate::rules::contract::ContractId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    StartMatch,
    ResetMatch,
    PickContract { seat: Seat, contract: ContractId },
    SetDoubles { cards: Vec<Card> },
    PlayCard { seat: Seat, card: Card },
    LayoutPlay { seat: Seat, card: Card },
    LayoutPass { seat: Seat },
}

impl Action {
    /// Seat the action is submitted for, when it names one.
    pub fn seat(&self) -> Option<Seat> {
        match self {
            Action::PickContract { seat, .. }
            | Action::PlayCard { seat, .. }
            | Action::LayoutPlay { seat, .. }
            | Action::LayoutPass { seat } => Some(*seat),
            Action::StartMatch | Action::ResetMatch | Action::SetDoubles { .. } => None,
        }
    }
}

/// Informational events. They never feed back into engine logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    MatchStart,
    MatchReset,
    DealStart {
        kingdom: u8,
        owner: Seat,
        contract: ContractId,
    },
    DealEnd {
        contract: ContractId,
        deltas: [i32; 4],
    },
    CardPlayed {
        seat: Seat,
        card: Card,
    },
    LayoutPlayed {
        seat: Seat,
        card: Card,
    },
    LayoutPass {
        seat: Seat,
    },
    LayoutOut {
        seat: Seat,
        place: u8,
    },
    TwosRevealed,
    TrickWon {
        winner: Seat,
        trick: Vec<Play>,
        points: i32,
    },
    DoublingPrompt {
        seat: Seat,
        eligible: Vec<Card>,
    },
    DoublingSet {
        count: usize,
    },
    GameEnd {
        scores: [i32; 4],
    },
    Error {
        message: String,
    },
}
