pub mod action;
pub mod config;
pub mod doubling;
pub mod engine;
pub mod match_state;
pub mod random;
pub mod view;

pub use action::{Action, Event};
pub use config::{GameMode, MatchConfig, RuleProfile};
pub use engine::{EngineError, Transition, apply};
pub use match_state::{DealRecord, MatchState, Phase};
pub use view::PlayerView;
