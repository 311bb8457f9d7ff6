mod heuristic;

pub use heuristic::HeuristicPolicy;

use trix_core::game::{Action, Phase, PlayerView};
use trix_core::model::card::Card;
use trix_core::rules::ContractId;

/// Decision interface for a seat the engine does not drive itself.
pub trait Policy: Send {
    /// Contract to play next, chosen from the view's remaining pool.
    fn choose_contract(&mut self, view: &PlayerView) -> Option<ContractId>;

    /// Card for the open trick.
    fn choose_play(&mut self, view: &PlayerView) -> Option<Card>;

    /// Card to lay on the board, `None` to pass.
    fn choose_layout(&mut self, view: &PlayerView) -> Option<Card>;

    /// Subset of the view's doubling choices to double.
    fn choose_doubles(&mut self, view: &PlayerView) -> Vec<Card>;

    /// Action answering whatever the current phase asks of the viewing seat.
    fn decide(&mut self, view: &PlayerView) -> Option<Action> {
        let seat = view.seat();
        match view.phase() {
            Phase::KingdomPickContract => self
                .choose_contract(view)
                .map(|contract| Action::PickContract { seat, contract }),
            Phase::DoublingDecision => Some(Action::SetDoubles {
                cards: self.choose_doubles(view),
            }),
            Phase::TrickPlay => self
                .choose_play(view)
                .map(|card| Action::PlayCard { seat, card }),
            Phase::TrixLayoutPlay => Some(match self.choose_layout(view) {
                Some(card) => Action::LayoutPlay { seat, card },
                None => Action::LayoutPass { seat },
            }),
            Phase::Setup | Phase::GameEnd => None,
        }
    }
}
