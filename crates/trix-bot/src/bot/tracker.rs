use trix_core::game::PlayerView;
use trix_core::model::seat::Seat;
use trix_core::model::suit::Suit;
use trix_core::model::trick::Trick;

/// Suits each seat is known to be out of, inferred from failures to follow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoidTracker {
    voids: [[bool; 4]; 4],
}

impl VoidTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_view(view: &PlayerView) -> Self {
        let mut tracker = Self::new();
        for done in view.completed_tricks() {
            tracker.observe(&done.trick);
        }
        tracker.observe(view.current_trick());
        tracker
    }

    pub fn observe(&mut self, trick: &Trick) {
        let Some(lead) = trick.lead_suit() else {
            return;
        };
        for play in trick.plays().iter().skip(1) {
            if play.card.suit != lead {
                self.voids[play.seat.index()][lead.index()] = true;
            }
        }
    }

    pub fn is_void(&self, seat: Seat, suit: Suit) -> bool {
        self.voids[seat.index()][suit.index()]
    }

    pub fn void_count<I>(&self, seats: I, suit: Suit) -> usize
    where
        I: IntoIterator<Item = Seat>,
    {
        seats
            .into_iter()
            .filter(|seat| self.is_void(*seat, suit))
            .count()
    }

    pub fn matrix(&self) -> [[bool; 4]; 4] {
        self.voids
    }
}
