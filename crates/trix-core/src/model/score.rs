use crate::model::seat::{Seat, Team};
use serde::{Deserialize, Serialize};

/// Running per-seat totals. Team totals are always derived from the members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    totals: [i32; 4],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 4] }
    }

    pub fn add(&mut self, seat: Seat, points: i32) {
        self.totals[seat.index()] += points;
    }

    pub fn score(&self, seat: Seat) -> i32 {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[i32; 4] {
        &self.totals
    }

    pub fn team_score(&self, team: Team) -> i32 {
        team.members().iter().map(|seat| self.score(*seat)).sum()
    }

    pub fn team_standings(&self) -> [i32; 2] {
        Team::BOTH.map(|team| self.team_score(team))
    }

    /// Team with the higher combined total; North-South on a tie.
    pub fn leading_team(&self) -> Team {
        let [north_south, east_west] = self.team_standings();
        if east_west > north_south {
            Team::EastWest
        } else {
            Team::NorthSouth
        }
    }

    /// Highest total wins; ties go to the earlier seat in rotation order.
    pub fn leading_seat(&self) -> Seat {
        let mut best = Seat::North;
        for seat in Seat::LOOP {
            if self.score(seat) > self.score(best) {
                best = seat;
            }
        }
        best
    }
}
