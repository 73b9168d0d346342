//! Selection model behind the seat picker.
//!
//! Rendering and pan/zoom live in the diagram widget; this is only the
//! bookkeeping that decides whether a click selects, unselects, or is
//! ignored, and which seats the live feed has taken off the market.

use std::collections::HashSet;

use shared::{
    domain::{SeatId, SeatState},
    protocol::SeatStatus,
};
use tracing::debug;

/// What a click on a seat did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatToggle {
    Selected,
    Unselected,
    /// Reserved or pending under another party; clicks are inert.
    Unavailable,
    /// The party's seat allowance is spent.
    LimitReached,
}

#[derive(Debug)]
pub struct SeatBoard {
    selected: Vec<SeatId>,
    unavailable: HashSet<SeatId>,
    max_select: usize,
}

impl SeatBoard {
    pub fn new(max_select: usize) -> Self {
        Self {
            selected: Vec::new(),
            unavailable: HashSet::new(),
            max_select,
        }
    }

    /// Applies the `reservedSeats` payload fetched at picker start-up.
    pub fn load_reserved(&mut self, seats: impl IntoIterator<Item = SeatId>) {
        self.unavailable.extend(seats);
    }

    /// Applies one live feed frame. `Pending` and `Reserved` take a seat
    /// off the market; `Nonpending` puts it back.
    pub fn apply_status(&mut self, status: &SeatStatus) {
        match status.state {
            SeatState::Pending | SeatState::Reserved => {
                debug!(seat = %status.seat, state = ?status.state, "seat unavailable");
                self.unavailable.insert(status.seat.clone());
            }
            SeatState::Nonpending => {
                debug!(seat = %status.seat, "seat available again");
                self.unavailable.remove(&status.seat);
            }
        }
    }

    /// Click handling, mirroring the diagram's rules: an unavailable seat
    /// is inert, an already-selected seat unselects, and new selections are
    /// capped at the party's allowance.
    pub fn toggle(&mut self, seat: SeatId) -> SeatToggle {
        if let Some(index) = self.selected.iter().position(|s| s == &seat) {
            self.selected.remove(index);
            return SeatToggle::Unselected;
        }
        if self.unavailable.contains(&seat) {
            return SeatToggle::Unavailable;
        }
        if self.selected.len() >= self.max_select {
            return SeatToggle::LimitReached;
        }
        self.selected.push(seat);
        SeatToggle::Selected
    }

    pub fn selected(&self) -> &[SeatId] {
        &self.selected
    }

    pub fn is_unavailable(&self, seat: &SeatId) -> bool {
        self.unavailable.contains(seat)
    }

    pub fn max_select(&self) -> usize {
        self.max_select
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
