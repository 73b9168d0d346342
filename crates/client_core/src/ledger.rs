//! Seat assignment bookkeeping.
//!
//! The ledger is the single source of truth for which attendee holds which
//! seat. Entries are keyed by seat id and kept in assignment order, so a
//! removal is by value rather than by object identity.

use shared::{
    domain::{MealSelection, SeatId},
    protocol::{GuestEntry, RegistrationForm},
};
use thiserror::Error;
use tracing::debug;

/// One attendee's claim on one seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatAssignment {
    pub seat_id: SeatId,
    pub person_name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignError {
    #[error("seat {0} is already assigned")]
    SeatAlreadyAssigned(SeatId),
}

/// Ordered collection of current seat-to-attendee assignments.
///
/// Invariant: each seat id appears at most once. The derived enablement
/// signal (`is_non_empty`) must be re-read by the caller after every
/// mutation; the workflow controller turns it into submit-button state.
#[derive(Debug, Default)]
pub struct AssignmentLedger {
    entries: Vec<SeatAssignment>,
}

impl AssignmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new assignment. A seat that is already held is rejected,
    /// never silently overwritten.
    pub fn assign(
        &mut self,
        seat_id: SeatId,
        person_name: impl Into<String>,
    ) -> Result<(), AssignError> {
        if self.entries.iter().any(|entry| entry.seat_id == seat_id) {
            return Err(AssignError::SeatAlreadyAssigned(seat_id));
        }
        let person_name = person_name.into();
        debug!(seat = %seat_id, person = %person_name, "seat assigned");
        self.entries.push(SeatAssignment {
            seat_id,
            person_name,
        });
        Ok(())
    }

    /// Removes the assignment for the given seat, if any. Unselecting a seat
    /// that was never selected is a reachable picker state, so an absent
    /// seat is a no-op rather than an error.
    pub fn unassign(&mut self, seat_id: &SeatId) -> Option<SeatAssignment> {
        let index = self
            .entries
            .iter()
            .position(|entry| &entry.seat_id == seat_id)?;
        let removed = self.entries.remove(index);
        debug!(seat = %removed.seat_id, person = %removed.person_name, "seat released");
        Some(removed)
    }

    /// Drives submit-control enablement: enabled iff at least one seat is
    /// assigned.
    pub fn is_non_empty(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeatAssignment> {
        self.entries.iter()
    }

    pub fn assignment_for(&self, seat_id: &SeatId) -> Option<&SeatAssignment> {
        self.entries.iter().find(|entry| &entry.seat_id == seat_id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Read-only snapshot for submission. An empty ledger yields a
    /// registration with `party_qty = 0` and no guest rows.
    pub fn registration(&self, party_name: impl Into<String>) -> RegistrationForm {
        RegistrationForm {
            party_name: party_name.into(),
            party_qty: self.entries.len() as u32,
            guests: self
                .entries
                .iter()
                .map(|entry| GuestEntry {
                    seat_holder: entry.person_name.clone(),
                    seat_select: entry.seat_id.clone(),
                    meal_select: MealSelection::default(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "tests/ledger_tests.rs"]
mod tests;
