use serde::{Deserialize, Serialize};

use crate::domain::{MealSelection, Reservation, SeatId, SeatState};

/// One guest row of a registration: who sits where, eating what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestEntry {
    pub seat_holder: String,
    pub seat_select: SeatId,
    pub meal_select: MealSelection,
}

/// Write-once snapshot of a party's registration, built from the assignment
/// ledger at submission time and posted to `/rest/postReservation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub party_name: String,
    pub party_qty: u32,
    pub guests: Vec<GuestEntry>,
}

impl RegistrationForm {
    /// Flattens the registration into the form-encoded fields the server
    /// expects: `partyName`, `partyQty`, then `seatHolderN` / `seatSelectN` /
    /// `mealSelectN` for N = 1..=party_qty.
    pub fn to_form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::with_capacity(2 + self.guests.len() * 3);
        fields.push(("partyName".to_string(), self.party_name.clone()));
        fields.push(("partyQty".to_string(), self.party_qty.to_string()));
        for (index, guest) in self.guests.iter().enumerate() {
            let n = index + 1;
            fields.push((format!("seatHolder{n}"), guest.seat_holder.clone()));
            fields.push((format!("seatSelect{n}"), guest.seat_select.to_string()));
            fields.push((format!("mealSelect{n}"), guest.meal_select.as_str().to_string()));
        }
        fields
    }
}

/// In-process events exchanged between the seat picker collaborator, the
/// fetchers, and the reservation workflow. Every event bubbles with a
/// `payload` field, mirroring the DOM CustomEvent contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum VenueEvent {
    SeatSelected(SeatId),
    SeatUnselected(SeatId),
    ReservationsReceived(Vec<Reservation>),
    SeatsReceived(Vec<SeatId>),
}

/// One frame of the live seat-status feed, e.g.
/// `{"seat":"S1-1","state":"pending"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatStatus {
    pub seat: SeatId,
    pub state: SeatState,
}
