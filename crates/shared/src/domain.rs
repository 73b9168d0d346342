use std::fmt;

use serde::{Deserialize, Serialize};

/// Seat identifier as drawn in the venue diagram, e.g. `S4-7` for table 4,
/// seat 7. Treated as opaque everywhere except [`SeatId::table_and_seat`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(pub String);

impl SeatId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits a diagram identifier of the form `S<table>-<seat>` into its
    /// table and seat numbers. Identifiers that do not follow the diagram
    /// convention yield `None`.
    pub fn table_and_seat(&self) -> Option<(u32, u32)> {
        let rest = self.0.strip_prefix('S')?;
        let (table, seat) = rest.split_once('-')?;
        Some((table.parse().ok()?, seat.parse().ok()?))
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeatId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Server-assigned reservation identifier (a TSID-style long).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(pub i64);

/// Meal choice attached to a reserved seat. The registration form defaults
/// every guest to `REGULAR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealSelection {
    #[default]
    Regular,
    Vegetarian,
    Child,
}

impl MealSelection {
    /// Wire form used in the registration POST fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            MealSelection::Regular => "REGULAR",
            MealSelection::Vegetarian => "VEGETARIAN",
            MealSelection::Child => "CHILD",
        }
    }
}

/// Seat availability as broadcast on the live seat-status feed.
///
/// `Pending` is a seat another party has selected but not finalized,
/// `Nonpending` reverts a pending seat to available, `Reserved` is booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatState {
    Pending,
    Nonpending,
    Reserved,
}

/// One reservation record as returned by `GET /rest/reservation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub name: String,
    pub seat_qty: u32,
    pub reservation_id: ReservationId,
    pub res_id_string: String,
    #[serde(default)]
    pub reserved_seats: Vec<SeatId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_id_parses_table_and_seat() {
        assert_eq!(SeatId::from("S13-4").table_and_seat(), Some((13, 4)));
        assert_eq!(SeatId::from("S1-19").table_and_seat(), Some((1, 19)));
    }

    #[test]
    fn seat_id_rejects_foreign_formats() {
        assert_eq!(SeatId::from("row3").table_and_seat(), None);
        assert_eq!(SeatId::from("S9").table_and_seat(), None);
        assert_eq!(SeatId::from("Sx-2").table_and_seat(), None);
    }

    #[test]
    fn seat_state_uses_feed_wire_strings() {
        assert_eq!(
            serde_json::to_string(&SeatState::Nonpending).unwrap(),
            "\"nonpending\""
        );
        let state: SeatState = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(state, SeatState::Pending);
    }

    #[test]
    fn reservation_decodes_server_shape() {
        let raw = r#"{
            "name": "Walker",
            "seatQty": 4,
            "reservationId": 388540566,
            "resIdString": "0G2Y5",
            "reservedSeats": ["S2-1", "S2-2"]
        }"#;
        let reservation: Reservation = serde_json::from_str(raw).unwrap();
        assert_eq!(reservation.seat_qty, 4);
        assert_eq!(reservation.reservation_id, ReservationId(388540566));
        assert_eq!(reservation.reserved_seats[1], SeatId::from("S2-2"));
    }

    #[test]
    fn reservation_tolerates_missing_seat_list() {
        let raw = r#"{"name":"Horner","seatQty":5,"reservationId":1,"resIdString":"A"}"#;
        let reservation: Reservation = serde_json::from_str(raw).unwrap();
        assert!(reservation.reserved_seats.is_empty());
    }
}
