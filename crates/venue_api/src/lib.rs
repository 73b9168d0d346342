//! Typed client for the venue server's REST surface.
//!
//! Only the contracts the reservation front-end consumes are covered here;
//! the endpoints themselves are an external collaborator.

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Reservation, SeatId},
    error::{ApiError, ErrorCode},
    protocol::RegistrationForm,
};
use tracing::debug;

/// Seam between the reservation workflow and the venue server. Implemented
/// by [`VenueApi`] for real traffic and by doubles in the workflow tests.
#[async_trait]
pub trait ReservationGateway: Send + Sync {
    /// `GET /rest/checkConfirmation?code=...` — JSON boolean body.
    async fn check_confirmation(&self, code: &str) -> Result<bool, ApiError>;
    /// `GET /rest/reservation` — all reservations on file.
    async fn reservations(&self) -> Result<Vec<Reservation>, ApiError>;
    /// `GET /rest/reservedSeats` — seat ids already booked.
    async fn reserved_seats(&self) -> Result<Vec<SeatId>, ApiError>;
    /// `POST /rest/postReservation` — form-encoded registration. The server
    /// documents no response body, so success is any 2xx status.
    async fn post_reservation(&self, form: &RegistrationForm) -> Result<(), ApiError>;
}

/// Placeholder gateway for wiring stages where no server URL is known yet.
pub struct MissingGateway;

#[async_trait]
impl ReservationGateway for MissingGateway {
    async fn check_confirmation(&self, _code: &str) -> Result<bool, ApiError> {
        Err(unavailable())
    }

    async fn reservations(&self) -> Result<Vec<Reservation>, ApiError> {
        Err(unavailable())
    }

    async fn reserved_seats(&self) -> Result<Vec<SeatId>, ApiError> {
        Err(unavailable())
    }

    async fn post_reservation(&self, _form: &RegistrationForm) -> Result<(), ApiError> {
        Err(unavailable())
    }
}

fn unavailable() -> ApiError {
    ApiError::new(ErrorCode::Internal, "reservation gateway is unavailable")
}

/// reqwest-backed [`ReservationGateway`].
pub struct VenueApi {
    http: Client,
    base_url: String,
}

impl VenueApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ReservationGateway for VenueApi {
    async fn check_confirmation(&self, code: &str) -> Result<bool, ApiError> {
        let response = self
            .http
            .get(format!("{}/rest/checkConfirmation", self.base_url))
            .query(&[("code", code)])
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;
        let confirmed = response.json::<bool>().await.map_err(protocol)?;
        debug!(confirmed, "confirmation code checked");
        Ok(confirmed)
    }

    async fn reservations(&self) -> Result<Vec<Reservation>, ApiError> {
        let response = self
            .http
            .get(format!("{}/rest/reservation", self.base_url))
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;
        response.json::<Vec<Reservation>>().await.map_err(protocol)
    }

    async fn reserved_seats(&self) -> Result<Vec<SeatId>, ApiError> {
        let response = self
            .http
            .get(format!("{}/rest/reservedSeats", self.base_url))
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;
        response.json::<Vec<SeatId>>().await.map_err(protocol)
    }

    async fn post_reservation(&self, form: &RegistrationForm) -> Result<(), ApiError> {
        let fields = form.to_form_fields();
        debug!(party = %form.party_name, qty = form.party_qty, "posting reservation");
        self.http
            .post(format!("{}/rest/postReservation", self.base_url))
            .form(&fields)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;
        Ok(())
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::transport(err.to_string())
}

fn protocol(err: reqwest::Error) -> ApiError {
    ApiError::protocol(err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
