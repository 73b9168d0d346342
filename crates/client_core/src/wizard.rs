//! Wizard step gating for the reservation form.
//!
//! Steps only move forward: identification, then the e-mailed confirmation
//! code, then seat selection and payment, then the terminal submitted
//! state. There is no back affordance.

use shared::error::ApiError;
use thiserror::Error;
use tracing::{debug, info};
use venue_api::ReservationGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    /// Party identification: the e-mail address form.
    #[default]
    Identification,
    /// Waiting on the e-mailed confirmation code.
    Confirmation,
    /// Seat selection and payment.
    SeatSelection,
    Submitted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("step {actual:?} cannot perform this transition (expected {expected:?})")]
    OutOfOrder {
        expected: WizardStep,
        actual: WizardStep,
    },
    #[error("required field {0} is missing or invalid")]
    InvalidField(&'static str),
    #[error("no seats assigned, nothing to submit")]
    NoSeatsAssigned,
}

/// Result of a confirmation-code check. Denial is a value, not an error:
/// the wizard stays put and the caller decides how to surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Confirmed,
    Denied,
}

#[derive(Debug, Default)]
pub struct ReservationWizard {
    step: WizardStep,
}

impl ReservationWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Fires on submission of the e-mail address form. Guarded only by
    /// client-side required-field validation; no server round trip.
    pub fn submit_identification(&mut self, email: &str) -> Result<WizardStep, WizardError> {
        self.expect(WizardStep::Identification)?;
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(WizardError::InvalidField("emailAddr"));
        }
        info!("identification submitted, awaiting confirmation code");
        self.step = WizardStep::Confirmation;
        Ok(self.step)
    }

    /// Checks the confirmation code against the server. Advances only on a
    /// truthy result; a denial leaves the wizard in place.
    pub async fn verify_confirmation(
        &mut self,
        code: &str,
        gateway: &dyn ReservationGateway,
    ) -> Result<ConfirmationOutcome, WizardCheckError> {
        self.expect(WizardStep::Confirmation)?;
        if gateway.check_confirmation(code).await? {
            info!("confirmation code accepted");
            self.step = WizardStep::SeatSelection;
            Ok(ConfirmationOutcome::Confirmed)
        } else {
            debug!("confirmation code denied");
            Ok(ConfirmationOutcome::Denied)
        }
    }

    /// Crate-internal: the flow moves here after a successful submission.
    pub(crate) fn mark_submitted(&mut self) -> Result<WizardStep, WizardError> {
        self.expect(WizardStep::SeatSelection)?;
        self.step = WizardStep::Submitted;
        Ok(self.step)
    }

    fn expect(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::OutOfOrder {
                expected,
                actual: self.step,
            })
        }
    }
}

/// A confirmation check can fail two ways: the wizard was not on the
/// confirmation step, or the server call itself failed.
#[derive(Debug, Error)]
pub enum WizardCheckError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
#[path = "tests/wizard_tests.rs"]
mod tests;
