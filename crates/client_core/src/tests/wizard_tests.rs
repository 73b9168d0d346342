use async_trait::async_trait;
use shared::{
    domain::{Reservation, SeatId},
    error::ApiError,
    protocol::RegistrationForm,
};

use super::*;

struct StubGateway {
    confirm: bool,
}

#[async_trait]
impl ReservationGateway for StubGateway {
    async fn check_confirmation(&self, _code: &str) -> Result<bool, ApiError> {
        Ok(self.confirm)
    }

    async fn reservations(&self) -> Result<Vec<Reservation>, ApiError> {
        Ok(Vec::new())
    }

    async fn reserved_seats(&self) -> Result<Vec<SeatId>, ApiError> {
        Ok(Vec::new())
    }

    async fn post_reservation(&self, _form: &RegistrationForm) -> Result<(), ApiError> {
        Ok(())
    }
}

#[test]
fn identification_requires_a_plausible_email() {
    let mut wizard = ReservationWizard::new();
    assert_eq!(
        wizard.submit_identification(""),
        Err(WizardError::InvalidField("emailAddr"))
    );
    assert_eq!(
        wizard.submit_identification("not-an-address"),
        Err(WizardError::InvalidField("emailAddr"))
    );
    assert_eq!(wizard.step(), WizardStep::Identification);

    assert_eq!(
        wizard.submit_identification("guest@example.org"),
        Ok(WizardStep::Confirmation)
    );
}

#[tokio::test]
async fn accepted_code_advances_to_seat_selection() {
    let mut wizard = ReservationWizard::new();
    wizard.submit_identification("guest@example.org").unwrap();

    let outcome = wizard
        .verify_confirmation("8675309", &StubGateway { confirm: true })
        .await
        .expect("check");
    assert_eq!(outcome, ConfirmationOutcome::Confirmed);
    assert_eq!(wizard.step(), WizardStep::SeatSelection);
}

#[tokio::test]
async fn denied_code_keeps_the_wizard_in_place() {
    let mut wizard = ReservationWizard::new();
    wizard.submit_identification("guest@example.org").unwrap();

    let outcome = wizard
        .verify_confirmation("000000", &StubGateway { confirm: false })
        .await
        .expect("check");
    assert_eq!(outcome, ConfirmationOutcome::Denied);
    assert_eq!(wizard.step(), WizardStep::Confirmation);
}

#[tokio::test]
async fn confirmation_before_identification_is_out_of_order() {
    let mut wizard = ReservationWizard::new();
    let err = wizard
        .verify_confirmation("123", &StubGateway { confirm: true })
        .await
        .expect_err("wrong step");
    assert!(matches!(
        err,
        WizardCheckError::Wizard(WizardError::OutOfOrder { .. })
    ));
}

#[test]
fn submitted_is_terminal_and_only_reachable_from_seat_selection() {
    let mut wizard = ReservationWizard::new();
    assert!(wizard.mark_submitted().is_err());

    wizard.submit_identification("guest@example.org").unwrap();
    assert!(wizard.mark_submitted().is_err());
}
