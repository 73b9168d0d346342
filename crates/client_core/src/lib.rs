//! Client-side reservation workflow: seat assignment bookkeeping, wizard
//! step gating, and registration submission.
//!
//! The diagram widget and its pan/zoom stay external; they talk to this
//! crate through [`shared::protocol::VenueEvent`] notifications and the
//! [`AssigneePrompt`] seam. All state mutation runs through
//! [`ReservationFlow`] on a single writer, matching the event-loop
//! execution model of the UI.

use std::sync::Arc;

use shared::{domain::SeatId, protocol::VenueEvent};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use venue_api::ReservationGateway;

pub mod board;
pub mod feed;
pub mod ledger;
pub mod submit;
pub mod wizard;

pub use board::{SeatBoard, SeatToggle};
pub use feed::{run_seat_feed, seat_feed_url, FeedExit};
pub use ledger::{AssignError, AssignmentLedger, SeatAssignment};
pub use submit::{ReservationSubmitter, SubmissionReceipt, SubmitOutcome};
pub use wizard::{
    ConfirmationOutcome, ReservationWizard, WizardCheckError, WizardError, WizardStep,
};

/// Collaborator that asks the user which attendee takes a just-selected
/// seat. Returning `None` is an explicit cancel: the selection is abandoned
/// and the ledger stays untouched.
pub trait AssigneePrompt: Send + Sync {
    fn prompt_assignee(&self, seat: &SeatId) -> Option<String>;
}

/// Outbound workflow events for the UI layer.
#[derive(Debug, Clone)]
pub enum FlowEvent {
    /// Recomputed after every `assign`/`unassign`, mutating or not; drives
    /// the finalize control.
    SubmitEnabled(bool),
    SeatAssigned { seat: SeatId, person: String },
    SeatReleased { seat: SeatId, person: String },
    SelectionCancelled { seat: SeatId },
    StepChanged(WizardStep),
    ReservationAccepted(SubmissionReceipt),
}

/// Owns the ledger, wizard, and submitter, and routes every mutation.
pub struct ReservationFlow {
    ledger: AssignmentLedger,
    wizard: ReservationWizard,
    submitter: ReservationSubmitter,
    prompt: Arc<dyn AssigneePrompt>,
    events: broadcast::Sender<FlowEvent>,
}

impl ReservationFlow {
    pub fn new(prompt: Arc<dyn AssigneePrompt>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            ledger: AssignmentLedger::new(),
            wizard: ReservationWizard::new(),
            submitter: ReservationSubmitter::new(),
            prompt,
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FlowEvent> {
        self.events.subscribe()
    }

    pub fn ledger(&self) -> &AssignmentLedger {
        &self.ledger
    }

    pub fn step(&self) -> WizardStep {
        self.wizard.step()
    }

    /// Reacts to a seat picker notification. Selection commits to the
    /// ledger only once the assignee prompt confirms; unselection releases
    /// the seat unconditionally (a never-assigned seat is a no-op).
    pub fn on_picker_event(&mut self, event: VenueEvent) {
        match event {
            VenueEvent::SeatSelected(seat) => {
                if self.ledger.assignment_for(&seat).is_some() {
                    warn!(seat = %seat, "seat already assigned, ignoring re-selection");
                    return;
                }
                match self.prompt.prompt_assignee(&seat) {
                    Some(person) => {
                        // uniqueness was just checked on this same writer
                        if let Err(err) = self.ledger.assign(seat.clone(), person.clone()) {
                            warn!(%err, "assignment rejected");
                        } else {
                            self.emit(FlowEvent::SeatAssigned { seat, person });
                        }
                        self.emit_enablement();
                    }
                    None => {
                        debug!(seat = %seat, "assignment cancelled at prompt");
                        self.emit(FlowEvent::SelectionCancelled { seat });
                    }
                }
            }
            VenueEvent::SeatUnselected(seat) => {
                if let Some(removed) = self.ledger.unassign(&seat) {
                    self.emit(FlowEvent::SeatReleased {
                        seat: removed.seat_id,
                        person: removed.person_name,
                    });
                }
                self.emit_enablement();
            }
            other => debug!(event = ?other, "picker event not handled by the flow"),
        }
    }

    /// Step 1 → 2: e-mail form submission, client-side validation only.
    pub fn advance_identification(&mut self, email: &str) -> Result<WizardStep, WizardError> {
        let step = self.wizard.submit_identification(email)?;
        self.emit(FlowEvent::StepChanged(step));
        Ok(step)
    }

    /// Step 2 → 3: advances only when the server accepts the code; a
    /// denial leaves the wizard in place.
    pub async fn advance_confirmation(
        &mut self,
        code: &str,
        gateway: &dyn ReservationGateway,
    ) -> Result<ConfirmationOutcome, WizardCheckError> {
        let outcome = self.wizard.verify_confirmation(code, gateway).await?;
        if outcome == ConfirmationOutcome::Confirmed {
            self.emit(FlowEvent::StepChanged(self.wizard.step()));
        }
        Ok(outcome)
    }

    /// Step 3 → submitted: snapshots the ledger and posts it once. Gated
    /// on the seat-selection step and on a non-empty ledger, the same
    /// condition that enables the finalize control. On acceptance the
    /// wizard reaches its terminal step and the UI is told to freeze party
    /// identification and the picker.
    pub async fn finalize(
        &mut self,
        party_name: &str,
        gateway: &dyn ReservationGateway,
        cancel: &CancellationToken,
    ) -> Result<SubmitOutcome, WizardError> {
        if self.wizard.step() != WizardStep::SeatSelection {
            return Err(WizardError::OutOfOrder {
                expected: WizardStep::SeatSelection,
                actual: self.wizard.step(),
            });
        }
        if !self.ledger.is_non_empty() {
            return Err(WizardError::NoSeatsAssigned);
        }
        let outcome = self
            .submitter
            .submit(party_name, &self.ledger, gateway, cancel)
            .await;
        if let SubmitOutcome::Accepted(receipt) = &outcome {
            let step = self.wizard.mark_submitted()?;
            self.emit(FlowEvent::StepChanged(step));
            self.emit(FlowEvent::ReservationAccepted(receipt.clone()));
        }
        Ok(outcome)
    }

    fn emit_enablement(&self) {
        self.emit(FlowEvent::SubmitEnabled(self.ledger.is_non_empty()));
    }

    fn emit(&self, event: FlowEvent) {
        // no subscribers is fine, e.g. in headless runs
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
