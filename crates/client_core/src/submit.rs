//! Reservation submission with an at-most-once guard.

use chrono::{DateTime, Utc};
use shared::{error::ApiError, protocol::RegistrationForm};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use venue_api::ReservationGateway;

use crate::ledger::AssignmentLedger;

/// Proof that a registration left the client, with the exact snapshot that
/// was posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub form: RegistrationForm,
    pub submitted_at: DateTime<Utc>,
}

/// Discriminated outcome of a submission attempt. Transport failure is a
/// value here, never an unhandled rejection.
#[derive(Debug)]
pub enum SubmitOutcome {
    Accepted(SubmissionReceipt),
    /// A submission is already outstanding or completed; no network call
    /// was made.
    AlreadySubmitted,
    /// The cancellation token fired before the server answered. The guard
    /// resets: a cancelled action never happened.
    Cancelled,
    Failed(ApiError),
}

#[derive(Debug, Default)]
pub struct ReservationSubmitter {
    submitted: bool,
}

impl ReservationSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_submitted(&self) -> bool {
        self.submitted
    }

    /// Snapshots the ledger and performs exactly one POST.
    ///
    /// The guard is set before the request goes out, so a second call while
    /// the first is outstanding is a no-op. An empty ledger is tolerated
    /// defensively and produces a registration with `party_qty = 0`.
    pub async fn submit(
        &mut self,
        party_name: &str,
        ledger: &AssignmentLedger,
        gateway: &dyn ReservationGateway,
        cancel: &CancellationToken,
    ) -> SubmitOutcome {
        if self.submitted {
            warn!("reservation already submitted, ignoring repeat request");
            return SubmitOutcome::AlreadySubmitted;
        }
        self.submitted = true;

        let form = ledger.registration(party_name);
        if form.party_qty == 0 {
            warn!("submitting with an empty ledger; submit gating was bypassed");
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                warn!(party = %form.party_name, "reservation submission cancelled");
                self.submitted = false;
                SubmitOutcome::Cancelled
            }
            result = gateway.post_reservation(&form) => match result {
                Ok(()) => {
                    info!(party = %form.party_name, qty = form.party_qty, "reservation accepted");
                    SubmitOutcome::Accepted(SubmissionReceipt {
                        form,
                        submitted_at: Utc::now(),
                    })
                }
                Err(err) => {
                    warn!(party = %form.party_name, %err, "reservation submission failed");
                    SubmitOutcome::Failed(err)
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/submit_tests.rs"]
mod tests;
