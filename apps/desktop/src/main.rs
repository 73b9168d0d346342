use std::{collections::HashMap, sync::Arc};

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{
    run_seat_feed, seat_feed_url, AssigneePrompt, ConfirmationOutcome, ReservationFlow, SeatBoard,
    SeatToggle, SubmitOutcome,
};
use shared::{domain::SeatId, protocol::VenueEvent};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use venue_api::{ReservationGateway, VenueApi};

mod config;

#[derive(Parser, Debug)]
struct Args {
    /// Venue server base URL, e.g. http://127.0.0.1:8080
    #[arg(long)]
    server_url: Option<String>,
    /// E-mail address for party identification
    #[arg(long)]
    email: String,
    /// Confirmation code received by e-mail
    #[arg(long)]
    confirmation_code: String,
    /// Party identification, e.g. "Horner Party of 5"
    #[arg(long)]
    party_name: String,
    /// Seat assignment as SEAT=NAME, e.g. --seat S1-1=Alice (repeatable)
    #[arg(long = "seat", value_parser = parse_seat_assignment)]
    seats: Vec<(String, String)>,
    /// Post the registration instead of only printing it
    #[arg(long)]
    finalize: bool,
    /// Stay connected and print live seat-status updates until Ctrl-C
    #[arg(long)]
    watch: bool,
}

fn parse_seat_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(seat, name)| (seat.to_string(), name.to_string()))
        .ok_or_else(|| format!("expected SEAT=NAME, got '{raw}'"))
}

/// Non-interactive stand-in for the assignment popover: seat holders come
/// from the command line.
struct SeatNamePrompt {
    names: HashMap<SeatId, String>,
}

impl AssigneePrompt for SeatNamePrompt {
    fn prompt_assignee(&self, seat: &SeatId) -> Option<String> {
        self.names.get(seat).cloned()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    let settings = config::load_settings(args.server_url.clone());

    let api = VenueApi::new(&settings.server_url);
    let prompt = Arc::new(SeatNamePrompt {
        names: args
            .seats
            .iter()
            .map(|(seat, name)| (SeatId::new(seat.clone()), name.clone()))
            .collect(),
    });
    let mut flow = ReservationFlow::new(prompt);

    flow.advance_identification(&args.email)?;
    match flow
        .advance_confirmation(&args.confirmation_code, &api)
        .await
    {
        Ok(ConfirmationOutcome::Confirmed) => {}
        Ok(ConfirmationOutcome::Denied) => bail!("confirmation code denied"),
        Err(err) => bail!("confirmation check failed: {err}"),
    }

    let mut board = SeatBoard::new(settings.max_select);
    board.load_reserved(api.reserved_seats().await?);

    for (seat, _) in &args.seats {
        let seat = SeatId::new(seat.clone());
        match board.toggle(seat.clone()) {
            SeatToggle::Selected => {
                flow.on_picker_event(VenueEvent::SeatSelected(seat));
            }
            SeatToggle::Unavailable => warn!(%seat, "seat is already taken"),
            SeatToggle::LimitReached => warn!(%seat, "party seat allowance is spent"),
            // a repeated --seat flag toggles the seat back off
            SeatToggle::Unselected => {
                warn!(%seat, "seat listed twice, dropping the selection");
                flow.on_picker_event(VenueEvent::SeatUnselected(seat));
            }
        }
    }

    let registration = flow.ledger().registration(&args.party_name);
    println!("{}", serde_json::to_string_pretty(&registration)?);

    if args.finalize {
        let cancel = CancellationToken::new();
        match flow.finalize(&args.party_name, &api, &cancel).await? {
            SubmitOutcome::Accepted(receipt) => {
                println!("Seats booked at {}!", receipt.submitted_at);
            }
            SubmitOutcome::AlreadySubmitted => println!("Reservation was already submitted."),
            SubmitOutcome::Cancelled => println!("Submission cancelled."),
            SubmitOutcome::Failed(err) => bail!("submission failed: {err}"),
        }
    }

    if args.watch {
        let (updates, mut rx) = broadcast::channel(64);
        let cancel = CancellationToken::new();
        let feed = tokio::spawn(run_seat_feed(
            seat_feed_url(&settings.server_url)?,
            updates,
            cancel.clone(),
        ));
        let printer = tokio::spawn(async move {
            while let Ok(status) = rx.recv().await {
                println!("seat {} is now {:?}", status.seat, status.state);
            }
        });
        tokio::signal::ctrl_c().await?;
        cancel.cancel();
        let _ = feed.await?;
        printer.abort();
    }

    Ok(())
}
