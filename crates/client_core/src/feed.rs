//! Live seat-status feed.
//!
//! The venue server pushes seat state transitions (`pending`, `nonpending`,
//! `reserved`) over a WebSocket at `/ws/msg`. The feed keeps the connection
//! alive with `ping` heartbeats, forwards decoded frames to a broadcast
//! channel, and hands control back to the caller when the connection ends
//! or its heartbeat budget is spent so the caller can reconnect.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use shared::protocol::SeatStatus;
use tokio::sync::broadcast;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
/// After this many heartbeats the feed asks for a fresh connection, the
/// client-side analog of the original page reload.
pub const HEARTBEAT_BUDGET: u32 = 21;

/// Why the feed returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedExit {
    /// The server closed the stream.
    Closed,
    Cancelled,
    /// Heartbeat budget spent; reconnect for a fresh seat snapshot.
    HeartbeatBudgetSpent,
}

/// One inbound frame, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedFrame {
    Pong,
    Status(SeatStatus),
    Unrecognized(String),
}

pub fn decode_frame(text: &str) -> FeedFrame {
    if text == "pong" {
        return FeedFrame::Pong;
    }
    match serde_json::from_str::<SeatStatus>(text) {
        Ok(status) => FeedFrame::Status(status),
        Err(_) => FeedFrame::Unrecognized(text.to_string()),
    }
}

/// Derives the feed endpoint from the server's HTTP base URL.
pub fn seat_feed_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url).context("invalid server base url")?;
    let scheme = match url.scheme() {
        "https" | "wss" => "wss",
        _ => "ws",
    };
    url.set_scheme(scheme)
        .map_err(|_| anyhow::anyhow!("cannot derive ws scheme from {base_url}"))?;
    url.set_path("/ws/msg");
    Ok(url)
}

/// Runs one feed connection to completion.
///
/// Sends `initSeats` on connect so the server replays currently pending
/// seats, then forwards every decoded [`SeatStatus`] to `updates`.
pub async fn run_seat_feed(
    ws_url: Url,
    updates: broadcast::Sender<SeatStatus>,
    cancel: CancellationToken,
) -> Result<FeedExit> {
    let (stream, _) = connect_async(ws_url.as_str())
        .await
        .context("seat feed connect failed")?;
    let (mut sink, mut source) = stream.split();

    sink.send(Message::Text("initSeats".into()))
        .await
        .context("seat feed init request failed")?;

    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    // interval fires immediately; the first tick is not a heartbeat
    heartbeat.tick().await;
    let mut pings_sent = 0u32;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                return Ok(FeedExit::Cancelled);
            }
            _ = heartbeat.tick() => {
                if pings_sent >= HEARTBEAT_BUDGET {
                    debug!("seat feed heartbeat budget spent, requesting reconnect");
                    let _ = sink.send(Message::Close(None)).await;
                    return Ok(FeedExit::HeartbeatBudgetSpent);
                }
                sink.send(Message::Text("ping".into()))
                    .await
                    .context("seat feed heartbeat failed")?;
                pings_sent += 1;
            }
            frame = source.next() => {
                let Some(frame) = frame else {
                    return Ok(FeedExit::Closed);
                };
                match frame.context("seat feed stream error")? {
                    Message::Text(text) => match decode_frame(&text) {
                        FeedFrame::Pong => debug!("seat feed heartbeat answered"),
                        FeedFrame::Status(status) => {
                            debug!(seat = %status.seat, state = ?status.state, "seat status frame");
                            // nobody listening is fine; the board may not be up yet
                            let _ = updates.send(status);
                        }
                        FeedFrame::Unrecognized(text) => {
                            warn!(%text, "unrecognized seat feed frame");
                        }
                    },
                    Message::Close(_) => return Ok(FeedExit::Closed),
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/feed_tests.rs"]
mod tests;
