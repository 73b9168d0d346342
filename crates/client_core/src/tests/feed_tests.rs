use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use axum::{
    extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Router,
};
use shared::domain::{SeatId, SeatState};
use tokio::net::TcpListener;

use super::*;

#[test]
fn frames_decode_to_pong_status_or_unrecognized() {
    assert_eq!(decode_frame("pong"), FeedFrame::Pong);

    let frame = decode_frame(r#"{"seat":"S1-1","state":"reserved"}"#);
    assert_eq!(
        frame,
        FeedFrame::Status(SeatStatus {
            seat: SeatId::from("S1-1"),
            state: SeatState::Reserved,
        })
    );

    assert!(matches!(
        decode_frame("hello there"),
        FeedFrame::Unrecognized(_)
    ));
}

#[test]
fn feed_url_follows_the_page_scheme() {
    let https = seat_feed_url("https://venue.example").expect("url");
    assert_eq!(https.as_str(), "wss://venue.example/ws/msg");

    let http = seat_feed_url("http://127.0.0.1:8080/app").expect("url");
    assert_eq!(http.as_str(), "ws://127.0.0.1:8080/ws/msg");
}

async fn ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(serve_one_status)
}

async fn serve_one_status(mut socket: WebSocket) {
    // the client announces itself with an initSeats request
    match socket.recv().await {
        Some(Ok(WsMessage::Text(text))) if text == "initSeats" => {}
        other => {
            tracing::error!(?other, "expected initSeats request");
            return;
        }
    }
    let _ = socket
        .send(WsMessage::Text(
            r#"{"seat":"S4-2","state":"pending"}"#.to_string(),
        ))
        .await;
    let _ = socket.send(WsMessage::Close(None)).await;
}

async fn spawn_feed_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route("/ws/msg", get(ws_handler));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn feed_forwards_status_frames_until_server_close() {
    let base_url = spawn_feed_server().await;
    let (updates, mut rx) = broadcast::channel(16);

    let exit = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        run_seat_feed(
            seat_feed_url(&base_url).expect("url"),
            updates,
            CancellationToken::new(),
        ),
    )
    .await
    .expect("feed timed out")
    .expect("feed failed");

    assert_eq!(exit, FeedExit::Closed);
    let status = rx.try_recv().expect("one status frame");
    assert_eq!(status.seat, SeatId::from("S4-2"));
    assert_eq!(status.state, SeatState::Pending);
}

async fn swallow_pings(mut socket: WebSocket, pings: Arc<AtomicU32>) {
    match socket.recv().await {
        Some(Ok(WsMessage::Text(text))) if text == "initSeats" => {}
        other => {
            tracing::error!(?other, "expected initSeats request");
            return;
        }
    }
    // never answer, never close; the client's budget has to run out
    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            WsMessage::Text(text) if text == "ping" => {
                pings.fetch_add(1, Ordering::SeqCst);
            }
            WsMessage::Close(_) => break,
            _ => {}
        }
    }
}

async fn spawn_silent_server(pings: Arc<AtomicU32>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/ws/msg",
        get(move |ws: WebSocketUpgrade| {
            let pings = pings.clone();
            async move { ws.on_upgrade(move |socket| swallow_pings(socket, pings)) }
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test(start_paused = true)]
async fn heartbeat_budget_spends_into_a_reconnect_request() {
    let pings = Arc::new(AtomicU32::new(0));
    let base_url = spawn_silent_server(pings.clone()).await;
    let (updates, _rx) = broadcast::channel(16);

    // paused time auto-advances through the 30s heartbeat intervals
    let exit = run_seat_feed(
        seat_feed_url(&base_url).expect("url"),
        updates,
        CancellationToken::new(),
    )
    .await
    .expect("feed failed");
    assert_eq!(exit, FeedExit::HeartbeatBudgetSpent);

    // the close frame trails the last ping on the wire; let the stub drain
    for _ in 0..100 {
        if pings.load(Ordering::SeqCst) >= HEARTBEAT_BUDGET {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(pings.load(Ordering::SeqCst), HEARTBEAT_BUDGET);
}

#[tokio::test]
async fn cancellation_stops_the_feed() {
    let base_url = spawn_feed_server().await;
    let (updates, _rx) = broadcast::channel(16);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let exit = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        run_seat_feed(seat_feed_url(&base_url).expect("url"), updates, cancel),
    )
    .await
    .expect("feed timed out")
    .expect("feed failed");

    assert_eq!(exit, FeedExit::Cancelled);
}
