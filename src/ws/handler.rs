//! WebSocket upgrade handlers for the command and streaming channels

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::app::AppState;
use crate::game::{ClientId, ScoreEvent};
use crate::util::rate_limit::CommandRateLimiter;
use crate::util::time::TICK_INTERVAL;
use crate::ws::protocol::{Command, FieldSnapshot, Notice};

/// Command-channel upgrade. One connection per client id.
pub async fn pong_handler(
    ws: WebSocketUpgrade,
    Path(client_id): Path<ClientId>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_pong_socket(socket, client_id, state))
}

/// Handle the upgraded command connection: claim a slot (or spectate), then
/// pump inbound key frames into the game until the socket closes.
async fn handle_pong_socket(socket: WebSocket, client_id: ClientId, state: AppState) {
    info!(client_id, "new command connection");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Subscribe before announcing so this client also sees its own join.
    let notices = state.subscribe();
    state.publish(Notice::Joined { client: client_id });

    let assigned = state.game.lock().connect(client_id);
    let slot_notice = match assigned {
        Some(pad) => {
            info!(client_id, pad = pad.as_str(), "slot assigned");
            Notice::SlotAssigned {
                client: client_id,
                pad,
            }
        }
        None => {
            info!(client_id, "arena full, admitted as spectator");
            Notice::SpectatorOnly
        }
    };
    if let Err(e) = send_json(&mut ws_sink, &slot_notice.envelope()).await {
        error!(client_id, error = %e, "failed to send slot notice");
        state.game.lock().disconnect(client_id);
        state.publish(Notice::Left { client: client_id });
        return;
    }

    // Writer task: shared notices -> this socket.
    let writer_handle = tokio::spawn(forward_notices(ws_sink, notices, client_id));

    // Reader loop: key frames -> game state.
    let rate_limiter = CommandRateLimiter::new();
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(frame)) => {
                if !rate_limiter.check() {
                    warn!(client_id, "rate limited command frame");
                    continue;
                }
                let Some(command) = Command::parse(&frame) else {
                    debug!(client_id, frame = %frame, "ignoring unknown frame");
                    continue;
                };
                let notice = state.game.lock().command(client_id, command);
                if let Some(notice) = notice {
                    state.publish(notice);
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(client_id, "received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!(client_id, "client initiated close");
                break;
            }
            Err(e) => {
                debug!(client_id, error = %e, "command socket error");
                break;
            }
        }
    }

    // A dropped connection is an implicit leave.
    state.game.lock().disconnect(client_id);
    state.publish(Notice::Left { client: client_id });
    writer_handle.abort();

    info!(client_id, "command connection closed");
}

/// Forward shared notices to one command-channel socket until either side
/// goes away.
async fn forward_notices(
    mut ws_sink: SplitSink<WebSocket, Message>,
    mut notices: broadcast::Receiver<Notice>,
    client_id: ClientId,
) {
    loop {
        match notices.recv().await {
            Ok(notice) => {
                if let Err(e) = send_json(&mut ws_sink, &notice.envelope()).await {
                    debug!(client_id, error = %e, "notice send failed");
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(client_id, lagged_count = n, "client lagged, skipping {} notices", n);
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!(client_id, "notice channel closed");
                break;
            }
        }
    }
}

/// Streaming-channel upgrade: no inbound data, snapshots out.
pub async fn field_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_field_socket(socket, state))
}

/// The authoritative tick driver, one per streaming subscriber: advance the
/// simulation, publish score changes, stream the snapshot. A failed send
/// ends only this subscriber's loop.
async fn handle_field_socket(mut socket: WebSocket, state: AppState) {
    info!("new field subscriber");

    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let (event, snapshot, score_notice): (Option<ScoreEvent>, _, _) = {
            let mut game = state.game.lock();
            let event = game.tick();
            let score_notice = event.map(|_| Notice::score(&game.arena));
            (event, FieldSnapshot::capture(&game.arena), score_notice)
        };

        if let Some(event) = event {
            info!(
                missed = event.missed.as_str(),
                awarded_to = event.awarded_to.as_str(),
                "point scored"
            );
        }
        if let Some(notice) = score_notice {
            state.publish(notice.clone());
            if let Err(e) = send_socket_json(&mut socket, &notice.envelope()).await {
                debug!(error = %e, "score send failed, closing field loop");
                break;
            }
        }

        if let Err(e) = send_socket_json(&mut socket, &snapshot).await {
            debug!(error = %e, "snapshot send failed, closing field loop");
            break;
        }
    }

    info!("field subscriber closed");
}

/// Send a message over a split WebSocket sink
async fn send_json<T: Serialize>(
    sink: &mut SplitSink<WebSocket, Message>,
    value: &T,
) -> Result<(), String> {
    let json = serde_json::to_string(value).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json)).await.map_err(|e| e.to_string())
}

/// Send a message over an unsplit WebSocket
async fn send_socket_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), String> {
    let json = serde_json::to_string(value).map_err(|e| e.to_string())?;
    socket
        .send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}
