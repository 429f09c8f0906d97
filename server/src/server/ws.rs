// WebSocket handlers and websocket-specific helpers.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::StreamExt;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;

use crate::server::router;
use crate::server::state::{AppState, ConnId};
use groupchat_shared::{ClientMsg, ServerMsg};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    // Register the outbound queue before any event can name this
    // connection, so fan-out never races the handshake.
    let conn = ConnId::next();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMsg>();
    state.hub.write().await.conns.insert(conn, tx);

    let hello = format!("{} {}", "[CONNECT]".bold().green(), conn.bold());
    tracing::info!(%hello);

    loop {
        tokio::select! {
            biased;

            // Outbound messages queued for this connection by the router.
            queued = rx.recv() => {
                match queued {
                    Some(sm) => send_ws(&mut socket, &sm).await,
                    // Sender dropped: the hub no longer knows this connection.
                    None => break,
                }
            }

            // Incoming websocket messages from this client.
            msg = socket.next() => {
                match msg {
                    Some(Ok(Message::Text(txt))) => {
                        match serde_json::from_str::<ClientMsg>(&txt) {
                            Ok(cm) => router::handle_client_msg(&state, conn, cm).await,
                            Err(e) => {
                                // Dropped here; never propagated to other connections.
                                tracing::warn!(%conn, error = %e, "failed to parse incoming ClientMsg JSON");
                                tracing::debug!(raw_in = %txt);
                                send_ws(&mut socket, &ServerMsg::Error("Malformed ClientMsg JSON".into())).await;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    // Cleanup runs no matter how the loop ended: client close, socket
    // error, or the hub dropping the sender.
    router::handle_disconnect(&state, conn).await;
    tracing::info!(%conn, "client disconnected");
}

async fn send_ws(socket: &mut WebSocket, msg: &ServerMsg) {
    match serde_json::to_string(msg) {
        Ok(txt) => {
            let _ = socket.send(Message::Text(txt)).await;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize ServerMsg for websocket send");
        }
    }
}
