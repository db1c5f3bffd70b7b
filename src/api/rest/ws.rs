use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    /// Only stream this user's notifications; everything when absent.
    pub user_id: Option<Uuid>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<WsQuery>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query.user_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user_id: Option<Uuid>) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = BroadcastStream::new(state.notifier.subscribe());

    state.metrics.ws_clients.inc();
    info!(user_id = ?user_id, "websocket client connected");

    let send_task = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let notification = match event {
                Ok(notification) => notification,
                Err(err) => {
                    warn!(error = %err, "websocket client lagging; notifications dropped");
                    continue;
                }
            };

            if user_id.is_some_and(|id| id != notification.user_id) {
                continue;
            }

            let json = match serde_json::to_string(&notification) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize notification for ws");
                    continue;
                }
            };

            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    state.metrics.ws_clients.dec();
    info!(user_id = ?user_id, "websocket client disconnected");
}
