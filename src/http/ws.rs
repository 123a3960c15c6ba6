use super::state::AppState;
use crate::fanout::ChannelSubscriber;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// GET /ws
/// Subscriber connection: receives the current state on connect, then every
/// state change and relayed event
pub async fn subscribe(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (subscriber, mut outbound) = ChannelSubscriber::new(state.subscriber_buffer);
    let hub = Arc::clone(state.hub());

    // Writer: drain the outbound queue into the socket. When it stops, the
    // queue's receiver is dropped and the next broadcast removes the connection.
    // Started before registration so onboarding frames never wait on it.
    let writer = tokio::spawn(async move {
        while let Some(payload) = outbound.recv().await {
            if let Err(e) = sink.send(Message::Text(payload.to_string())).await {
                debug!("WebSocket write failed: {}", e);
                break;
            }
        }
        let _ = sink.close().await;
    });

    let handle = match hub.connect(Arc::new(subscriber)).await {
        Ok(handle) => handle,
        Err(e) => {
            warn!("Subscriber failed during onboarding: {}", e);
            writer.abort();
            return;
        }
    };

    // Reader: subscribers don't send anything meaningful, just wait for close
    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("WebSocket read failed: {}", e);
                break;
            }
        }
    }

    hub.disconnect(&handle).await;
    writer.abort();
    info!(connection = %handle, "Display client disconnected");
}
