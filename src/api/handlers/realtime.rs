//! WebSocket stream of real-time events

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::api::state::AppState;
use crate::domain::events::RealtimeEvent;

/// GET /ws
pub async fn realtime_stream(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let receiver = state.events.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, receiver))
}

/// Forwards every broadcast event as a JSON text frame until either side closes
async fn handle_socket(socket: WebSocket, mut receiver: broadcast::Receiver<RealtimeEvent>) {
    let (mut ws_write, mut ws_read) = socket.split();
    let client_id = uuid::Uuid::new_v4();

    info!(client_id = %client_id, "Realtime client connected");

    let mut read_task = tokio::spawn(async move {
        while let Some(msg) = ws_read.next().await {
            match msg {
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    debug!(error = %e, "Realtime read error");
                    break;
                }
                _ => {}
            }
        }
    });

    loop {
        tokio::select! {
            result = receiver.recv() => {
                match result {
                    Ok(event) => {
                        let Some(text) = encode_event(&event) else {
                            continue;
                        };

                        if let Err(e) = ws_write.send(Message::Text(text.into())).await {
                            debug!(client_id = %client_id, error = %e, "Realtime write error");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(client_id = %client_id, missed, "Realtime client lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = &mut read_task => break,
        }
    }

    read_task.abort();
    info!(client_id = %client_id, "Realtime client disconnected");
}

fn encode_event(event: &RealtimeEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!(event = event.name(), error = %e, "Failed to serialize realtime event");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::disaster::{AuditAction, Disaster};

    #[test]
    fn test_encode_event_wire_shape() {
        let event = RealtimeEvent::disaster(
            AuditAction::Delete,
            Disaster::new("Flood", "Water rising", "reliefAdmin"),
        );

        let text = encode_event(&event).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["event"], "disaster_updated");
        assert_eq!(value["data"]["action"], "delete");
        assert_eq!(value["data"]["disaster"]["title"], "Flood");
    }
}
