use {
    crate::{
        AppState,
        domain::{
            id::room_for_user,
            push::{NOTIFICATIONS_ROOM, PushChannel, PushError},
        },
    },
    axum::{
        extract::{
            Path, State, WebSocketUpgrade,
            ws::{Message, WebSocket},
        },
        response::IntoResponse,
    },
    serde::Serialize,
    std::sync::Arc,
    tokio::sync::broadcast::{self, error::RecvError},
};

#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    pub room: String,
    pub event: String,
    pub data: serde_json::Value,
}

/// In-process fan-out to WebSocket subscribers. Each connection filters the
/// shared stream down to the rooms it joined.
#[derive(Clone)]
pub struct RealtimeHub {
    tx: broadcast::Sender<Arc<PushMessage>>,
}

impl RealtimeHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<PushMessage>> {
        self.tx.subscribe()
    }
}

impl PushChannel for RealtimeHub {
    fn emit(&self, room: &str, event: &str, payload: serde_json::Value) -> Result<(), PushError> {
        // Nobody connected is not a failure.
        if self.tx.receiver_count() == 0 {
            return Ok(());
        }

        self.tx
            .send(Arc::new(PushMessage {
                room: room.to_string(),
                event: event.to_string(),
                data: payload,
            }))
            .map(|_| ())
            .map_err(|_| PushError::Closed)
    }
}

/// Joins the user's private room and the shared notifications room.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let rx = state.hub.subscribe();
    ws.on_upgrade(move |socket| forward_rooms(socket, room_for_user(user_id), rx))
}

async fn forward_rooms(
    mut socket: WebSocket,
    room: String,
    mut rx: broadcast::Receiver<Arc<PushMessage>>,
) {
    tracing::info!(room = %room, "realtime client joined");

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Ok(msg) if msg.room == room || msg.room == NOTIFICATIONS_ROOM => {
                    let frame = serde_json::json!({ "event": msg.event, "data": msg.data });
                    if socket.send(Message::Text(frame.to_string().into())).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(room = %room, skipped, "realtime client lagging, events dropped");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::info!(room = %room, "realtime client left");
}
