//! HTTP entry point and per-connection plumbing.
//!
//! `GET /join?room=N` upgrades to a WebSocket and drops the connection
//! into room `N`, creating the room on first join. Each connection gets
//! a writer task fed by an mpsc channel, so rooms hand payloads off
//! without ever touching a socket while holding a lock.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cards::CardRegistry;
use crate::game::Game;

use super::room::Room;

/// Room joined when the query string names none.
pub const DEFAULT_ROOM: u8 = 255;

/// Shared server state behind the router.
pub struct AppState {
    rooms: DashMap<u8, Arc<Room>>,
    registry: Arc<CardRegistry>,
    set: String,
}

/// Handle to the state, cloned into every connection task.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build the shared state around a loaded registry and the card set
    /// every room's game plays with.
    #[must_use]
    pub fn shared(registry: CardRegistry, set: impl Into<String>) -> SharedState {
        Arc::new(Self {
            rooms: DashMap::new(),
            registry: Arc::new(registry),
            set: set.into(),
        })
    }

    /// Number of rooms currently open.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

/// The application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/join", get(join_handler))
        .with_state(state)
}

#[derive(Deserialize)]
struct JoinParams {
    room: Option<String>,
}

async fn join_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<JoinParams>,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    let number = params
        .room
        .as_deref()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_ROOM);
    ws.on_upgrade(move |socket| handle_socket(socket, state, number))
}

async fn handle_socket(socket: WebSocket, state: SharedState, number: u8) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<String>(32);

    // Writer task: the only place this socket is written to.
    tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sink.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    let room = state
        .rooms
        .entry(number)
        .or_insert_with(|| {
            info!(room = number, "opening room");
            let game = Game::new(state.registry.clone(), state.set.clone(), rand::random());
            Arc::new(Room::new(number, game))
        })
        .clone();
    let role = room.join(tx).await;

    while let Some(Ok(message)) = stream.next().await {
        if let Message::Text(text) = message {
            room.handle_message(role, text.as_str()).await;
        }
    }

    if room.handle_disconnect(role).await {
        state
            .rooms
            .remove_if(&number, |_, live| Arc::ptr_eq(live, &room));
        info!(room = number, "room removed");
    }
    debug!(room = number, "connection closed");
}
