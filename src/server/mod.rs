//! WebSocket transport for hosting games.
//!
//! A running server is a map of numbered [`Room`]s, each seating two
//! players (plus any spectators) around one [`Game`](crate::game::Game).
//! Clients join over `GET /join?room=N`, negotiate setup through typed
//! [`Envelope`]s, and then exchange gameplay traffic until a seat
//! disconnects.

mod message;
mod room;
mod ws;

pub use message::{
    CoinChoice, CoinContent, Envelope, ErrorContent, Inbound, MessageType, SetupContent,
    SetupResponse, TurnOrderChoice, TurnOrderContent,
};
pub use room::{Role, Room};
pub use ws::{router, AppState, SharedState, DEFAULT_ROOM};
