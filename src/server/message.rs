//! Wire framing for the room protocol.
//!
//! Every payload crossing a room's WebSocket rides in an [`Envelope`]
//! tagged with a [`MessageType`]. Inbound frames arrive with the content
//! still undecoded ([`Inbound`]), because its shape depends on the tag
//! and on where the room stands in its setup negotiation.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::{CardId, InstanceId};
use crate::piles::Movement;

/// Discriminant carried in every envelope's `type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    /// Deck submission, and its echo carrying assigned instance ids.
    #[serde(rename = "SETUP_MESSAGE")]
    Setup,

    /// Offer of the coin call to seat 0 (and the waiting notice to seat 1).
    HeadsOrTails,

    /// Seat 0's answer to the coin call.
    CoinChoice,

    /// Offer of the turn-order choice to the seat that won the flip.
    FirstOrSecond,

    /// The winner's answer to the turn-order choice.
    FirstOrSecondChoice,

    /// In-game traffic: an [`Action`](crate::core::Action) inbound, an
    /// [`UpdateInfo`](crate::game::UpdateInfo) outbound.
    Gameplay,

    /// Rejection notice, sent only to the offending seat.
    Error,
}

impl MessageType {
    /// The tag as it appears on the wire.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            MessageType::Setup => "SETUP_MESSAGE",
            MessageType::HeadsOrTails => "HEADS_OR_TAILS",
            MessageType::CoinChoice => "COIN_CHOICE",
            MessageType::FirstOrSecond => "FIRST_OR_SECOND",
            MessageType::FirstOrSecondChoice => "FIRST_OR_SECOND_CHOICE",
            MessageType::Gameplay => "GAMEPLAY",
            MessageType::Error => "ERROR",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// The framing every outbound payload travels in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub content: T,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Seconds since the Unix epoch at send time.
    pub timestamp: u64,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a payload, stamping it with the current time.
    pub fn new(message_type: MessageType, content: T) -> Self {
        Self {
            content,
            message_type,
            timestamp: unix_timestamp(),
        }
    }

    /// Serialize to the JSON sent over the socket.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

/// An inbound frame with its content still undecoded.
///
/// Decoding happens in two steps: the frame first, then
/// [`Inbound::into_content`] once the room knows what the tag and its
/// own phase say to expect.
#[derive(Debug, Deserialize)]
pub struct Inbound {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl Inbound {
    /// Parse the framing of one inbound frame.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Decode the content into the type the current phase expects.
    pub fn into_content<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.content)
    }
}

/// Deck list a seat submits during setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupContent {
    pub deck: Vec<CardId>,
}

/// Instance ids assigned to both decks, echoed to each seat once both
/// decks are in, so clients can bind sprites before the first draw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupResponse {
    pub deck: Vec<InstanceId>,
    pub opp_deck: Vec<InstanceId>,
}

/// Tells a seat whether it is the one calling the coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinContent {
    pub is_choosing_flip: bool,
}

/// Seat 0's coin call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinChoice {
    pub heads: bool,
}

/// Tells a seat whether it picks the turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOrderContent {
    pub is_choosing_turn_order: bool,
}

/// The flip winner's turn-order pick: `first` means "I go first".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrderChoice {
    pub first: bool,
}

/// Why an inbound message was rejected.
///
/// When the failed action had already moved cards, those movements ride
/// along so the client can resynchronize its board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContent {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movements: Option<Vec<Movement>>,
}
