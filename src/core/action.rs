//! Inbound player actions.
//!
//! An [`Action`] is the unit of player input: one discrete request sent
//! over the wire, interpreted exactly once by the dispatcher. Selections
//! are almost always one or two cards, so they ride in a `SmallVec`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::InstanceId;
use crate::piles::Pile;

/// What kind of request an action carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// End the current turn. Declared for the protocol; not yet dispatched.
    EndTurn,

    /// Play a single card out of the hand.
    PlayCard,

    /// Conclude a card selection (answering a pending prompt, or a plain
    /// discard when nothing is pending).
    FinishSelection,
}

/// One discrete player request.
///
/// While a selection prompt is pending, the pending effect owns
/// interpretation of the payload and `kind` is not consulted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The declared request kind.
    #[serde(rename = "type")]
    pub kind: ActionKind,

    /// The cards this request refers to, in submission order.
    #[serde(rename = "selectedCards", default)]
    pub selected_cards: SmallVec<[InstanceId; 2]>,

    /// The pile the cards are taken from, when the kind requires one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Pile>,
}

impl Action {
    /// Build a `PlayCard` action for one card out of the hand.
    #[must_use]
    pub fn play_card(instance: InstanceId) -> Self {
        Self {
            kind: ActionKind::PlayCard,
            selected_cards: SmallVec::from_slice(&[instance]),
            from: Some(Pile::Hand),
        }
    }

    /// Build a `FinishSelection` action carrying the given cards.
    #[must_use]
    pub fn finish_selection(instances: &[InstanceId]) -> Self {
        Self {
            kind: ActionKind::FinishSelection,
            selected_cards: SmallVec::from_slice(instances),
            from: Some(Pile::Hand),
        }
    }

    /// Build an `EndTurn` action.
    #[must_use]
    pub fn end_turn() -> Self {
        Self {
            kind: ActionKind::EndTurn,
            selected_cards: SmallVec::new(),
            from: None,
        }
    }
}
