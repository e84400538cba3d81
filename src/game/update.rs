//! Outbound update views.
//!
//! Every processed action yields two [`UpdateInfo`]s derived from the
//! same movement list: the actor's in full detail and the opponent's
//! with hidden cards redacted and piles flipped across the table.
//! Clients apply movements incrementally; an update is an event log,
//! not a snapshot.

use serde::{Deserialize, Serialize};

use crate::core::{InstanceId, Phase};
use crate::effects::{CountRestriction, Prompt};
use crate::piles::{Movement, Pile};

/// One player's view of the result of a game step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfo {
    /// Card relocations since the last update, in the order performed.
    pub movements: Vec<Movement>,

    /// The phase this player's client should display.
    pub phase: Phase,

    /// The pile the client should focus (the one being selected from,
    /// or the hand).
    pub pile: Pile,

    /// Cards to show face up out-of-pile (revealed search results).
    pub open_view_cards: Vec<InstanceId>,

    /// Cards this player may click: playables in `MY_TURN`, selection
    /// candidates in `SELECTING_CARDS`, nothing otherwise.
    pub selectable_cards: Vec<InstanceId>,

    /// Bounds on how many of the selectable cards must be picked.
    /// Present only while a selection is pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_restrictions: Option<CountRestriction>,
}

impl UpdateInfo {
    /// Assemble the actor's view from a movement journal and the
    /// interpreter's prompt.
    #[must_use]
    pub fn new(movements: Vec<Movement>, prompt: Prompt) -> Self {
        Self {
            movements,
            phase: prompt.phase,
            pile: prompt.pile,
            open_view_cards: prompt.open_view_cards,
            selectable_cards: prompt.selectable_cards,
            selection_restrictions: prompt.selection_restrictions,
        }
    }

    /// The opponent's rendition of this update: every movement
    /// redacted, no prompt (it is not their turn).
    #[must_use]
    pub fn opponent_view(&self) -> Self {
        Self {
            movements: self
                .movements
                .iter()
                .map(Movement::redacted_for_opponent)
                .collect(),
            phase: Phase::OpponentsTurn,
            pile: Pile::Hand,
            open_view_cards: Vec::new(),
            selectable_cards: Vec::new(),
            selection_restrictions: None,
        }
    }
}

/// Both views of one game step. The actor half goes to the player who
/// acted; the opponent half to the other seat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnUpdate {
    pub actor: UpdateInfo,
    pub opponent: UpdateInfo,
}

impl TurnUpdate {
    /// Build both views from the actor's movements and prompt.
    #[must_use]
    pub fn new(movements: Vec<Movement>, prompt: Prompt) -> Self {
        let actor = UpdateInfo::new(movements, prompt);
        let opponent = actor.opponent_view();
        Self { actor, opponent }
    }
}

/// Interleave a player's own movements with the opponent's redacted
/// ones, own first. Used when one game step moves both players' cards.
#[must_use]
pub fn merge_movements(own: &[Movement], theirs: &[Movement]) -> Vec<Movement> {
    let mut merged = Vec::with_capacity(own.len() + theirs.len());
    merged.extend_from_slice(own);
    merged.extend(theirs.iter().map(Movement::redacted_for_opponent));
    merged
}
