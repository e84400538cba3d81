//! Effect tree definitions.
//!
//! A card's effect is a small tree authored in JSON and walked by the
//! interpreter. The grammar is deliberately closed: sequencing with
//! `THEN`, relocation with `MOVE`, and target resolution with `TARGET`.
//! `OR` and `SHUFFLE` are admitted by the parser but have no evaluation
//! semantics yet; the interpreter rejects them explicitly rather than
//! guessing.

use serde::{Deserialize, Serialize};

use crate::effects::CardFilter;
use crate::piles::Pile;

/// How a `TARGET` node resolves to concrete cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetKind {
    /// The player picks cards matching the filter; suspends the game.
    Select,
    /// The card that was played to start the effect.
    This,
    /// Every card matching the filter. Grammar only; not evaluated.
    All,
    /// The top cards of a pile. Grammar only; not evaluated.
    Top,
}

impl TargetKind {
    /// The wire name of this target kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TargetKind::Select => "SELECT",
            TargetKind::This => "THIS",
            TargetKind::All => "ALL",
            TargetKind::Top => "TOP",
        }
    }
}

/// One node of a card effect tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    /// Evaluate children in order, suspending wherever one suspends.
    Then {
        #[serde(default)]
        args: Vec<Effect>,
    },

    /// Pick one child. Grammar only; not evaluated.
    Or {
        #[serde(default)]
        args: Vec<Effect>,
    },

    /// Resolve `target` to cards, then move each to `to`.
    Move { target: Box<Effect>, to: Pile },

    /// Resolve to a list of cards for an enclosing `MOVE`.
    Target {
        #[serde(rename = "targetType")]
        target_type: TargetKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<CardFilter>,
    },

    /// Shuffle a pile. Grammar only; not evaluated.
    Shuffle,
}

impl Effect {
    /// Sequence several effects.
    #[must_use]
    pub fn then(args: impl IntoIterator<Item = Effect>) -> Self {
        Effect::Then {
            args: args.into_iter().collect(),
        }
    }

    /// A target resolving to the played card itself.
    #[must_use]
    pub const fn target_this() -> Self {
        Effect::Target {
            target_type: TargetKind::This,
            filter: None,
        }
    }

    /// A target the player answers with a selection.
    #[must_use]
    pub fn target_select(filter: CardFilter) -> Self {
        Effect::Target {
            target_type: TargetKind::Select,
            filter: Some(filter),
        }
    }

    /// Move the played card itself to `to`.
    #[must_use]
    pub fn move_this_to(to: Pile) -> Self {
        Effect::Move {
            target: Box::new(Effect::target_this()),
            to,
        }
    }

    /// Move player-selected cards matching `filter` to `to`.
    #[must_use]
    pub fn move_selected_to(filter: CardFilter, to: Pile) -> Self {
        Effect::Move {
            target: Box::new(Effect::target_select(filter)),
            to,
        }
    }

    /// The wire name of this node's kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Effect::Then { .. } => "THEN",
            Effect::Or { .. } => "OR",
            Effect::Move { .. } => "MOVE",
            Effect::Target { .. } => "TARGET",
            Effect::Shuffle => "SHUFFLE",
        }
    }
}
