//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: its
//! display data, the precondition gating when it may be played, and
//! the effect tree interpreted when it is. Definitions carry no
//! per-game state; live cards reference them by set name and index.
//!
//! The serialized form matches the authoring format card sets are
//! written in, minus the alias field (aliases are resolved away at
//! load time).

use serde::{Deserialize, Serialize};

use crate::effects::Effect;
use crate::expr::Expr;

/// Static card definition.
///
/// A card with no precondition is always playable; a card with no
/// effect goes to the discard pile when played and does nothing else.
///
/// ## Example
///
/// ```
/// use cardroom::cards::CardDefinition;
/// use cardroom::effects::Effect;
/// use cardroom::piles::Pile;
///
/// let card = CardDefinition::vanilla("Recycler", "recycler.png")
///     .with_effect(Effect::move_this_to(Pile::Deck));
///
/// assert!(card.effect.is_some());
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CardDefinition {
    /// Card name (for display/debugging).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Path to the card's face image, relative to the client's assets.
    #[serde(rename = "imageSrc", default, skip_serializing_if = "String::is_empty")]
    pub image_src: String,

    /// Type tag referenced by card filters. Untyped cards match only
    /// filters without a type constraint.
    #[serde(rename = "cardType", default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,

    /// Expression that must evaluate true for the card to be playable.
    #[serde(rename = "preCondition", default, skip_serializing_if = "Option::is_none")]
    pub precondition: Option<Expr>,

    /// Effect tree evaluated when the card is played.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<Effect>,
}

impl CardDefinition {
    /// Create a definition with no precondition, effect, or type.
    #[must_use]
    pub fn vanilla(name: impl Into<String>, image_src: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_src: image_src.into(),
            card_type: None,
            precondition: None,
            effect: None,
        }
    }

    /// Set the type tag (builder pattern).
    #[must_use]
    pub fn with_card_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = Some(card_type.into());
        self
    }

    /// Set the play precondition (builder pattern).
    #[must_use]
    pub fn with_precondition(mut self, precondition: Expr) -> Self {
        self.precondition = Some(precondition);
        self
    }

    /// Set the play effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }
}
