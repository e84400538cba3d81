//! Legal-play computation.
//!
//! A hand card is playable when its precondition holds. Evaluation
//! failures never crash a game: a card whose precondition cannot be
//! evaluated is simply not playable, and the failure is logged.

use tracing::warn;

use crate::cards::CardDefinition;
use crate::core::InstanceId;
use crate::expr::{ExprError, GameVars, VAR_CARDS_IN_HAND};
use crate::piles::{Pile, PileManager};

/// Expression variables backed by one player's piles.
pub struct PileFacts<'a> {
    piles: &'a PileManager,
}

impl<'a> PileFacts<'a> {
    #[must_use]
    pub fn new(piles: &'a PileManager) -> Self {
        Self { piles }
    }
}

impl GameVars for PileFacts<'_> {
    fn game_variable(&self, name: &str) -> Result<i64, ExprError> {
        match name {
            VAR_CARDS_IN_HAND => Ok(self.piles.pile_len(Pile::Hand) as i64),
            _ => Err(ExprError::UnknownVariable(name.to_string())),
        }
    }
}

/// The hand cards whose precondition currently holds, in pile order.
///
/// Cards without a definition, and cards whose precondition fails to
/// evaluate, are excluded.
pub fn playable_cards(piles: &PileManager, defs: &[CardDefinition]) -> Vec<InstanceId> {
    let facts = PileFacts::new(piles);
    let hand = piles.pile(Pile::Hand).unwrap_or(&[]);

    let mut playable = Vec::with_capacity(hand.len());
    for card in hand {
        let Some(def) = defs.get(card.card.index()) else {
            warn!(card = %card.card, "card has no definition, treating as unplayable");
            continue;
        };
        let ok = match &def.precondition {
            None => true,
            Some(cond) => match cond.evaluate_bool(&facts) {
                Ok(ok) => ok,
                Err(err) => {
                    warn!(card = %card.card, %err, "precondition failed to evaluate");
                    false
                }
            },
        };
        if ok {
            playable.push(card.instance);
        }
    }
    playable
}
