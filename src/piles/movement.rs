//! Card movement records.
//!
//! Every physical relocation of a card produces one [`Movement`]. The
//! list of movements since the last update is the only thing clients
//! get to animate from, so the engine records them even for actions
//! that later fail partway through.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, InstanceId};
use crate::piles::Pile;

/// One card changing piles, from the owner's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// The card copy that moved. Never redacted, so clients can track a
    /// face-down card across moves.
    #[serde(rename = "gameId")]
    pub instance: InstanceId,

    /// The printed card, or [`CardId::HIDDEN`] in redacted views.
    #[serde(rename = "cardId")]
    pub card: CardId,

    pub from: Pile,
    pub to: Pile,
}

impl Movement {
    /// Rewrite this movement for the other player.
    ///
    /// The printed card is blanked when the destination is hidden from
    /// across the table, then both ends are mapped through
    /// [`Pile::opponent_view`]. Visibility is decided on the real
    /// destination before the perspective flip.
    #[must_use]
    pub fn redacted_for_opponent(&self) -> Self {
        let card = if self.to.public_knowledge() {
            self.card
        } else {
            CardId::HIDDEN
        };
        Self {
            instance: self.instance,
            card,
            from: self.from.opponent_view(),
            to: self.to.opponent_view(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let movement = Movement {
            instance: InstanceId(2),
            card: CardId(1),
            from: Pile::Hand,
            to: Pile::Discard,
        };
        let json = serde_json::to_string(&movement).unwrap();
        assert_eq!(
            json,
            "{\"gameId\":2,\"cardId\":1,\"from\":\"HAND\",\"to\":\"DISCARD\"}"
        );
    }

    #[test]
    fn test_redaction_hides_cards_landing_face_down() {
        let draw = Movement {
            instance: InstanceId(5),
            card: CardId(3),
            from: Pile::Deck,
            to: Pile::Hand,
        };
        let seen = draw.redacted_for_opponent();

        assert_eq!(seen.instance, InstanceId(5));
        assert_eq!(seen.card, CardId::HIDDEN);
        assert_eq!(seen.from, Pile::OppDeck);
        assert_eq!(seen.to, Pile::OppHand);
    }

    #[test]
    fn test_redaction_reveals_cards_landing_face_up() {
        let discard = Movement {
            instance: InstanceId(2),
            card: CardId(1),
            from: Pile::Hand,
            to: Pile::Discard,
        };
        let seen = discard.redacted_for_opponent();

        assert_eq!(seen.card, CardId(1));
        assert_eq!(seen.from, Pile::OppHand);
        assert_eq!(seen.to, Pile::OppDiscard);
    }
}
