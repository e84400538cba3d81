//! Pile identities and perspective mapping.
//!
//! Every card in a game sits in exactly one pile. Piles come in pairs:
//! seven owned by the viewing player and seven `OPP_*` mirrors naming
//! the opponent's side. Game state is always stored in own-perspective
//! piles; the `OPP_*` variants exist only in outbound updates, produced
//! by [`Pile::opponent_view`] when one player's movements are shown to
//! the other.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fourteen named card locations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Pile {
    Hand,
    Deck,
    Discard,
    Reserve,
    Special,
    Battlefield,
    Temporary,
    OppHand,
    OppDeck,
    OppDiscard,
    OppReserve,
    OppSpecial,
    OppBattlefield,
    OppTemporary,
}

impl Pile {
    /// The seven piles a single player owns, in dealing order.
    pub const PLAYER_PILES: [Pile; 7] = [
        Pile::Hand,
        Pile::Deck,
        Pile::Discard,
        Pile::Reserve,
        Pile::Special,
        Pile::Battlefield,
        Pile::Temporary,
    ];

    /// Whether cards in this pile are visible to both players.
    ///
    /// Hands, decks, the face-down reserve, and the temporary working
    /// pile are hidden; everything else is face up.
    #[must_use]
    pub const fn public_knowledge(self) -> bool {
        !matches!(
            self,
            Pile::Hand
                | Pile::Deck
                | Pile::Reserve
                | Pile::Temporary
                | Pile::OppHand
                | Pile::OppDeck
                | Pile::OppReserve
                | Pile::OppTemporary
        )
    }

    /// Map this pile across the table.
    ///
    /// Own piles become their `OPP_*` mirror and vice versa, so applying
    /// it twice returns the original pile.
    #[must_use]
    pub const fn opponent_view(self) -> Pile {
        match self {
            Pile::Hand => Pile::OppHand,
            Pile::Deck => Pile::OppDeck,
            Pile::Discard => Pile::OppDiscard,
            Pile::Reserve => Pile::OppReserve,
            Pile::Special => Pile::OppSpecial,
            Pile::Battlefield => Pile::OppBattlefield,
            Pile::Temporary => Pile::OppTemporary,
            Pile::OppHand => Pile::Hand,
            Pile::OppDeck => Pile::Deck,
            Pile::OppDiscard => Pile::Discard,
            Pile::OppReserve => Pile::Reserve,
            Pile::OppSpecial => Pile::Special,
            Pile::OppBattlefield => Pile::Battlefield,
            Pile::OppTemporary => Pile::Temporary,
        }
    }

    /// The wire name of this pile.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Pile::Hand => "HAND",
            Pile::Deck => "DECK",
            Pile::Discard => "DISCARD",
            Pile::Reserve => "RESERVE",
            Pile::Special => "SPECIAL",
            Pile::Battlefield => "BATTLEFIELD",
            Pile::Temporary => "TEMPORARY",
            Pile::OppHand => "OPP_HAND",
            Pile::OppDeck => "OPP_DECK",
            Pile::OppDiscard => "OPP_DISCARD",
            Pile::OppReserve => "OPP_RESERVE",
            Pile::OppSpecial => "OPP_SPECIAL",
            Pile::OppBattlefield => "OPP_BATTLEFIELD",
            Pile::OppTemporary => "OPP_TEMPORARY",
        }
    }
}

impl fmt::Display for Pile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        assert!(!Pile::Hand.public_knowledge());
        assert!(!Pile::Deck.public_knowledge());
        assert!(!Pile::Reserve.public_knowledge());
        assert!(!Pile::Temporary.public_knowledge());
        assert!(!Pile::OppHand.public_knowledge());
        assert!(!Pile::OppDeck.public_knowledge());
        assert!(Pile::Discard.public_knowledge());
        assert!(Pile::Special.public_knowledge());
        assert!(Pile::Battlefield.public_knowledge());
        assert!(Pile::OppDiscard.public_knowledge());
    }

    #[test]
    fn test_opponent_view_is_an_involution() {
        let all = [
            Pile::Hand,
            Pile::Deck,
            Pile::Discard,
            Pile::Reserve,
            Pile::Special,
            Pile::Battlefield,
            Pile::Temporary,
            Pile::OppHand,
            Pile::OppDeck,
            Pile::OppDiscard,
            Pile::OppReserve,
            Pile::OppSpecial,
            Pile::OppBattlefield,
            Pile::OppTemporary,
        ];
        for pile in all {
            assert_eq!(pile.opponent_view().opponent_view(), pile);
        }
        assert_eq!(Pile::Hand.opponent_view(), Pile::OppHand);
        assert_eq!(Pile::OppDiscard.opponent_view(), Pile::Discard);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Pile::Hand).unwrap(), "\"HAND\"");
        assert_eq!(
            serde_json::to_string(&Pile::OppBattlefield).unwrap(),
            "\"OPP_BATTLEFIELD\""
        );

        let pile: Pile = serde_json::from_str("\"OPP_DECK\"").unwrap();
        assert_eq!(pile, Pile::OppDeck);
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(Pile::Temporary.to_string(), "TEMPORARY");
        assert_eq!(Pile::OppHand.to_string(), "OPP_HAND");
    }
}
