//! Turn phases as seen by one player.
//!
//! Every update tells the receiving client which phase it is now in. The
//! same game step produces different phases for the two seats: the acting
//! player may be in `SelectingCards` while the opponent sees
//! `OpponentsTurn`.

use serde::{Deserialize, Serialize};

/// The phase a single player's client should display.
///
/// `SelectingTemporaryCards` is declared for the wire protocol but no
/// current effect produces it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// This player may act: play a card or discard.
    #[default]
    MyTurn,

    /// The other player is acting; no input expected.
    OpponentsTurn,

    /// A pending effect is waiting for this player to pick cards.
    SelectingCards,

    /// Reserved: selection out of a temporary pile.
    SelectingTemporaryCards,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::MyTurn => "MY_TURN",
            Phase::OpponentsTurn => "OPPONENTS_TURN",
            Phase::SelectingCards => "SELECTING_CARDS",
            Phase::SelectingTemporaryCards => "SELECTING_TEMPORARY_CARDS",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Phase::MyTurn).unwrap(), "\"MY_TURN\"");
        assert_eq!(
            serde_json::to_string(&Phase::SelectingCards).unwrap(),
            "\"SELECTING_CARDS\""
        );

        let parsed: Phase = serde_json::from_str("\"OPPONENTS_TURN\"").unwrap();
        assert_eq!(parsed, Phase::OpponentsTurn);
    }

    #[test]
    fn test_default_is_my_turn() {
        assert_eq!(Phase::default(), Phase::MyTurn);
    }
}
