//! Player identification.
//!
//! A game seats exactly two players, indexed 0 and 1. `PlayerId` is a
//! type-safe wrapper around the seat index.

use serde::{Deserialize, Serialize};

/// Seat index of a player within a game.
///
/// Seats are 0-based: the first player to join is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other seat in a two-player game.
    ///
    /// ```
    /// use cardroom::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(0).opponent(), PlayerId::new(1));
    /// assert_eq!(PlayerId::new(1).opponent(), PlayerId::new(0));
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}
