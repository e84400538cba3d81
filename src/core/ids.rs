//! Identifier newtypes.
//!
//! Two distinct card identities flow through the engine and the wire
//! protocol, and mixing them up is the classic bug this module exists
//! to prevent:
//!
//! - [`CardId`] names a printed card within a set (an index into the
//!   set's definition list). Every copy of the same card shares it.
//! - [`InstanceId`] names one physical copy inside one game. It is
//!   assigned at deck construction and never reused.
//!
//! Both serialize as bare numbers to match the wire protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a card definition within its set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    /// Stand-in written into redacted movements in place of a real id.
    ///
    /// Collides with the first definition of a set; clients are expected
    /// to treat it as "card back" only in redacted contexts.
    pub const HIDDEN: CardId = CardId(0);

    /// Create a card id from a raw set index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw set index.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The definition's position in its set list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for CardId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Identity of one card copy within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create an instance id from a raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for InstanceId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}
