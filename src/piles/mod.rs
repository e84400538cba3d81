//! Piles: card locations, movement between them, and visibility.
//!
//! Game state lives in per-player [`PileManager`]s. Every relocation a
//! manager performs yields a [`Movement`] record, which [`Pile`]'s
//! perspective and visibility rules turn into what each player is
//! allowed to see.

pub mod manager;
pub mod movement;
pub mod pile;

pub use manager::{CardInstance, PileManager};
pub use movement::Movement;
pub use pile::Pile;
