//! Core engine types: identities, players, phases, actions, errors, RNG.
//!
//! This module contains the fundamental building blocks the rest of the
//! engine is assembled from. Nothing here knows about piles or effects.

pub mod action;
pub mod error;
pub mod ids;
pub mod phase;
pub mod player;
pub mod rng;

pub use action::{Action, ActionKind};
pub use error::GameError;
pub use ids::{CardId, InstanceId};
pub use phase::Phase;
pub use player::PlayerId;
pub use rng::GameRng;
