//! # cardroom
//!
//! A two-player card game server built around a resumable card-effect
//! interpreter.
//!
//! ## Design Principles
//!
//! 1. **Cards Are Data**: Behavior is authored as JSON effect trees and
//!    interpreted at play time. Adding a card never means adding code.
//!
//! 2. **Explicit Continuations**: When an effect needs a player's card
//!    selection, the interpreter suspends into a heap-allocated frame
//!    stack and resumes from it on the next action. No game logic ever
//!    blocks a thread waiting on input.
//!
//! 3. **Per-Seat Truth**: Every state change is reported twice, once in
//!    full to its owner and once redacted to the opponent. Hidden-pile
//!    card identities never cross the wire.
//!
//! ## Architecture
//!
//! - **Deterministic Core**: All randomness flows through a seeded
//!   `GameRng`, so a game replays identically from its seed and inputs.
//!
//! - **Fail-Closed Evaluation**: Expression or filter failures make a
//!   card unplayable and log a warning; they never guess.
//!
//! - **Transport at the Edge**: The engine is synchronous and owns no
//!   I/O. The optional `server` feature wraps it in WebSocket rooms.
//!
//! ## Modules
//!
//! - `core`: Identity newtypes, players, phases, actions, errors, RNG
//! - `expr`: Arithmetic/comparison expression trees for preconditions
//! - `piles`: Per-player pile management and movement records
//! - `cards`: Card definitions, set registry, and the JSON loader
//! - `effects`: The effect grammar and its resumable interpreter
//! - `game`: Live game state, action dispatch, and update assembly
//! - `server`: WebSocket rooms (feature `server`)

pub mod cards;
pub mod core;
pub mod effects;
pub mod expr;
pub mod game;
pub mod piles;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use crate::core::{Action, ActionKind, CardId, GameError, GameRng, InstanceId, Phase, PlayerId};

pub use crate::expr::{Expr, ExprError, GameVars};

pub use crate::piles::{CardInstance, Movement, Pile, PileManager};

pub use crate::cards::{load_dir, load_set_str, CardDefinition, CardRegistry, LoadError};

pub use crate::effects::{
    CardFilter, ContinuationFrame, ContinuationStack, CountRestriction, Effect, EffectInterpreter,
    Flow, Prompt, TargetKind,
};

pub use crate::game::{merge_movements, ActionRejected, Game, TurnUpdate, UpdateInfo};
