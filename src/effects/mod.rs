//! Card effects and their evaluation.
//!
//! Effects are authored as data and interpreted at play time:
//! - `Effect`: the effect grammar (sequencing, movement, targeting)
//! - `CardFilter` / `CountRestriction`: which cards a selection may name
//! - `ContinuationStack`: where paused evaluations live between actions
//! - `EffectInterpreter`: walks a tree, journaling movements, pausing
//!   whenever a selection needs player input
//!
//! An effect never blocks on the player. Anything interactive suspends
//! the whole evaluation onto the continuation stack and surfaces a
//! `Prompt`; the answering action resumes from the exact node that
//! paused.

mod continuation;
mod effect;
mod filter;
mod interp;

pub use continuation::{ContinuationFrame, ContinuationStack};
pub use effect::{Effect, TargetKind};
pub use filter::{CardFilter, CountRestriction};
pub use interp::{EffectInterpreter, Flow, Prompt};
