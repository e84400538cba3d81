//! Action-level error taxonomy.
//!
//! Three families share one enum:
//!
//! - **Malformed input**: a player submitted something the game cannot
//!   honor (wrong counts, unknown action shapes, cards they do not hold).
//!   The action is rejected and state is unchanged.
//! - **Grammar gaps**: effect/filter/target kinds the grammar admits but
//!   evaluation does not implement. Surfaced loudly rather than silently
//!   skipped.
//! - **Invariant violations**: internal bookkeeping defects such as an
//!   instance id missing from the ownership index. These abort the action
//!   without corrupting pile state.
//!
//! Expression-evaluation failures live in [`crate::expr::ExprError`]; they
//! never reach players because preconditions fail closed.

use crate::core::{CardId, InstanceId, PlayerId};
use crate::effects::CountRestriction;
use crate::piles::Pile;

/// Why an inbound action (or game-management call) was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    /// The action kind/shape matches no dispatch rule.
    UnrecognizedAction,

    /// The action carried the wrong number of selected cards.
    WrongSelectionCount { expected: usize, got: usize },

    /// The action named the wrong source pile (or none at all).
    WrongSourcePile { expected: Pile, got: Option<Pile> },

    /// A selected card is not currently in the pile the game expects.
    CardNotInPile { instance: InstanceId, pile: Pile },

    /// A selected card is not among the pending selection's candidates.
    NotSelectable { instance: InstanceId },

    /// The same card was selected more than once.
    DuplicateSelection { instance: InstanceId },

    /// The selection size falls outside the pending count restriction.
    SelectionCountOutOfRange {
        got: usize,
        restriction: CountRestriction,
    },

    /// The acting seat does not exist in this game.
    NoSuchPlayer { player: PlayerId },

    /// Both seats are already taken.
    GameFull,

    /// The game cannot start until both seats are set up.
    GameNotReady { seated: usize },

    /// A card id has no definition in the named set.
    UnknownCard { set: String, card: CardId },

    /// The seat already has a deck; decks are submitted once per game.
    DeckAlreadySubmitted { player: PlayerId },

    /// Effect kind the interpreter does not evaluate (`OR`, `SHUFFLE`).
    UnsupportedEffect(&'static str),

    /// Target kind the interpreter does not evaluate (`ALL`, `TOP`).
    UnsupportedTarget(&'static str),

    /// Filter kind the evaluator does not implement (`AND`, `OR`).
    UnsupportedFilter(&'static str),

    /// A `JUST` filter named no pile to scan.
    FilterMissingPile,

    /// A `SELECT` target carried no filter to compute candidates from.
    SelectWithoutFilter,

    /// A movement named a pile the acting player does not own.
    UnknownPile(Pile),

    /// An instance id is missing from the ownership index.
    UntrackedInstance(InstanceId),

    /// A `TARGET` was evaluated with nowhere to put the resolved targets.
    TargetOutsideMove,

    /// The pending continuation does not describe a card selection.
    CorruptContinuation,
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::UnrecognizedAction => write!(f, "not sure how to handle action"),
            GameError::WrongSelectionCount { expected, got } => {
                write!(f, "expected {expected} selected card(s), got {got}")
            }
            GameError::WrongSourcePile { expected, got } => match got {
                Some(got) => write!(f, "expected cards from {expected}, got {got}"),
                None => write!(f, "expected cards from {expected}, got no source pile"),
            },
            GameError::CardNotInPile { instance, pile } => {
                write!(f, "{instance} is not in {pile}")
            }
            GameError::NotSelectable { instance } => {
                write!(f, "{instance} is not among the selectable cards")
            }
            GameError::DuplicateSelection { instance } => {
                write!(f, "{instance} was selected more than once")
            }
            GameError::SelectionCountOutOfRange { got, restriction } => {
                write!(f, "selected {got} card(s), outside {restriction}")
            }
            GameError::NoSuchPlayer { player } => write!(f, "no such player: {player}"),
            GameError::GameFull => write!(f, "both seats are already taken"),
            GameError::GameNotReady { seated } => {
                write!(f, "game needs two set-up players, has {seated}")
            }
            GameError::UnknownCard { set, card } => {
                write!(f, "no card {card} in set {set}")
            }
            GameError::DeckAlreadySubmitted { player } => {
                write!(f, "{player} already submitted a deck")
            }
            GameError::UnsupportedEffect(kind) => write!(f, "unhandled effect kind: {kind}"),
            GameError::UnsupportedTarget(kind) => write!(f, "unhandled target type: {kind}"),
            GameError::UnsupportedFilter(kind) => write!(f, "unhandled filter kind: {kind}"),
            GameError::FilterMissingPile => write!(f, "JUST filter names no pile"),
            GameError::SelectWithoutFilter => write!(f, "SELECT target carries no filter"),
            GameError::UnknownPile(pile) => write!(f, "could not find pile {pile}"),
            GameError::UntrackedInstance(instance) => {
                write!(f, "{instance} is missing from the ownership index")
            }
            GameError::TargetOutsideMove => {
                write!(f, "tried to populate a target list, but none was expected")
            }
            GameError::CorruptContinuation => {
                write!(f, "pending continuation does not describe a card selection")
            }
        }
    }
}

impl std::error::Error for GameError {}
