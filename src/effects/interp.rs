//! The effect interpreter.
//!
//! Evaluation walks an effect tree depth-first against one player's
//! piles. When a `TARGET`/`SELECT` leaf needs input, the walk does not
//! block: every level records itself on the [`ContinuationStack`] and
//! the interpreter returns [`Flow::Suspended`] together with a
//! [`Prompt`] describing the choice. A later evaluation with the
//! answering action pops one frame per level and continues mid-tree.
//!
//! Pile mutations are journaled as they happen. On an error partway
//! through, the journal still holds every movement already performed;
//! callers report those rather than pretending the action never ran.
//!
//! ## Resolution protocol
//!
//! `TARGET` nodes do not return their cards in the prompt; they write
//! them into an output slot owned by the enclosing `MOVE`. Evaluating a
//! `TARGET` anywhere that slot is absent is an authoring error.

use tracing::debug;

use crate::cards::CardDefinition;
use crate::core::{Action, GameError, InstanceId, Phase};
use crate::effects::{ContinuationStack, CountRestriction, Effect, TargetKind};
use crate::game::legal::playable_cards;
use crate::piles::{Movement, Pile, PileManager};

/// Whether an evaluation ran to completion or paused for input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Done,
    Suspended,
}

/// The non-movement half of an update: what the player may do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub phase: Phase,
    pub pile: Pile,
    pub open_view_cards: Vec<InstanceId>,
    pub selectable_cards: Vec<InstanceId>,
    pub selection_restrictions: Option<CountRestriction>,
}

impl Prompt {
    /// A normal mid-turn prompt offering the playable cards.
    #[must_use]
    pub fn my_turn(selectable: Vec<InstanceId>) -> Self {
        Self {
            phase: Phase::MyTurn,
            pile: Pile::Hand,
            open_view_cards: Vec::new(),
            selectable_cards: selectable,
            selection_restrictions: None,
        }
    }

    /// A selection prompt focusing the pile being selected from and
    /// listing the candidates and size bounds.
    #[must_use]
    pub fn selection(
        pile: Pile,
        candidates: Vec<InstanceId>,
        restriction: CountRestriction,
    ) -> Self {
        Self {
            phase: Phase::SelectingCards,
            pile,
            open_view_cards: Vec::new(),
            selectable_cards: candidates,
            selection_restrictions: Some(restriction),
        }
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self::my_turn(Vec::new())
    }
}

/// Evaluates effect trees for one player, journaling every movement.
///
/// One interpreter instance covers one inbound action; the continuation
/// stack it borrows outlives it and carries suspensions across actions.
pub struct EffectInterpreter<'a> {
    piles: &'a mut PileManager,
    defs: &'a [CardDefinition],
    stack: &'a mut ContinuationStack,
    journal: Vec<Movement>,
}

impl<'a> EffectInterpreter<'a> {
    #[must_use]
    pub fn new(
        piles: &'a mut PileManager,
        defs: &'a [CardDefinition],
        stack: &'a mut ContinuationStack,
    ) -> Self {
        Self {
            piles,
            defs,
            stack,
            journal: Vec::new(),
        }
    }

    /// Evaluate an effect tree, or resume the pending one.
    ///
    /// `effect` is the tree to start (`None` to resume purely from the
    /// continuation stack); `action` is the inbound action driving this
    /// evaluation. Movements land in the journal either way.
    pub fn run(
        &mut self,
        effect: Option<&Effect>,
        action: &Action,
    ) -> Result<(Prompt, Flow), GameError> {
        self.eval(effect, action, action, None)
    }

    /// The movements performed so far by this interpreter.
    #[must_use]
    pub fn journal(&self) -> &[Movement] {
        &self.journal
    }

    /// Consume the interpreter, yielding the movements it performed.
    #[must_use]
    pub fn into_journal(self) -> Vec<Movement> {
        self.journal
    }

    /// One recursion level of evaluation.
    ///
    /// If a frame is pending it describes this level: it is popped and
    /// its effect evaluated from where it stopped. Otherwise `node` is
    /// evaluated fresh. `out` is the enclosing `MOVE`'s slot for
    /// resolved targets; only `TARGET` nodes write it.
    fn eval(
        &mut self,
        node: Option<&Effect>,
        action: &Action,
        inciting: &Action,
        out: Option<&mut Vec<InstanceId>>,
    ) -> Result<(Prompt, Flow), GameError> {
        let popped = self.stack.pop();
        let resumed = popped.is_some();
        let (effect, start_index, inciting) = match popped.as_ref() {
            Some(frame) => (&frame.effect, frame.resume_index, &frame.inciting),
            None => (node.ok_or(GameError::CorruptContinuation)?, 0, inciting),
        };
        debug!(kind = effect.kind_name(), resumed, "evaluating effect");

        match effect {
            Effect::Then { args } => {
                let mut prompt = Prompt::default();
                for i in start_index..args.len() {
                    let (child, flow) = self.eval(Some(&args[i]), action, inciting, None)?;
                    prompt = child;
                    if flow == Flow::Suspended {
                        self.stack.push(effect.clone(), i, inciting.clone());
                        return Ok((prompt, Flow::Suspended));
                    }
                }
                Ok((prompt, Flow::Done))
            }

            Effect::Or { .. } => Err(GameError::UnsupportedEffect("OR")),
            Effect::Shuffle => Err(GameError::UnsupportedEffect("SHUFFLE")),

            Effect::Move { target, to } => {
                let mut selected = Vec::new();
                let (child, flow) =
                    self.eval(Some(target.as_ref()), action, inciting, Some(&mut selected))?;
                if flow == Flow::Suspended {
                    self.stack.push(effect.clone(), 0, inciting.clone());
                    return Ok((child, Flow::Suspended));
                }

                for &instance in &selected {
                    let movement = self.piles.move_card_to(instance, *to)?;
                    self.journal.push(movement);
                }

                Ok((
                    Prompt::my_turn(playable_cards(self.piles, self.defs)),
                    Flow::Done,
                ))
            }

            Effect::Target {
                target_type,
                filter,
            } => {
                if resumed {
                    // The just-submitted action answers this target.
                    let out = out.ok_or(GameError::TargetOutsideMove)?;
                    *out = action.selected_cards.to_vec();
                    return Ok((Prompt::default(), Flow::Done));
                }

                match target_type {
                    TargetKind::Select => {
                        let filter =
                            filter.as_ref().ok_or(GameError::SelectWithoutFilter)?;
                        let candidates = filter.applicable_cards(self.piles, self.defs)?;
                        let pile = filter.pile().ok_or(GameError::FilterMissingPile)?;
                        let restriction = filter.count();
                        debug!(
                            candidates = candidates.len(),
                            %pile,
                            %restriction,
                            "pausing for card selection"
                        );
                        self.stack.push(effect.clone(), 0, inciting.clone());
                        Ok((
                            Prompt::selection(pile, candidates, restriction),
                            Flow::Suspended,
                        ))
                    }
                    TargetKind::This => {
                        let got = inciting.selected_cards.len();
                        if got != 1 {
                            return Err(GameError::WrongSelectionCount { expected: 1, got });
                        }
                        let out = out.ok_or(GameError::TargetOutsideMove)?;
                        *out = inciting.selected_cards.to_vec();
                        Ok((Prompt::default(), Flow::Done))
                    }
                    TargetKind::All => Err(GameError::UnsupportedTarget("ALL")),
                    TargetKind::Top => Err(GameError::UnsupportedTarget("TOP")),
                }
            }
        }
    }
}
