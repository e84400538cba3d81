//! The turn-action dispatcher.
//!
//! One entry point, [`Game::process_action`], invoked once per inbound
//! player action. Routing order:
//!
//! 1. A pending continuation owns the action outright, whatever its
//!    declared kind: the submitted ids are validated against the
//!    pending selection's candidates and count bounds, then the
//!    interpreter resumes. Validation failures leave the continuation
//!    intact so the player can retry.
//! 2. `PLAY_CARD` requires exactly one card from the hand. A card with
//!    an effect starts a fresh interpreter evaluation; a card without
//!    one is discarded directly.
//! 3. `FINISH_SELECTION` with nothing pending is a plain discard of
//!    the named hand cards.
//! 4. Anything else is rejected as unrecognized.
//!
//! Errors after the interpreter has already moved cards do not roll
//! anything back: the partial movement log rides along with the
//! rejection so clients stay in sync with the real piles.

use std::fmt;

use tracing::{debug, warn};

use crate::cards::CardDefinition;
use crate::core::{Action, ActionKind, GameError, PlayerId};
use crate::effects::{ContinuationStack, Effect, EffectInterpreter, Prompt, TargetKind};
use crate::game::legal::playable_cards;
use crate::game::update::TurnUpdate;
use crate::game::Game;
use crate::piles::{Pile, PileManager};

/// An action the game would not honor.
///
/// `partial` carries both update views when movements had already been
/// performed before the failure; `None` means state is unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRejected {
    pub error: GameError,
    pub partial: Option<TurnUpdate>,
}

impl From<GameError> for ActionRejected {
    fn from(error: GameError) -> Self {
        Self {
            error,
            partial: None,
        }
    }
}

impl fmt::Display for ActionRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action rejected: {}", self.error)
    }
}

impl std::error::Error for ActionRejected {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl Game {
    /// Interpret one inbound action for the given seat.
    ///
    /// Returns both update views on success. On rejection the error
    /// carries any movements that happened before the failure.
    pub fn process_action(
        &mut self,
        player: PlayerId,
        action: &Action,
    ) -> Result<TurnUpdate, ActionRejected> {
        let result = self.dispatch(player, action);
        if let Err(rejected) = &result {
            warn!(%player, error = %rejected.error, "action rejected");
        }
        result
    }

    fn dispatch(
        &mut self,
        player: PlayerId,
        action: &Action,
    ) -> Result<TurnUpdate, ActionRejected> {
        self.seat(player)?;
        debug!(
            %player,
            kind = ?action.kind,
            cards = action.selected_cards.len(),
            pending = self.stack.is_pending(),
            "dispatching action"
        );

        let seat = player.index();
        let defs = self.registry.set(&self.set).unwrap_or(&[]);

        if self.stack.is_pending() {
            validate_pending_selection(&self.stack, &self.players[seat], defs, action)?;
            return run_interpreter(
                &mut self.players[seat],
                defs,
                &mut self.stack,
                None,
                action,
            );
        }

        match action.kind {
            ActionKind::PlayCard => {
                if action.selected_cards.len() != 1 {
                    return Err(GameError::WrongSelectionCount {
                        expected: 1,
                        got: action.selected_cards.len(),
                    }
                    .into());
                }
                if action.from != Some(Pile::Hand) {
                    return Err(GameError::WrongSourcePile {
                        expected: Pile::Hand,
                        got: action.from,
                    }
                    .into());
                }
                let instance = action.selected_cards[0];
                let piles = &mut self.players[seat];
                if !piles.contains(instance, Pile::Hand) {
                    return Err(GameError::CardNotInPile {
                        instance,
                        pile: Pile::Hand,
                    }
                    .into());
                }
                let card = piles
                    .card(instance)
                    .ok_or(GameError::UntrackedInstance(instance))?;
                let def = self
                    .registry
                    .lookup(&self.set, card)
                    .ok_or_else(|| GameError::UnknownCard {
                        set: self.set.clone(),
                        card,
                    })?;

                match &def.effect {
                    Some(effect) => run_interpreter(
                        &mut self.players[seat],
                        defs,
                        &mut self.stack,
                        Some(effect),
                        action,
                    ),
                    None => {
                        let piles = &mut self.players[seat];
                        let movement = piles.move_card_to(instance, Pile::Discard)?;
                        let prompt = Prompt::my_turn(playable_cards(piles, defs));
                        Ok(TurnUpdate::new(vec![movement], prompt))
                    }
                }
            }

            ActionKind::FinishSelection => {
                // No effect asked for this selection: a plain discard.
                let piles = &mut self.players[seat];
                for (i, &instance) in action.selected_cards.iter().enumerate() {
                    if action.selected_cards[..i].contains(&instance) {
                        return Err(GameError::DuplicateSelection { instance }.into());
                    }
                    if !piles.contains(instance, Pile::Hand) {
                        return Err(GameError::CardNotInPile {
                            instance,
                            pile: Pile::Hand,
                        }
                        .into());
                    }
                }

                let mut movements = Vec::with_capacity(action.selected_cards.len());
                for &instance in &action.selected_cards {
                    movements.push(piles.move_card_to(instance, Pile::Discard)?);
                }
                let prompt = Prompt::my_turn(playable_cards(piles, defs));
                Ok(TurnUpdate::new(movements, prompt))
            }

            ActionKind::EndTurn => Err(GameError::UnrecognizedAction.into()),
        }
    }
}

/// Check a submitted selection against the pending frame before any
/// frame is popped, so a rejection leaves the continuation resumable.
fn validate_pending_selection(
    stack: &ContinuationStack,
    piles: &PileManager,
    defs: &[CardDefinition],
    action: &Action,
) -> Result<(), GameError> {
    let frame = stack.innermost().ok_or(GameError::CorruptContinuation)?;
    let Effect::Target {
        target_type: TargetKind::Select,
        filter: Some(filter),
    } = &frame.effect
    else {
        return Err(GameError::CorruptContinuation);
    };

    let candidates = filter.applicable_cards(piles, defs)?;
    for (i, &instance) in action.selected_cards.iter().enumerate() {
        if action.selected_cards[..i].contains(&instance) {
            return Err(GameError::DuplicateSelection { instance });
        }
        if !candidates.contains(&instance) {
            return Err(GameError::NotSelectable { instance });
        }
    }

    let restriction = filter.count();
    if !restriction.allows(action.selected_cards.len()) {
        return Err(GameError::SelectionCountOutOfRange {
            got: action.selected_cards.len(),
            restriction,
        });
    }
    Ok(())
}

/// Run or resume an evaluation, converting the journal into update
/// views. On error the journal is preserved in the rejection.
fn run_interpreter(
    piles: &mut PileManager,
    defs: &[CardDefinition],
    stack: &mut ContinuationStack,
    effect: Option<&Effect>,
    action: &Action,
) -> Result<TurnUpdate, ActionRejected> {
    let mut interp = EffectInterpreter::new(piles, defs, stack);
    match interp.run(effect, action) {
        Ok((prompt, _)) => Ok(TurnUpdate::new(interp.into_journal(), prompt)),
        Err(error) => {
            let journal = interp.into_journal();
            let partial = (!journal.is_empty()).then(|| {
                TurnUpdate::new(journal, Prompt::my_turn(playable_cards(piles, defs)))
            });
            Err(ActionRejected { error, partial })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cards::{CardDefinition, CardRegistry};
    use crate::core::{CardId, InstanceId, Phase};
    use crate::effects::{CardFilter, CountRestriction};
    use crate::expr::{Expr, VAR_CARDS_IN_HAND};

    fn registry() -> Arc<CardRegistry> {
        let trader = CardDefinition::vanilla("Trader", "trader.png")
            .with_precondition(Expr::greater_than(
                Expr::variable(VAR_CARDS_IN_HAND),
                Expr::constant(2),
            ))
            .with_effect(Effect::then([
                Effect::move_this_to(Pile::Discard),
                Effect::move_selected_to(
                    CardFilter::just(Pile::Hand, CountRestriction::exactly(2)),
                    Pile::Discard,
                ),
            ]));
        let mut registry = CardRegistry::new();
        registry.insert_set(
            "base",
            vec![CardDefinition::vanilla("Filler", "filler.png"), trader],
        );
        Arc::new(registry)
    }

    /// Both players run a three-card deck; the full deck is drawn, so
    /// seat 0 holds instances 0..3 and seat 1 holds 3..6.
    fn started_game() -> Game {
        let mut game = Game::new(registry(), "base", 11);
        let p0 = game.add_player().unwrap();
        let p1 = game.add_player().unwrap();
        game.setup_player(p0, &[CardId(0), CardId(0), CardId(1)])
            .unwrap();
        game.setup_player(p1, &[CardId(0), CardId(0), CardId(1)])
            .unwrap();
        game.start_game(true).unwrap();
        game
    }

    fn sorted(mut ids: Vec<InstanceId>) -> Vec<InstanceId> {
        ids.sort();
        ids
    }

    #[test]
    fn test_effect_card_suspends_for_selection() {
        let mut game = started_game();
        let p0 = PlayerId::new(0);

        let update = game
            .process_action(p0, &Action::play_card(InstanceId(2)))
            .unwrap();

        assert_eq!(update.actor.movements.len(), 1);
        assert_eq!(update.actor.movements[0].instance, InstanceId(2));
        assert_eq!(update.actor.movements[0].from, Pile::Hand);
        assert_eq!(update.actor.movements[0].to, Pile::Discard);
        assert_eq!(update.actor.phase, Phase::SelectingCards);
        assert_eq!(
            sorted(update.actor.selectable_cards.clone()),
            vec![InstanceId(0), InstanceId(1)]
        );
        assert_eq!(
            update.actor.selection_restrictions,
            Some(CountRestriction::exactly(2))
        );
        assert!(game.selection_pending());

        // The opponent sees the discard (public pile, card revealed)
        // but no prompt.
        assert_eq!(update.opponent.phase, Phase::OpponentsTurn);
        assert_eq!(update.opponent.movements[0].card, CardId(1));
        assert_eq!(update.opponent.movements[0].from, Pile::OppHand);
        assert_eq!(update.opponent.movements[0].to, Pile::OppDiscard);
        assert!(update.opponent.selectable_cards.is_empty());
    }

    #[test]
    fn test_finish_selection_resumes_pending_effect() {
        let mut game = started_game();
        let p0 = PlayerId::new(0);
        game.process_action(p0, &Action::play_card(InstanceId(2)))
            .unwrap();

        let update = game
            .process_action(
                p0,
                &Action::finish_selection(&[InstanceId(0), InstanceId(1)]),
            )
            .unwrap();

        assert_eq!(update.actor.movements.len(), 2);
        assert!(update
            .actor
            .movements
            .iter()
            .all(|m| m.from == Pile::Hand && m.to == Pile::Discard));
        assert_eq!(update.actor.phase, Phase::MyTurn);
        assert!(update.actor.selectable_cards.is_empty());
        assert!(update.actor.selection_restrictions.is_none());
        assert!(!game.selection_pending());

        let piles = game.piles(p0).unwrap();
        assert_eq!(piles.pile_len(Pile::Hand), 0);
        assert_eq!(piles.pile_len(Pile::Discard), 3);
    }

    #[test]
    fn test_pending_selection_enforces_count() {
        let mut game = started_game();
        let p0 = PlayerId::new(0);
        game.process_action(p0, &Action::play_card(InstanceId(2)))
            .unwrap();

        let rejected = game
            .process_action(p0, &Action::finish_selection(&[InstanceId(0)]))
            .unwrap_err();

        assert_eq!(
            rejected.error,
            GameError::SelectionCountOutOfRange {
                got: 1,
                restriction: CountRestriction::exactly(2),
            }
        );
        assert!(rejected.partial.is_none());
        assert!(game.selection_pending());

        // Nothing moved, and a corrected selection still works.
        assert_eq!(game.piles(p0).unwrap().pile_len(Pile::Hand), 2);
        game.process_action(
            p0,
            &Action::finish_selection(&[InstanceId(0), InstanceId(1)]),
        )
        .unwrap();
        assert!(!game.selection_pending());
    }

    #[test]
    fn test_pending_selection_rejects_bad_ids() {
        let mut game = started_game();
        let p0 = PlayerId::new(0);
        game.process_action(p0, &Action::play_card(InstanceId(2)))
            .unwrap();

        let rejected = game
            .process_action(
                p0,
                &Action::finish_selection(&[InstanceId(0), InstanceId(5)]),
            )
            .unwrap_err();
        assert_eq!(
            rejected.error,
            GameError::NotSelectable {
                instance: InstanceId(5),
            }
        );

        let rejected = game
            .process_action(
                p0,
                &Action::finish_selection(&[InstanceId(0), InstanceId(0)]),
            )
            .unwrap_err();
        assert_eq!(
            rejected.error,
            GameError::DuplicateSelection {
                instance: InstanceId(0),
            }
        );
        assert!(game.selection_pending());
    }

    #[test]
    fn test_pending_continuation_owns_any_action_kind() {
        let mut game = started_game();
        let p0 = PlayerId::new(0);
        game.process_action(p0, &Action::play_card(InstanceId(2)))
            .unwrap();

        // A PLAY_CARD arriving mid-selection is treated as the answer
        // to the selection, and fails its count check.
        let rejected = game
            .process_action(p0, &Action::play_card(InstanceId(0)))
            .unwrap_err();
        assert_eq!(
            rejected.error,
            GameError::SelectionCountOutOfRange {
                got: 1,
                restriction: CountRestriction::exactly(2),
            }
        );
        assert!(game.selection_pending());
    }

    #[test]
    fn test_vanilla_card_discards_directly() {
        let mut game = started_game();
        let p0 = PlayerId::new(0);

        let update = game
            .process_action(p0, &Action::play_card(InstanceId(0)))
            .unwrap();

        assert_eq!(update.actor.movements.len(), 1);
        assert_eq!(update.actor.phase, Phase::MyTurn);
        assert!(!game.selection_pending());

        // Hand is down to two cards, so the hand-size precondition now
        // gates the effect card out of the playable set.
        assert_eq!(
            update.actor.selectable_cards,
            vec![InstanceId(1)]
        );
    }

    #[test]
    fn test_play_card_shape_is_validated() {
        let mut game = started_game();
        let p0 = PlayerId::new(0);

        let mut two_cards = Action::play_card(InstanceId(0));
        two_cards.selected_cards.push(InstanceId(1));
        let rejected = game.process_action(p0, &two_cards).unwrap_err();
        assert_eq!(
            rejected.error,
            GameError::WrongSelectionCount {
                expected: 1,
                got: 2,
            }
        );

        let mut no_source = Action::play_card(InstanceId(0));
        no_source.from = None;
        let rejected = game.process_action(p0, &no_source).unwrap_err();
        assert_eq!(
            rejected.error,
            GameError::WrongSourcePile {
                expected: Pile::Hand,
                got: None,
            }
        );

        let rejected = game
            .process_action(p0, &Action::play_card(InstanceId(4)))
            .unwrap_err();
        assert_eq!(
            rejected.error,
            GameError::CardNotInPile {
                instance: InstanceId(4),
                pile: Pile::Hand,
            }
        );
        assert!(rejected.partial.is_none());
    }

    #[test]
    fn test_finish_selection_without_pending_is_a_discard() {
        let mut game = started_game();
        let p0 = PlayerId::new(0);

        let update = game
            .process_action(
                p0,
                &Action::finish_selection(&[InstanceId(0), InstanceId(1)]),
            )
            .unwrap();

        assert_eq!(update.actor.movements.len(), 2);
        assert_eq!(update.actor.phase, Phase::MyTurn);
        // Only the effect card remains, and its precondition fails at
        // hand size 1.
        assert!(update.actor.selectable_cards.is_empty());

        let piles = game.piles(p0).unwrap();
        assert_eq!(piles.pile_len(Pile::Hand), 1);
        assert_eq!(piles.pile_len(Pile::Discard), 2);
    }

    #[test]
    fn test_unhandled_shapes_are_rejected() {
        let mut game = started_game();

        let rejected = game
            .process_action(PlayerId::new(0), &Action::end_turn())
            .unwrap_err();
        assert_eq!(rejected.error, GameError::UnrecognizedAction);

        let rejected = game
            .process_action(PlayerId::new(7), &Action::play_card(InstanceId(0)))
            .unwrap_err();
        assert_eq!(
            rejected.error,
            GameError::NoSuchPlayer {
                player: PlayerId::new(7),
            }
        );
    }
}
