//! Live game state and the operations that drive it.
//!
//! A [`Game`] owns everything mutable about one match: both players'
//! piles, the continuation stack carrying any suspended effect, the
//! instance-id allocator, and a seeded RNG. The registry of card
//! definitions is injected read-only and shared between games.
//!
//! Setup runs in a fixed order: seat both players ([`Game::add_player`]),
//! submit both decks ([`Game::setup_player`]), then
//! [`Game::start_game`] shuffles, draws opening hands, and emits the
//! first update pair. From then on every inbound action goes through
//! [`Game::process_action`].

pub mod dispatch;
pub mod legal;
pub mod update;

pub use dispatch::ActionRejected;
pub use update::{merge_movements, TurnUpdate, UpdateInfo};

use std::sync::Arc;

use tracing::{debug, info};

use crate::cards::{CardDefinition, CardRegistry};
use crate::core::{CardId, GameError, GameRng, InstanceId, Phase, PlayerId};
use crate::effects::ContinuationStack;
use crate::game::legal::playable_cards;
use crate::piles::{CardInstance, Movement, Pile, PileManager};

/// Number of seats in a game.
pub const MAX_PLAYERS: usize = 2;

/// Cards drawn into the opening hand, deck permitting.
pub const OPENING_HAND_SIZE: usize = 7;

/// One match between two players.
pub struct Game {
    players: Vec<PileManager>,
    stack: ContinuationStack,
    registry: Arc<CardRegistry>,
    set: String,
    next_instance: u32,
    rng: GameRng,
}

impl Game {
    /// Create an empty game playing with the named card set.
    ///
    /// The seed fixes every random outcome (shuffles, coin flips), so a
    /// game replays identically from the same seed and inputs.
    #[must_use]
    pub fn new(registry: Arc<CardRegistry>, set: impl Into<String>, seed: u64) -> Self {
        Self {
            players: Vec::with_capacity(MAX_PLAYERS),
            stack: ContinuationStack::new(),
            registry,
            set: set.into(),
            next_instance: 0,
            rng: GameRng::new(seed),
        }
    }

    /// Seat the next player, returning their seat id.
    pub fn add_player(&mut self) -> Result<PlayerId, GameError> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::GameFull);
        }
        let player = PlayerId::new(self.players.len() as u8);
        self.players.push(PileManager::new());
        debug!(%player, "seated player");
        Ok(player)
    }

    /// Instantiate a deck list into the player's deck pile.
    ///
    /// Cards enter the deck in list order and receive fresh instance
    /// ids, monotonic across both players and never reused. The whole
    /// deck is validated against the set before anything is assigned.
    /// Returns the assigned ids, in deck order.
    pub fn setup_player(
        &mut self,
        player: PlayerId,
        deck: &[CardId],
    ) -> Result<Vec<InstanceId>, GameError> {
        self.seat(player)?;
        if self.players[player.index()].total_cards() > 0 {
            return Err(GameError::DeckAlreadySubmitted { player });
        }
        for &card in deck {
            if self.registry.lookup(&self.set, card).is_none() {
                return Err(GameError::UnknownCard {
                    set: self.set.clone(),
                    card,
                });
            }
        }

        let mut assigned = Vec::with_capacity(deck.len());
        for &card in deck {
            let instance = InstanceId::new(self.next_instance);
            self.next_instance += 1;
            self.players[player.index()].add_to_top(Pile::Deck, CardInstance::new(card, instance))?;
            assigned.push(instance);
        }
        info!(%player, cards = deck.len(), "deck submitted");
        Ok(assigned)
    }

    /// The instance ids of the player's own deck and the opponent's,
    /// for client-side sprite binding before the game starts.
    pub fn setup_data(
        &self,
        player: PlayerId,
    ) -> Result<(Vec<InstanceId>, Vec<InstanceId>), GameError> {
        self.seat(player)?;
        if self.players.len() < MAX_PLAYERS {
            return Err(GameError::GameNotReady {
                seated: self.players.len(),
            });
        }
        Ok((
            self.deck_instances(player),
            self.deck_instances(player.opponent()),
        ))
    }

    /// Shuffle both decks, draw opening hands, and build the first
    /// update for each seat (indexed by seat number).
    ///
    /// `going_first` says whether seat 0 takes the first turn. Each
    /// update carries the seat's own draw movements in full detail
    /// followed by the opponent's redacted ones, and hands the acting
    /// seat its playable cards.
    pub fn start_game(&mut self, going_first: bool) -> Result<[UpdateInfo; 2], GameError> {
        let ready = self
            .players
            .iter()
            .filter(|piles| piles.total_cards() > 0)
            .count();
        if ready < MAX_PLAYERS {
            return Err(GameError::GameNotReady { seated: ready });
        }

        let mut draws: [Vec<Movement>; 2] = [Vec::new(), Vec::new()];
        for (seat, drawn) in draws.iter_mut().enumerate() {
            let piles = &mut self.players[seat];
            piles.shuffle(Pile::Deck, &mut self.rng);
            *drawn = piles.move_from_top(Pile::Deck, Pile::Hand, OPENING_HAND_SIZE)?;
        }

        let defs = self.definitions();
        let seat_update = |seat: usize| {
            let my_turn = (seat == 0) == going_first;
            let (phase, selectable) = if my_turn {
                (Phase::MyTurn, playable_cards(&self.players[seat], defs))
            } else {
                (Phase::OpponentsTurn, Vec::new())
            };
            UpdateInfo {
                movements: merge_movements(&draws[seat], &draws[1 - seat]),
                phase,
                pile: Pile::Hand,
                open_view_cards: Vec::new(),
                selectable_cards: selectable,
                selection_restrictions: None,
            }
        };

        info!(going_first, "game started");
        Ok([seat_update(0), seat_update(1)])
    }

    /// Flip the game's coin.
    pub fn flip_coin(&mut self) -> bool {
        self.rng.coin_flip()
    }

    /// Whether both seats are filled and both decks are in.
    #[must_use]
    pub fn decks_ready(&self) -> bool {
        self.players.len() == MAX_PLAYERS
            && self.players.iter().all(|piles| piles.total_cards() > 0)
    }

    /// Whether a suspended effect is waiting on a card selection.
    #[must_use]
    pub fn selection_pending(&self) -> bool {
        self.stack.is_pending()
    }

    /// A player's piles, for inspection.
    #[must_use]
    pub fn piles(&self, player: PlayerId) -> Option<&PileManager> {
        self.players.get(player.index())
    }

    fn seat(&self, player: PlayerId) -> Result<(), GameError> {
        if player.index() < self.players.len() {
            Ok(())
        } else {
            Err(GameError::NoSuchPlayer { player })
        }
    }

    fn deck_instances(&self, player: PlayerId) -> Vec<InstanceId> {
        self.players[player.index()]
            .pile(Pile::Deck)
            .map_or_else(Vec::new, |cards| {
                cards.iter().map(|card| card.instance).collect()
            })
    }

    fn definitions(&self) -> &[CardDefinition] {
        self.registry.set(&self.set).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use crate::core::CardId;

    fn vanilla_registry() -> Arc<CardRegistry> {
        let mut registry = CardRegistry::new();
        registry.insert_set(
            "base",
            vec![
                CardDefinition::vanilla("Pidgey", "pidgey.png"),
                CardDefinition::vanilla("Rattata", "rattata.png"),
            ],
        );
        Arc::new(registry)
    }

    fn seated_game() -> Game {
        let mut game = Game::new(vanilla_registry(), "base", 7);
        game.add_player().unwrap();
        game.add_player().unwrap();
        game
    }

    fn ten_cards() -> Vec<CardId> {
        (0..10).map(|n| CardId(n % 2)).collect()
    }

    #[test]
    fn test_seats_exactly_two_players() {
        let mut game = Game::new(vanilla_registry(), "base", 0);
        assert_eq!(game.add_player().unwrap(), PlayerId::new(0));
        assert_eq!(game.add_player().unwrap(), PlayerId::new(1));
        assert_eq!(game.add_player().unwrap_err(), GameError::GameFull);
    }

    #[test]
    fn test_setup_assigns_monotonic_instances() {
        let mut game = seated_game();

        let first = game
            .setup_player(PlayerId::new(0), &[CardId(0), CardId(0), CardId(1)])
            .unwrap();
        let second = game
            .setup_player(PlayerId::new(1), &[CardId(1), CardId(0)])
            .unwrap();

        assert_eq!(first, vec![InstanceId(0), InstanceId(1), InstanceId(2)]);
        assert_eq!(second, vec![InstanceId(3), InstanceId(4)]);

        let piles = game.piles(PlayerId::new(0)).unwrap();
        assert_eq!(piles.pile_len(Pile::Deck), 3);
        assert_eq!(piles.location(InstanceId(1)), Some(Pile::Deck));
        assert_eq!(piles.card(InstanceId(2)), Some(CardId(1)));
    }

    #[test]
    fn test_setup_rejects_unknown_cards_atomically() {
        let mut game = seated_game();

        let err = game
            .setup_player(PlayerId::new(0), &[CardId(0), CardId(9)])
            .unwrap_err();
        assert_eq!(
            err,
            GameError::UnknownCard {
                set: "base".into(),
                card: CardId(9),
            }
        );
        // Nothing was assigned, so a corrected deck starts at id 0.
        let assigned = game.setup_player(PlayerId::new(0), &[CardId(0)]).unwrap();
        assert_eq!(assigned, vec![InstanceId(0)]);
    }

    #[test]
    fn test_setup_rejects_resubmission() {
        let mut game = seated_game();
        game.setup_player(PlayerId::new(0), &[CardId(0)]).unwrap();

        let err = game.setup_player(PlayerId::new(0), &[CardId(1)]).unwrap_err();
        assert_eq!(
            err,
            GameError::DeckAlreadySubmitted {
                player: PlayerId::new(0),
            }
        );
    }

    #[test]
    fn test_setup_data_lists_both_decks() {
        let mut game = seated_game();
        game.setup_player(PlayerId::new(0), &[CardId(0), CardId(1)])
            .unwrap();
        game.setup_player(PlayerId::new(1), &[CardId(0)]).unwrap();

        let (mine, theirs) = game.setup_data(PlayerId::new(1)).unwrap();
        assert_eq!(mine, vec![InstanceId(2)]);
        assert_eq!(theirs, vec![InstanceId(0), InstanceId(1)]);
    }

    #[test]
    fn test_start_game_draws_opening_hands() {
        let mut game = seated_game();
        let deck0 = game.setup_player(PlayerId::new(0), &ten_cards()).unwrap();
        game.setup_player(PlayerId::new(1), &ten_cards()).unwrap();

        let [for_p0, for_p1] = game.start_game(true).unwrap();

        // Own 7 draws in detail, then the opponent's 7 redacted.
        assert_eq!(for_p0.movements.len(), 14);
        for movement in &for_p0.movements[..7] {
            assert_eq!(movement.from, Pile::Deck);
            assert_eq!(movement.to, Pile::Hand);
        }
        for movement in &for_p0.movements[7..] {
            assert_eq!(movement.from, Pile::OppDeck);
            assert_eq!(movement.to, Pile::OppHand);
            assert_eq!(movement.card, CardId::HIDDEN);
        }

        assert_eq!(for_p0.phase, Phase::MyTurn);
        assert_eq!(for_p0.selectable_cards.len(), 7);
        assert_eq!(for_p1.phase, Phase::OpponentsTurn);
        assert!(for_p1.selectable_cards.is_empty());

        // The 7 drawn ids come out of the assigned 10; the rest stay put.
        let piles = game.piles(PlayerId::new(0)).unwrap();
        assert_eq!(piles.pile_len(Pile::Hand), 7);
        assert_eq!(piles.pile_len(Pile::Deck), 3);
        let mut seen: Vec<InstanceId> = piles
            .pile(Pile::Hand)
            .unwrap()
            .iter()
            .chain(piles.pile(Pile::Deck).unwrap().iter())
            .map(|card| card.instance)
            .collect();
        seen.sort();
        let mut expected = deck0;
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_start_game_short_deck_draws_what_it_can() {
        let mut game = seated_game();
        game.setup_player(PlayerId::new(0), &[CardId(0), CardId(1), CardId(0)])
            .unwrap();
        game.setup_player(PlayerId::new(1), &[CardId(1)]).unwrap();

        let [for_p0, _] = game.start_game(false).unwrap();

        // 3 own draws plus the single opposing one.
        assert_eq!(for_p0.movements.len(), 4);
        assert_eq!(for_p0.phase, Phase::OpponentsTurn);

        let piles = game.piles(PlayerId::new(0)).unwrap();
        assert_eq!(piles.pile_len(Pile::Hand), 3);
        assert_eq!(piles.pile_len(Pile::Deck), 0);
    }

    #[test]
    fn test_start_game_requires_both_decks() {
        let mut game = seated_game();
        game.setup_player(PlayerId::new(0), &[CardId(0)]).unwrap();

        let err = game.start_game(true).unwrap_err();
        assert_eq!(err, GameError::GameNotReady { seated: 1 });
    }

    #[test]
    fn test_same_seed_same_shuffle() {
        let run = || {
            let mut game = seated_game();
            game.setup_player(PlayerId::new(0), &ten_cards()).unwrap();
            game.setup_player(PlayerId::new(1), &ten_cards()).unwrap();
            let [for_p0, _] = game.start_game(true).unwrap();
            for_p0.movements
        };
        assert_eq!(run(), run());
    }
}
