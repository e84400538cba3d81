//! Pile manager for card locations and movement.
//!
//! One `PileManager` holds a single player's seven piles. It tracks
//! where every card copy sits, moves cards between piles, and reports
//! each move as a [`Movement`] for the update stream. Within a pile,
//! index 0 is the bottom and the last element is the top.

use rustc_hash::FxHashMap;

use crate::core::{CardId, GameError, GameRng, InstanceId};
use crate::piles::{Movement, Pile};

/// One card copy: which printed card it is and which copy it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardInstance {
    pub card: CardId,
    pub instance: InstanceId,
}

impl CardInstance {
    #[must_use]
    pub const fn new(card: CardId, instance: InstanceId) -> Self {
        Self { card, instance }
    }
}

/// Manages one player's card locations across their piles.
///
/// Only the seven own-perspective piles exist here; `OPP_*` piles are a
/// display artifact and moving a card into one is an error.
#[derive(Clone, Debug)]
pub struct PileManager {
    /// Pile contents, bottom to top.
    piles: FxHashMap<Pile, Vec<CardInstance>>,

    /// Card locations: instance -> pile it currently sits in.
    locations: FxHashMap<InstanceId, Pile>,
}

impl PileManager {
    /// Create a manager with all seven piles empty.
    #[must_use]
    pub fn new() -> Self {
        let mut piles = FxHashMap::default();
        for pile in Pile::PLAYER_PILES {
            piles.insert(pile, Vec::new());
        }
        Self {
            piles,
            locations: FxHashMap::default(),
        }
    }

    /// Add a card to the top of a pile.
    ///
    /// Panics if the instance is already tracked; deck construction is
    /// the only caller and assigns each instance once.
    pub fn add_to_top(&mut self, pile: Pile, card: CardInstance) -> Result<(), GameError> {
        if self.locations.contains_key(&card.instance) {
            panic!("instance {} already tracked", card.instance);
        }
        let Some(cards) = self.piles.get_mut(&pile) else {
            return Err(GameError::UnknownPile(pile));
        };
        cards.push(card);
        self.locations.insert(card.instance, pile);
        Ok(())
    }

    /// Shuffle a pile in place.
    pub fn shuffle(&mut self, pile: Pile, rng: &mut GameRng) {
        if let Some(cards) = self.piles.get_mut(&pile) {
            rng.shuffle(cards);
        }
    }

    /// Move a specific card to the top of another pile.
    ///
    /// Fails without touching state if the destination is not an own
    /// pile or the instance is not tracked.
    pub fn move_card_to(
        &mut self,
        instance: InstanceId,
        to: Pile,
    ) -> Result<Movement, GameError> {
        if !self.piles.contains_key(&to) {
            return Err(GameError::UnknownPile(to));
        }
        let (from, card) = self
            .take(instance)
            .ok_or(GameError::UntrackedInstance(instance))?;
        self.locations.insert(instance, to);
        self.piles.entry(to).or_default().push(card);
        Ok(Movement {
            instance,
            card: card.card,
            from,
            to,
        })
    }

    /// Move up to `count` cards off the top of one pile onto another.
    ///
    /// Stops early if the source runs out; the returned movements are in
    /// the order the cards were taken.
    pub fn move_from_top(
        &mut self,
        from: Pile,
        to: Pile,
        count: usize,
    ) -> Result<Vec<Movement>, GameError> {
        if !self.piles.contains_key(&from) {
            return Err(GameError::UnknownPile(from));
        }
        if !self.piles.contains_key(&to) {
            return Err(GameError::UnknownPile(to));
        }

        let mut movements = Vec::with_capacity(count);
        for _ in 0..count {
            let card = match self.piles.get_mut(&from).and_then(Vec::pop) {
                Some(card) => card,
                None => break,
            };
            self.locations.insert(card.instance, to);
            self.piles.entry(to).or_default().push(card);
            movements.push(Movement {
                instance: card.instance,
                card: card.card,
                from,
                to,
            });
        }
        Ok(movements)
    }

    /// The contents of a pile, bottom to top. `None` for `OPP_*` piles.
    #[must_use]
    pub fn pile(&self, pile: Pile) -> Option<&[CardInstance]> {
        self.piles.get(&pile).map(Vec::as_slice)
    }

    /// How many cards a pile holds. Zero for `OPP_*` piles.
    #[must_use]
    pub fn pile_len(&self, pile: Pile) -> usize {
        self.piles.get(&pile).map_or(0, Vec::len)
    }

    /// The pile a card currently sits in.
    #[must_use]
    pub fn location(&self, instance: InstanceId) -> Option<Pile> {
        self.locations.get(&instance).copied()
    }

    /// Check if a card is in a specific pile.
    #[must_use]
    pub fn contains(&self, instance: InstanceId, pile: Pile) -> bool {
        self.locations.get(&instance) == Some(&pile)
    }

    /// The printed card behind an instance.
    #[must_use]
    pub fn card(&self, instance: InstanceId) -> Option<CardId> {
        let pile = self.location(instance)?;
        self.piles
            .get(&pile)?
            .iter()
            .find(|c| c.instance == instance)
            .map(|c| c.card)
    }

    /// Total number of cards tracked.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.locations.len()
    }

    /// Remove a card from wherever it sits.
    fn take(&mut self, instance: InstanceId) -> Option<(Pile, CardInstance)> {
        let from = self.locations.get(&instance).copied()?;
        let pile = self.piles.get_mut(&from)?;
        let index = pile.iter().position(|c| c.instance == instance)?;
        let card = pile.remove(index);
        self.locations.remove(&instance);
        Some((from, card))
    }
}

impl Default for PileManager {
    fn default() -> Self {
        Self::new()
    }
}
