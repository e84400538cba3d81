//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every loaded card set. A card is
//! addressed by set name plus its index within the set; the numeric
//! half of that address is the `CardId` that travels in deck lists
//! and movement records.

use rustc_hash::FxHashMap;

use crate::cards::definition::CardDefinition;
use crate::core::CardId;

/// Registry of card definitions, grouped into named sets.
///
/// ## Example
///
/// ```
/// use cardroom::cards::{CardDefinition, CardRegistry};
/// use cardroom::core::CardId;
///
/// let mut registry = CardRegistry::new();
/// registry.insert_set(
///     "base",
///     vec![CardDefinition::vanilla("Pidgey", "pidgey.png")],
/// );
///
/// let found = registry.lookup("base", CardId::new(0)).unwrap();
/// assert_eq!(found.name, "Pidgey");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    sets: FxHashMap<String, Vec<CardDefinition>>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a complete set of definitions.
    ///
    /// Panics if a set with the same name already exists.
    pub fn insert_set(&mut self, name: impl Into<String>, cards: Vec<CardDefinition>) {
        let name = name.into();
        if self.sets.contains_key(&name) {
            panic!("card set {name:?} already registered");
        }
        self.sets.insert(name, cards);
    }

    /// Get a whole set by name.
    #[must_use]
    pub fn set(&self, name: &str) -> Option<&[CardDefinition]> {
        self.sets.get(name).map(Vec::as_slice)
    }

    /// Get one definition by set name and card id.
    #[must_use]
    pub fn lookup(&self, set: &str, card: CardId) -> Option<&CardDefinition> {
        self.sets.get(set)?.get(card.index())
    }

    /// Check whether a set is registered.
    #[must_use]
    pub fn contains_set(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Number of cards in a set, zero if the set is unknown.
    #[must_use]
    pub fn set_len(&self, name: &str) -> usize {
        self.sets.get(name).map_or(0, Vec::len)
    }

    /// Number of registered sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Iterate over registered set names.
    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_set() -> Vec<CardDefinition> {
        vec![
            CardDefinition::vanilla("Pidgey", "pidgey.png"),
            CardDefinition::vanilla("Rattata", "rattata.png"),
        ]
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = CardRegistry::new();
        registry.insert_set("base", base_set());

        let found = registry.lookup("base", CardId::new(1));
        assert_eq!(found.map(|c| c.name.as_str()), Some("Rattata"));

        assert!(registry.lookup("base", CardId::new(99)).is_none());
        assert!(registry.lookup("promo", CardId::new(0)).is_none());
    }

    #[test]
    fn test_set_access() {
        let mut registry = CardRegistry::new();
        registry.insert_set("base", base_set());

        assert_eq!(registry.set("base").map(<[_]>::len), Some(2));
        assert_eq!(registry.set_len("base"), 2);
        assert_eq!(registry.set_len("promo"), 0);
        assert!(registry.set("promo").is_none());
        assert!(registry.contains_set("base"));
        assert!(!registry.contains_set("promo"));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_set_panics() {
        let mut registry = CardRegistry::new();
        registry.insert_set("base", base_set());
        registry.insert_set("base", Vec::new());
    }

    #[test]
    fn test_set_names() {
        let mut registry = CardRegistry::new();
        registry.insert_set("base", base_set());
        registry.insert_set("promo", Vec::new());

        let mut names: Vec<_> = registry.set_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["base", "promo"]);
        assert_eq!(registry.len(), 2);
    }
}
