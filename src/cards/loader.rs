//! Card set loading.
//!
//! Sets are authored as JSON arrays of card objects; a card's numeric
//! id is its index within the array. A card may carry an `alias`
//! naming a card in any loaded set, from which it inherits the
//! precondition, effect, and type tag it does not itself define.
//! Inheritance is shallow: it reads the named card's authored fields,
//! so alias chains do not flatten.
//!
//! The loader accepts the full effect grammar but warns about kinds
//! evaluation rejects, so authoring mistakes surface at startup
//! instead of mid-game.

use std::fmt;
use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::{info, warn};

use crate::cards::definition::CardDefinition;
use crate::cards::registry::CardRegistry;
use crate::effects::{CardFilter, Effect, TargetKind};

/// A failure to load card content.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Json {
        set: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "could not read card content: {err}"),
            LoadError::Json { set, source } => {
                write!(f, "set {set:?} is not valid card JSON: {source}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Json { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

/// Reference to a card in another (or the same) set.
#[derive(Clone, Debug, Deserialize)]
struct Alias {
    set: String,
    id: u32,
}

/// One card as authored, before alias resolution.
#[derive(Debug, Deserialize)]
struct RawCard {
    #[serde(flatten)]
    def: CardDefinition,
    #[serde(default)]
    alias: Option<Alias>,
}

/// Load a single set from a JSON string, resolving aliases within it.
pub fn load_set_str(name: &str, json: &str) -> Result<Vec<CardDefinition>, LoadError> {
    let mut raw_sets = FxHashMap::default();
    raw_sets.insert(name.to_owned(), parse_set(name, json)?);
    let mut sets = resolve(&raw_sets);
    Ok(sets.remove(name).unwrap_or_default())
}

/// Load every `*.json` file in a directory as the set named by its
/// file stem, resolving aliases across all of them.
///
/// A file that cannot be read or parsed is skipped with a warning;
/// only an unreadable directory fails the whole load.
pub fn load_dir(path: impl AsRef<Path>) -> Result<CardRegistry, LoadError> {
    let path = path.as_ref();
    let mut raw_sets = FxHashMap::default();

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let file = entry.path();
        if file.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(set_name) = file.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        let text = match fs::read_to_string(&file) {
            Ok(text) => text,
            Err(err) => {
                warn!(file = %file.display(), %err, "skipping unreadable set file");
                continue;
            }
        };
        match parse_set(set_name, &text) {
            Ok(cards) => {
                raw_sets.insert(set_name.to_owned(), cards);
            }
            Err(err) => {
                warn!(file = %file.display(), %err, "skipping malformed set file");
            }
        }
    }

    let mut registry = CardRegistry::new();
    for (name, cards) in resolve(&raw_sets) {
        info!(set = %name, cards = cards.len(), "loaded card set");
        registry.insert_set(name, cards);
    }
    Ok(registry)
}

fn parse_set(name: &str, json: &str) -> Result<Vec<RawCard>, LoadError> {
    let cards: Vec<RawCard> = serde_json::from_str(json).map_err(|source| LoadError::Json {
        set: name.to_owned(),
        source,
    })?;
    for (index, card) in cards.iter().enumerate() {
        if let Some(effect) = &card.def.effect {
            warn_unevaluated_effect(name, index, effect);
        }
    }
    Ok(cards)
}

/// Produce the final definitions from the raw tables, filling alias
/// holes from the aliased card's authored fields.
fn resolve(
    raw_sets: &FxHashMap<String, Vec<RawCard>>,
) -> FxHashMap<String, Vec<CardDefinition>> {
    let mut sets: FxHashMap<String, Vec<CardDefinition>> = raw_sets
        .iter()
        .map(|(name, cards)| {
            (
                name.clone(),
                cards.iter().map(|raw| raw.def.clone()).collect(),
            )
        })
        .collect();

    for (set_name, raw_cards) in raw_sets {
        for (index, raw) in raw_cards.iter().enumerate() {
            let Some(alias) = &raw.alias else { continue };
            if alias.set.is_empty() {
                continue;
            }

            let Some(target_set) = raw_sets.get(&alias.set) else {
                warn!(set = %set_name, card = index, target = %alias.set,
                    "alias points to an unknown set");
                continue;
            };
            let Some(target) = target_set.get(alias.id as usize) else {
                warn!(set = %set_name, card = index, target = %alias.set, id = alias.id,
                    "alias points to a known set but an unknown card id");
                continue;
            };

            let Some(cards) = sets.get_mut(set_name) else { continue };
            let card = &mut cards[index];
            if card.precondition.is_none() {
                card.precondition = target.def.precondition.clone();
            }
            if card.effect.is_none() {
                card.effect = target.def.effect.clone();
            }
            if card.card_type.is_none() {
                card.card_type = target.def.card_type.clone();
            }
        }
    }

    sets
}

fn warn_unevaluated_effect(set: &str, card: usize, effect: &Effect) {
    match effect {
        Effect::Then { args } => {
            for arg in args {
                warn_unevaluated_effect(set, card, arg);
            }
        }
        Effect::Or { args } => {
            warn!(set, card, kind = "OR", "effect kind is not evaluated");
            for arg in args {
                warn_unevaluated_effect(set, card, arg);
            }
        }
        Effect::Shuffle => {
            warn!(set, card, kind = "SHUFFLE", "effect kind is not evaluated");
        }
        Effect::Move { target, .. } => warn_unevaluated_effect(set, card, target),
        Effect::Target {
            target_type,
            filter,
        } => {
            if matches!(target_type, TargetKind::All | TargetKind::Top) {
                warn!(set, card, kind = target_type.name(), "target kind is not evaluated");
            }
            if let Some(filter) = filter {
                warn_unevaluated_filter(set, card, filter);
            }
        }
    }
}

fn warn_unevaluated_filter(set: &str, card: usize, filter: &CardFilter) {
    match filter {
        CardFilter::And { args, .. } | CardFilter::Or { args, .. } => {
            let kind = match filter {
                CardFilter::And { .. } => "AND",
                _ => "OR",
            };
            warn!(set, card, kind, "filter kind is not evaluated");
            for arg in args {
                warn_unevaluated_filter(set, card, arg);
            }
        }
        CardFilter::Just { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_SET: &str = r#"[
        {
            "name": "Ultra Ball",
            "imageSrc": "ultra_ball.png",
            "cardType": "ITEM",
            "preCondition": {
                "kind": "OPERATOR",
                "operator": ">",
                "args": [
                    {"kind": "VARIABLE", "variable": "CARDS_IN_HAND"},
                    {"kind": "CONSTANT", "val": 2}
                ]
            },
            "effect": {"kind": "THEN", "args": [
                {"kind": "MOVE",
                 "target": {"kind": "TARGET", "targetType": "THIS"},
                 "to": "DISCARD"},
                {"kind": "MOVE",
                 "target": {"kind": "TARGET", "targetType": "SELECT",
                            "filter": {"kind": "JUST", "pile": "HAND",
                                       "count": {"atLeast": 2, "atMost": 2}}},
                 "to": "DISCARD"}
            ]}
        },
        {"name": "Pidgey", "imageSrc": "pidgey.png"}
    ]"#;

    #[test]
    fn test_load_set_str() {
        let cards = load_set_str("base", BASE_SET).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].name, "Ultra Ball");
        assert!(cards[0].precondition.is_some());
        assert!(cards[0].effect.is_some());
        assert!(cards[1].effect.is_none());
    }

    #[test]
    fn test_alias_inherits_missing_fields() {
        let json = r#"[
            {"name": "Original", "imageSrc": "a.png", "cardType": "ITEM",
             "effect": {"kind": "SHUFFLE"}},
            {"name": "Reprint", "imageSrc": "b.png",
             "alias": {"set": "base", "id": 0}}
        ]"#;
        let cards = load_set_str("base", json).unwrap();

        let reprint = &cards[1];
        assert_eq!(reprint.name, "Reprint");
        assert_eq!(reprint.image_src, "b.png");
        assert_eq!(reprint.card_type.as_deref(), Some("ITEM"));
        assert_eq!(reprint.effect, Some(Effect::Shuffle));
    }

    #[test]
    fn test_alias_keeps_own_fields() {
        let json = r#"[
            {"name": "Original", "imageSrc": "a.png", "cardType": "ITEM",
             "effect": {"kind": "SHUFFLE"}},
            {"name": "Variant", "imageSrc": "b.png", "cardType": "TOOL",
             "effect": {"kind": "THEN", "args": []},
             "alias": {"set": "base", "id": 0}}
        ]"#;
        let cards = load_set_str("base", json).unwrap();

        let variant = &cards[1];
        assert_eq!(variant.card_type.as_deref(), Some("TOOL"));
        assert_eq!(variant.effect, Some(Effect::Then { args: vec![] }));
    }

    #[test]
    fn test_dangling_alias_is_tolerated() {
        let json = r#"[
            {"name": "Orphan A", "imageSrc": "a.png",
             "alias": {"set": "missing", "id": 0}},
            {"name": "Orphan B", "imageSrc": "b.png",
             "alias": {"set": "base", "id": 99}}
        ]"#;
        let cards = load_set_str("base", json).unwrap();

        assert_eq!(cards.len(), 2);
        assert!(cards[0].effect.is_none());
        assert!(cards[1].effect.is_none());
    }

    #[test]
    fn test_alias_chains_do_not_flatten() {
        let json = r#"[
            {"name": "Root", "imageSrc": "a.png", "effect": {"kind": "SHUFFLE"}},
            {"name": "Link", "imageSrc": "b.png", "alias": {"set": "base", "id": 0}},
            {"name": "End", "imageSrc": "c.png", "alias": {"set": "base", "id": 1}}
        ]"#;
        let cards = load_set_str("base", json).unwrap();

        // Link inherits from Root, but End reads only what Link authored.
        assert_eq!(cards[1].effect, Some(Effect::Shuffle));
        assert!(cards[2].effect.is_none());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = load_set_str("broken", "[{").unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_load_dir_resolves_cross_set_aliases() {
        let dir = std::env::temp_dir().join(format!("cardroom-loader-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("base.json"), BASE_SET).unwrap();
        fs::write(
            dir.join("promo.json"),
            r#"[{"name": "Promo Ball", "imageSrc": "promo.png",
                 "alias": {"set": "base", "id": 0}}]"#,
        )
        .unwrap();
        fs::write(dir.join("notes.txt"), "not a set").unwrap();

        let registry = load_dir(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.set_len("base"), 2);

        let promo = registry.lookup("promo", crate::core::CardId::new(0)).unwrap();
        assert_eq!(promo.name, "Promo Ball");
        assert_eq!(promo.card_type.as_deref(), Some("ITEM"));
        assert!(promo.precondition.is_some());
        assert!(promo.effect.is_some());
    }

    #[test]
    fn test_load_dir_missing_directory_is_an_error() {
        let err = load_dir("/nonexistent/cardroom-sets").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
