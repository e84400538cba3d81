//! Card filters and selection count restrictions.
//!
//! A filter describes, declaratively, which cards a selection may draw
//! from. The evaluator answers one question: given the acting player's
//! piles, which instances match right now? Compound `AND`/`OR` filters
//! are part of the authored grammar but have no evaluation semantics
//! yet and are rejected loudly.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::cards::CardDefinition;
use crate::core::{GameError, InstanceId};
use crate::piles::{Pile, PileManager};

/// Bounds on how many cards a selection may contain.
///
/// An absent bound is authored as zero; a zero `atMost` places no upper
/// limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountRestriction {
    #[serde(default)]
    pub at_least: usize,
    #[serde(default)]
    pub at_most: usize,
}

impl CountRestriction {
    /// A restriction demanding exactly `n` cards.
    #[must_use]
    pub const fn exactly(n: usize) -> Self {
        Self {
            at_least: n,
            at_most: n,
        }
    }

    /// Whether a selection of `n` cards satisfies this restriction.
    #[must_use]
    pub fn allows(&self, n: usize) -> bool {
        n >= self.at_least && (self.at_most == 0 || n <= self.at_most)
    }
}

impl fmt::Display for CountRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.at_most == 0 {
            write!(f, "at least {}", self.at_least)
        } else {
            write!(f, "between {} and {}", self.at_least, self.at_most)
        }
    }
}

/// A declarative description of which cards may be selected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardFilter {
    /// Cards matching every sub-filter. Grammar only; not evaluated.
    And {
        #[serde(default)]
        args: Vec<CardFilter>,
        #[serde(default)]
        count: CountRestriction,
    },

    /// Cards matching any sub-filter. Grammar only; not evaluated.
    Or {
        #[serde(default)]
        args: Vec<CardFilter>,
        #[serde(default)]
        count: CountRestriction,
    },

    /// Cards in one pile, optionally narrowed to one card type.
    Just {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pile: Option<Pile>,
        #[serde(
            rename = "type",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        card_type: Option<String>,
        #[serde(default)]
        count: CountRestriction,
    },
}

impl CardFilter {
    /// All cards in a pile, bounded by a count restriction.
    #[must_use]
    pub fn just(pile: Pile, count: CountRestriction) -> Self {
        CardFilter::Just {
            pile: Some(pile),
            card_type: None,
            count,
        }
    }

    /// Cards of one type in a pile, bounded by a count restriction.
    #[must_use]
    pub fn just_typed(
        pile: Pile,
        card_type: impl Into<String>,
        count: CountRestriction,
    ) -> Self {
        CardFilter::Just {
            pile: Some(pile),
            card_type: Some(card_type.into()),
            count,
        }
    }

    /// The pile this filter scans, when it names one.
    #[must_use]
    pub fn pile(&self) -> Option<Pile> {
        match self {
            CardFilter::Just { pile, .. } => *pile,
            CardFilter::And { .. } | CardFilter::Or { .. } => None,
        }
    }

    /// The count restriction attached to this filter node.
    #[must_use]
    pub fn count(&self) -> CountRestriction {
        match self {
            CardFilter::And { count, .. }
            | CardFilter::Or { count, .. }
            | CardFilter::Just { count, .. } => *count,
        }
    }

    /// The cards currently matching this filter, in pile order.
    ///
    /// The count restriction is not enforced here; it bounds the
    /// player's eventual selection, not the candidate list.
    pub fn applicable_cards(
        &self,
        piles: &PileManager,
        defs: &[CardDefinition],
    ) -> Result<Vec<InstanceId>, GameError> {
        match self {
            CardFilter::And { .. } => Err(GameError::UnsupportedFilter("AND")),
            CardFilter::Or { .. } => Err(GameError::UnsupportedFilter("OR")),
            CardFilter::Just {
                pile, card_type, ..
            } => {
                let pile = pile.ok_or(GameError::FilterMissingPile)?;
                let cards = piles.pile(pile).ok_or(GameError::UnknownPile(pile))?;

                let mut matched = Vec::with_capacity(cards.len());
                for card in cards {
                    let keep = match card_type {
                        None => true,
                        Some(want) => match defs.get(card.card.index()) {
                            Some(def) => def.card_type.as_deref() == Some(want.as_str()),
                            None => {
                                warn!(card = %card.card, "card has no definition, excluding from filter");
                                false
                            }
                        },
                    };
                    if keep {
                        matched.push(card.instance);
                    }
                }
                Ok(matched)
            }
        }
    }
}
