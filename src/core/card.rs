//! Card representation

use crate::core::{CardIdentityId, Criterion, VegetableType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One card of the deck
///
/// Every card has a vegetable face and a point face. Which rule sits on the
/// point face is decided by the vegetable, so the pair is fixed when the deck
/// is built and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Manifest entry this card was built from
    pub identity: CardIdentityId,

    /// Vegetable side
    pub vegetable: VegetableType,

    /// Scoring rule on the point side
    pub criterion: Criterion,
}

impl Card {
    pub fn new(identity: CardIdentityId, vegetable: VegetableType, criterion: Criterion) -> Self {
        Card {
            identity,
            vegetable,
            criterion,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.criterion, self.vegetable)
    }
}
