//! Per-actor holdings

use crate::core::{Card, VegetableCounts, VegetableType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who makes decisions for a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// Remote player answering prompts over the network
    Human,
    /// Local scripted bot
    Bot,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorKind::Human => f.write_str("human"),
            ActorKind::Bot => f.write_str("bot"),
        }
    }
}

/// Vegetables and point cards collected by one actor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorState {
    /// Vegetable counters indexed by `VegetableType::index`
    pub vegetables: VegetableCounts,

    /// Point cards in the order they were collected
    pub point_cards: Vec<Card>,
}

impl ActorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, vegetable: VegetableType) -> u32 {
        self.vegetables[vegetable.index()]
    }

    /// Total number of vegetables across all types
    pub fn total(&self) -> u32 {
        self.vegetables.iter().sum()
    }

    pub fn add_vegetable(&mut self, vegetable: VegetableType) {
        self.vegetables[vegetable.index()] += 1;
    }

    pub fn add_point_card(&mut self, card: Card) {
        self.point_cards.push(card);
    }

    /// Remove a point card, keeping the order of the rest
    pub fn remove_point_card(&mut self, index: usize) -> Option<Card> {
        if index < self.point_cards.len() {
            Some(self.point_cards.remove(index))
        } else {
            None
        }
    }
}
