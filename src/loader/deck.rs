//! Deck construction from a manifest

use crate::core::{Card, VegetableType, VEGETABLE_TYPES};
use crate::loader::Manifest;
use crate::{Result, SaladError};
use rand::seq::{index, SliceRandom};
use rand::Rng;

/// Cards dealt per vegetable type for every seat at the table
pub const CARDS_PER_VEGETABLE_PER_ACTOR: usize = 3;

/// Builds the shuffled deck for one match
pub struct DeckBuilder;

impl DeckBuilder {
    /// Number of cards of each vegetable type in a deck for `actor_count` actors
    pub fn cards_per_vegetable(actor_count: usize) -> usize {
        CARDS_PER_VEGETABLE_PER_ACTOR * actor_count
    }

    /// Total deck size for `actor_count` actors
    pub fn deck_size(actor_count: usize) -> usize {
        VEGETABLE_TYPES * Self::cards_per_vegetable(actor_count)
    }

    /// Build and shuffle a deck
    ///
    /// For each vegetable type, distinct identities are sampled without
    /// replacement and paired with that type's rule. The finished deck is
    /// shuffled once as a whole.
    pub fn build<R: Rng + ?Sized>(
        manifest: &Manifest,
        actor_count: usize,
        rng: &mut R,
    ) -> Result<Vec<Card>> {
        let per_vegetable = Self::cards_per_vegetable(actor_count);
        if manifest.len() < per_vegetable {
            return Err(SaladError::Config(format!(
                "manifest has {} cards but {} actors need {}",
                manifest.len(),
                actor_count,
                per_vegetable
            )));
        }

        let mut deck = Vec::with_capacity(Self::deck_size(actor_count));
        for vegetable in VegetableType::ALL {
            for i in index::sample(rng, manifest.len(), per_vegetable) {
                let identity = &manifest.identities()[i];
                deck.push(Card::new(identity.id, vegetable, identity.rule(vegetable)));
            }
        }

        deck.shuffle(rng);
        Ok(deck)
    }
}
