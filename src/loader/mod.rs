//! Manifest, rule text and deck loaders
//!
//! Parsers for the card manifest (.json) and the scoring rule language

pub mod criteria;
pub mod deck;
pub mod manifest;

pub use criteria::{parse_criterion, CriterionError};
pub use deck::DeckBuilder;
pub use manifest::{CardIdentity, Manifest};
