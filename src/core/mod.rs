//! Core game types

pub mod actor;
pub mod card;
pub mod criterion;
pub mod types;

pub use actor::{ActorKind, ActorState};
pub use card::Card;
pub use criterion::Criterion;
pub use types::{ActorId, CardIdentityId, VegetableCounts, VegetableType, VEGETABLE_TYPES};
