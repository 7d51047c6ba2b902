//! Strongly-typed wrappers for game concepts
//!
//! Vegetables double as a resource and as an array index, so the enum carries
//! its own index mapping and the fixed-size count array type used everywhere.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of vegetable types in the game
pub const VEGETABLE_TYPES: usize = 6;

/// Per-type counters indexed by [`VegetableType::index`]
pub type VegetableCounts = [u32; VEGETABLE_TYPES];

/// The six vegetable types, in manifest order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VegetableType {
    Pepper,
    Lettuce,
    Carrot,
    Cabbage,
    Onion,
    Tomato,
}

impl VegetableType {
    pub const ALL: [VegetableType; VEGETABLE_TYPES] = [
        VegetableType::Pepper,
        VegetableType::Lettuce,
        VegetableType::Carrot,
        VegetableType::Cabbage,
        VegetableType::Onion,
        VegetableType::Tomato,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Upper-case name as it appears in rule text and the manifest
    pub fn name(self) -> &'static str {
        match self {
            VegetableType::Pepper => "PEPPER",
            VegetableType::Lettuce => "LETTUCE",
            VegetableType::Carrot => "CARROT",
            VegetableType::Cabbage => "CABBAGE",
            VegetableType::Onion => "ONION",
            VegetableType::Tomato => "TOMATO",
        }
    }
}

impl fmt::Display for VegetableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VegetableType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|veg| veg.name() == s)
            .ok_or_else(|| format!("unknown vegetable type '{s}'"))
    }
}

/// Index of a card identity in the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardIdentityId(u16);

impl CardIdentityId {
    pub fn new(id: u16) -> Self {
        CardIdentityId(id)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for CardIdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Seat number of an actor (human or bot) in turn order
pub type ActorId = usize;
