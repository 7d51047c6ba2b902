//! Match configuration
//!
//! Built from the command line in `main.rs` and checked before any game
//! state exists, so a bad table size never reaches the turn loop.

use crate::game::VerbosityLevel;
use crate::{Result, SaladError};
use serde::{Deserialize, Serialize};

/// Fewest actors a match can seat
pub const MIN_ACTORS: usize = 2;

/// Most actors a match can seat
pub const MAX_ACTORS: usize = 6;

/// Default cap on sampled candidates before a bot falls back to a full search
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Bot policy tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Random candidates tried per decision before falling back
    pub max_attempts: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Everything needed to set up one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Human players, seated first
    pub humans: usize,

    /// Bots, seated after the humans
    pub bots: usize,

    /// Seed for deck building, the starting actor and the bots; `None` draws
    /// one from entropy
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub bot: BotConfig,

    #[serde(default)]
    pub verbosity: VerbosityLevel,
}

impl MatchConfig {
    pub fn new(humans: usize, bots: usize) -> Self {
        MatchConfig {
            humans,
            bots,
            seed: None,
            bot: BotConfig::default(),
            verbosity: VerbosityLevel::default(),
        }
    }

    /// A table of bots only
    pub fn bots_only(bots: usize) -> Self {
        Self::new(0, bots)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.bot.max_attempts = max_attempts;
        self
    }

    pub fn actor_count(&self) -> usize {
        self.humans + self.bots
    }

    /// Check the table size and bot settings
    pub fn validate(&self) -> Result<()> {
        let actors = self.actor_count();
        if !(MIN_ACTORS..=MAX_ACTORS).contains(&actors) {
            return Err(SaladError::Config(format!(
                "number of players + bots has to be between {MIN_ACTORS}-{MAX_ACTORS}, got {actors}"
            )));
        }
        if self.bot.max_attempts == 0 {
            return Err(SaladError::Config(
                "bot max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
