//! Greedy sampling bot
//!
//! The bot draws random candidate actions, throws away illegal ones and
//! plays the first whose resulting score is not below its current score.
//! Each candidate is tried on a private clone of the game state.
//!
//! Sampling has no guaranteed end for market decisions, so it is capped.
//! When the cap is hit the market decision searches every legal action and
//! keeps the best result, and the swap decision declines.

use crate::config::BotConfig;
use crate::core::ActorId;
use crate::game::{ActorAction, ActorController, GameState, ValidatedAction};
use crate::{Result, SaladError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

pub struct BotController {
    actor: ActorId,
    rng: ChaCha12Rng,
    max_attempts: usize,
}

impl BotController {
    /// Create a bot with default settings
    pub fn new(actor: ActorId, seed: u64) -> Self {
        Self::with_config(actor, seed, &BotConfig::default())
    }

    pub fn with_config(actor: ActorId, seed: u64, config: &BotConfig) -> Self {
        BotController {
            actor,
            rng: ChaCha12Rng::seed_from_u64(seed),
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Score the active actor would have after playing `validated`
    fn score_after(state: &GameState, validated: ValidatedAction) -> i32 {
        let actor = validated.actor();
        let mut scratch = state.clone();
        scratch.apply(validated);
        scratch.score(actor)
    }

    /// Validate a candidate and keep it if it does not lower the score
    fn accept(state: &GameState, candidate: ActorAction) -> Option<ActorAction> {
        let validated = state.validate(candidate).ok()?;
        let before = state.score(validated.actor());
        let action = validated.action().clone();
        if Self::score_after(state, validated) >= before {
            Some(action)
        } else {
            None
        }
    }

    fn sample_market_action(&mut self, state: &GameState) -> ActorAction {
        let spots = state.market.spot_count();
        if self.rng.gen_bool(0.5) {
            let count = self.rng.gen_range(1..=2);
            let first = self.rng.gen_range(0..spots);
            if count == 1 {
                ActorAction::take_one(first)
            } else {
                ActorAction::take_two(first, self.rng.gen_range(0..spots))
            }
        } else {
            ActorAction::TakePointCard(self.rng.gen_range(0..state.market.columns()))
        }
    }

    fn sample_swap(&mut self, state: &GameState) -> ActorAction {
        let held = state.active_state().point_cards.len();
        if held == 0 || self.rng.gen_bool(0.5) {
            ActorAction::SwapOneCard(None)
        } else {
            ActorAction::SwapOneCard(Some(self.rng.gen_range(0..held)))
        }
    }
}

/// Every legal market action, single spots first, then spot pairs, then piles
pub fn legal_market_actions(state: &GameState) -> Vec<ActorAction> {
    let occupied: Vec<usize> = state.market.occupied_spots().collect();
    let mut actions: Vec<ActorAction> = occupied.iter().map(|&s| ActorAction::take_one(s)).collect();
    for (i, &first) in occupied.iter().enumerate() {
        for &second in &occupied[i + 1..] {
            actions.push(ActorAction::take_two(first, second));
        }
    }
    actions.extend(
        (0..state.market.columns())
            .filter(|&pile| state.market.top_point_card(pile).is_some())
            .map(ActorAction::TakePointCard),
    );
    actions
}

/// Legal market action with the highest resulting score, first on ties
pub fn best_market_action(state: &GameState) -> Option<ActorAction> {
    let mut best: Option<(i32, ActorAction)> = None;
    for candidate in legal_market_actions(state) {
        let Ok(validated) = state.validate(candidate) else {
            continue;
        };
        let action = validated.action().clone();
        let score = BotController::score_after(state, validated);
        if best.as_ref().map_or(true, |(top, _)| score > *top) {
            best = Some((score, action));
        }
    }
    best.map(|(_, action)| action)
}

impl ActorController for BotController {
    fn actor_id(&self) -> ActorId {
        self.actor
    }

    fn choose_market_action(&mut self, state: &GameState) -> Result<ActorAction> {
        for _ in 0..self.max_attempts {
            let candidate = self.sample_market_action(state);
            if let Some(action) = Self::accept(state, candidate) {
                return Ok(action);
            }
        }

        tracing::debug!(
            actor = self.actor,
            attempts = self.max_attempts,
            "bot sampling exhausted, searching all market actions"
        );
        best_market_action(state).ok_or(SaladError::NoLegalAction(self.actor))
    }

    fn choose_swap(&mut self, state: &GameState) -> Result<ActorAction> {
        for _ in 0..self.max_attempts {
            let candidate = self.sample_swap(state);
            if let Some(action) = Self::accept(state, candidate) {
                return Ok(action);
            }
        }
        Ok(ActorAction::SwapOneCard(None))
    }

    fn name(&self) -> &str {
        "bot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardIdentityId, Criterion, VegetableType};
    use crate::loader::{DeckBuilder, Manifest};

    fn seeded_state(seed: u64) -> GameState {
        let manifest = Manifest::builtin().unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let deck = DeckBuilder::build(&manifest, 2, &mut rng).unwrap();
        let mut state = GameState::new(deck, GameState::seat_kinds(0, 2), 0).unwrap();
        state.market.refill();
        state
    }

    /// Deck where every point face penalises carrots
    fn carrot_hating_state() -> GameState {
        let deck = (0..36)
            .map(|i| {
                Card::new(
                    CardIdentityId::new(i),
                    VegetableType::ALL[i as usize % 6],
                    Criterion::PerVegetable {
                        weights: [0, 0, -3, 0, 0, 0],
                    },
                )
            })
            .collect();
        let mut state = GameState::new(deck, GameState::seat_kinds(0, 2), 0).unwrap();
        state.market.refill();
        state
    }

    #[test]
    fn test_market_choice_is_legal_and_does_not_lose_points() {
        for seed in 0..20 {
            let state = seeded_state(seed);
            let mut bot = BotController::new(0, seed);
            let action = bot.choose_market_action(&state).unwrap();
            assert!(action.is_market_action());
            let validated = state.validate(action).unwrap();
            assert!(BotController::score_after(&state, validated) >= state.score(0));
        }
    }

    #[test]
    fn test_live_state_untouched_by_simulation() {
        let state = seeded_state(3);
        let before = state.clone();
        let mut bot = BotController::new(0, 3);
        bot.choose_market_action(&state).unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn test_same_seed_same_choice() {
        let state = seeded_state(11);
        let a = BotController::new(0, 42).choose_market_action(&state).unwrap();
        let b = BotController::new(0, 42).choose_market_action(&state).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_swap_never_lowers_score() {
        let mut state = carrot_hating_state();
        state.actors[0].vegetables = [0, 0, 2, 0, 0, 0];
        // Flipping any held card removes a -6 rule but adds a vegetable
        let held = Card::new(
            CardIdentityId::new(99),
            VegetableType::Carrot,
            Criterion::PerVegetable {
                weights: [0, 0, -3, 0, 0, 0],
            },
        );
        state.actors[0].add_point_card(held);
        state.actors[0].add_point_card(held);
        let before = state.score(0);

        for seed in 0..10 {
            let mut bot = BotController::new(0, seed);
            let action = bot.choose_swap(&state).unwrap();
            let validated = state.validate(action).unwrap();
            assert!(BotController::score_after(&state, validated) >= before);
        }
    }

    #[test]
    fn test_exhausted_market_sampling_falls_back_to_search() {
        let mut state = carrot_hating_state();
        state.actors[0].add_point_card(*state.market.top_point_card(0).unwrap());
        let config = BotConfig { max_attempts: 1 };
        let mut bot = BotController::with_config(0, 5, &config);
        let action = bot.choose_market_action(&state).unwrap();
        assert!(state.validate(action).is_ok());
    }

    #[test]
    fn test_best_market_action_avoids_penalty() {
        let mut state = carrot_hating_state();
        state.actors[0].add_point_card(*state.market.top_point_card(0).unwrap());
        let action = best_market_action(&state).unwrap();
        let validated = state.validate(action.clone()).unwrap();
        let after = BotController::score_after(&state, validated);
        // Picking a non-carrot pair keeps the score at zero
        assert_eq!(after, 0, "{action}");
    }

    #[test]
    fn test_legal_market_actions_on_full_grid() {
        let state = seeded_state(0);
        // 6 singles, 15 pairs, 3 piles
        assert_eq!(legal_market_actions(&state).len(), 24);
    }
}
