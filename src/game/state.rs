//! Main game state structure

use crate::core::{ActorId, ActorKind, ActorState, Card};
use crate::game::scoring;
use crate::market::Market;
use crate::{Result, SaladError};
use serde::{Deserialize, Serialize};

/// Complete game state
///
/// Plain value type: cloning it yields an independent copy, which is what
/// the bots simulate candidate actions on. The turn orchestrator owns the
/// only live instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Draw piles and the face-up grid
    pub market: Market,

    /// Holdings per seat, indexed by `ActorId`
    pub actors: Vec<ActorState>,

    /// Who decides for each seat
    kinds: Vec<ActorKind>,

    /// Seat whose turn it is
    active: ActorId,
}

impl GameState {
    /// Create a game over a shuffled deck
    ///
    /// Seats are numbered in the order of `kinds`. The grid starts empty;
    /// it is filled at the start of the first turn.
    pub fn new(deck: Vec<Card>, kinds: Vec<ActorKind>, starting_actor: ActorId) -> Result<Self> {
        if kinds.is_empty() {
            return Err(SaladError::Config("a game needs at least one actor".to_string()));
        }
        if starting_actor >= kinds.len() {
            return Err(SaladError::Config(format!(
                "starting actor {} out of range for {} actors",
                starting_actor,
                kinds.len()
            )));
        }

        Ok(GameState {
            market: Market::standard(deck)?,
            actors: vec![ActorState::new(); kinds.len()],
            kinds,
            active: starting_actor,
        })
    }

    /// Seat kinds for `humans` human players followed by `bots` bots
    pub fn seat_kinds(humans: usize, bots: usize) -> Vec<ActorKind> {
        std::iter::repeat(ActorKind::Human)
            .take(humans)
            .chain(std::iter::repeat(ActorKind::Bot).take(bots))
            .collect()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn active_actor(&self) -> ActorId {
        self.active
    }

    pub fn actor(&self, actor: ActorId) -> &ActorState {
        &self.actors[actor]
    }

    pub fn active_state(&self) -> &ActorState {
        &self.actors[self.active]
    }

    pub fn kind(&self, actor: ActorId) -> ActorKind {
        self.kinds[actor]
    }

    pub fn kinds(&self) -> &[ActorKind] {
        &self.kinds
    }

    /// Seats played by humans
    pub fn human_seats(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == ActorKind::Human)
            .map(|(id, _)| id)
    }

    /// Current score of an actor
    pub fn score(&self, actor: ActorId) -> i32 {
        scoring::actor_score(&self.actors, actor)
    }

    /// The game is over once every draw pile is empty
    pub fn is_finished(&self) -> bool {
        self.market.piles_empty()
    }

    /// Pass the turn to the next seat
    pub fn advance_turn(&mut self) -> ActorId {
        self.active = (self.active + 1) % self.actors.len();
        self.active
    }
}
