//! Scripted controller for deterministic tests
//!
//! Plays a fixed list of actions in order. Once the script runs out it
//! takes the first legal market action and declines every swap.

use crate::core::ActorId;
use crate::game::bot_controller::legal_market_actions;
use crate::game::{ActorAction, ActorController, GameState};
use crate::{Result, SaladError};
use std::collections::VecDeque;

pub struct ScriptedController {
    actor: ActorId,
    script: VecDeque<ActorAction>,
}

impl ScriptedController {
    pub fn new(actor: ActorId, actions: Vec<ActorAction>) -> Self {
        ScriptedController {
            actor,
            script: actions.into(),
        }
    }

    /// Actions not yet played
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ActorController for ScriptedController {
    fn actor_id(&self) -> ActorId {
        self.actor
    }

    fn choose_market_action(&mut self, state: &GameState) -> Result<ActorAction> {
        if let Some(action) = self.script.pop_front() {
            return Ok(action);
        }
        legal_market_actions(state)
            .into_iter()
            .next()
            .ok_or(SaladError::NoLegalAction(self.actor))
    }

    fn choose_swap(&mut self, _state: &GameState) -> Result<ActorAction> {
        Ok(self
            .script
            .pop_front()
            .unwrap_or(ActorAction::SwapOneCard(None)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
