//! Decision interface for seats resolved in-process
//!
//! The turn loop asks a controller for each decision of its seat. Bots and
//! test scripts implement this; remote humans answer over their channels
//! instead (see `game_loop`).

use crate::core::ActorId;
use crate::game::{ActorAction, GameState};
use crate::Result;

pub trait ActorController {
    /// Seat this controller decides for
    fn actor_id(&self) -> ActorId;

    /// Pick vegetables or a point card from the market
    ///
    /// Called with the grid already refilled for this turn.
    fn choose_market_action(&mut self, state: &GameState) -> Result<ActorAction>;

    /// Optionally flip one held point card to its vegetable side
    ///
    /// Only called when the actor holds at least one point card.
    fn choose_swap(&mut self, state: &GameState) -> Result<ActorAction>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "controller"
    }
}
