//! Game state, turn structure and the actors that drive it

pub mod actions;
pub mod bot_controller;
pub mod controller;
pub mod display;
pub mod game_loop;
pub mod logger;
pub mod scoring;
pub mod scripted_controller;
pub mod state;
pub mod turn;

pub use actions::{
    parse_market_input, parse_swap_input, ActionError, ActorAction, ValidatedAction,
};
pub use bot_controller::BotController;
pub use controller::ActorController;
pub use game_loop::{
    run_local, ActorChannel, GameLoop, GameOutcome, InboundMessage, LocalReport, OutboundMessage,
    SeatHandle,
};
pub use logger::{GameLogger, LogEntry, OutputMode, VerbosityLevel};
pub use scoring::{actor_score, Ranking, Standing};
pub use scripted_controller::ScriptedController;
pub use state::GameState;
pub use turn::{Match, MatchEvent, TurnPhase};
