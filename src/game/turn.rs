//! Turn state machine
//!
//! A turn is a market action, then an optional swap if the actor holds any
//! point cards, then a reveal of the actor's hand. The grid is refilled at
//! the start of every turn and the match ends after the first turn that
//! leaves every draw pile empty.

/// Log through the match logger only when verbose logging is compiled in
macro_rules! log_if_verbose {
    ($self:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $self.logger.verbose(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$self;
        }
    };
}

use crate::config::MatchConfig;
use crate::core::ActorId;
use crate::game::display;
use crate::game::{
    ActionError, ActorAction, ActorController, GameLogger, GameState, Ranking, ValidatedAction,
};
use crate::loader::{DeckBuilder, Manifest};
use crate::{Result, SaladError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which decision the match is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    AwaitingMarketAction,
    AwaitingSwapDecision,
    Finished,
}

/// Something every participant should hear about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// An action was carried out; `text` is its announcement
    ActionTaken { actor: ActorId, text: String },
    /// The actor's turn is over and their hand is shown to the table
    HandRevealed { actor: ActorId },
    /// Every pile is empty
    Finished(Ranking),
}

/// One match in progress
#[derive(Debug, Clone)]
pub struct Match {
    state: GameState,
    phase: TurnPhase,
    /// Turns started so far, the current one included
    turn: u32,
    ranking: Option<Ranking>,
    pub logger: GameLogger,
}

impl Match {
    /// Deal a new match
    ///
    /// Checks the configuration, builds and shuffles the deck, then draws a
    /// uniformly random starting actor, all from `rng`.
    pub fn new<R: Rng + ?Sized>(
        config: &MatchConfig,
        manifest: &Manifest,
        rng: &mut R,
    ) -> Result<Self> {
        let logger = GameLogger::with_verbosity(config.verbosity);
        Self::with_logger(config, manifest, rng, logger)
    }

    /// Deal a new match that reports through `logger`
    pub fn with_logger<R: Rng + ?Sized>(
        config: &MatchConfig,
        manifest: &Manifest,
        rng: &mut R,
        logger: GameLogger,
    ) -> Result<Self> {
        config.validate()?;
        let actors = config.actor_count();
        let deck = DeckBuilder::build(manifest, actors, rng)?;
        let starting_actor = rng.gen_range(0..actors);
        let kinds = GameState::seat_kinds(config.humans, config.bots);
        let state = GameState::new(deck, kinds, starting_actor)?;
        Ok(Self::from_state(state, logger))
    }

    /// Start the first turn of an already dealt game
    pub fn from_state(state: GameState, logger: GameLogger) -> Self {
        let mut game = Match {
            state,
            phase: TurnPhase::AwaitingMarketAction,
            turn: 0,
            ranking: None,
            logger,
        };
        game.begin_turn();
        if game.state.is_finished() && game.state.market.occupied_spots().next().is_none() {
            game.finish();
        }
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn active_actor(&self) -> ActorId {
        self.state.active_actor()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == TurnPhase::Finished
    }

    /// Final ranking, once the match is over
    pub fn ranking(&self) -> Option<&Ranking> {
        self.ranking.as_ref()
    }

    /// Play one decision for the active actor
    ///
    /// A rejected action leaves the state and the phase exactly as they were,
    /// so the same decision can simply be asked for again.
    pub fn submit(
        &mut self,
        action: ActorAction,
    ) -> std::result::Result<Vec<MatchEvent>, ActionError> {
        match self.phase {
            TurnPhase::Finished => Err(ActionError::GameOver),
            TurnPhase::AwaitingMarketAction => {
                if !action.is_market_action() {
                    return Err(ActionError::WrongPhase {
                        expected: "vegetables or a point card",
                    });
                }
                let validated = self.state.validate(action)?;
                let mut events = vec![self.play(validated)];
                if self.state.active_state().point_cards.is_empty() {
                    self.end_turn(&mut events);
                } else {
                    self.phase = TurnPhase::AwaitingSwapDecision;
                }
                Ok(events)
            }
            TurnPhase::AwaitingSwapDecision => {
                if action.is_market_action() {
                    return Err(ActionError::WrongPhase {
                        expected: "a point card to flip or n",
                    });
                }
                let validated = self.state.validate(action)?;
                let mut events = vec![self.play(validated)];
                self.end_turn(&mut events);
                Ok(events)
            }
        }
    }

    /// Drive the match to the end with one controller per seat
    ///
    /// `controllers` must hold a controller for every seat, in any order.
    pub fn run(&mut self, controllers: &mut [Box<dyn ActorController>]) -> Result<Ranking> {
        while !self.is_finished() {
            let actor = self.active_actor();
            let controller = controllers
                .iter_mut()
                .find(|c| c.actor_id() == actor)
                .ok_or_else(|| SaladError::Config(format!("no controller for actor {actor}")))?;

            let action = match self.phase {
                TurnPhase::AwaitingMarketAction => controller.choose_market_action(&self.state)?,
                TurnPhase::AwaitingSwapDecision => controller.choose_swap(&self.state)?,
                TurnPhase::Finished => break,
            };
            let shown = action.to_string();
            self.submit(action)
                .map_err(|source| SaladError::IllegalAction { actor, source })?;
            self.logger.controller_choice(controller.name(), actor, &shown);
        }

        self.ranking
            .clone()
            .ok_or_else(|| SaladError::Config("match ended without a ranking".to_string()))
    }

    fn play(&mut self, validated: ValidatedAction) -> MatchEvent {
        let actor = validated.actor();
        let text = self.state.describe(&validated);
        self.logger.normal(&text);
        self.state.apply(validated);
        MatchEvent::ActionTaken { actor, text }
    }

    fn begin_turn(&mut self) {
        self.turn += 1;
        self.state.market.refill();
        self.phase = TurnPhase::AwaitingMarketAction;
        self.logger.normal(&format!(
            "Turn {}: Player {} ({})",
            self.turn,
            self.active_actor(),
            self.state.kind(self.active_actor())
        ));
        log_if_verbose!(self, "{}", display::market_text(&self.state).trim_end());
    }

    fn end_turn(&mut self, events: &mut Vec<MatchEvent>) {
        let actor = self.active_actor();
        log_if_verbose!(self, "{}", display::hand_text(&self.state, actor).trim_end());
        events.push(MatchEvent::HandRevealed { actor });

        if self.state.is_finished() {
            events.push(MatchEvent::Finished(self.finish()));
        } else {
            self.state.advance_turn();
            self.begin_turn();
        }
    }

    fn finish(&mut self) -> Ranking {
        let ranking = Ranking::from_actors(&self.state.actors);
        self.logger.minimal(ranking.to_string().trim_end());
        self.phase = TurnPhase::Finished;
        self.ranking = Some(ranking.clone());
        ranking
    }
}
