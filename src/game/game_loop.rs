//! Host game loop
//!
//! Drives a [`Match`] to the end. Bot seats are answered in-process by
//! their controller. Human seats get a prompt over their outbound channel
//! and the loop waits on that seat's inbound channel alone; a reply that
//! does not parse or is illegal is reported back and the same prompt is
//! sent again.

use crate::config::{BotConfig, MatchConfig};
use crate::core::{ActorId, ActorKind};
use crate::game::display::{self, MARKET_PROMPT, SWAP_PROMPT};
use crate::game::{
    parse_market_input, parse_swap_input, ActorController, BotController, Match, MatchEvent,
    Ranking, TurnPhase,
};
use crate::loader::Manifest;
use crate::{Result, SaladError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use tokio::sync::mpsc;

/// Buffered messages per direction on a seat's channels
pub const CHANNEL_CAPACITY: usize = 64;

/// What a human seat sends to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Raw answer to the last prompt
    Decision(Vec<u8>),
    /// The actor left; the match stops
    Quit,
}

impl InboundMessage {
    /// Classify a raw payload: empty or a lone `Q` means quit
    pub fn from_payload(payload: Vec<u8>) -> Self {
        if payload.is_empty() || payload == b"Q" {
            InboundMessage::Quit
        } else {
            InboundMessage::Decision(payload)
        }
    }
}

/// What the host sends to a human seat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// Display text
    Text(String),
    /// Display text that expects one answer
    Prompt(String),
    /// The match is over; no more messages follow
    Close,
}

/// Host side of a human seat
#[derive(Debug)]
pub struct ActorChannel {
    pub inbound: mpsc::Receiver<InboundMessage>,
    pub outbound: mpsc::Sender<OutboundMessage>,
}

/// Remote side of a human seat, held by the transport or a test
#[derive(Debug)]
pub struct SeatHandle {
    pub inbound: mpsc::Sender<InboundMessage>,
    pub outbound: mpsc::Receiver<OutboundMessage>,
}

impl ActorChannel {
    /// Linked host and remote ends
    pub fn pair() -> (ActorChannel, SeatHandle) {
        let (inbound_tx, inbound_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (outbound_tx, outbound_rx) = mpsc::channel(CHANNEL_CAPACITY);
        (
            ActorChannel {
                inbound: inbound_rx,
                outbound: outbound_tx,
            },
            SeatHandle {
                inbound: inbound_tx,
                outbound: outbound_rx,
            },
        )
    }
}

/// How a match ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    /// Every pile ran out
    Completed(Ranking),
    /// A human quit or disconnected; no ranking is produced
    Aborted { by: ActorId },
}

enum Seat {
    Human(ActorChannel),
    Bot(BotController),
}

/// Async driver for a match with human seats
pub struct GameLoop {
    game: Match,
    seats: Vec<Seat>,
}

impl GameLoop {
    /// Seat the humans (in seat order) and create a bot for every bot seat
    ///
    /// Bot seeds are drawn from `rng`, one per bot in seat order.
    pub fn new<R: Rng + ?Sized>(
        game: Match,
        humans: Vec<ActorChannel>,
        bot_config: &BotConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let human_seats = game.state().human_seats().count();
        if humans.len() != human_seats {
            return Err(SaladError::Config(format!(
                "{} human connections for {} human seats",
                humans.len(),
                human_seats
            )));
        }

        let mut humans = humans.into_iter();
        let mut seats = Vec::with_capacity(game.state().actor_count());
        for (actor, kind) in game.state().kinds().iter().enumerate() {
            let seat = match kind {
                ActorKind::Human => match humans.next() {
                    Some(channel) => Seat::Human(channel),
                    None => {
                        return Err(SaladError::Config(format!("no channel for actor {actor}")))
                    }
                },
                ActorKind::Bot => {
                    Seat::Bot(BotController::with_config(actor, rng.gen(), bot_config))
                }
            };
            seats.push(seat);
        }

        Ok(GameLoop { game, seats })
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    /// Play until the piles run out or a human quits
    pub async fn run(mut self) -> Result<GameOutcome> {
        tracing::info!(
            actors = self.seats.len(),
            starting_actor = self.game.active_actor(),
            "match started"
        );

        while !self.game.is_finished() {
            let actor = self.game.active_actor();
            let events = match &mut self.seats[actor] {
                Seat::Bot(bot) => {
                    let state = self.game.state();
                    let action = match self.game.phase() {
                        TurnPhase::AwaitingMarketAction => bot.choose_market_action(state)?,
                        _ => bot.choose_swap(state)?,
                    };
                    self.game
                        .logger
                        .controller_choice(bot.name(), actor, &action.to_string());
                    self.game
                        .submit(action)
                        .map_err(|source| SaladError::IllegalAction { actor, source })?
                }
                Seat::Human(channel) => {
                    match Self::ask_human(&mut self.game, channel, actor).await {
                        Some(events) => events,
                        None => {
                            tracing::info!(actor, "actor quit, aborting match");
                            self.close_all().await;
                            return Ok(GameOutcome::Aborted { by: actor });
                        }
                    }
                }
            };
            self.broadcast_events(events).await;
        }

        self.close_all().await;
        let ranking = self
            .game
            .ranking()
            .cloned()
            .ok_or_else(|| SaladError::Config("match ended without a ranking".to_string()))?;
        tracing::info!(winners = ?ranking.winners(), turns = self.game.turn(), "match finished");
        Ok(GameOutcome::Completed(ranking))
    }

    /// Prompt a human until a legal answer arrives; `None` if they quit
    async fn ask_human(
        game: &mut Match,
        channel: &mut ActorChannel,
        actor: ActorId,
    ) -> Option<Vec<MatchEvent>> {
        let (context, prompt) = match game.phase() {
            TurnPhase::AwaitingMarketAction => (
                display::hand_text(game.state(), actor) + &display::market_text(game.state()),
                MARKET_PROMPT,
            ),
            _ => (display::hand_text(game.state(), actor), SWAP_PROMPT),
        };
        channel.outbound.send(OutboundMessage::Text(context)).await.ok()?;

        loop {
            channel
                .outbound
                .send(OutboundMessage::Prompt(prompt.to_string()))
                .await
                .ok()?;

            let payload = match channel.inbound.recv().await {
                Some(InboundMessage::Decision(payload)) => payload,
                Some(InboundMessage::Quit) | None => return None,
            };

            let parsed = match game.phase() {
                TurnPhase::AwaitingMarketAction => parse_market_input(&payload),
                _ => parse_swap_input(&payload),
            };
            match parsed.and_then(|action| game.submit(action)) {
                Ok(events) => return Some(events),
                Err(err) => {
                    tracing::debug!(actor, error = %err, "rejected input");
                    channel
                        .outbound
                        .send(OutboundMessage::Text(format!("{err}\n")))
                        .await
                        .ok()?;
                }
            }
        }
    }

    async fn broadcast_events(&mut self, events: Vec<MatchEvent>) {
        for event in events {
            match event {
                MatchEvent::ActionTaken { text, .. } => {
                    self.broadcast(display::action_text(&text), None).await;
                }
                MatchEvent::HandRevealed { actor } => {
                    let hand = display::hand_text(self.game.state(), actor);
                    self.broadcast(hand, Some(actor)).await;
                }
                MatchEvent::Finished(ranking) => {
                    self.broadcast(ranking.to_string(), None).await;
                }
            }
        }
    }

    /// Send text to every human seat except `skip`
    async fn broadcast(&mut self, text: String, skip: Option<ActorId>) {
        for (actor, seat) in self.seats.iter().enumerate() {
            if Some(actor) == skip {
                continue;
            }
            if let Seat::Human(channel) = seat {
                if channel
                    .outbound
                    .send(OutboundMessage::Text(text.clone()))
                    .await
                    .is_err()
                {
                    tracing::warn!(actor, "outbound channel closed");
                }
            }
        }
    }

    async fn close_all(&mut self) {
        for seat in &self.seats {
            if let Seat::Human(channel) = seat {
                let _ = channel.outbound.send(OutboundMessage::Close).await;
            }
        }
    }
}

/// Result of a match played entirely by bots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalReport {
    pub seed: u64,
    pub starting_actor: ActorId,
    pub turns: u32,
    pub ranking: Ranking,
}

/// Play an all-bot match synchronously
///
/// The seed (from the config, or drawn from entropy) fixes the deck, the
/// starting actor and every bot's choices.
pub fn run_local(config: &MatchConfig, manifest: &Manifest) -> Result<LocalReport> {
    if config.humans != 0 {
        return Err(SaladError::Config(
            "local matches are played by bots only".to_string(),
        ));
    }
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    let mut game = Match::new(config, manifest, &mut rng)?;
    let starting_actor = game.active_actor();

    let mut controllers: Vec<Box<dyn ActorController>> = (0..config.actor_count())
        .map(|actor| {
            Box::new(BotController::with_config(actor, rng.gen(), &config.bot))
                as Box<dyn ActorController>
        })
        .collect();
    let ranking = game.run(&mut controllers)?;

    Ok(LocalReport {
        seed,
        starting_actor,
        turns: game.turn(),
        ranking,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::VerbosityLevel;

    #[test]
    fn test_quit_payloads() {
        assert_eq!(InboundMessage::from_payload(vec![]), InboundMessage::Quit);
        assert_eq!(InboundMessage::from_payload(b"Q".to_vec()), InboundMessage::Quit);
        assert_eq!(
            InboundMessage::from_payload(b"q".to_vec()),
            InboundMessage::Decision(b"q".to_vec())
        );
        assert_eq!(
            InboundMessage::from_payload(b"AB".to_vec()),
            InboundMessage::Decision(b"AB".to_vec())
        );
    }

    #[test]
    fn test_run_local_is_reproducible() {
        let manifest = Manifest::builtin().unwrap();
        let config = MatchConfig::bots_only(3)
            .with_seed(77)
            .with_verbosity(VerbosityLevel::Silent);
        let a = run_local(&config, &manifest).unwrap();
        let b = run_local(&config, &manifest).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seed, 77);
    }

    #[test]
    fn test_run_local_rejects_humans() {
        let manifest = Manifest::builtin().unwrap();
        let config = MatchConfig::new(1, 1).with_verbosity(VerbosityLevel::Silent);
        assert!(matches!(
            run_local(&config, &manifest),
            Err(SaladError::Config(_))
        ));
    }

    #[test]
    fn test_channel_count_must_match_human_seats() {
        let manifest = Manifest::builtin().unwrap();
        let config = MatchConfig::new(2, 1).with_verbosity(VerbosityLevel::Silent);
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let game = Match::new(&config, &manifest, &mut rng).unwrap();
        let (channel, _handle) = ActorChannel::pair();
        let result = GameLoop::new(game, vec![channel], &config.bot, &mut rng);
        assert!(matches!(result, Err(SaladError::Config(_))));
    }
}
