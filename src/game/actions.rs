//! Actor actions: validation, application and the host's input encodings

use crate::core::ActorId;
use crate::game::GameState;
use crate::market::Market;
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

/// Most vegetable cards one actor may take from the market in a turn
pub const MAX_VEGETABLES_PER_TURN: usize = 2;

/// Decisions an actor can make
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActorAction {
    /// Take one or two vegetable cards from market spots
    TakeVegetables(SmallVec<[usize; MAX_VEGETABLES_PER_TURN]>),

    /// Take the top point card of a draw pile
    TakePointCard(usize),

    /// Flip one collected point card to its vegetable side, or decline
    SwapOneCard(Option<usize>),
}

impl ActorAction {
    pub fn take_one(spot: usize) -> Self {
        ActorAction::TakeVegetables(SmallVec::from_slice(&[spot]))
    }

    pub fn take_two(first: usize, second: usize) -> Self {
        ActorAction::TakeVegetables(SmallVec::from_slice(&[first, second]))
    }

    /// True for the actions allowed in the market step of a turn
    pub fn is_market_action(&self) -> bool {
        matches!(
            self,
            ActorAction::TakeVegetables(_) | ActorAction::TakePointCard(_)
        )
    }
}

impl fmt::Display for ActorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorAction::TakeVegetables(spots) => {
                f.write_str("take ")?;
                for &spot in spots {
                    write!(f, "{}", Market::spot_letter(spot))?;
                }
                Ok(())
            }
            ActorAction::TakePointCard(pile) => write!(f, "take point card {pile}"),
            ActorAction::SwapOneCard(Some(index)) => write!(f, "swap {index}"),
            ActorAction::SwapOneCard(None) => f.write_str("no swap"),
        }
    }
}

/// Why an action was rejected
///
/// The message is sent verbatim to the actor that made the decision.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Pick 1 or 2 vegetables, not {0}")]
    Cardinality(usize),

    #[error("Spot {spot} is outside the market ({spots} spots)")]
    SpotOutOfRange { spot: usize, spots: usize },

    #[error("Spot {0} is empty")]
    EmptySpot(char),

    #[error("Cannot take from spot {0} twice")]
    DuplicateSpot(char),

    #[error("Pile {pile} does not exist ({piles} piles)")]
    PileOutOfRange { pile: usize, piles: usize },

    #[error("Pile {0} is empty")]
    EmptyPile(usize),

    #[error("Point card {index} does not exist (you hold {held})")]
    PointCardOutOfRange { index: usize, held: usize },

    #[error("Expected {expected}")]
    WrongPhase { expected: &'static str },

    #[error("The game is over")]
    GameOver,

    #[error("Could not understand '{0}'")]
    Unparsable(String),
}

/// An action that passed [`GameState::validate`]
///
/// Only `validate` can build one, so [`GameState::apply`] never sees an
/// unchecked action. The token is neither `Clone` nor `Copy`: applying it
/// consumes it, and it is only meaningful for the state that produced it.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidatedAction {
    actor: ActorId,
    action: ActorAction,
}

impl ValidatedAction {
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn action(&self) -> &ActorAction {
        &self.action
    }
}

impl GameState {
    /// Check an action for the active actor against the current state
    pub fn validate(&self, action: ActorAction) -> Result<ValidatedAction, ActionError> {
        match &action {
            ActorAction::TakeVegetables(spots) => {
                if spots.is_empty() || spots.len() > MAX_VEGETABLES_PER_TURN {
                    return Err(ActionError::Cardinality(spots.len()));
                }
                for (i, &spot) in spots.iter().enumerate() {
                    if spot >= self.market.spot_count() {
                        return Err(ActionError::SpotOutOfRange {
                            spot,
                            spots: self.market.spot_count(),
                        });
                    }
                    if spots[..i].contains(&spot) {
                        return Err(ActionError::DuplicateSpot(Market::spot_letter(spot)));
                    }
                    if !self.market.is_occupied(spot) {
                        return Err(ActionError::EmptySpot(Market::spot_letter(spot)));
                    }
                }
            }
            ActorAction::TakePointCard(pile) => {
                let piles = self.market.columns();
                if *pile >= piles {
                    return Err(ActionError::PileOutOfRange { pile: *pile, piles });
                }
                if self.market.top_point_card(*pile).is_none() {
                    return Err(ActionError::EmptyPile(*pile));
                }
            }
            ActorAction::SwapOneCard(Some(index)) => {
                let held = self.active_state().point_cards.len();
                if *index >= held {
                    return Err(ActionError::PointCardOutOfRange {
                        index: *index,
                        held,
                    });
                }
            }
            ActorAction::SwapOneCard(None) => {}
        }

        Ok(ValidatedAction {
            actor: self.active_actor(),
            action,
        })
    }

    /// Carry out a validated action for the active actor
    pub fn apply(&mut self, validated: ValidatedAction) {
        debug_assert_eq!(validated.actor, self.active_actor());
        let actor = validated.actor;
        match validated.action {
            ActorAction::TakeVegetables(spots) => {
                for spot in spots {
                    let card = self
                        .market
                        .take_vegetables(spot)
                        .unwrap_or_else(|| panic!("validated spot {spot} is empty"));
                    self.actors[actor].add_vegetable(card.vegetable);
                }
            }
            ActorAction::TakePointCard(pile) => {
                let card = self
                    .market
                    .take_point_card(pile)
                    .unwrap_or_else(|| panic!("validated pile {pile} is empty"));
                self.actors[actor].add_point_card(card);
            }
            ActorAction::SwapOneCard(Some(index)) => {
                let card = self.actors[actor]
                    .remove_point_card(index)
                    .unwrap_or_else(|| panic!("validated point card {index} is missing"));
                self.actors[actor].add_vegetable(card.vegetable);
            }
            ActorAction::SwapOneCard(None) => {}
        }
    }

    /// Announcement of an action, one line per card moved
    ///
    /// Must be called before the action is applied, while the cards it
    /// names are still in place.
    pub fn describe(&self, validated: &ValidatedAction) -> String {
        let actor = validated.actor;
        match &validated.action {
            ActorAction::TakeVegetables(spots) => spots
                .iter()
                .filter_map(|&spot| self.market.spot(spot))
                .map(|card| format!("Player {actor} drew {} from market", card.vegetable))
                .collect::<Vec<_>>()
                .join("\n"),
            ActorAction::TakePointCard(pile) => match self.market.top_point_card(*pile) {
                Some(card) => format!("Player {actor} drew {} from market", card.criterion),
                None => format!("Player {actor} drew from empty pile {pile}"),
            },
            ActorAction::SwapOneCard(Some(index)) => {
                match self.actors[actor].point_cards.get(*index) {
                    Some(card) => format!(
                        "Player {actor} swapped {} to {}",
                        card.criterion, card.vegetable
                    ),
                    None => format!("Player {actor} swapped a missing card"),
                }
            }
            ActorAction::SwapOneCard(None) => format!("Player {actor} did not swap any card"),
        }
    }
}

fn unparsable(input: &[u8]) -> ActionError {
    ActionError::Unparsable(String::from_utf8_lossy(input).trim().to_string())
}

fn spot_from_letter(letter: u8) -> Option<usize> {
    match letter.to_ascii_uppercase() {
        upper @ b'A'..=b'F' => Some((upper - b'A') as usize),
        _ => None,
    }
}

/// Decode a market decision typed by a human
///
/// One digit takes the top point card of that pile; one or two letters
/// `A`-`F` (any case) take vegetables from those spots.
pub fn parse_market_input(input: &[u8]) -> Result<ActorAction, ActionError> {
    let trimmed = input.trim_ascii();
    match trimmed {
        [digit @ b'0'..=b'9'] => Ok(ActorAction::TakePointCard((digit - b'0') as usize)),
        [letter] => spot_from_letter(*letter)
            .map(ActorAction::take_one)
            .ok_or_else(|| unparsable(input)),
        [first, second] => match (spot_from_letter(*first), spot_from_letter(*second)) {
            (Some(a), Some(b)) => Ok(ActorAction::take_two(a, b)),
            _ => Err(unparsable(input)),
        },
        _ => Err(unparsable(input)),
    }
}

/// Decode a swap decision typed by a human: `n` declines, a number picks a
/// point card by position
pub fn parse_swap_input(input: &[u8]) -> Result<ActorAction, ActionError> {
    let trimmed = input.trim_ascii();
    if trimmed.eq_ignore_ascii_case(b"n") {
        return Ok(ActorAction::SwapOneCard(None));
    }
    std::str::from_utf8(trimmed)
        .ok()
        .and_then(|text| text.parse::<usize>().ok())
        .map(|index| ActorAction::SwapOneCard(Some(index)))
        .ok_or_else(|| unparsable(input))
}
