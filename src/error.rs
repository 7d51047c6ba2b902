//! Error types for the Point Salad engine

use crate::core::{ActorId, VegetableType};
use crate::game::ActionError;
use crate::loader::criteria::CriterionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaladError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid rule on card {card} {vegetable} face: {source}")]
    InvalidRule {
        card: String,
        vegetable: VegetableType,
        #[source]
        source: CriterionError,
    },

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("No legal action available for actor {0}")]
    NoLegalAction(ActorId),

    #[error("Illegal action from actor {actor}: {source}")]
    IllegalAction {
        actor: ActorId,
        #[source]
        source: ActionError,
    },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SaladError>;
