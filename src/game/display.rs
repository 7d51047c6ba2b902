//! Text shown to human players

use crate::core::{ActorId, VegetableType};
use crate::game::GameState;
use crate::market::Market;
use std::fmt::Write;

/// Prompt for the market step of a turn
pub const MARKET_PROMPT: &str = "pick 1 or 2 vegetables example: AB or\npick 1 point card example: 0\n";

/// Prompt for the optional swap after the market step
pub const SWAP_PROMPT: &str =
    "pick 0-1 point card to flip to vegetable, type n to pick none example: 5\n";

/// Face-up spots and the point side on top of each pile
pub fn market_text(state: &GameState) -> String {
    let market = &state.market;
    let mut out = String::from("---- MARKET ----\n");
    for spot in 0..market.spot_count() {
        if let Some(card) = market.spot(spot) {
            let _ = writeln!(out, "[{}] {}", Market::spot_letter(spot), card.vegetable);
        }
    }
    out.push_str("piles:\n");
    for pile in 0..market.columns() {
        match market.top_point_card(pile) {
            Some(card) => {
                let _ = writeln!(out, "[{}] {}", pile, card.criterion);
            }
            None => out.push('\n'),
        }
    }
    out
}

/// An actor's score, vegetables and point cards
pub fn hand_text(state: &GameState, actor: ActorId) -> String {
    let holdings = state.actor(actor);
    let mut out = String::new();
    let _ = writeln!(out, "---- Player {actor} ----");
    let _ = writeln!(out, "{} current score", state.score(actor));
    out.push_str("--------\n");
    for vegetable in VegetableType::ALL {
        let _ = writeln!(out, "{} {}", holdings.count(vegetable), vegetable);
    }
    out.push_str("---- point cards ----\n");
    for (i, card) in holdings.point_cards.iter().enumerate() {
        let _ = writeln!(out, "{}: {}", i, card.criterion);
    }
    out
}

/// Broadcast header plus one line per card moved
pub fn action_text(description: &str) -> String {
    format!("---- Action ----\n{description}\n")
}
