//! Point Salad - card-drafting game engine
//!
//! An authoritative host drives the market, validates every action and
//! scores hands with a small rule language. Humans join over TCP; bots
//! play in-process.

pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod market;
pub mod network;
pub mod tournament;

pub use error::{Result, SaladError};
