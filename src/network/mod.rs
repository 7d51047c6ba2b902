//! TCP transport between the host and remote players
//!
//! A client opens with the 4-byte magic `ABCZ` and the host answers `ZCBA`.
//! After that the host sends typed frames (`[kind u8][len u32 BE][utf-8]`)
//! and the client answers prompts with short length-prefixed frames
//! (`[len u32 BE][bytes]`). An empty answer means quit.

pub mod codec;
pub mod tcp;

pub use codec::{
    read_decision, read_outbound, write_decision, write_outbound, MAX_DECISION_BYTES,
    MAX_TEXT_BYTES, PING_MAGIC, PONG_MAGIC,
};
pub use tcp::{accept_players, connect, handshake_client, handshake_host, spawn_connection};
