//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (packets by spawn order, nodes by id)
//! - Time enters only as caller-supplied timestamps
//! - No rendering or platform dependencies

pub mod level;
pub mod state;
pub mod tick;

pub use level::{LevelGraph, Node, NodeId, NodeRole};
pub use state::{
    BurstColor, GamePhase, GameState, Packet, PacketKind, Particle, Payload, RenderSnapshot,
    SwitchRouter,
};
pub use tick::tick;
